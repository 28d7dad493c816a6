//! Accounts and sessions: registration, log in and out, the session cookie and the guard
//! middleware that protects the app's pages.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod redirect;
mod register;
mod session;
mod token;

pub use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{AuthState, auth_guard, auth_guard_hx};
pub use register::{get_register_page, register_user};
pub use session::{sign_in, sign_up};
