//! The registration page for creating an account.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error, PasswordHash,
    auth::{session::sign_up, set_auth_cookie},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, email_input,
        loading_spinner, log_in_register, password_input,
    },
    internal_server_error::get_internal_server_error_redirect,
};

/// The minimum number of characters the password should have to be considered valid on the client side (server-side validation is done on top of this validation).
const PASSWORD_INPUT_MIN_LENGTH: u8 = 14;

fn confirm_password_input(min_length: u8, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label
                for="confirm-password"
                class=(FORM_LABEL_STYLE)
            {
                "Confirm Password"
            }

            input
                type="password"
                name="confirm_password"
                id="confirm-password"
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                minlength=(min_length);

            @if let Some(error_message) = error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }
        }
    }
}

/// Error messages shown next to the registration form fields.
#[derive(Default)]
struct FormErrors<'a> {
    email: Option<&'a str>,
    password: Option<&'a str>,
    confirm_password: Option<&'a str>,
}

fn registration_form(email: &str, errors: FormErrors) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS)
            hx-indicator="#indicator"
            hx-disabled-elt="#email, #password, #confirm-password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            (email_input(email, errors.email))
            (password_input("", PASSWORD_INPUT_MIN_LENGTH, errors.password))
            (confirm_password_input(PASSWORD_INPUT_MIN_LENGTH, errors.confirm_password))

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Create Account"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "

                a
                    href=(endpoints::LOG_IN_VIEW) tabindex="0"
                    class="font-semibold leading-6 text-blue-600 hover:text-blue-500 dark:text-blue-500 dark:hover:text-blue-400"
                {
                  "Log in here"
                }
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let registration_form = registration_form("", FormErrors::default());
    let content = log_in_register("Create an account", &registration_form);
    base("Register", &[], &content).into_response()
}

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The bcrypt cost for hashing new passwords.
    pub password_cost: u32,
    /// The connection holding the user table.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            password_cost: PasswordHash::DEFAULT_COST,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<RegistrationState> for Key {
    fn from_ref(state: &RegistrationState) -> Self {
        state.cookie_key.clone()
    }
}

/// The data entered in the registration form.
#[derive(Serialize, Deserialize)]
pub struct RegisterForm {
    /// The email address to sign in with.
    pub email: String,
    /// The new password.
    pub password: String,
    /// The new password typed a second time.
    pub confirm_password: String,
}

/// Create an account, sign the new user in and send them to the dashboard.
///
/// Problems with the input are shown next to the offending field.
pub async fn register_user(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<RegisterForm>,
) -> Response {
    if user_data.password != user_data.confirm_password {
        return registration_form(
            &user_data.email,
            FormErrors {
                confirm_password: Some("Passwords do not match"),
                ..Default::default()
            },
        )
        .into_response();
    }

    let sign_up_result = match state.db_connection.lock() {
        Ok(connection) => sign_up(
            &user_data.email,
            &user_data.password,
            state.password_cost,
            &connection,
        ),
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    let user = match sign_up_result {
        Ok(user) => user,
        Err(error @ Error::InvalidEmail(_)) => {
            let message = error.to_string();
            return registration_form(
                &user_data.email,
                FormErrors {
                    email: Some(message.as_str()),
                    ..Default::default()
                },
            )
            .into_response();
        }
        Err(Error::DuplicateEmail) => {
            return registration_form(
                &user_data.email,
                FormErrors {
                    email: Some("That email address is already registered, try logging in"),
                    ..Default::default()
                },
            )
            .into_response();
        }
        Err(error @ Error::TooWeak(_)) => {
            let message = error.to_string();
            return registration_form(
                &user_data.email,
                FormErrors {
                    password: Some(message.as_str()),
                    ..Default::default()
                },
            )
            .into_response();
        }
        Err(error) => {
            tracing::error!("An unhandled error occurred while registering a user: {error}");
            return get_internal_server_error_redirect();
        }
    };

    tracing::info!("Registered user {}", user.id);

    match set_auth_cookie(jar, user.id, state.cookie_duration) {
        Ok(jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
            jar,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An error occurred while setting the auth cookie: {error}");
            get_internal_server_error_redirect()
        }
    }
}

#[cfg(test)]
mod register_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, body::Body, extract::State, http::Response, http::StatusCode};
    use axum_extra::extract::PrivateCookieJar;
    use rusqlite::Connection;
    use scraper::Selector;

    use crate::{
        app_state::create_cookie_key,
        auth::DEFAULT_COOKIE_DURATION,
        db::initialize,
        endpoints,
        test_utils::{
            assert_form_input, assert_hx_endpoint, assert_hx_redirect, assert_valid_html,
            must_get_form, parse_html_document, parse_html_fragment,
        },
        user::count_users,
    };

    use super::{RegisterForm, RegistrationState, get_register_page, register_user};

    const PASSWORD: &str = "roostersgocockledoodledoo";

    fn get_state() -> RegistrationState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        RegistrationState {
            cookie_key: create_cookie_key("foobar"),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            password_cost: 4,
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn form(email: &str, password: &str, confirm_password: &str) -> RegisterForm {
        RegisterForm {
            email: email.to_owned(),
            password: password.to_owned(),
            confirm_password: confirm_password.to_owned(),
        }
    }

    async fn register(state: RegistrationState, form: RegisterForm) -> Response<Body> {
        let jar = PrivateCookieJar::new(state.cookie_key.clone());
        register_user(State(state), jar, Form(form)).await
    }

    async fn error_messages(response: Response<Body>) -> Vec<String> {
        let html = parse_html_fragment(response).await;
        html.select(&Selector::parse("p.text-red-500").unwrap())
            .map(|p| p.text().collect::<String>().trim().to_owned())
            .collect()
    }

    #[tokio::test]
    async fn render_register_page() {
        let response = get_register_page().await;
        assert_eq!(response.status(), StatusCode::OK);

        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::USERS, "hx-post");
        assert_form_input(&form, "email", "email");
        assert_form_input(&form, "password", "password");
        assert_form_input(&form, "confirm_password", "password");
    }

    #[tokio::test]
    async fn register_creates_user_and_redirects_to_dashboard() {
        let state = get_state();
        let connection = state.db_connection.clone();

        let response = register(state, form("jamie@example.com", PASSWORD, PASSWORD)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::DASHBOARD_VIEW);
        assert!(response.headers().get("set-cookie").is_some());
        assert_eq!(count_users(&connection.lock().unwrap()), Ok(1));
    }

    #[tokio::test]
    async fn register_rejects_mismatched_passwords() {
        let response = register(
            get_state(),
            form("jamie@example.com", PASSWORD, "turkeysgogobblegobble"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(error_messages(response).await, vec!["Passwords do not match"]);
    }

    #[tokio::test]
    async fn register_rejects_weak_password() {
        let response = register(get_state(), form("jamie@example.com", "hunter2", "hunter2")).await;

        let messages = error_messages(response).await;
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("password is too weak"));
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let state = get_state();
        register(state.clone(), form("jamie@example.com", PASSWORD, PASSWORD)).await;

        let response = register(state, form("jamie@example.com", PASSWORD, PASSWORD)).await;

        assert_eq!(
            error_messages(response).await,
            vec!["That email address is already registered, try logging in"]
        );
    }

    #[tokio::test]
    async fn register_rejects_invalid_email() {
        let response = register(get_state(), form("jamie", PASSWORD, PASSWORD)).await;

        assert_eq!(
            error_messages(response).await,
            vec!["jamie is not a valid email address"]
        );
    }
}
