//! The log-in page and the handler for log-in requests.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Query, State},
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
    AppState, Error,
    auth::{
        invalidate_auth_cookie, redirect::normalize_redirect_url, session::sign_in,
        set_auth_cookie,
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, base, email_input, loading_spinner, log_in_register, password_input,
    },
};

/// How long the auth cookie should last if the user selects "remember me" at log-in.
const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

pub(crate) const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect email or password.";
const INTERNAL_ERROR_MSG: &str = "An internal error occurred. Please try again later.";

fn log_in_form(email: &str, error_message: Option<&str>, redirect_url: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-indicator="#indicator"
            hx-disabled-elt="#email, #password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            (email_input(email, None))
            (password_input("", 0, error_message))

            div class="flex items-center gap-x-3"
            {
                input
                    type="checkbox"
                    name="remember_me"
                    id="remember_me"
                    tabindex="0"
                    class="rounded-xs";

                label
                    for="remember_me"
                    class="block text-sm font-medium text-gray-900 dark:text-white"
                {
                    "Keep me logged in for one week"
                }
            }

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Log in"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400" {
                "Don't have an account? "
                a
                    href=(endpoints::REGISTER_VIEW) tabindex="0"
                    class="font-semibold leading-6 text-blue-600 hover:text-blue-500 dark:text-blue-500 dark:hover:text-blue-400"
                {
                  "Register here"
                }
            }
        }
    }
}

fn parse_redirect_url(raw_url: Option<&str>, source: &str) -> Option<String> {
    let redirect_url = raw_url.and_then(normalize_redirect_url);

    if let (None, Some(raw_url)) = (&redirect_url, raw_url) {
        tracing::warn!("Invalid redirect URL from {source}: {raw_url}");
    }

    redirect_url
}

/// The page to return to after logging in.
#[derive(Deserialize)]
pub struct RedirectQuery {
    /// A local URL, e.g. "/expenses?range=this-month".
    pub redirect_url: Option<String>,
}

/// Display the log-in page.
pub async fn get_log_in_page(Query(query): Query<RedirectQuery>) -> Response {
    let redirect_url = parse_redirect_url(query.redirect_url.as_deref(), "log-in query");
    let log_in_form = log_in_form("", None, redirect_url.as_deref());
    let content = log_in_register("Log in to your account", &log_in_form);
    base("Log In", &[], &content).into_response()
}

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The connection holding the user table.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

/// The raw data entered by the user in the log-in form.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInData {
    /// Email entered during log-in.
    pub email: String,

    /// Password entered during log-in.
    pub password: String,

    /// Whether to extend the initial auth cookie duration.
    ///
    /// Checkboxes only send a value when ticked, so any `Some` means `true`.
    pub remember_me: Option<String>,

    /// Optional URL to redirect to after logging in.
    pub redirect_url: Option<String>,
}

/// Handler for log-in requests via the POST method.
///
/// On success the auth cookie is set and the client is redirected to the
/// dashboard, or the page they were trying to reach. Otherwise the form is
/// returned with a message explaining the problem.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<LogInData>,
) -> Response {
    let redirect_url = parse_redirect_url(user_data.redirect_url.as_deref(), "log-in form");
    let redirect_url = redirect_url.as_deref();

    let sign_in_result = match state.db_connection.lock() {
        Ok(connection) => sign_in(&user_data.email, &user_data.password, &connection),
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    let user = match sign_in_result {
        Ok(user) => user,
        Err(Error::InvalidCredentials) => {
            return log_in_form(
                &user_data.email,
                Some(INVALID_CREDENTIALS_ERROR_MSG),
                redirect_url,
            )
            .into_response();
        }
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            return log_in_form(&user_data.email, Some(INTERNAL_ERROR_MSG), redirect_url)
                .into_response();
        }
    };

    let cookie_duration = if user_data.remember_me.is_some() {
        REMEMBER_ME_COOKIE_DURATION
    } else {
        state.cookie_duration
    };

    let redirect_url = redirect_url.unwrap_or(endpoints::DASHBOARD_VIEW);
    tracing::info!("User {} logged in", user.id);

    match set_auth_cookie(jar.clone(), user.id, cookie_duration) {
        Ok(updated_jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(redirect_url.to_owned()),
            updated_jar,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Error setting auth cookie: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_auth_cookie(jar),
            )
                .into_response()
        }
    }
}


#[cfg(test)]
mod log_in_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form, Router,
        body::Body,
        extract::State,
        http::{Response, StatusCode},
        routing::post,
    };
    use axum_extra::extract::PrivateCookieJar;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use scraper::Selector;
    use time::{Duration, OffsetDateTime};

    use crate::{
        app_state::create_cookie_key,
        auth::{DEFAULT_COOKIE_DURATION, cookie::COOKIE_TOKEN, session::sign_up},
        db::initialize,
        endpoints,
        test_utils::{assert_hx_redirect, parse_html_fragment},
    };

    use super::{
        INVALID_CREDENTIALS_ERROR_MSG, LogInData, LoginState, REMEMBER_ME_COOKIE_DURATION,
        post_log_in,
    };

    const EMAIL: &str = "jamie@example.com";
    const PASSWORD: &str = "roostersgocockledoodledoo";

    fn get_state(with_user: bool) -> LoginState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        if with_user {
            sign_up(EMAIL, PASSWORD, 4, &connection).expect("Could not create test user");
        }

        LoginState {
            cookie_key: create_cookie_key("foobar"),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn form(password: &str, redirect_url: Option<&str>) -> LogInData {
        LogInData {
            email: EMAIL.to_owned(),
            password: password.to_owned(),
            remember_me: None,
            redirect_url: redirect_url.map(str::to_owned),
        }
    }

    async fn new_log_in_request(state: LoginState, log_in_form: LogInData) -> Response<Body> {
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        post_log_in(State(state), jar, Form(log_in_form)).await
    }

    async fn assert_error_message(response: Response<Body>, want: &str) {
        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let error = html
            .select(&Selector::parse("p.text-red-500").unwrap())
            .next()
            .expect("expected error message paragraph")
            .text()
            .collect::<String>();
        assert_eq!(error.trim(), want);
    }

    #[tokio::test]
    async fn log_in_succeeds_with_valid_credentials() {
        let response = new_log_in_request(get_state(true), form(PASSWORD, None)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::DASHBOARD_VIEW);
    }

    #[tokio::test]
    async fn log_in_redirects_to_requested_url() {
        let redirect_url = "/expenses?range=this-year";

        let response =
            new_log_in_request(get_state(true), form(PASSWORD, Some(redirect_url))).await;

        assert_hx_redirect(&response, redirect_url);
    }

    #[tokio::test]
    async fn log_in_falls_back_on_invalid_redirect_url() {
        let response = new_log_in_request(
            get_state(true),
            form(PASSWORD, Some("https://example.com")),
        )
        .await;

        assert_hx_redirect(&response, endpoints::DASHBOARD_VIEW);
    }

    #[tokio::test]
    async fn log_in_fails_with_incorrect_password() {
        let response =
            new_log_in_request(get_state(true), form("turkeysgogobblegobble", None)).await;

        assert_error_message(response, INVALID_CREDENTIALS_ERROR_MSG).await;
    }

    #[tokio::test]
    async fn log_in_fails_for_unknown_user() {
        let response = new_log_in_request(get_state(false), form(PASSWORD, None)).await;

        assert_error_message(response, INVALID_CREDENTIALS_ERROR_MSG).await;
    }

    #[tokio::test]
    async fn log_in_fails_with_missing_credentials() {
        let app = Router::new()
            .route(endpoints::LOG_IN_API, post(post_log_in))
            .with_state(get_state(false));
        let server = TestServer::try_new(app).expect("Could not create test server.");

        server
            .post(endpoints::LOG_IN_API)
            .content_type("application/x-www-form-urlencoded")
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn remember_me_extends_auth_cookie_through_form() {
        let app = Router::new()
            .route(endpoints::LOG_IN_API, post(post_log_in))
            .with_state(get_state(true));
        let server = TestServer::try_new(app).expect("Could not create test server.");
        let form = [
            ("email", EMAIL),
            ("password", PASSWORD),
            ("remember_me", "on"),
        ];

        let response = server.post(endpoints::LOG_IN_API).form(&form).await;

        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        let expires = response
            .cookie(COOKIE_TOKEN)
            .expires_datetime()
            .expect("cookie should expire");
        let want = OffsetDateTime::now_utc() + REMEMBER_ME_COOKIE_DURATION;
        assert!(
            (expires - want).abs() < Duration::seconds(2),
            "got expiry {expires:?}, want {want:?}"
        );
    }
}
