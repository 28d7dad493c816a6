//! Authentication middleware that validates cookies, extends sessions, and handles redirects.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{StatusCode, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use time::Duration;

use crate::{
    AppState,
    auth::{
        cookie::{extend_auth_cookie_duration_if_needed, get_token_from_cookies},
        redirect::build_log_in_redirect_url,
    },
};

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// How far each authenticated request pushes out the session expiry.
    pub cookie_duration: Duration,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

async fn auth_guard_internal(
    state: AuthState,
    request: Request,
    next: Next,
    get_redirect: impl Fn(String) -> Response,
) -> Response {
    let log_in_redirect_url = build_log_in_redirect_url(&request);

    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(err) => {
            tracing::error!("Error getting cookie jar: {err:?}. Redirecting to log in page.");
            return get_redirect(log_in_redirect_url);
        }
    };
    let user_id = match get_token_from_cookies(&jar) {
        Ok(token) => token.user_id,
        Err(error) => {
            tracing::debug!("Rejected session for {}: {error}", parts.uri);
            return get_redirect(log_in_redirect_url);
        }
    };

    parts.extensions.insert(user_id);
    let request = Request::from_parts(parts, body);
    let response = next.run(request).await;

    let (mut parts, body) = response.into_parts();
    let jar = match extend_auth_cookie_duration_if_needed(jar.clone(), state.cookie_duration) {
        Ok(updated_jar) => updated_jar,
        Err(err) => {
            tracing::error!("Error extending cookie duration: {err:?}. Rolling back cookie jar.");
            jar
        }
    };
    for (key, val) in jar.into_response().headers().iter() {
        if key != SET_COOKIE {
            continue;
        }

        parts.headers.append(key, val.to_owned());
    }

    Response::from_parts(parts, body)
}

/// Middleware function that checks for a valid authorization cookie.
/// The user ID is placed into request and then the request executed normally if the cookie is valid, otherwise a redirect to the log-in page is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    auth_guard_internal(state, request, next, |redirect_url| {
        Redirect::to(&redirect_url).into_response()
    })
    .await
}

/// Like [auth_guard], but responds with a HTMX redirect for requests made by HTMX.
pub async fn auth_guard_hx(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    auth_guard_internal(state, request, next, |redirect_url| {
        (HxRedirect(redirect_url), StatusCode::OK).into_response()
    })
    .await
}

#[cfg(test)]
mod auth_guard_tests {
    use axum::{
        Extension, Router,
        extract::{Path, State},
        middleware,
        routing::{get, post},
    };
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key, SameSite},
    };
    use axum_test::TestServer;
    use sha2::Digest;
    use time::{Duration, OffsetDateTime};

    use crate::{
        Error,
        auth::{
            DEFAULT_COOKIE_DURATION, auth_guard, auth_guard_hx, cookie::COOKIE_TOKEN,
            redirect::log_in_url_for, set_auth_cookie,
        },
        endpoints::{self, format_endpoint},
        user::UserID,
    };

    use super::AuthState;

    async fn test_handler(Extension(user_id): Extension<UserID>) -> String {
        format!("Hello, user {user_id}!")
    }

    async fn stub_log_in_route(
        Path((user_id, seconds)): Path<(i64, i64)>,
        jar: PrivateCookieJar,
    ) -> Result<PrivateCookieJar, Error> {
        set_auth_cookie(jar, UserID::new(user_id), Duration::seconds(seconds))
    }

    const TEST_LOG_IN_ROUTE_PATH: &str = "/log_in/{user_id}/{seconds}";
    const TEST_PROTECTED_ROUTE: &str = "/protected";
    const TEST_API_ROUTE: &str = "/api/protected";

    fn get_state(cookie_duration: Duration) -> AuthState {
        let hash = sha2::Sha512::digest("nafstenoas");

        AuthState {
            cookie_key: Key::from(&hash),
            cookie_duration,
        }
    }

    fn get_test_server(cookie_duration: Duration) -> TestServer {
        let state = get_state(cookie_duration);

        let app = Router::new()
            .route(TEST_PROTECTED_ROUTE, get(test_handler))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
            .route(TEST_LOG_IN_ROUTE_PATH, post(stub_log_in_route))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    fn get_test_server_hx(cookie_duration: Duration) -> TestServer {
        let state = get_state(cookie_duration);

        let app = Router::new()
            .route(TEST_API_ROUTE, get(test_handler))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    fn log_in_path(user_id: i64, seconds: i64) -> String {
        format!(
            "{}/{seconds}",
            format_endpoint("/log_in/{user_id}", user_id)
        )
    }

    #[track_caller]
    fn assert_date_time_close(left: OffsetDateTime, right: OffsetDateTime) {
        assert!(
            (left - right).abs() < Duration::seconds(2),
            "got date time {left:?}, want {right:?}"
        );
    }

    #[tokio::test]
    async fn get_protected_route_with_valid_cookie() {
        let server = get_test_server(DEFAULT_COOKIE_DURATION);
        let response = server.post(&log_in_path(42, 300)).await;

        response.assert_status_ok();
        let token_cookie = response.cookie(COOKIE_TOKEN);

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(token_cookie)
            .await;

        response.assert_status_ok();
        response.assert_text("Hello, user 42!");
    }

    #[tokio::test]
    async fn auth_guard_extends_short_session() {
        let server = get_test_server(Duration::hours(1));
        let response = server.post(&log_in_path(1, 5)).await;
        let jar = response.cookies();

        let response = server.get(TEST_PROTECTED_ROUTE).add_cookies(jar).await;

        let token_cookie = response.cookie(COOKIE_TOKEN);
        assert_date_time_close(
            token_cookie.expires_datetime().unwrap(),
            OffsetDateTime::now_utc() + Duration::hours(1),
        );
        assert_eq!(token_cookie.secure(), Some(true));
        assert_eq!(token_cookie.http_only(), Some(true));
        assert_eq!(token_cookie.same_site(), Some(SameSite::Strict));
    }

    #[tokio::test]
    async fn get_protected_route_with_no_auth_cookie_redirects_to_log_in() {
        let server = get_test_server(DEFAULT_COOKIE_DURATION);
        let response = server.get(TEST_PROTECTED_ROUTE).await;

        response.assert_status_see_other();
        assert_eq!(
            response.header("location"),
            log_in_url_for(TEST_PROTECTED_ROUTE)
        );
    }

    #[tokio::test]
    async fn get_protected_route_with_invalid_auth_cookie_redirects_to_log_in() {
        let server = get_test_server(DEFAULT_COOKIE_DURATION);
        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(Cookie::build((COOKIE_TOKEN, "FOOBAR")).build())
            .await;

        response.assert_status_see_other();
        assert_eq!(
            response.header("location"),
            log_in_url_for(TEST_PROTECTED_ROUTE)
        );
    }

    #[tokio::test]
    async fn get_protected_route_with_expired_session_redirects_to_log_in() {
        let server = get_test_server(DEFAULT_COOKIE_DURATION);
        let response = server.post(&log_in_path(1, -60)).await;
        let token_cookie = response.cookie(COOKIE_TOKEN);

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(token_cookie)
            .await;

        response.assert_status_see_other();
    }

    #[tokio::test]
    async fn api_route_uses_hx_current_url_for_redirect() {
        let server = get_test_server_hx(DEFAULT_COOKIE_DURATION);
        let current_url = "/expenses?range=this-month&sort=amount";
        let response = server
            .get(TEST_API_ROUTE)
            .add_header("HX-Request", "true")
            .add_header("HX-Current-URL", current_url)
            .await;

        response.assert_status_ok();
        assert_eq!(response.header("hx-redirect"), log_in_url_for(current_url));
        assert_ne!(
            response.header("hx-redirect"),
            endpoints::LOG_IN_VIEW,
            "redirect should carry the current page"
        );
    }
}
