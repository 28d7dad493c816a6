//! Signs the user out by expiring their session cookie.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;

use crate::{auth::invalidate_auth_cookie, endpoints};

/// Invalidate the auth cookie and redirect the client to the log-in page.
pub async fn get_log_out(jar: PrivateCookieJar) -> Response {
    let jar = invalidate_auth_cookie(jar);

    (jar, Redirect::to(endpoints::LOG_IN_VIEW)).into_response()
}

#[cfg(test)]
mod log_out_tests {
    use axum::http::{StatusCode, header::SET_COOKIE};
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key},
    };
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime};

    use crate::{
        auth::{DEFAULT_COOKIE_DURATION, cookie::COOKIE_TOKEN, set_auth_cookie},
        endpoints,
        user::UserID,
    };

    use super::get_log_out;

    #[tokio::test]
    async fn log_out_invalidates_auth_cookie_and_redirects() {
        let jar = PrivateCookieJar::new(Key::from(&Sha512::digest("42")));
        let jar = set_auth_cookie(jar, UserID::new(123), DEFAULT_COOKIE_DURATION).unwrap();

        let response = get_log_out(jar).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").unwrap(),
            endpoints::LOG_IN_VIEW
        );

        let token_cookie = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|header| Cookie::parse(header.to_str().ok()?.to_owned()).ok())
            .find(|cookie| cookie.name() == COOKIE_TOKEN)
            .expect("token cookie not reset");
        assert_eq!(
            token_cookie.expires_datetime(),
            Some(OffsetDateTime::UNIX_EPOCH)
        );
        assert_eq!(token_cookie.max_age(), Some(Duration::ZERO));
    }
}
