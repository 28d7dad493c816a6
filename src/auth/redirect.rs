//! Works out where to send a user after they log in.

use axum::{extract::Request, http::Uri};

use crate::endpoints;

fn local_path_and_query(uri: &Uri) -> Option<String> {
    let path_and_query = uri.path_and_query()?.as_str();

    let is_local = path_and_query.starts_with('/') && !path_and_query.starts_with("//");
    let is_log_in_page = uri.path() == endpoints::LOG_IN_VIEW;

    (is_local && !is_log_in_page).then(|| path_and_query.to_owned())
}

/// Keep `raw_url` only if it is a relative path on this site that is not the log-in page.
pub(crate) fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }

    local_path_and_query(&uri)
}

/// The page the user was trying to reach when the request was sent.
///
/// API requests come from HTMX, so the page is read from the `HX-Current-URL` header.
fn redirect_target(request: &Request) -> Option<String> {
    if !request.uri().path().starts_with("/api") {
        let path_and_query = request.uri().path_and_query()?.as_str();
        return normalize_redirect_url(path_and_query);
    }

    let current_url = request
        .headers()
        .get("hx-current-url")
        .and_then(|header| header.to_str().ok());

    match current_url {
        Some(current_url) => {
            // HTMX sends the absolute URL of the page.
            let redirect_url = current_url
                .parse::<Uri>()
                .ok()
                .and_then(|uri| local_path_and_query(&uri));
            if redirect_url.is_none() {
                tracing::warn!("Invalid HX-Current-URL header value: {current_url}");
            }
            redirect_url
        }
        None => {
            tracing::warn!("Missing HX-Current-URL header for {}", request.uri());
            None
        }
    }
}

/// The log-in page URL with a `redirect_url` parameter that brings the user back to `target`.
pub(crate) fn log_in_url_for(target: &str) -> String {
    match serde_urlencoded::to_string([("redirect_url", target)]) {
        Ok(query) => endpoints::with_query(endpoints::LOG_IN_VIEW, &query),
        Err(error) => {
            tracing::error!("Could not encode redirect URL {target}: {error}");
            endpoints::LOG_IN_VIEW.to_owned()
        }
    }
}

/// The log-in page URL for a request that needs a session, falling back to the dashboard.
pub(crate) fn build_log_in_redirect_url(request: &Request) -> String {
    let target = redirect_target(request).unwrap_or_else(|| endpoints::DASHBOARD_VIEW.to_owned());

    log_in_url_for(&target)
}
