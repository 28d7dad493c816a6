//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::{Method, header::CONTENT_TYPE, request, response},
    middleware::Next,
    response::Response,
};

/// Form fields whose values never appear in the logs.
const REDACTED_FIELDS: [&str; 2] = ["password", "confirm_password"];

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and logged in full at the `debug` level. Password fields in
/// submitted forms are redacted. Event streams are passed through without
/// reading their body.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body_text) = read_request(request).await;

    if parts.method == Method::POST && is_form(&parts) {
        log_request(&parts, &redact_form_fields(&body_text, &REDACTED_FIELDS));
    } else {
        log_request(&parts, &body_text);
    }

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    if is_event_stream(&response) {
        tracing::info!("Sending event stream: {:#?}", response.headers());
        return response;
    }

    let (parts, body_text) = read_response(response).await;
    log_response(&parts, &body_text);

    Response::from_parts(parts, body_text.into())
}

fn is_form(parts: &request::Parts) -> bool {
    parts
        .headers
        .get(CONTENT_TYPE)
        .is_some_and(|value| value == "application/x-www-form-urlencoded")
}

fn is_event_stream(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .is_some_and(|value| value == "text/event-stream")
}

/// Replace the value of each field in `fields` with asterisks.
fn redact_form_fields(form_text: &str, fields: &[&str]) -> String {
    form_text
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((name, _)) if fields.contains(&name) => format!("{name}=********"),
            _ => pair.to_owned(),
        })
        .collect::<Vec<_>>()
        .join("&")
}

async fn body_text(body: Body) -> String {
    match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).to_string(),
        Err(error) => {
            tracing::warn!("Could not read body for logging: {error}");
            String::new()
        }
    }
}

async fn read_request(request: Request) -> (request::Parts, String) {
    let (parts, body) = request.into_parts();
    (parts, body_text(body).await)
}

async fn read_response(response: Response) -> (response::Parts, String) {
    let (parts, body) = response.into_parts();
    (parts, body_text(body).await)
}

/// The number of bytes of a body logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

fn truncate(body: &str) -> &str {
    if body.len() <= LOG_BODY_LENGTH_LIMIT {
        return body;
    }

    let mut end = LOG_BODY_LENGTH_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }

    &body[..end]
}

fn log_request(parts: &request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!("Received request: {parts:#?}\nbody: {}...", truncate(body));
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!("Received request: {parts:#?}\nbody: {body:?}");
    }
}

fn log_response(parts: &response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!("Sending response: {parts:#?}\nbody: {}...", truncate(body));
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {parts:#?}\nbody: {body:?}");
    }
}
