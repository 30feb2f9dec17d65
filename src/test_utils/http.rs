use axum::{body::Body, http::StatusCode, response::Response};

#[track_caller]
pub(crate) fn assert_status(response: &Response<Body>, status: StatusCode) {
    assert_eq!(
        response.status(),
        status,
        "unexpected status, headers: {:?}",
        response.headers()
    );
}

#[track_caller]
pub(crate) fn assert_status_ok(response: &Response<Body>) {
    assert_status(response, StatusCode::OK);
}

#[track_caller]
pub(crate) fn assert_content_type(response: &Response<Body>, content_type: &str) {
    assert_eq!(get_header(response, "content-type"), content_type);
}

/// The value of `header_name`, panicking if it is missing or not visible ASCII.
#[track_caller]
pub(crate) fn get_header(response: &Response<Body>, header_name: &str) -> String {
    match response.headers().get(header_name).map(|value| value.to_str()) {
        Some(Ok(value)) => value.to_owned(),
        Some(Err(error)) => panic!("header {header_name} is not text: {error}"),
        None => panic!("response has no {header_name} header"),
    }
}

/// Mutating endpoints answer HTMX with `303 See Other` and an `HX-Redirect` target.
#[track_caller]
pub(crate) fn assert_hx_redirect(response: &Response<Body>, endpoint: &str) {
    assert_status(response, StatusCode::SEE_OTHER);
    assert_eq!(get_header(response, "hx-redirect"), endpoint);
}
