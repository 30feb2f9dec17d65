use axum::{body::Body, response::Response};
use scraper::Html;

/// Read the whole response body as text.
pub(crate) async fn response_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_else(|error| panic!("could not read the response body: {error}"));

    String::from_utf8_lossy(&bytes).into_owned()
}

/// Parse a full page, e.g. the dashboard or an error page.
pub(crate) async fn parse_html_document(response: Response<Body>) -> Html {
    Html::parse_document(&response_text(response).await)
}

/// Parse an HTMX swap target, e.g. an alert or the report modal.
pub(crate) async fn parse_html_fragment(response: Response<Body>) -> Html {
    Html::parse_fragment(&response_text(response).await)
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    if let Some(error) = html.errors.first() {
        panic!(
            "{} HTML parse error(s), the first being {error:?}",
            html.errors.len()
        );
    }
}
