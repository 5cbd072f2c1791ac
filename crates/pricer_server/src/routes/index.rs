//! Interactive pricing form served at `/`.

use axum::{response::Html, routing::get, Router};

use super::AppState;

const INDEX_HTML: &str = include_str!("../../static/index.html");

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(index_handler))
}

/// GET / - HTML form posting JSON to `/api/price`
async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}
