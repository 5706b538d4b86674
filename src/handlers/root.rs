use axum::{response::Html, Json};
use serde_json::{json, Value};

const INDEX_HTML: &str = include_str!("../static/index.html");

// GET / - Admin page
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

// GET /health
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": 200, "message": "OK" }))
}
