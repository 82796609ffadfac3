//! OpenAPI document and its rendered page.

use axum::{http::header, response::Html, response::IntoResponse};

const API_YAML: &str = include_str!("../docs/api.yaml");

const REDOC_PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <title>Wallets API</title>
    <meta charset="utf-8"/>
    <meta name="viewport" content="width=device-width, initial-scale=1">
  </head>
  <body>
    <redoc spec-url="/api.yaml"></redoc>
    <script src="https://cdn.redoc.ly/redoc/latest/bundles/redoc.standalone.js"></script>
  </body>
</html>
"#;

pub async fn api_yaml() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/yaml")], API_YAML)
}

pub async fn redoc() -> Html<&'static str> {
    Html(REDOC_PAGE)
}
