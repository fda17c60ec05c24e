//! Front page and its static assets

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use magicmap_common::{MapType, Theme};

use crate::AppState;

const APP_JS: &str = include_str!("../ui/app.js");
const STYLE_CSS: &str = include_str!("../ui/style.css");

/// GET /
pub async fn serve_index() -> Html<String> {
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = env!("GIT_HASH");
    let build_timestamp = env!("BUILD_TIMESTAMP");
    let build_profile = env!("BUILD_PROFILE");

    let map_type_buttons: String = MapType::all_variants()
        .iter()
        .map(|t| {
            format!(
                r#"<button type="button" data-type="{}"{}>{}</button>"#,
                t.as_tag(),
                if *t == MapType::default() { r#" class="selected""# } else { "" },
                t.label()
            )
        })
        .collect();

    let theme_options: String = Theme::all_variants()
        .iter()
        .map(|t| format!(r#"<option value="{}">{}</option>"#, t.name(), t.label()))
        .collect();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Magic Map</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body class="theme-light">
    <header>
        <h1>✨ Magic Map</h1>
        <div>
            <select id="theme">{theme_options}</select>
            <div class="build-info">v{version} [{git_hash}]<br>{build_timestamp} ({build_profile})</div>
        </div>
    </header>
    <main>
        <section class="controls">
            <textarea id="notes" placeholder="Paste or type your notes here..."></textarea>
            <input id="image" type="file" accept="image/*">
            <div class="map-types">{map_type_buttons}</div>
            <button id="generate" type="button">Create My Map!</button>
            <button id="reset" type="button" class="secondary">Start Over</button>
        </section>
        <section>
            <div class="toolbar">
                <button id="save" type="button" class="secondary" disabled>Save Map</button>
                <button id="load" type="button" class="secondary" disabled>Load Map</button>
                <span id="confirmation" class="confirmation" style="display:none">Map saved!</span>
                <span id="tree-tools" style="display:none">
                    <button id="zoom-in" type="button" class="secondary">+</button>
                    <button id="zoom-out" type="button" class="secondary">&minus;</button>
                    <button id="export" type="button" class="secondary">Export PNG</button>
                </span>
            </div>
            <div id="map-area" class="map-area"></div>
        </section>
    </main>
    <script src="/static/app.js"></script>
</body>
</html>
"#
    ))
}

/// GET /static/app.js
pub async fn serve_app_js() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/javascript")],
        APP_JS,
    )
        .into_response()
}

/// GET /static/style.css
pub async fn serve_style_css() -> Response {
    (StatusCode::OK, [(header::CONTENT_TYPE, "text/css")], STYLE_CSS).into_response()
}

pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(serve_index))
        .route("/static/app.js", get(serve_app_js))
        .route("/static/style.css", get(serve_style_css))
}
