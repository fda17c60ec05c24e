//! HTTP server and routing tests

mod helpers;

use axum::http::{header, Method, StatusCode};
use helpers::{generate_body, photosynthesis, send, send_raw, seven_node_tree, test_app};
use magicmap_common::models::{StoryboardPanel, TimelineEvent};
use magicmap_common::{MapData, MapType};
use serde_json::json;

#[tokio::test]
async fn root_route_serves_html() {
    let app = test_app(Ok(photosynthesis())).await;

    let (status, headers, body) = send_raw(&app.state, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE].to_str().unwrap().contains("text/html"));

    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("Magic Map"));
    assert!(html.contains(r#"data-type="CharacterWeb""#));
    assert!(html.contains(env!("CARGO_PKG_VERSION")));
}

#[tokio::test]
async fn static_assets_served() {
    let app = test_app(Ok(photosynthesis())).await;

    let (status, headers, _) = send_raw(&app.state, Method::GET, "/static/app.js", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/javascript");

    let (status, headers, _) = send_raw(&app.state, Method::GET, "/static/style.css", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "text/css");
}

#[tokio::test]
async fn health_endpoint() {
    let app = test_app(Ok(photosynthesis())).await;

    let (status, body) = send(&app.state, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "magicmap-ui");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptime_seconds"].is_u64());
    assert!(body.get("last_error").is_none());
}

#[tokio::test]
async fn buildinfo_endpoint() {
    let app = test_app(Ok(photosynthesis())).await;

    let (status, body) = send(&app.state, Method::GET, "/api/buildinfo", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["git_hash"].is_string());
    assert!(body["build_profile"].is_string());
}

#[tokio::test]
async fn welcome_view_before_generation() {
    let app = test_app(Ok(photosynthesis())).await;

    let (status, _, body) = send_raw(&app.state, Method::GET, "/api/map/view", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("Let&#39;s Draw Your Ideas!"));
}

#[tokio::test]
async fn timeline_and_storyboard_views() {
    let app = test_app(Ok(MapData::Timeline(vec![TimelineEvent {
        date: "1492".to_string(),
        title: "Voyage".to_string(),
        description: "Ships <sail>".to_string(),
        emoji: None,
    }])))
    .await;
    send(
        &app.state,
        Method::POST,
        "/api/generate",
        Some(generate_body("History", MapType::Timeline)),
    )
    .await;

    let (_, _, body) = send_raw(&app.state, Method::GET, "/api/map/view", None).await;
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("📅"));
    assert!(html.contains("Ships &lt;sail&gt;"));

    app.generator.set_response(Ok(MapData::Storyboard(vec![
        StoryboardPanel {
            scene: 2,
            description: "Ending".to_string(),
            emoji: None,
        },
        StoryboardPanel {
            scene: 1,
            description: "Opening".to_string(),
            emoji: None,
        },
    ])));
    send(
        &app.state,
        Method::POST,
        "/api/generate",
        Some(generate_body("Story", MapType::Storyboard)),
    )
    .await;

    let (_, _, body) = send_raw(&app.state, Method::GET, "/api/map/view", None).await;
    let html = String::from_utf8(body).unwrap();
    assert!(html.find("Opening").unwrap() < html.find("Ending").unwrap());
}

#[tokio::test]
async fn theme_get_and_set() {
    let app = test_app(Ok(photosynthesis())).await;

    let (status, body) = send(&app.state, Method::GET, "/api/theme", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["theme"], "light");
    assert_eq!(body["available"].as_array().unwrap().len(), 4);

    let (status, body) = send(
        &app.state,
        Method::POST,
        "/api/theme",
        Some(json!({ "theme": "sketchbook" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["theme"], "sketchbook");

    let (status, _) = send(
        &app.state,
        Method::POST,
        "/api/theme",
        Some(json!({ "theme": "neon" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn tree_toggle_round_trip() {
    let app = test_app(Ok(seven_node_tree())).await;
    send(
        &app.state,
        Method::POST,
        "/api/generate",
        Some(generate_body("Tree", MapType::TreeView)),
    )
    .await;

    let (status, body) = send(&app.state, Method::POST, "/api/tree/toggle/0", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "collapsed");
    assert_eq!(body["visible"], json!([0]));

    let (_, _, svg) = send_raw(&app.state, Method::GET, "/api/tree/svg?t=60000", None).await;
    assert_eq!(String::from_utf8(svg).unwrap().matches("<circle").count(), 1);

    let (_, body) = send(&app.state, Method::POST, "/api/tree/toggle/0", None).await;
    assert_eq!(body["outcome"], "expanded");
    assert_eq!(body["visible"].as_array().unwrap().len(), 7);

    let (_, body) = send(&app.state, Method::POST, "/api/tree/toggle/2", None).await;
    assert_eq!(body["outcome"], "leaf");
}

#[tokio::test]
async fn tree_errors() {
    let app = test_app(Ok(seven_node_tree())).await;

    let (status, body) = send(&app.state, Method::POST, "/api/tree/toggle/0", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "NO_TREE");

    send(
        &app.state,
        Method::POST,
        "/api/generate",
        Some(generate_body("Tree", MapType::TreeView)),
    )
    .await;
    let (status, body) = send(&app.state, Method::POST, "/api/tree/toggle/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "UNKNOWN_NODE");

    let (status, _) = send(
        &app.state,
        Method::POST,
        "/api/tree/zoom",
        Some(json!({ "factor": 0.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn zoom_pan_and_viewport() {
    let app = test_app(Ok(photosynthesis())).await;
    send(
        &app.state,
        Method::POST,
        "/api/generate",
        Some(generate_body("Plants", MapType::TreeView)),
    )
    .await;

    let (_, fitted) = send(&app.state, Method::GET, "/api/map", None).await;
    let k = fitted["tree"]["transform"]["k"].as_f64().unwrap();

    let (status, zoomed) = send(
        &app.state,
        Method::POST,
        "/api/tree/zoom",
        Some(json!({ "factor": 2.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!((zoomed["k"].as_f64().unwrap() - k * 2.0).abs() < 1e-9);

    let (status, panned) = send(
        &app.state,
        Method::POST,
        "/api/tree/pan",
        Some(json!({ "dx": 10.0, "dy": -5.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!((panned["x"].as_f64().unwrap() - zoomed["x"].as_f64().unwrap() - 10.0).abs() < 1e-9);

    let (status, body) = send(
        &app.state,
        Method::POST,
        "/api/tree/viewport",
        Some(json!({ "width": 400.0, "height": 300.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["viewport"]["width"], 400.0);
    assert!(body["transform"].is_object());

    let (status, _) = send(
        &app.state,
        Method::POST,
        "/api/tree/viewport",
        Some(json!({ "width": 0.0, "height": 300.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn export_png_download() {
    let app = test_app(Ok(photosynthesis())).await;

    let (status, _, body) = send_raw(&app.state, Method::GET, "/api/tree/export.png", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    send(
        &app.state,
        Method::POST,
        "/api/generate",
        Some(generate_body("Plants", MapType::TreeView)),
    )
    .await;
    send(
        &app.state,
        Method::POST,
        "/api/tree/viewport",
        Some(json!({ "width": 300.0, "height": 200.0 })),
    )
    .await;

    let (status, headers, body) =
        send_raw(&app.state, Method::GET, "/api/tree/export.png", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "image/png");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"magic-map.png\""
    );
    assert_eq!(&body[..8], b"\x89PNG\r\n\x1a\n");
}

#[tokio::test]
async fn export_unavailable_for_lists() {
    let app = test_app(Ok(MapData::Storyboard(vec![]))).await;
    send(
        &app.state,
        Method::POST,
        "/api/generate",
        Some(generate_body("Story", MapType::Storyboard)),
    )
    .await;

    let (status, _, _) = send_raw(&app.state, Method::GET, "/api/tree/export.png", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn reset_returns_to_welcome() {
    let app = test_app(Ok(photosynthesis())).await;
    send(
        &app.state,
        Method::POST,
        "/api/generate",
        Some(generate_body("Plants", MapType::TreeView)),
    )
    .await;

    let (status, body) = send(&app.state, Method::POST, "/api/map/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "Welcome");
    assert!(body["data"].is_null());
    assert!(body["tree"].is_null());
}
