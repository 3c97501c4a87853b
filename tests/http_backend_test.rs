//! Exercises the HTTP backend against a local server.

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::runtime::Handle;
use url::Url;

use repocast::api::{AnalyticsBackend, FetchError, Gateway, HttpAnalyticsBackend};
use repocast::app::{App, Panel, Resolution};
use repocast::{Config, FetchState};

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn backend_for(addr: SocketAddr) -> HttpAnalyticsBackend {
    let base = Url::parse(&format!("http://{addr}")).unwrap();
    HttpAnalyticsBackend::new(&Gateway::new(base, "/api"), "/api/github", Duration::from_secs(5))
        .unwrap()
}

/// Echo server that records every request body and answers with `payload`.
async fn recording_server(payload: Value) -> (SocketAddr, Arc<Mutex<Vec<Value>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();
    let router = Router::new().route(
        "/api/github",
        post(move |Json(body): Json<Value>| {
            let recorder = recorder.clone();
            let payload = payload.clone();
            async move {
                recorder.lock().unwrap().push(body);
                Json(payload)
            }
        }),
    );
    (serve(router).await, seen)
}

#[tokio::test]
async fn test_posts_repository_and_decodes_payload() {
    let (addr, seen) = recording_server(json!({
        "created": [["2023-01", 5], ["2023-02", 7]],
        "starCount": [["2023-01", 120]],
        "max_issue_created_day": "Tuesday"
    }))
    .await;

    let result = backend_for(addr).fetch("facebook/react").await.unwrap();

    assert_eq!(seen.lock().unwrap().clone(), vec![json!({"repository": "facebook/react"})]);
    assert_eq!(result.created.len(), 2);
    assert_eq!(result.created[1].count, 7);
    assert_eq!(result.star_count[0].count, 120);
    assert_eq!(result.max_issue_created_day, "Tuesday");
    assert!(result.stacked.is_empty());
}

#[test]
fn test_endpoint_is_routed_to_configured_backend() {
    let base = Url::parse("http://10.1.2.3:5000/service/").unwrap();
    let gateway = Gateway::new(base.clone(), "/api");
    assert_eq!(gateway.base_url(), &base);

    let backend =
        HttpAnalyticsBackend::new(&gateway, "/api/github", Duration::from_secs(5)).unwrap();
    assert_eq!(backend.endpoint().as_str(), "http://10.1.2.3:5000/service/api/github");

    let err = HttpAnalyticsBackend::new(&gateway, "/other/github", Duration::from_secs(5))
        .err()
        .unwrap();
    assert!(matches!(err, FetchError::Gateway(_)), "{err:?}");
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let router = Router::new().route(
        "/api/github",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let addr = serve(router).await;

    match backend_for(addr).fetch("d3/d3").await {
        Err(FetchError::Status(status)) => assert_eq!(status.as_u16(), 500),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_a_decode_error() {
    let router = Router::new().route("/api/github", post(|| async { "<html>not json</html>" }));
    let addr = serve(router).await;

    let err = backend_for(addr).fetch("d3/d3").await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)), "{err:?}");
}

#[tokio::test]
async fn test_refused_connection_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = backend_for(addr).fetch("golang/go").await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)), "{err:?}");
}

#[tokio::test]
async fn test_app_loads_dashboard_over_http() {
    let (addr, seen) = recording_server(json!({
        "created": [["2023-01", 5]],
        "stacked": [
            {"name": "Created", "data": [["2023-01", 5]]},
            {"name": "Closed", "data": [["2023-01", 3]]}
        ],
        "createdAtImageUrls": {
            "model_loss_image_url": "http://images.test/loss.png"
        }
    }))
    .await;

    let config = Config {
        backend_url: Url::parse(&format!("http://{addr}")).unwrap(),
        ..Config::default()
    };
    let mut app = App::with_http_backend(config, Handle::current()).unwrap();
    app.mount();

    assert_eq!(app.settle().await, Some(Resolution::Applied(FetchState::Success)));
    assert_eq!(seen.lock().unwrap().len(), 1);

    let panels = app.panels();
    let stacked = panels
        .iter()
        .find_map(|panel| match panel {
            Panel::Chart(spec) if spec.stack_labels => Some(spec),
            _ => None,
        })
        .unwrap();
    assert_eq!(stacked.stack_totals(), vec![8]);

    let first_forecast = panels
        .iter()
        .find_map(|panel| match panel {
            Panel::Forecast(forecast) => Some(forecast),
            _ => None,
        })
        .unwrap();
    assert_eq!(
        first_forecast.images[0].url.as_deref(),
        Some("http://images.test/loss.png")
    );
    assert_eq!(first_forecast.images[1].url, None);
}

#[tokio::test]
async fn test_app_fails_cleanly_when_backend_is_down() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = Config {
        backend_url: Url::parse(&format!("http://{addr}")).unwrap(),
        ..Config::default()
    };
    let mut app = App::with_http_backend(config, Handle::current()).unwrap();
    app.mount();

    assert_eq!(app.settle().await, Some(Resolution::Applied(FetchState::Failed)));
    let snapshot = app.snapshot();
    assert!(snapshot.result.is_empty());
    assert!(app.selector_items().iter().all(|item| item.enabled));
}
