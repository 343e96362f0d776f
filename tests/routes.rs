//! Router-level tests: drive the full axum app with in-memory stores and a
//! temporary upload directory.

#![allow(clippy::panic)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::{Request, Response, StatusCode};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use hotel_crud::api;
use hotel_crud::app_state::AppState;
use hotel_crud::error::AppError;
use hotel_crud::render::Renderer;
use hotel_crud::storage::LocalStorage;
use serde_json::Value;

const URLENCODED: &str = "application/x-www-form-urlencoded";

struct TestApp {
    router: Router,
    uploads: TempDir,
}

impl TestApp {
    fn new(page_size: u32) -> Self {
        Self::build(page_size, None)
    }

    fn with_renderer(page_size: u32, renderer: Arc<dyn Renderer>) -> Self {
        Self::build(page_size, Some(renderer))
    }

    fn build(page_size: u32, renderer: Option<Arc<dyn Renderer>>) -> Self {
        let Ok(uploads) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let blobs = Arc::new(LocalStorage::new(
            uploads.path().to_path_buf(),
            "/media".to_string(),
        ));
        let mut state = AppState::in_memory(blobs, page_size);
        if let Some(renderer) = renderer {
            state = state.with_renderer(renderer);
        }
        Self {
            router: api::build_app(state, 1024 * 1024),
            uploads,
        }
    }

    async fn send(&self, request: Request<Body>) -> Response<Body> {
        let Ok(response) = self.router.clone().oneshot(request).await;
        response
    }

    async fn get(&self, uri: &str) -> Response<Body> {
        let Ok(request) = Request::builder().uri(uri).body(Body::empty()) else {
            panic!("request builds");
        };
        self.send(request).await
    }

    async fn post(&self, uri: &str, content_type: &str, body: impl Into<Body>) -> Response<Body> {
        let Ok(request) = Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, content_type)
            .body(body.into())
        else {
            panic!("request builds");
        };
        self.send(request).await
    }

    fn uploaded_files(&self) -> usize {
        std::fs::read_dir(self.uploads.path()).map_or(0, Iterator::count)
    }
}

/// Records every template call and renders the template name.
#[derive(Debug, Default)]
struct RecordingRenderer {
    calls: Mutex<Vec<(String, Value)>>,
}

impl RecordingRenderer {
    fn last(&self) -> (String, Value) {
        let Ok(calls) = self.calls.lock() else {
            panic!("renderer lock poisoned");
        };
        let Some(last) = calls.last() else {
            panic!("nothing rendered");
        };
        last.clone()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&self, template: &str, context: &Value) -> Result<String, AppError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((template.to_string(), context.clone()));
        }
        Ok(template.to_string())
    }
}

fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

async fn body_text(response: Response<Body>) -> String {
    let Ok(collected) = response.into_body().collect().await else {
        panic!("body readable");
    };
    String::from_utf8_lossy(&collected.to_bytes()).into_owned()
}

async fn body_json(response: Response<Body>) -> serde_json::Value {
    let text = body_text(response).await;
    let Ok(json) = serde_json::from_str(&text) else {
        panic!("not json: {text}");
    };
    json
}

fn multipart_body(boundary: &str, fields: &[(&str, &str)], image: Option<(&str, &str)>) -> String {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    if let Some((filename, content)) = image {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\n\
             Content-Type: image/png\r\n\r\n{content}\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));
    body
}

#[tokio::test]
async fn root_redirects_to_hotel_list() {
    let app = TestApp::new(10);
    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/hotel");
}

#[tokio::test]
async fn health_is_ok() {
    let app = TestApp::new(10);
    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json.get("status").and_then(|v| v.as_str()), Some("healthy"));
}

#[tokio::test]
async fn add_hotel_redirects_to_view() {
    let app = TestApp::new(10);
    let response = app
        .post("/hotel/add", URLENCODED, "name=Inn&city=Metropolis")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/hotel/1");

    let response = app.get("/hotel/1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Inn"));
    assert!(html.contains("Metropolis"));
    assert!(!html.contains("<img"));
}

#[tokio::test]
async fn add_form_offers_image_for_hotels_only() {
    let app = TestApp::new(10);
    let hotel_form = body_text(app.get("/hotel/add").await).await;
    assert!(hotel_form.contains("name=\"image\""));
    assert!(hotel_form.contains("name=\"amenities\""));

    let customer_form = body_text(app.get("/customer/add").await).await;
    assert!(!customer_form.contains("name=\"image\""));
    assert!(customer_form.contains("name=\"payment_id\""));
}

#[tokio::test]
async fn multipart_upload_sets_image_url() {
    let app = TestApp::new(10);
    let body = multipart_body("B0UND", &[("name", "Inn")], Some(("lobby.png", "PNGDATA")));
    let response = app
        .post("/hotel/add", "multipart/form-data; boundary=B0UND", body)
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(app.uploaded_files(), 1);

    let html = body_text(app.get("/hotel/1").await).await;
    assert!(html.contains("<img src=\"/media/lobby-"));
}

#[tokio::test]
async fn bad_image_extension_is_rejected() {
    let app = TestApp::new(10);
    let body = multipart_body("B0UND", &[("name", "Inn")], Some(("notes.txt", "hello")));
    let response = app
        .post("/hotel/add", "multipart/form-data; boundary=B0UND", body)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.uploaded_files(), 0);
    assert_eq!(app.get("/hotel/1").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_field_is_validation_error() {
    let app = TestApp::new(10);
    let response = app.post("/hotel/add", URLENCODED, "name=Inn&stars=5").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let code = json
        .get("error")
        .and_then(|e| e.get("code"))
        .and_then(serde_json::Value::as_u64);
    assert_eq!(code, Some(1002));
}

#[tokio::test]
async fn edit_overwrites_submitted_fields() {
    let app = TestApp::new(10);
    let _ = app
        .post("/hotel/add", URLENCODED, "name=Inn&city=Metropolis")
        .await;

    let form = body_text(app.get("/hotel/1/edit").await).await;
    assert!(form.contains("value=\"Metropolis\""));

    let response = app.post("/hotel/1/edit", URLENCODED, "city=Gotham").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/hotel/1");

    let html = body_text(app.get("/hotel/1").await).await;
    assert!(html.contains("Gotham"));
    assert!(html.contains("Inn"));
    assert!(!html.contains("Metropolis"));
}

#[tokio::test]
async fn edit_missing_is_not_found() {
    let app = TestApp::new(10);
    assert_eq!(app.get("/hotel/9/edit").await.status(), StatusCode::NOT_FOUND);
    let response = app.post("/hotel/9/edit", URLENCODED, "name=X").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_redirects_to_list_even_when_missing() {
    let app = TestApp::new(10);
    let _ = app.post("/hotel/add", URLENCODED, "name=Inn").await;

    let response = app.get("/hotel/1/delete").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/hotel");
    assert_eq!(app.get("/hotel/1").await.status(), StatusCode::NOT_FOUND);

    let response = app.get("/hotel/42/delete").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn list_paginates_by_page_token() {
    let app = TestApp::new(2);
    for name in ["Cedar", "Aspen", "Birch"] {
        let _ = app.post("/hotel/add", URLENCODED, format!("name={name}")).await;
    }

    let first = body_text(app.get("/hotel").await).await;
    assert!(first.contains("Aspen"));
    assert!(first.contains("Birch"));
    assert!(!first.contains("Cedar"));
    assert!(first.contains("/hotel?page_token=2"));

    let second = body_text(app.get("/hotel?page_token=2").await).await;
    assert!(second.contains("Cedar"));
    assert!(!second.contains("page_token"));
}

#[tokio::test]
async fn short_list_has_no_next_link() {
    let app = TestApp::new(10);
    for name in ["A", "B", "C"] {
        let _ = app.post("/hotel/add", URLENCODED, format!("name={name}")).await;
    }
    let html = body_text(app.get("/hotel").await).await;
    assert!(!html.contains("page_token"));
}

#[tokio::test]
async fn malformed_page_token_is_bad_request() {
    let app = TestApp::new(10);
    let response = app.get("/customer?page_token=abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn customer_lifecycle_uses_customer_routes() {
    let app = TestApp::new(10);
    let response = app
        .post(
            "/customer/add",
            URLENCODED,
            "fname=Ada&lname=Lovelace&email=ada%40example.com&payment_id=7",
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/customer/1");

    let response = app.post("/customer/1/edit", URLENCODED, "email=ada%40engine.org").await;
    assert_eq!(location(&response), "/customer/1");
    let html = body_text(app.get("/customer/1").await).await;
    assert!(html.contains("ada@engine.org"));
    assert!(html.contains("Lovelace"));

    let list = body_text(app.get("/customer").await).await;
    assert!(list.contains("/customer/1"));

    let response = app.get("/customer/1/delete").await;
    assert_eq!(location(&response), "/customer");
    assert_eq!(app.get("/customer/1").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn customer_image_is_rejected() {
    let app = TestApp::new(10);
    let body = multipart_body("B0UND", &[("fname", "Ada")], Some(("ada.png", "PNGDATA")));
    let response = app
        .post("/customer/add", "multipart/form-data; boundary=B0UND", body)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.uploaded_files(), 0);
}

#[tokio::test]
async fn query_endpoints_return_projections() {
    let app = TestApp::new(10);
    let _ = app
        .post("/hotel/add", URLENCODED, "name=Inn&city=Metropolis&website=inn.example")
        .await;
    let _ = app
        .post("/customer/add", URLENCODED, "fname=Ada&payment_id=3")
        .await;

    let hotels = body_json(app.get("/api/v1/hotels").await).await;
    let Some(first) = hotels.as_array().and_then(|a| a.first()) else {
        panic!("expected one hotel: {hotels}");
    };
    assert_eq!(first.get("name").and_then(|v| v.as_str()), Some("Inn"));
    assert!(first.get("website").is_none());

    let customers = body_json(app.get("/api/v1/customers").await).await;
    let Some(first) = customers.as_array().and_then(|a| a.first()) else {
        panic!("expected one customer: {customers}");
    };
    assert_eq!(first.get("fname").and_then(|v| v.as_str()), Some("Ada"));
    assert!(first.get("payment_id").is_none());
}

#[tokio::test]
async fn list_context_carries_columns_and_next_token() {
    let renderer = Arc::new(RecordingRenderer::default());
    let app = TestApp::with_renderer(1, Arc::clone(&renderer) as Arc<dyn Renderer>);
    for name in ["Birch", "Aspen"] {
        let _ = app.post("/hotel/add", URLENCODED, format!("name={name}")).await;
    }

    let response = app.get("/hotel").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "list.html");

    let (template, context) = renderer.last();
    assert_eq!(template, "list.html");
    assert_eq!(context.get("kind").and_then(Value::as_str), Some("hotel"));
    assert_eq!(
        context.get("columns"),
        Some(&serde_json::json!(["name", "city", "state"]))
    );
    assert_eq!(
        context.get("next_page_token").and_then(Value::as_str),
        Some("1")
    );
    let names: Vec<&str> = context
        .get("records")
        .and_then(Value::as_array)
        .map(|records| {
            records
                .iter()
                .filter_map(|r| r.get("name").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();
    assert_eq!(names, ["Aspen"]);
}

#[tokio::test]
async fn customer_form_context_has_no_image_field() {
    let renderer = Arc::new(RecordingRenderer::default());
    let app = TestApp::with_renderer(10, Arc::clone(&renderer) as Arc<dyn Renderer>);
    let _ = app
        .post("/customer/add", URLENCODED, "fname=Ada&lname=Lovelace")
        .await;

    assert_eq!(app.get("/customer/1/edit").await.status(), StatusCode::OK);
    let (template, context) = renderer.last();
    assert_eq!(template, "form.html");
    assert_eq!(context.get("action").and_then(Value::as_str), Some("Edit"));
    assert_eq!(
        context.get("accepts_image").and_then(Value::as_bool),
        Some(false)
    );
    assert_eq!(
        context
            .get("record")
            .and_then(|r| r.get("lname"))
            .and_then(Value::as_str),
        Some("Lovelace")
    );
}
