use super::*;
use axum::{body, body::Body, http::Request};
use serde_json::json;
use tokio::net::TcpListener;
use tower::ServiceExt;

async fn echo_backend(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "ok",
        "warning": false,
        "summary": {"X_A_final": 0.8},
        "data": {"t_eval": [0.0, 1.0], "X_A_eval": [0.0, 0.1]},
        "echo": body
    }))
}

async fn failing_backend() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "Traceback ...")
}

async fn spawn_backend() -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new()
        .route("/simulate", post(echo_backend))
        .route("/broken", post(failing_backend));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

fn test_app(backend_url: &str, body_limit_bytes: usize) -> Router {
    let state = AppState {
        http: Client::new(),
        backend_url: Url::parse(backend_url).expect("backend url"),
    };
    build_router(Arc::new(state), body_limit_bytes)
}

fn simulate_request(body: impl Into<Body>) -> Request<Body> {
    Request::post("/api/simulate")
        .header("content-type", "application/json")
        .body(body.into())
        .expect("request")
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

#[tokio::test]
async fn healthz_reports_ok() {
    let app = test_app("http://127.0.0.1:9/simulate", 1024);
    let request = Request::get("/healthz")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"ok");
}

#[tokio::test]
async fn simulate_relays_backend_json_verbatim() {
    let backend = spawn_backend().await;
    let app = test_app(&format!("{backend}/simulate"), 64 * 1024);

    let document = json!({"mode_op": "isothermal", "K_det": 0.05, "A": null});
    let response = app
        .oneshot(simulate_request(document.to_string()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["summary"]["X_A_final"], json!(0.8));
    assert_eq!(body["echo"], document);
}

#[tokio::test]
async fn backend_error_status_becomes_upstream_failure() {
    let backend = spawn_backend().await;
    let app = test_app(&format!("{backend}/broken"), 64 * 1024);

    let response = app
        .oneshot(simulate_request(json!({"mode_op": "isothermal"}).to_string()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        json!({"code": "upstream", "message": "Error al procesar la solicitud"})
    );
}

#[tokio::test]
async fn unreachable_backend_becomes_upstream_failure() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let app = test_app(&format!("http://{addr}/simulate"), 64 * 1024);
    let response = app
        .oneshot(simulate_request("{}"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ApiError = serde_json::from_value(json_body(response).await).expect("api error");
    assert_eq!(body.code, ErrorCode::Upstream);
}

#[tokio::test]
async fn invalid_json_is_rejected_before_forwarding() {
    let app = test_app("http://127.0.0.1:9/simulate", 64 * 1024);
    let response = app
        .oneshot(simulate_request("{not json"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ApiError = serde_json::from_value(json_body(response).await).expect("api error");
    assert_eq!(body.code, ErrorCode::Validation);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let app = test_app("http://127.0.0.1:9/simulate", 16);
    let payload = json!({"mode_op": "non-isothermal", "padding": "x".repeat(64)}).to_string();
    let request = Request::post("/api/simulate")
        .header("content-type", "application/json")
        .header("content-length", payload.len())
        .body(Body::from(payload))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
