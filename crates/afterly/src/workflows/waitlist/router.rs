use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::domain::{RegistrarError, SignupContext};
use super::service::{DeliveryOutcome, WaitlistRegistrar};
use crate::error::AppError;

/// Router builder exposing waitlist signup.
pub fn waitlist_router(registrar: Arc<WaitlistRegistrar>) -> Router {
    Router::new()
        .route("/api/v1/waitlist", post(join_handler))
        .route("/api/v1/waitlist/position", get(position_handler))
        .with_state(registrar)
}

#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct JoinResponse {
    pub email: String,
    pub waitlist_number: u64,
    pub timestamp: String,
    pub deliveries: Vec<DeliveryOutcome>,
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

pub(crate) async fn join_handler(
    State(registrar): State<Arc<WaitlistRegistrar>>,
    headers: HeaderMap,
    Json(request): Json<JoinRequest>,
) -> Result<(StatusCode, Json<JoinResponse>), AppError> {
    let context = SignupContext::new(
        header_value(&headers, header::REFERER),
        header_value(&headers, header::USER_AGENT),
    );

    let receipt = registrar.submit(&request.email, context).await?;
    let body = JoinResponse {
        timestamp: receipt.record.timestamp(),
        email: receipt.record.email,
        waitlist_number: receipt.record.waitlist_number,
        deliveries: receipt.deliveries,
    };
    Ok((StatusCode::CREATED, Json(body)))
}

pub(crate) async fn position_handler(
    State(registrar): State<Arc<WaitlistRegistrar>>,
) -> Result<Json<Value>, AppError> {
    let count = registrar
        .current_position()
        .map_err(RegistrarError::from)?;
    Ok(Json(json!({ "waitlist_count": count })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::waitlist::{
        NotificationEndpoint, NotificationError, SignupRecord, WaitlistCounter,
    };
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use axum::response::Response;
    use std::sync::Mutex;
    use tower::ServiceExt;

    #[derive(Debug, Default)]
    struct RecordingEndpoint {
        records: Mutex<Vec<SignupRecord>>,
    }

    impl RecordingEndpoint {
        fn records(&self) -> Vec<SignupRecord> {
            self.records.lock().expect("records mutex").clone()
        }
    }

    #[async_trait]
    impl NotificationEndpoint for RecordingEndpoint {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn is_configured(&self) -> bool {
            true
        }

        async fn deliver(&self, record: &SignupRecord) -> Result<(), NotificationError> {
            self.records
                .lock()
                .expect("records mutex")
                .push(record.clone());
            Ok(())
        }
    }

    fn router() -> Router {
        waitlist_router(Arc::new(WaitlistRegistrar::new(
            WaitlistCounter::in_memory(),
            Vec::new(),
        )))
    }

    fn recording_router() -> (Router, Arc<RecordingEndpoint>) {
        let endpoint = Arc::new(RecordingEndpoint::default());
        let endpoints: Vec<Arc<dyn NotificationEndpoint>> =
            vec![endpoint.clone() as Arc<dyn NotificationEndpoint>];
        let router = waitlist_router(Arc::new(WaitlistRegistrar::new(
            WaitlistCounter::in_memory(),
            endpoints,
        )));
        (router, endpoint)
    }

    async fn read_json(response: Response) -> Value {
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        serde_json::from_slice(&body).expect("json")
    }

    fn join(email: &str) -> Request<Body> {
        Request::post("/api/v1/waitlist")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::REFERER, "https://afterly.example/landing")
            .header(header::USER_AGENT, "integration-test")
            .body(Body::from(json!({ "email": email }).to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn join_assigns_sequential_positions() {
        let router = router();

        let first = router
            .clone()
            .oneshot(join("one@example.com"))
            .await
            .expect("route executes");
        assert_eq!(first.status(), StatusCode::CREATED);
        let first = read_json(first).await;
        assert_eq!(first["waitlist_number"], 1);
        assert!(first["timestamp"].as_str().is_some_and(|ts| ts.ends_with('Z')));

        let second = router
            .clone()
            .oneshot(join("two@example.com"))
            .await
            .expect("route executes");
        assert_eq!(read_json(second).await["waitlist_number"], 2);

        let position = router
            .oneshot(
                Request::get("/api/v1/waitlist/position")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("route executes");
        assert_eq!(read_json(position).await["waitlist_count"], 2);
    }

    #[tokio::test]
    async fn join_rejects_addresses_without_at_sign() {
        let response = router()
            .oneshot(join("nobody"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let payload = read_json(response).await;
        assert!(payload["error"].as_str().is_some());
    }

    #[tokio::test]
    async fn join_records_referer_and_user_agent_headers() {
        let (router, endpoint) = recording_router();

        let response = router
            .oneshot(join("river@example.com"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            read_json(response).await["deliveries"][0]["status"],
            "delivered"
        );

        let records = endpoint.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].email, "river@example.com");
        assert_eq!(records[0].referrer, "https://afterly.example/landing");
        assert_eq!(records[0].user_agent, "integration-test");
    }

    #[tokio::test]
    async fn join_without_headers_falls_back_to_direct_and_unknown() {
        let (router, endpoint) = recording_router();

        let request = Request::post("/api/v1/waitlist")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "email": "lee@example.com" }).to_string()))
            .expect("request");
        let response = router.oneshot(request).await.expect("route executes");
        assert_eq!(response.status(), StatusCode::CREATED);

        let records = endpoint.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].referrer, "Direct");
        assert_eq!(records[0].user_agent, "unknown");
    }

    #[tokio::test]
    async fn join_rejects_blank_email_without_consuming_a_position() {
        let (router, endpoint) = recording_router();

        let response = router
            .clone()
            .oneshot(join("   "))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(endpoint.records().is_empty());

        let position = router
            .oneshot(
                Request::get("/api/v1/waitlist/position")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("route executes");
        assert_eq!(read_json(position).await["waitlist_count"], 0);
    }
}
