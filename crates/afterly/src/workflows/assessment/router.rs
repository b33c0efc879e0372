use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::catalog::AssessmentCatalog;
use crate::error::AppError;
use super::domain::{Category, Question};
use super::outcome::AssessmentOutcome;
use super::tiers::{classify, TierProfile};

/// Router builder exposing the question set and scoring.
pub fn assessment_router(catalog: &'static AssessmentCatalog) -> Router {
    Router::new()
        .route("/api/v1/assessment/questions", get(questions_handler))
        .route("/api/v1/assessment/score", post(score_handler))
        .route("/api/v1/assessment/tiers/:score", get(tier_handler))
        .with_state(catalog)
}

#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub id: &'static str,
    pub category: Category,
    pub category_label: &'static str,
    pub prompt: &'static str,
    pub options: Vec<OptionView>,
}

#[derive(Debug, Serialize)]
pub struct OptionView {
    pub index: usize,
    pub label: &'static str,
    pub points: u16,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id,
            category: question.category,
            category_label: question.category.label(),
            prompt: question.prompt,
            options: question
                .options
                .iter()
                .enumerate()
                .map(|(index, option)| OptionView {
                    index,
                    label: option.label,
                    points: option.points,
                })
                .collect(),
        }
    }
}

/// Option indices keyed by question id.
#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub answers: BTreeMap<String, usize>,
}

#[derive(Debug, Serialize)]
pub struct TierResponse {
    pub score: u16,
    #[serde(flatten)]
    pub profile: TierProfile,
}

pub(crate) async fn questions_handler(
    State(catalog): State<&'static AssessmentCatalog>,
) -> Json<Vec<QuestionView>> {
    Json(catalog.questions().iter().map(QuestionView::from).collect())
}

pub(crate) async fn score_handler(
    State(catalog): State<&'static AssessmentCatalog>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<AssessmentOutcome>, AppError> {
    let answers = catalog.answers_from_indices(&request.answers)?;
    let outcome = AssessmentOutcome::evaluate(catalog, &answers)?;
    debug!(score = outcome.score, tier = ?outcome.profile.tier, "assessment scored");
    Ok(Json(outcome))
}

pub(crate) async fn tier_handler(Path(score): Path<u16>) -> Json<TierResponse> {
    Json(TierResponse {
        score,
        profile: *classify(score),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn read_json(response: Response) -> Value {
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        serde_json::from_slice(&body).expect("json")
    }

    fn score_request(body: Value) -> Request<Body> {
        Request::post("/api/v1/assessment/score")
            .header(axum::http::header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn lists_questions_in_catalog_order() {
        let response = assessment_router(AssessmentCatalog::standard())
            .oneshot(
                Request::get("/api/v1/assessment/questions")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json(response).await;
        let questions = payload.as_array().expect("array");
        assert_eq!(questions.len(), 10);
        assert_eq!(questions[0]["id"], "q1");
        assert_eq!(questions[0]["category"], "digital_asset_organization");
        assert_eq!(questions[9]["id"], "q10");
        assert_eq!(questions[4]["options"][1]["points"], 8);
    }

    #[tokio::test]
    async fn scores_complete_submission() {
        let answers: serde_json::Map<String, Value> = (1..=10)
            .map(|n| (format!("q{n}"), json!(if n <= 4 { 0 } else { 2 })))
            .collect();

        let response = assessment_router(AssessmentCatalog::standard())
            .oneshot(score_request(json!({ "answers": answers })))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json(response).await;
        assert_eq!(payload["score"], 80);
        assert_eq!(payload["max_score"], 180);
        assert_eq!(payload["tier"], "prepared");
        assert_eq!(payload["label"], "Prepared");
        assert_eq!(payload["quick_wins"].as_array().map(Vec::len), Some(2));
        assert_eq!(payload["categories"].as_array().map(Vec::len), Some(6));
    }

    #[tokio::test]
    async fn rejects_partial_and_invalid_submissions() {
        let router = assessment_router(AssessmentCatalog::standard());

        let partial = router
            .clone()
            .oneshot(score_request(json!({ "answers": { "q1": 0 } })))
            .await
            .expect("route executes");
        assert_eq!(partial.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let payload = read_json(partial).await;
        assert!(payload["error"]
            .as_str()
            .is_some_and(|message| message.contains("q10")));

        let invalid = router
            .oneshot(score_request(json!({ "answers": { "q99": 0 } })))
            .await
            .expect("route executes");
        assert_eq!(invalid.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn classifies_raw_scores() {
        let response = assessment_router(AssessmentCatalog::standard())
            .oneshot(
                Request::get("/api/v1/assessment/tiers/49")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json(response).await;
        assert_eq!(payload["score"], 49);
        assert_eq!(payload["tier"], "at_risk");
    }
}
