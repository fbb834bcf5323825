//! Axum route handlers for the mood questionnaire.

use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::errors::AppError;
use crate::models::mood::{MoodResponseRow, RecordId};
use crate::mood::form::{FormErrors, MoodFormInput, MoodSubmission};
use crate::mood::recommender::{request_recommendation, Recommendation, RecommendationError};
use crate::render::{
    RECOMMENDATION_UNAVAILABLE_MESSAGE, SUBMISSION_FAILED_MESSAGE, SUBMISSION_UNREADABLE_MESSAGE,
};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RecommendationFailure {
    pub code: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub response_id: RecordId,
    pub recommendation: Option<Recommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RecommendationFailure>,
}

/// Stores the submission, then asks for a recommendation.
/// A failed recommendation leaves the stored record in place.
async fn store_and_recommend(
    state: &AppState,
    submission: &MoodSubmission,
) -> Result<(MoodResponseRow, Result<Recommendation, RecommendationError>), AppError> {
    let row = state.store.save(submission).await?;

    let outcome = request_recommendation(state.completion.as_ref(), submission).await;
    if let Err(e) = &outcome {
        error!("No recommendation for response {}: {e}", row.id);
    }

    Ok((row, outcome))
}

/// GET /mood/
pub async fn handle_questionnaire(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let html = state
        .templates
        .questionnaire(&MoodFormInput::default(), &FormErrors::default())?;
    Ok(Html(html))
}

/// POST /mood/
///
/// Invalid input re-renders the form with inline errors (422) and stores nothing.
/// Unreadable bodies and storage failures re-render it with a page-level notice.
pub async fn handle_submit(
    State(state): State<AppState>,
    form: Result<Form<MoodFormInput>, FormRejection>,
) -> Result<Response, AppError> {
    let input = match form {
        Ok(Form(input)) => input,
        Err(rejection) => {
            warn!("Unreadable questionnaire post: {rejection}");
            let html = state
                .templates
                .questionnaire_with_notice(&MoodFormInput::default(), SUBMISSION_UNREADABLE_MESSAGE)?;
            return Ok((rejection.status(), Html(html)).into_response());
        }
    };

    let submission = match input.clean() {
        Ok(submission) => submission,
        Err(errors) => {
            let html = state.templates.questionnaire(&input, &errors)?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response());
        }
    };

    let (row, outcome) = match store_and_recommend(&state, &submission).await {
        Ok(stored) => stored,
        Err(AppError::Store(e)) => {
            error!("Could not store mood response: {e}");
            let html = state
                .templates
                .questionnaire_with_notice(&input, SUBMISSION_FAILED_MESSAGE)?;
            return Ok((StatusCode::INTERNAL_SERVER_ERROR, Html(html)).into_response());
        }
        Err(e) => return Err(e),
    };
    let html = state.templates.results(row.id, &submission, &outcome)?;
    Ok(Html(html).into_response())
}

/// POST /api/v1/mood
pub async fn handle_submit_json(
    State(state): State<AppState>,
    body: Result<Json<MoodFormInput>, JsonRejection>,
) -> Result<Json<SubmitResponse>, AppError> {
    let Json(input) = body.map_err(|rejection| AppError::BadBody(rejection.body_text()))?;
    let submission = input
        .clean()
        .map_err(|errors| AppError::InvalidFields(errors.into_inner()))?;

    let (row, outcome) = store_and_recommend(&state, &submission).await?;

    let response = match outcome {
        Ok(recommendation) => SubmitResponse {
            response_id: row.id,
            recommendation: Some(recommendation),
            error: None,
        },
        Err(e) => SubmitResponse {
            response_id: row.id,
            recommendation: None,
            error: Some(RecommendationFailure {
                code: e.code(),
                message: RECOMMENDATION_UNAVAILABLE_MESSAGE,
            }),
        },
    };

    Ok(Json(response))
}
