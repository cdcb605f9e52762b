//! HTTP request handlers for the receipt API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::split::split_bill;

use super::request::{SplitRequest, TextReceiptRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Headroom above the image limit for JSON envelopes.
const BODY_LIMIT_HEADROOM: usize = 64 * 1024;

/// Creates the API router with all endpoints.
///
/// - `POST /receipts`: raw image bytes, returns the processed receipt
/// - `POST /receipts/text`: model text, returns the processed receipt
/// - `POST /receipts/split`: receipt plus claims, returns the bill split
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.pipeline().config().image.max_bytes + BODY_LIMIT_HEADROOM;
    Router::new()
        .route("/receipts", post(process_image_handler))
        .route("/receipts/text", post(process_text_handler))
        .route("/receipts/split", post(split_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Handler for POST /receipts.
///
/// Runs the full pipeline on a blocking worker, since image decoding and the
/// vision model call are synchronous.
async fn process_image_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        image_bytes = body.len(),
        "Processing receipt image"
    );

    let pipeline = state.pipeline().clone();
    let start_time = Instant::now();
    let outcome = tokio::task::spawn_blocking(move || pipeline.process(&body)).await;

    match outcome {
        Ok(Ok(processed)) => {
            info!(
                correlation_id = %correlation_id,
                total = %processed.record.total,
                corrected = processed.correction.is_some(),
                duration_ms = start_time.elapsed().as_millis(),
                "Receipt processed successfully"
            );
            (StatusCode::OK, Json(processed)).into_response()
        }
        Ok(Err(err)) => engine_error_response(correlation_id, err),
        Err(join_error) => {
            warn!(
                correlation_id = %correlation_id,
                error = %join_error,
                "Receipt processing task failed"
            );
            ApiErrorResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::internal("Receipt processing was interrupted"),
            )
            .into_response()
        }
    }
}

/// Handler for POST /receipts/text.
async fn process_text_handler(
    State(state): State<AppState>,
    payload: Result<Json<TextReceiptRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };
    info!(
        correlation_id = %correlation_id,
        response_length = request.response_text.len(),
        "Processing model response text"
    );

    match state.pipeline().process_response(&request.response_text) {
        Ok(processed) => (StatusCode::OK, Json(processed)).into_response(),
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for POST /receipts/split.
async fn split_handler(payload: Result<Json<SplitRequest>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };
    info!(
        correlation_id = %correlation_id,
        claims = request.claims.len(),
        items = request.receipt.items.len(),
        "Splitting receipt"
    );

    match split_bill(&request.receipt, &request.claims) {
        Ok(split) => (StatusCode::OK, Json(split)).into_response(),
        Err(err) => engine_error_response(correlation_id, err),
    }
}

fn engine_error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Receipt request failed"
    );
    ApiErrorResponse::from(err).into_response()
}

fn json_rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::new(StatusCode::BAD_REQUEST, error).into_response()
}
