//! Calendar event request endpoints

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use serde_json::json;

use crate::{
    error::{ApiError, ApiResult},
    jwt::Principal,
    models::{
        Deleted,
        event_request::{NewEventRequest, UpdateEventRequest},
    },
    state::AppState,
};

pub async fn create_event_request(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    WithRejection(Json(payload), _): WithRejection<Json<NewEventRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let request = state
        .event_request_repository
        .create(payload, &principal)
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "eventRequest": request }))))
}

/// List every event request (administrators only)
pub async fn list_event_requests(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<impl IntoResponse> {
    let requests = state.event_request_repository.find_all(&principal).await?;

    Ok(Json(json!({ "eventRequests": requests })))
}

pub async fn list_event_requests_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let requests = state.event_request_repository.find_by_status(&status).await?;

    Ok(Json(json!({ "eventRequests": requests })))
}

pub async fn list_owner_event_requests(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let requests = state
        .event_request_repository
        .find_by_owner(&user_id, &principal)
        .await?;

    Ok(Json(json!({ "eventRequests": requests })))
}

pub async fn get_event_request(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(request_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let request = state
        .event_request_repository
        .get(&request_id, &principal)
        .await?;

    Ok(Json(json!({ "eventRequest": request })))
}

/// Partially update an event request
pub async fn update_event_request(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(request_id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateEventRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let request = state
        .event_request_repository
        .update(&request_id, payload, &principal)
        .await?;

    Ok(Json(request))
}

pub async fn delete_event_request(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(request_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let deleted = state
        .event_request_repository
        .delete(&request_id, &principal)
        .await?;

    Ok(Json(Deleted { deleted }))
}
