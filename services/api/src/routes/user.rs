//! User endpoints

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
    models::user::{LoginRequest, NewUser, UpdateUser},
    state::AppState,
};

/// Sign in with email and password
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required."));
    }

    let session = state
        .user_repository
        .authenticate(&payload.email, &payload.password)
        .await?;

    Ok(Json(session))
}

/// Register a new artist account
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<NewUser>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let session = state.user_repository.register(payload).await?;

    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn list_users(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let users = state.user_repository.find_all().await?;

    Ok(Json(json!({ "users": users })))
}

pub async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let user = state.user_repository.find_by_email(&email).await?;

    Ok(Json(json!({ "user": user })))
}

pub async fn get_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let user = state.user_repository.get(&user_id, &principal).await?;

    Ok(Json(json!({ "user": user })))
}

/// Partially update a user profile
pub async fn update_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateUser>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .user_repository
        .update(&user_id, payload, &principal)
        .await?;

    Ok(Json(user))
}

/// Event requests owned by a user
pub async fn list_user_event_requests(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let requests = state
        .event_request_repository
        .find_by_owner(&user_id, &principal)
        .await?;

    if requests.is_empty() {
        return Ok(Json(json!({
            "message": "No event requests found for this user.",
            "eventRequests": requests,
        })));
    }

    Ok(Json(json!({ "eventRequests": requests })))
}
