//! Administrator endpoints

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};

use crate::{
    error::{ApiError, ApiResult},
    jwt::Principal,
    models::{
        Deleted,
        event_request::UpdateEventRequest,
        user::{AdminUpdateUser, AuthenticatedUser, LoginRequest, NewUser},
    },
    state::AppState,
};

fn admin_session(session: AuthenticatedUser) -> Json<Value> {
    Json(json!({ "token": session.token, "admin": session.user }))
}

pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required."));
    }

    let session = state
        .admin_repository
        .login(&payload.email, &payload.password)
        .await?;

    Ok(admin_session(session))
}

/// Create another administrator
pub async fn register_admin(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    WithRejection(Json(payload), _): WithRejection<Json<NewUser>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let session = state.admin_repository.register(&principal, payload).await?;

    Ok((StatusCode::CREATED, admin_session(session)))
}

pub async fn list_users(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<impl IntoResponse> {
    let users = state.admin_repository.all_users(&principal).await?;

    Ok(Json(json!({ "users": users })))
}

/// Partially update any user, role included
pub async fn update_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<AdminUpdateUser>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .admin_repository
        .update_user(&principal, &user_id, payload)
        .await?;

    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let deleted = state
        .admin_repository
        .delete_user(&principal, &user_id)
        .await?;

    Ok(Json(Deleted { deleted }))
}

pub async fn list_event_requests(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<impl IntoResponse> {
    let requests = state.admin_repository.all_event_requests(&principal).await?;

    Ok(Json(json!({ "eventRequests": requests })))
}

pub async fn update_event_request(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(request_id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateEventRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let request = state
        .admin_repository
        .update_event_request(&principal, &request_id, payload)
        .await?;

    Ok(Json(request))
}

pub async fn delete_event_request(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(request_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let deleted = state
        .admin_repository
        .delete_event_request(&principal, &request_id)
        .await?;

    Ok(Json(Deleted { deleted }))
}
