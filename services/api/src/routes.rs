//! API service routes

use axum::{
    Json, Router,
    extract::State,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::json;

use crate::{error::ApiError, middleware::auth_middleware, state::AppState};

mod admin;
mod event;
mod user;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/user", get(user::list_users))
        .route("/user/email/:email", get(user::get_user_by_email))
        .route("/user/events/:userid", get(user::list_user_event_requests))
        .route("/user/:userid", get(user::get_user).put(user::update_user))
        .route(
            "/event",
            post(event::create_event_request).get(event::list_event_requests),
        )
        .route("/event/user/:userid", get(event::list_owner_event_requests))
        .route(
            "/event/:requestid",
            get(event::get_event_request)
                .put(event::update_event_request)
                .delete(event::delete_event_request),
        )
        .route("/admin/register", post(admin::register_admin))
        .route("/admin/users", get(admin::list_users))
        .route(
            "/admin/users/:userid",
            put(admin::update_user).delete(admin::delete_user),
        )
        .route("/admin/event-requests", get(admin::list_event_requests))
        .route(
            "/admin/event-requests/:requestid",
            put(admin::update_event_request).delete(admin::delete_event_request),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health_check))
        .route("/user/login", post(user::login))
        .route("/user/register", post(user::register))
        .route("/event/status/:status", get(event::list_event_requests_by_status))
        .route("/admin/login", post(admin::login))
        .merge(protected_routes)
        .fallback(not_found)
        .with_state(state)
}

/// Welcome endpoint
pub async fn welcome() -> &'static str {
    "Welcome to the GigMatch API"
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let database = common::database::health_check(&state.db_pool).await?;

    Ok(Json(json!({
        "status": if database { "ok" } else { "degraded" },
        "service": "gigmatch-api",
        "database": database,
    })))
}

async fn not_found() -> ApiError {
    ApiError::not_found("Not Found")
}
