//! Application state shared across handlers

use common::store::PgStore;
use sqlx::PgPool;

use crate::{
    jwt::JwtService,
    repositories::{AdminRepository, EventRequestRepository, UserRepository},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub tokens: JwtService,
    pub user_repository: UserRepository<PgStore>,
    pub event_request_repository: EventRequestRepository<PgStore>,
    pub admin_repository: AdminRepository<PgStore>,
}
