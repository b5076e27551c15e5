//! Authentication middleware for bearer token validation

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::debug;

use crate::{
    error::{ApiError, ApiResult},
    jwt::{JwtService, Principal},
    state::AppState,
};

/// Authentication middleware.
///
/// Verifies the bearer token and stores the resulting [`Principal`] in the
/// request extensions for handlers to extract.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = authenticate(&state.tokens, bearer.as_ref().map(|TypedHeader(auth)| auth))?;

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Resolve the principal carried by an `Authorization: Bearer` header
pub fn authenticate(
    tokens: &JwtService,
    header: Option<&Authorization<Bearer>>,
) -> ApiResult<Principal> {
    let header =
        header.ok_or_else(|| ApiError::unauthorized("Access token missing or invalid."))?;

    tokens.verify(header.token()).map_err(|e| {
        debug!("Rejected access token: {}", e);
        ApiError::unauthorized("Invalid access token.")
    })
}
