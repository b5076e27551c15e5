//! Authorization rules applied after a principal has been established

use crate::{
    error::{ApiError, ApiResult},
    jwt::Principal,
};

/// Allow administrators only
pub fn ensure_admin(principal: &Principal, message: &str) -> ApiResult<()> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(ApiError::unauthorized(message))
    }
}

/// Allow the owner of a resource, or any administrator
pub fn ensure_self_or_admin(principal: &Principal, owner_id: &str, message: &str) -> ApiResult<()> {
    if principal.is_admin() || principal.subject_id == owner_id {
        Ok(())
    } else {
        Err(ApiError::unauthorized(message))
    }
}
