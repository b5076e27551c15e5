//! Repositories for database operations
//!
//! Every repository follows the same write flow: confirm the row exists,
//! apply the authorization policy, sanitize the whitelisted fields, compile
//! them with [`sql_for_partial_update`] and execute the result. The first
//! failing step ends the flow, so nothing is written before all checks pass.
//!
//! The existence check and the write are separate statements without a
//! surrounding transaction; a row deleted in between surfaces as a
//! `BadRequest` from the write rather than a `NotFound`.

use common::{
    sql::{UpdateFields, sql_for_partial_update},
    store::{Record, Store},
};

use crate::error::{ApiError, ApiResult};

pub mod admin;
pub mod event_request;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;

pub use admin::AdminRepository;
pub use event_request::EventRequestRepository;
pub use user::UserRepository;

/// Compile and run a partial update of the row keyed by `key`.
///
/// An empty field set is rejected before compilation. A write that returns
/// no row is reported as a failed update of `entity`.
async fn apply_partial_update<S: Store, T: Record>(
    store: &S,
    table: &str,
    key_column: &str,
    key: &str,
    fields: UpdateFields,
    entity: &str,
) -> ApiResult<T> {
    if fields.is_empty() {
        return Err(ApiError::bad_request("No fields to update"));
    }

    let statement = sql_for_partial_update(table, fields, key_column, key);

    store
        .fetch_optional(statement)
        .await?
        .ok_or_else(|| ApiError::bad_request(format!("There was an error updating the {}.", entity)))
}
