//! API models for request and response payloads

use serde::{Deserialize, Deserializer, Serialize};

pub mod event_request;
pub mod user;

/// Response wrapping a deleted row
#[derive(Debug, Serialize)]
pub struct Deleted<T> {
    pub deleted: T,
}

/// Deserialize a field that distinguishes "absent" from "explicitly null".
///
/// Use together with `#[serde(default)]`: an absent key stays `None`, a
/// `null` becomes `Some(None)` and a value becomes `Some(Some(value))`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
