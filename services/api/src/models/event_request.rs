//! Calendar event request models

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::nullable;

/// Status given to requests created without one
pub const DEFAULT_STATUS: &str = "Pending";

/// Calendar event booking request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct EventRequest {
    #[serde(rename = "requestid")]
    #[sqlx(rename = "requestid")]
    pub request_id: String,
    #[serde(rename = "eventid")]
    #[sqlx(rename = "eventid")]
    pub event_id: String,
    #[serde(rename = "userid")]
    #[sqlx(rename = "userid")]
    pub owner_id: String,
    pub status: String,
    #[serde(rename = "requestdate")]
    #[sqlx(rename = "requestdate")]
    pub request_date: NaiveDate,
    #[serde(rename = "starttime")]
    #[sqlx(rename = "starttime")]
    pub start_time: NaiveTime,
    #[serde(rename = "endtime")]
    #[sqlx(rename = "endtime")]
    pub end_time: NaiveTime,
    pub amount: f64,
    #[serde(rename = "artistname")]
    #[sqlx(rename = "artistname")]
    pub artist_name: String,
    #[serde(rename = "eventname")]
    #[sqlx(rename = "eventname")]
    pub event_name: Option<String>,
}

/// Owner of an event request, as read by existence checks
#[derive(Debug, Clone, Deserialize, FromRow)]
pub struct EventOwner {
    #[serde(rename = "userid")]
    #[sqlx(rename = "userid")]
    pub owner_id: String,
}

/// Event request creation payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewEventRequest {
    /// Owner on whose behalf an administrator creates the request
    #[serde(default, rename = "userid")]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "requestdate")]
    pub request_date: NaiveDate,
    #[serde(rename = "starttime")]
    pub start_time: NaiveTime,
    #[serde(rename = "endtime")]
    pub end_time: NaiveTime,
    pub amount: f64,
    #[serde(default, rename = "artistname")]
    pub artist_name: Option<String>,
    #[serde(default, rename = "eventname")]
    pub event_name: Option<String>,
}

/// Event request update payload; absent fields stay untouched and a `null`
/// event name clears it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEventRequest {
    pub status: Option<String>,
    #[serde(rename = "requestdate")]
    pub request_date: Option<NaiveDate>,
    #[serde(rename = "starttime")]
    pub start_time: Option<NaiveTime>,
    #[serde(rename = "endtime")]
    pub end_time: Option<NaiveTime>,
    pub amount: Option<f64>,
    #[serde(rename = "artistname")]
    pub artist_name: Option<String>,
    #[serde(default, rename = "eventname", deserialize_with = "nullable")]
    pub event_name: Option<Option<String>>,
}
