//! Calendar event request repository

use common::{
    sql::{Statement, UpdateFields},
    store::Store,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    jwt::Principal,
    models::event_request::{
        DEFAULT_STATUS, EventOwner, EventRequest, NewEventRequest, UpdateEventRequest,
    },
    policy,
    validation::validate_required,
};

pub(crate) const EVENT_REQUESTS_TABLE: &str = "calendareventrequests";
pub(crate) const EVENT_REQUEST_KEY: &str = "requestid";
const EVENT_REQUEST_COLUMNS: &str = "requestid, eventid, userid, status, requestdate, \
     starttime, endtime, amount, artistname, eventname";

/// Event request repository
#[derive(Clone)]
pub struct EventRequestRepository<S> {
    store: S,
}

impl<S: Store> EventRequestRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create an event request owned by the principal.
    ///
    /// Administrators may name another owner through `userid`.
    pub async fn create(
        &self,
        new_request: NewEventRequest,
        principal: &Principal,
    ) -> ApiResult<EventRequest> {
        let owner_id = match new_request.owner_id {
            Some(owner_id) => {
                policy::ensure_self_or_admin(
                    principal,
                    &owner_id,
                    "You are not authorized to create event requests for this user.",
                )?;
                owner_id
            }
            None => principal.subject_id.clone(),
        };

        let artist_name = new_request.artist_name.unwrap_or_default();
        validate_required(&artist_name, "Artist name is required").map_err(ApiError::BadRequest)?;

        let request_id = Uuid::new_v4().to_string();
        info!("Creating event request {} for user {}", request_id, owner_id);

        let statement = Statement::new(format!(
            "INSERT INTO calendareventrequests ({0}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {0}",
            EVENT_REQUEST_COLUMNS
        ))
        .bind(request_id)
        .bind(Uuid::new_v4().to_string())
        .bind(owner_id)
        .bind(new_request.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()))
        .bind(new_request.request_date)
        .bind(new_request.start_time)
        .bind(new_request.end_time)
        .bind(new_request.amount)
        .bind(artist_name)
        .bind(new_request.event_name);

        match self.store.fetch_optional(statement).await {
            Ok(Some(created)) => Ok(created),
            Ok(None) => Err(ApiError::bad_request(
                "There was an error creating the event request.",
            )),
            Err(e) if e.is_foreign_key_violation() => {
                Err(ApiError::bad_request("No user exists for this event request."))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get an event request by ID; visible to its owner and to administrators
    pub async fn get(&self, request_id: &str, principal: &Principal) -> ApiResult<EventRequest> {
        let request: EventRequest = self
            .store
            .fetch_optional(
                Statement::new(format!(
                    "SELECT {} FROM calendareventrequests WHERE requestid = $1",
                    EVENT_REQUEST_COLUMNS
                ))
                .bind(request_id),
            )
            .await?
            .ok_or_else(|| ApiError::not_found("Event request not found."))?;

        policy::ensure_self_or_admin(
            principal,
            &request.owner_id,
            "You are not authorized to access this event request.",
        )?;

        Ok(request)
    }

    /// Partially update an event request
    pub async fn update(
        &self,
        request_id: &str,
        changes: UpdateEventRequest,
        principal: &Principal,
    ) -> ApiResult<EventRequest> {
        info!("Updating event request: {}", request_id);

        let owner = self.find_owner(request_id).await?;
        policy::ensure_self_or_admin(
            principal,
            &owner.owner_id,
            "You are not authorized to update this event request.",
        )?;

        self.apply_update(request_id, changes).await
    }

    /// Delete an event request, returning the removed row
    pub async fn delete(&self, request_id: &str, principal: &Principal) -> ApiResult<EventRequest> {
        let owner = self.find_owner(request_id).await?;
        policy::ensure_self_or_admin(
            principal,
            &owner.owner_id,
            "You are not authorized to delete this event request.",
        )?;

        self.remove(request_id).await
    }

    /// List every event request; administrators only
    pub async fn find_all(&self, principal: &Principal) -> ApiResult<Vec<EventRequest>> {
        policy::ensure_admin(principal, "Only administrators can list all event requests.")?;

        let requests: Vec<EventRequest> = self
            .store
            .fetch_all(Statement::new(format!(
                "SELECT {} FROM calendareventrequests ORDER BY requestdate, starttime",
                EVENT_REQUEST_COLUMNS
            )))
            .await?;

        if requests.is_empty() {
            return Err(ApiError::not_found("No event requests found."));
        }

        Ok(requests)
    }

    /// List the event requests of one user; the result may be empty
    pub async fn find_by_owner(
        &self,
        owner_id: &str,
        principal: &Principal,
    ) -> ApiResult<Vec<EventRequest>> {
        policy::ensure_self_or_admin(
            principal,
            owner_id,
            "You are not authorized to view these event requests.",
        )?;

        let requests = self
            .store
            .fetch_all(
                Statement::new(format!(
                    "SELECT {} FROM calendareventrequests WHERE userid = $1 \
                     ORDER BY requestdate, starttime",
                    EVENT_REQUEST_COLUMNS
                ))
                .bind(owner_id),
            )
            .await?;

        Ok(requests)
    }

    /// List event requests with the given status
    pub async fn find_by_status(&self, status: &str) -> ApiResult<Vec<EventRequest>> {
        let requests = self
            .store
            .fetch_all(
                Statement::new(format!(
                    "SELECT {} FROM calendareventrequests WHERE status = $1 \
                     ORDER BY requestdate, starttime",
                    EVENT_REQUEST_COLUMNS
                ))
                .bind(status),
            )
            .await?;

        Ok(requests)
    }

    pub(crate) async fn find_owner(&self, request_id: &str) -> ApiResult<EventOwner> {
        self.store
            .fetch_optional(
                Statement::new("SELECT userid FROM calendareventrequests WHERE requestid = $1")
                    .bind(request_id),
            )
            .await?
            .ok_or_else(|| ApiError::not_found("Event request not found."))
    }

    pub(crate) async fn apply_update(
        &self,
        request_id: &str,
        changes: UpdateEventRequest,
    ) -> ApiResult<EventRequest> {
        super::apply_partial_update(
            &self.store,
            EVENT_REQUESTS_TABLE,
            EVENT_REQUEST_KEY,
            request_id,
            event_fields(changes),
            "event request",
        )
        .await
    }

    pub(crate) async fn remove(&self, request_id: &str) -> ApiResult<EventRequest> {
        info!("Deleting event request: {}", request_id);

        self.store
            .fetch_optional(
                Statement::new(format!(
                    "DELETE FROM calendareventrequests WHERE requestid = $1 RETURNING {}",
                    EVENT_REQUEST_COLUMNS
                ))
                .bind(request_id),
            )
            .await?
            .ok_or_else(|| {
                ApiError::bad_request("There was an error deleting the event request.")
            })
    }
}

/// Build the whitelisted assignments of an event request update
fn event_fields(changes: UpdateEventRequest) -> UpdateFields {
    let mut fields = UpdateFields::new();

    if let Some(status) = changes.status {
        fields.set("status", status);
    }
    if let Some(request_date) = changes.request_date {
        fields.set("requestdate", request_date);
    }
    if let Some(start_time) = changes.start_time {
        fields.set("starttime", start_time);
    }
    if let Some(end_time) = changes.end_time {
        fields.set("endtime", end_time);
    }
    if let Some(amount) = changes.amount {
        fields.set("amount", amount);
    }
    if let Some(artist_name) = changes.artist_name {
        fields.set("artistname", artist_name);
    }
    if let Some(event_name) = changes.event_name {
        fields.set("eventname", event_name);
    }

    fields
}
