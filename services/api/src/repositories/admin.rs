//! Administrator operations
//!
//! Every operation here requires an Admin principal, checked before any
//! statement runs. There is no self-service exception.

use common::store::Store;
use tracing::{info, warn};

use crate::{
    error::{ApiError, ApiResult},
    jwt::Principal,
    models::{
        event_request::{EventRequest, UpdateEventRequest},
        user::{AdminUpdateUser, AuthenticatedUser, NewUser, Role, User},
    },
    policy,
    repositories::{EventRequestRepository, UserRepository, user::profile_fields},
};

const ADMIN_ONLY: &str = "Only administrators can perform this action.";
const INVALID_LOGIN: &str = "Invalid email/password.";

/// Administrator repository, layered over the entity repositories
#[derive(Clone)]
pub struct AdminRepository<S> {
    users: UserRepository<S>,
    events: EventRequestRepository<S>,
}

impl<S: Store> AdminRepository<S> {
    pub fn new(users: UserRepository<S>, events: EventRequestRepository<S>) -> Self {
        Self { users, events }
    }

    /// Create another administrator account
    pub async fn register(
        &self,
        principal: &Principal,
        new_admin: NewUser,
    ) -> ApiResult<AuthenticatedUser> {
        policy::ensure_admin(principal, ADMIN_ONLY)?;

        let admin = self.users.create_account(new_admin, Role::Admin).await?;
        self.users.issue_session(admin)
    }

    /// Sign in an administrator.
    ///
    /// Unknown emails, wrong passwords and non-admin accounts all fail with
    /// the same message.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<AuthenticatedUser> {
        let Some(record) = self.users.find_record_by_email(email).await? else {
            return Err(ApiError::unauthorized(INVALID_LOGIN));
        };

        if !self.users.passwords().verify(password, &record.password_hash)? {
            return Err(ApiError::unauthorized(INVALID_LOGIN));
        }

        if record.user.role != Role::Admin {
            warn!("Admin login attempted by non-admin user {}", record.user.id);
            return Err(ApiError::unauthorized(INVALID_LOGIN));
        }

        self.users.issue_session(record.into_public())
    }

    pub async fn all_users(&self, principal: &Principal) -> ApiResult<Vec<User>> {
        policy::ensure_admin(principal, ADMIN_ONLY)?;
        self.users.find_all().await
    }

    /// Partially update any user, including their role
    pub async fn update_user(
        &self,
        principal: &Principal,
        user_id: &str,
        changes: AdminUpdateUser,
    ) -> ApiResult<User> {
        policy::ensure_admin(principal, ADMIN_ONLY)?;
        info!("Admin {} updating user {}", principal.subject_id, user_id);

        let existing = self
            .users
            .find_credential(user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found."))?;

        let mut fields = profile_fields(
            self.users.passwords(),
            changes.profile,
            &existing.password_hash,
        )?;
        if let Some(role) = changes.role {
            fields.set("usertype", role.as_str());
        }

        self.users.apply_update(user_id, fields).await
    }

    pub async fn delete_user(&self, principal: &Principal, user_id: &str) -> ApiResult<User> {
        policy::ensure_admin(principal, ADMIN_ONLY)?;

        if self.users.find_credential(user_id).await?.is_none() {
            return Err(ApiError::not_found("User not found."));
        }

        self.users.delete(user_id).await
    }

    pub async fn all_event_requests(&self, principal: &Principal) -> ApiResult<Vec<EventRequest>> {
        self.events.find_all(principal).await
    }

    pub async fn update_event_request(
        &self,
        principal: &Principal,
        request_id: &str,
        changes: UpdateEventRequest,
    ) -> ApiResult<EventRequest> {
        policy::ensure_admin(principal, ADMIN_ONLY)?;

        self.events.find_owner(request_id).await?;
        self.events.apply_update(request_id, changes).await
    }

    pub async fn delete_event_request(
        &self,
        principal: &Principal,
        request_id: &str,
    ) -> ApiResult<EventRequest> {
        policy::ensure_admin(principal, ADMIN_ONLY)?;

        self.events.find_owner(request_id).await?;
        self.events.remove(request_id).await
    }
}
