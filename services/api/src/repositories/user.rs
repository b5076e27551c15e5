//! User repository for database operations

use common::{
    sql::{Statement, UpdateFields},
    store::Store,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    jwt::{JwtService, Principal},
    models::user::{
        AuthenticatedUser, NewUser, Role, StoredCredential, UpdateUser, User, UserRecord,
    },
    password::PasswordService,
    policy,
    validation::{validate_email, validate_password},
};

pub(crate) const USERS_TABLE: &str = "users";
pub(crate) const USER_KEY: &str = "userid";
pub(crate) const USER_COLUMNS: &str =
    "userid, name, email, artistname, usertype, venuename, location";

const EMAIL_TAKEN: &str = "Email is already registered.";

/// User repository
#[derive(Clone)]
pub struct UserRepository<S> {
    store: S,
    passwords: PasswordService,
    tokens: JwtService,
}

impl<S: Store> UserRepository<S> {
    /// Create a new user repository
    pub fn new(store: S, passwords: PasswordService, tokens: JwtService) -> Self {
        Self {
            store,
            passwords,
            tokens,
        }
    }

    /// Register a new artist account and sign it in
    pub async fn register(&self, new_user: NewUser) -> ApiResult<AuthenticatedUser> {
        let user = self.create_account(new_user, Role::Artist).await?;
        self.issue_session(user)
    }

    /// Verify credentials and issue a session token
    pub async fn authenticate(&self, email: &str, password: &str) -> ApiResult<AuthenticatedUser> {
        info!("Authenticating user");

        let record = self
            .find_record_by_email(email)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;

        if !self.passwords.verify(password, &record.password_hash)? {
            return Err(ApiError::unauthorized("Invalid username/password"));
        }

        self.issue_session(record.into_public())
    }

    /// Get all users ordered by email
    pub async fn find_all(&self) -> ApiResult<Vec<User>> {
        let users: Vec<User> = self
            .store
            .fetch_all(Statement::new(format!(
                "SELECT {} FROM users ORDER BY email",
                USER_COLUMNS
            )))
            .await?;

        if users.is_empty() {
            return Err(ApiError::not_found("No users found"));
        }

        Ok(users)
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> ApiResult<User> {
        self.store
            .fetch_optional(
                Statement::new(format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
                    .bind(email),
            )
            .await?
            .ok_or_else(|| ApiError::not_found(format!("No user found for {}.", email)))
    }

    /// Get a user by ID; visible to the user themself and to administrators
    pub async fn get(&self, user_id: &str, principal: &Principal) -> ApiResult<User> {
        let user: User = self
            .store
            .fetch_optional(
                Statement::new(format!("SELECT {} FROM users WHERE userid = $1", USER_COLUMNS))
                    .bind(user_id),
            )
            .await?
            .ok_or_else(|| ApiError::not_found("User not found."))?;

        policy::ensure_self_or_admin(
            principal,
            &user.id,
            "You are not authorized to access this user.",
        )?;

        Ok(user)
    }

    /// Partially update a user's own profile
    pub async fn update(
        &self,
        user_id: &str,
        changes: UpdateUser,
        principal: &Principal,
    ) -> ApiResult<User> {
        info!("Updating user: {}", user_id);

        let existing = self
            .find_credential(user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found."))?;

        policy::ensure_self_or_admin(
            principal,
            &existing.id,
            "You are not authorized to update this user.",
        )?;

        let fields = profile_fields(&self.passwords, changes, &existing.password_hash)?;
        self.apply_update(user_id, fields).await
    }

    pub(crate) async fn apply_update(&self, user_id: &str, fields: UpdateFields) -> ApiResult<User> {
        super::apply_partial_update(&self.store, USERS_TABLE, USER_KEY, user_id, fields, "user")
            .await
            .map_err(email_conflict)
    }

    pub(crate) async fn create_account(&self, new_user: NewUser, role: Role) -> ApiResult<User> {
        info!("Creating {} account", role);

        validate_password(&new_user.password).map_err(|msg| ApiError::bad_request(msg + "."))?;
        validate_email(&new_user.email).map_err(ApiError::BadRequest)?;

        if self.find_record_by_email(&new_user.email).await?.is_some() {
            return Err(ApiError::bad_request(EMAIL_TAKEN));
        }

        let password_hash = self.passwords.hash(&new_user.password)?;

        let statement = Statement::new(format!(
            "INSERT INTO users (userid, name, email, password, artistname, usertype, venuename, location) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(new_user.name)
        .bind(new_user.email)
        .bind(password_hash)
        .bind(new_user.artist_name)
        .bind(role.as_str())
        .bind(new_user.venue_name)
        .bind(new_user.location);

        self.store
            .fetch_optional(statement)
            .await
            .map_err(|e| email_conflict(e.into()))?
            .ok_or_else(|| ApiError::bad_request("There was an error creating the user."))
    }

    pub(crate) fn issue_session(&self, user: User) -> ApiResult<AuthenticatedUser> {
        let token = self.tokens.issue(&Principal::from(&user))?;
        Ok(AuthenticatedUser { token, user })
    }

    pub(crate) async fn find_record_by_email(&self, email: &str) -> ApiResult<Option<UserRecord>> {
        let record = self
            .store
            .fetch_optional(
                Statement::new(format!(
                    "SELECT {}, password FROM users WHERE email = $1",
                    USER_COLUMNS
                ))
                .bind(email),
            )
            .await?;

        Ok(record)
    }

    pub(crate) async fn find_credential(&self, user_id: &str) -> ApiResult<Option<StoredCredential>> {
        let credential = self
            .store
            .fetch_optional(
                Statement::new("SELECT userid, password FROM users WHERE userid = $1").bind(user_id),
            )
            .await?;

        Ok(credential)
    }

    pub(crate) async fn delete(&self, user_id: &str) -> ApiResult<User> {
        info!("Deleting user: {}", user_id);

        self.store
            .fetch_optional(
                Statement::new(format!(
                    "DELETE FROM users WHERE userid = $1 RETURNING {}",
                    USER_COLUMNS
                ))
                .bind(user_id),
            )
            .await?
            .ok_or_else(|| ApiError::bad_request("There was an error deleting the user."))
    }

    pub(crate) fn passwords(&self) -> &PasswordService {
        &self.passwords
    }
}

/// Resolve the value stored for a password supplied in an update.
///
/// An empty password keeps the existing hash; anything else must pass the
/// length rule and is replaced by a fresh hash.
pub(crate) fn sanitize_password(
    passwords: &PasswordService,
    candidate: &str,
    existing_hash: &str,
) -> ApiResult<String> {
    if candidate.is_empty() {
        return Ok(existing_hash.to_string());
    }

    validate_password(candidate).map_err(ApiError::BadRequest)?;
    Ok(passwords.hash(candidate)?)
}

/// Build the whitelisted profile assignments of a user update
pub(crate) fn profile_fields(
    passwords: &PasswordService,
    changes: UpdateUser,
    existing_hash: &str,
) -> ApiResult<UpdateFields> {
    let mut fields = UpdateFields::new();

    if let Some(name) = changes.name {
        fields.set("name", name);
    }
    if let Some(email) = changes.email {
        validate_email(&email).map_err(ApiError::BadRequest)?;
        fields.set("email", email);
    }
    if let Some(password) = changes.password {
        fields.set(
            "password",
            sanitize_password(passwords, &password, existing_hash)?,
        );
    }
    if let Some(artist_name) = changes.artist_name {
        fields.set("artistname", artist_name);
    }
    if let Some(venue_name) = changes.venue_name {
        fields.set("venuename", venue_name);
    }
    if let Some(location) = changes.location {
        fields.set("location", location);
    }

    Ok(fields)
}

fn email_conflict(err: ApiError) -> ApiError {
    match err {
        ApiError::Database(e) if e.is_unique_violation() => ApiError::bad_request(EMAIL_TAKEN),
        other => other,
    }
}
