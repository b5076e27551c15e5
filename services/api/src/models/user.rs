//! User models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use thiserror::Error;

use super::nullable;

/// Role of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Artist,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Artist => "Artist",
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(String);

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "Artist" => Ok(Role::Artist),
            "Admin" => Ok(Role::Admin),
            _ => Err(UnknownRole(value)),
        }
    }
}

/// Public projection of a user row; never carries the password hash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    #[serde(rename = "userid")]
    #[sqlx(rename = "userid")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "artistname")]
    #[sqlx(rename = "artistname")]
    pub artist_name: Option<String>,
    #[serde(rename = "usertype")]
    #[sqlx(rename = "usertype", try_from = "String")]
    pub role: Role,
    #[serde(rename = "venuename")]
    #[sqlx(rename = "venuename")]
    pub venue_name: Option<String>,
    pub location: Option<String>,
}

/// Full user row including the stored password hash
#[derive(Debug, Clone, Deserialize, FromRow)]
pub struct UserRecord {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub user: User,
    #[serde(rename = "password")]
    #[sqlx(rename = "password")]
    pub password_hash: String,
}

impl UserRecord {
    /// Drop the hash, keeping only the public projection
    pub fn into_public(self) -> User {
        self.user
    }
}

/// Key and stored hash of a user, as read by update flows
#[derive(Debug, Clone, Deserialize, FromRow)]
pub struct StoredCredential {
    #[serde(rename = "userid")]
    #[sqlx(rename = "userid")]
    pub id: String,
    #[serde(rename = "password")]
    #[sqlx(rename = "password")]
    pub password_hash: String,
}

/// Request for user registration
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default, rename = "artistname")]
    pub artist_name: Option<String>,
    #[serde(default, rename = "venuename")]
    pub venue_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Request for user login
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// User update payload; absent fields stay untouched.
///
/// The optional profile columns accept an explicit `null`, which clears them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default, rename = "artistname", deserialize_with = "nullable")]
    pub artist_name: Option<Option<String>>,
    #[serde(default, rename = "venuename", deserialize_with = "nullable")]
    pub venue_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub location: Option<Option<String>>,
}

/// User update payload accepted from administrators
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminUpdateUser {
    #[serde(flatten)]
    pub profile: UpdateUser,
    #[serde(rename = "usertype")]
    pub role: Option<Role>,
}

/// Authenticated user together with a freshly issued token
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedUser {
    pub token: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_distinguishes_null_from_absent() {
        let changes: AdminUpdateUser = serde_json::from_value(json!({
            "name": "J",
            "password": "",
            "usertype": "Admin",
            "artistname": null,
        }))
        .unwrap();

        assert_eq!(changes.profile.artist_name, Some(None));
        assert_eq!(changes.profile.venue_name, None);
        assert_eq!(changes.profile.location, None);
        assert_eq!(changes.role, Some(Role::Admin));
    }

    #[test]
    fn test_update_keeps_supplied_values() {
        let changes: UpdateUser =
            serde_json::from_value(json!({ "venuename": "Blue Note" })).unwrap();

        assert_eq!(changes.venue_name, Some(Some("Blue Note".to_string())));
        assert_eq!(changes.artist_name, None);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        assert!(Role::try_from("admin".to_string()).is_err());
        assert_eq!(Role::try_from("Artist".to_string()).unwrap(), Role::Artist);
    }
}
