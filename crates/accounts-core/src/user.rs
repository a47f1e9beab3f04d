//! The user record and the request bodies that create or modify it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Store-assigned primary key.
pub type UserId = i64;

/// The role that selects the admin credential scheme.
pub const ADMIN_ROLE: &str = "admin";

/// Role given to users created without one.
pub const DEFAULT_ROLE: &str = "user";

// ─── Records ─────────────────────────────────────────────────────────────────

/// A persisted user account.
///
/// `credential_hash` is serialized as `password` to keep the wire shape of
/// the public API. Redacting it is the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id:              UserId,
  pub username:        String,
  pub email:           String,
  #[serde(rename = "password")]
  pub credential_hash: String,
  pub full_name:       Option<String>,
  pub role:            String,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
}

impl User {
  pub fn is_admin(&self) -> bool { self.role == ADMIN_ROLE }
}

/// A user that has not been inserted yet; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
  pub username:        String,
  pub email:           String,
  pub credential_hash: String,
  pub full_name:       Option<String>,
  pub role:            String,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
}

impl NewUser {
  /// Attach the id the store assigned.
  pub fn with_id(self, id: UserId) -> User {
    User {
      id,
      username:        self.username,
      email:           self.email,
      credential_hash: self.credential_hash,
      full_name:       self.full_name,
      role:            self.role,
      created_at:      self.created_at,
      updated_at:      self.updated_at,
    }
  }
}

// ─── Requests ────────────────────────────────────────────────────────────────

/// Body of a create request. Missing keys and `null` values deserialize as
/// empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateUserRequest {
  #[serde(deserialize_with = "null_as_empty")]
  pub username:  String,
  #[serde(deserialize_with = "null_as_empty")]
  pub email:     String,
  #[serde(deserialize_with = "null_as_empty")]
  pub password:  String,
  #[serde(deserialize_with = "null_as_empty")]
  pub full_name: String,
  #[serde(deserialize_with = "null_as_empty")]
  pub role:      String,
}

/// Body of an update request.
///
/// Every field is optional in the merge sense: an empty string means "leave
/// the stored value alone", so a field can never be cleared through an update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateUserRequest {
  #[serde(deserialize_with = "null_as_empty")]
  pub username:  String,
  #[serde(deserialize_with = "null_as_empty")]
  pub email:     String,
  #[serde(deserialize_with = "null_as_empty")]
  pub password:  String,
  #[serde(deserialize_with = "null_as_empty")]
  pub full_name: String,
  #[serde(deserialize_with = "null_as_empty")]
  pub role:      String,
}

/// Read a string, treating an explicit `null` like a missing key.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
  Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// `Some(value)` unless `value` is empty.
pub(crate) fn non_empty(value: &str) -> Option<&str> {
  (!value.is_empty()).then_some(value)
}
