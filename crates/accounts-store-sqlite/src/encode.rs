//! Encoding and decoding helpers between [`User`] and its SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings.

use accounts_core::{User, UserId};
use chrono::{DateTime, Utc};

use crate::{Error, Result};

/// Column list shared by every read, in [`RawUser::from_row`] order.
pub const USER_COLUMNS: &str =
  "id, username, email, password, full_name, role, created_at, updated_at";

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Rows ─────────────────────────────────────────────────────────────────────

/// A `users` row exactly as SQLite returns it.
pub struct RawUser {
  pub id:         UserId,
  pub username:   String,
  pub email:      String,
  pub password:   String,
  pub full_name:  Option<String>,
  pub role:       String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      username:   row.get(1)?,
      email:      row.get(2)?,
      password:   row.get(3)?,
      full_name:  row.get(4)?,
      role:       row.get(5)?,
      created_at: row.get(6)?,
      updated_at: row.get(7)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:              self.id,
      username:        self.username,
      email:           self.email,
      credential_hash: self.password,
      full_name:       self.full_name,
      role:            self.role,
      created_at:      decode_dt(&self.created_at)?,
      updated_at:      decode_dt(&self.updated_at)?,
    })
  }
}
