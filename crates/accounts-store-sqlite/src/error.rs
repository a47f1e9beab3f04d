//! Error type for `accounts-store-sqlite`.

use accounts_core::UserId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A `UNIQUE` column rejected the write. Carries SQLite's message, e.g.
  /// `UNIQUE constraint failed: users.email`.
  #[error("{0}")]
  UniqueViolation(String),

  #[error("user not found: {0}")]
  UserNotFound(UserId),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for accounts_core::Error {
  fn from(err: Error) -> Self {
    match err {
      Error::UniqueViolation(msg) => Self::Conflict(msg),
      Error::UserNotFound(id) => Self::NotFound(id),
      other => Self::Storage(Box::new(other)),
    }
  }
}
