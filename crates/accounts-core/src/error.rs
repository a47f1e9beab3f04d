//! Error types for `accounts-core`.

use thiserror::Error;

use crate::user::UserId;

#[derive(Debug, Error)]
pub enum Error {
  /// Required input was missing from a request.
  #[error("{0}")]
  Validation(String),

  #[error("user not found: {0}")]
  NotFound(UserId),

  /// A unique-constrained field duplicates another record's value.
  #[error("{0}")]
  Conflict(String),

  /// The hashing primitive failed; nothing was written.
  #[error("failed to hash password: {0}")]
  HashingFailure(String),

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Convert a backend error into the core taxonomy.
pub(crate) fn from_store<E: Into<Error>>(err: E) -> Error { err.into() }
