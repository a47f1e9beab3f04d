//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::envelope::Envelope;

pub const NOT_FOUND: &str = "User not found";

/// An error returned by an API handler, rendered as a failed [`Envelope`].
///
/// `message` is the user-facing summary; `detail` lands in the envelope's
/// `error` member and carries the underlying error text.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{message}")]
  BadRequest { message: String, detail: Option<String> },

  #[error("user not found")]
  NotFound,

  #[error("{message}: {detail}")]
  Conflict { message: &'static str, detail: String },

  #[error("{message}: {detail}")]
  Internal { message: &'static str, detail: String },
}

impl ApiError {
  /// Map a service error, using `action` (e.g. `"Failed to create user"`) as
  /// the summary for conflicts and storage failures.
  pub fn from_service(action: &'static str, err: accounts_core::Error) -> Self {
    use accounts_core::Error;

    match err {
      Error::Validation(message) => Self::BadRequest { message, detail: None },
      Error::NotFound(_) => Self::NotFound,
      Error::Conflict(detail) => Self::Conflict { message: action, detail },
      Error::HashingFailure(detail) => {
        Self::Internal { message: "Failed to hash password", detail }
      }
      Error::Storage(e) => Self::Internal { message: action, detail: e.to_string() },
    }
  }

  pub fn invalid_id(err: std::num::ParseIntError) -> Self {
    Self::BadRequest { message: "Invalid user ID".into(), detail: Some(err.to_string()) }
  }

  pub fn invalid_body(rejection: JsonRejection) -> Self {
    Self::BadRequest {
      message: "Invalid request body".into(),
      detail:  Some(rejection.body_text()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message, detail) = match self {
      ApiError::BadRequest { message, detail } => (StatusCode::BAD_REQUEST, message, detail),
      ApiError::NotFound => (StatusCode::NOT_FOUND, NOT_FOUND.to_owned(), None),
      ApiError::Conflict { message, detail } => {
        (StatusCode::CONFLICT, message.to_owned(), Some(detail))
      }
      ApiError::Internal { message, detail } => {
        tracing::error!(%detail, "{message}");
        (StatusCode::INTERNAL_SERVER_ERROR, message.to_owned(), Some(detail))
      }
    };
    (status, Json(Envelope::failure(message, detail))).into_response()
  }
}
