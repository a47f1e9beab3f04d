//! The uniform response body.

use serde::Serialize;

/// `{success, data?, message?, error?}`; absent members are omitted.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
  pub success: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data:    Option<T>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error:   Option<String>,
}

impl<T> Envelope<T> {
  pub fn ok(data: T, message: impl Into<String>) -> Self {
    Self { success: true, data: Some(data), message: Some(message.into()), error: None }
  }
}

impl Envelope<()> {
  /// A success with nothing but a message.
  pub fn done(message: impl Into<String>) -> Self {
    Self { success: true, data: None, message: Some(message.into()), error: None }
  }

  pub fn failure(message: impl Into<String>, error: Option<String>) -> Self {
    Self { success: false, data: None, message: Some(message.into()), error }
  }
}
