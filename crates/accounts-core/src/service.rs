//! [`UserService`] applies validation and the credential policy to
//! requests, then hands the result to a [`UserStore`].
//!
//! Updates are read-then-write with no version check. Two updates racing on
//! the same user both read the same snapshot and the later `save` silently
//! discards the earlier one's changes.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::{
  Error, Result,
  credential::{Operation, choose_scheme, hash_blocking},
  error::from_store,
  store::UserStore,
  user::{
    CreateUserRequest, DEFAULT_ROLE, NewUser, UpdateUserRequest, User, UserId, non_empty,
  },
};

/// Message carried by the validation error for an incomplete create request.
pub const REQUIRED_FIELDS: &str = "Username, email, and password are required";

/// Create, read, update and delete operations over a shared store handle.
///
/// Cloning is cheap: the store is reference-counted.
pub struct UserService<S> {
  store: Arc<S>,
}

impl<S> Clone for UserService<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: UserStore> UserService<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub fn store(&self) -> &Arc<S> { &self.store }

  // ── Reads ─────────────────────────────────────────────────────────────────

  pub async fn list_users(&self) -> Result<Vec<User>> {
    self.store.find_all().await.map_err(from_store)
  }

  pub async fn get_user(&self, id: UserId) -> Result<User> {
    self
      .store
      .find_by_id(id)
      .await
      .map_err(from_store)?
      .ok_or(Error::NotFound(id))
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  /// Validate, hash and insert a new user.
  pub async fn create_user(&self, request: CreateUserRequest) -> Result<User> {
    let CreateUserRequest { username, email, password, full_name, role } = request;

    if username.is_empty() || email.is_empty() || password.is_empty() {
      return Err(Error::Validation(REQUIRED_FIELDS.to_owned()));
    }

    let scheme = choose_scheme(None, &role, Operation::Create);
    let role = non_empty(&role).unwrap_or(DEFAULT_ROLE).to_owned();
    let credential_hash = hash_blocking(scheme, password).await?;

    let now = Utc::now();
    let new_user = NewUser {
      username,
      email,
      credential_hash,
      full_name: non_empty(&full_name).map(str::to_owned),
      role,
      created_at: now,
      updated_at: now,
    };

    let user = self.store.insert(new_user).await.map_err(from_store).inspect_err(|e| {
      if let Error::Conflict(reason) = e {
        warn!(%reason, "create rejected by uniqueness constraint");
      }
    })?;

    info!(user_id = user.id, username = %user.username, role = %user.role, ?scheme, "user created");
    Ok(user)
  }

  /// Merge the non-empty fields of `request` into the stored user.
  ///
  /// A new password is hashed with the admin scheme if the stored role *or*
  /// the requested role is admin; see [`choose_scheme`].
  pub async fn update_user(&self, id: UserId, request: UpdateUserRequest) -> Result<User> {
    let UpdateUserRequest { username, email, password, full_name, role } = request;

    let mut user = self.get_user(id).await.inspect_err(|e| {
      if matches!(e, Error::NotFound(_)) {
        warn!(user_id = id, "update of unknown user");
      }
    })?;

    // Captured before the merge so a role change in this request cannot hide
    // the stored admin status from the scheme decision.
    let stored_role = user.role.clone();

    if let Some(username) = non_empty(&username) {
      user.username = username.to_owned();
    }
    if let Some(email) = non_empty(&email) {
      user.email = email.to_owned();
    }
    if !password.is_empty() {
      let scheme = choose_scheme(Some(&stored_role), &role, Operation::Update);
      user.credential_hash = hash_blocking(scheme, password).await?;
    }
    if let Some(full_name) = non_empty(&full_name) {
      user.full_name = Some(full_name.to_owned());
    }
    if let Some(role) = non_empty(&role) {
      user.role = role.to_owned();
    }

    user.updated_at = Utc::now();

    let user = self.store.save(user).await.map_err(from_store).inspect_err(|e| match e {
      Error::Conflict(reason) => warn!(user_id = id, %reason, "update rejected by uniqueness constraint"),
      Error::NotFound(_) => warn!(user_id = id, "user vanished before update was saved"),
      _ => {}
    })?;

    info!(user_id = user.id, role = %user.role, "user updated");
    Ok(user)
  }

  pub async fn delete_user(&self, id: UserId) -> Result<()> {
    let removed = self.store.delete_by_id(id).await.map_err(from_store)?;
    if removed == 0 {
      warn!(user_id = id, "delete of unknown user");
      return Err(Error::NotFound(id));
    }

    info!(user_id = id, "user deleted");
    Ok(())
  }
}
