//! The `UserStore` trait.
//!
//! Implemented by storage backends (e.g. `accounts-store-sqlite`). The
//! service and HTTP layers depend on this abstraction, never on a concrete
//! backend, so tests can substitute an in-memory double.

use std::future::Future;

use crate::user::{NewUser, User, UserId};

/// Durable, uniquely-keyed storage for users.
///
/// Every method is a single statement and atomic from the caller's point of
/// view. No multi-record transactions are exposed.
///
/// Backend errors must convert into [`crate::Error`] so the service can tell
/// a uniqueness violation ([`crate::Error::Conflict`]) and a vanished row
/// ([`crate::Error::NotFound`]) apart from other failures
/// ([`crate::Error::Storage`]).
pub trait UserStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static + Into<crate::Error>;

  /// Every user, in primary-key order. No pagination.
  fn find_all(&self) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// Retrieve a user by id. Returns `None` if not found.
  fn find_by_id(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Persist a new user and return it with its assigned id.
  ///
  /// Fails with a uniqueness violation if the username or email is taken.
  fn insert(&self, user: NewUser) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Replace the stored record with the same id.
  ///
  /// Fails with a uniqueness violation if the username or email belongs to a
  /// different record, or with not-found if the id no longer exists.
  fn save(&self, user: User) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Hard-delete by id. Returns the number of rows removed (0 or 1).
  fn delete_by_id(&self, id: UserId) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Number of stored users.
  fn count(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
