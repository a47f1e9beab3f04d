//! Core types, policies and trait definitions for the accounts service.
//!
//! This crate knows nothing about HTTP or SQL. It defines the [`User`]
//! record, the [`UserStore`](store::UserStore) persistence contract, the
//! credential hashing policy, and the [`UserService`](service::UserService)
//! that applies that policy to create and update requests.

pub mod credential;
pub mod error;
pub mod seed;
pub mod service;
pub mod store;
pub mod user;

pub use error::{Error, Result};
pub use user::{NewUser, User, UserId};

#[cfg(test)]
mod test_store;
