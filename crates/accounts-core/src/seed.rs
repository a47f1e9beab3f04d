//! First-run bootstrap: default accounts for an empty store.

use chrono::Utc;
use tracing::{debug, info};

use crate::{
  Result,
  credential::{CredentialScheme, hash_blocking},
  error::from_store,
  store::UserStore,
  user::NewUser,
};

struct SeedUser {
  username:  &'static str,
  email:     &'static str,
  password:  &'static str,
  full_name: &'static str,
  role:      &'static str,
  /// Named explicitly: the moderator gets bcrypt even though it is not an
  /// admin, which [`crate::credential::choose_scheme`] would never pick.
  scheme:    CredentialScheme,
}

const SEED_USERS: [SeedUser; 3] = [
  SeedUser {
    username:  "admin",
    email:     "admin@example.com",
    password:  "admin123",
    full_name: "System Administrator",
    role:      "admin",
    scheme:    CredentialScheme::Admin,
  },
  SeedUser {
    username:  "jdoe",
    email:     "john.doe@example.com",
    password:  "user123",
    full_name: "John Doe",
    role:      "user",
    scheme:    CredentialScheme::Standard,
  },
  SeedUser {
    username:  "moderator1",
    email:     "mod@example.com",
    password:  "mod123",
    full_name: "Jane Smith",
    role:      "moderator",
    scheme:    CredentialScheme::Admin,
  },
];

/// Insert the default users if, and only if, the store is empty.
///
/// The guard is emptiness, not identity: a store holding any user at all is
/// left untouched. Returns the number of users inserted.
pub async fn seed_if_empty<S: UserStore>(store: &S) -> Result<usize> {
  let existing = store.count().await.map_err(from_store)?;
  if existing > 0 {
    debug!(existing, "store not empty; skipping seed");
    return Ok(0);
  }

  for seed in &SEED_USERS {
    let credential_hash = hash_blocking(seed.scheme, seed.password.to_owned()).await?;
    let now = Utc::now();
    store
      .insert(NewUser {
        username: seed.username.to_owned(),
        email: seed.email.to_owned(),
        credential_hash,
        full_name: Some(seed.full_name.to_owned()),
        role: seed.role.to_owned(),
        created_at: now,
        updated_at: now,
      })
      .await
      .map_err(from_store)?;
  }

  info!(count = SEED_USERS.len(), "seeded initial users");
  Ok(SEED_USERS.len())
}
