//! The SQLite implementation of [`UserStore`].

use std::path::Path;

use accounts_core::{NewUser, User, UserId, store::UserStore};
use rusqlite::OptionalExtension as _;
use tracing::debug;

use crate::{
  Error, Result,
  encode::{RawUser, USER_COLUMNS, encode_dt},
  schema::SCHEMA,
};

/// Map a unique-constraint failure to [`Error::UniqueViolation`]; everything
/// else stays a database error.
fn classify(err: tokio_rusqlite::Error) -> Error {
  if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(code, msg)) = &err
    && code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  {
    return Error::UniqueViolation(msg.clone().unwrap_or_else(|| code.to_string()));
  }
  Error::Database(err)
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A user store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── UserStore impl ──────────────────────────────────────────────────────────

impl UserStore for SqliteStore {
  type Error = Error;

  async fn find_all(&self) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))?;
        let rows = stmt
          .query_map([], RawUser::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            rusqlite::params![id],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn insert(&self, user: NewUser) -> Result<User> {
    let username    = user.username.clone();
    let email       = user.email.clone();
    let password    = user.credential_hash.clone();
    let full_name   = user.full_name.clone();
    let role        = user.role.clone();
    let created_str = encode_dt(user.created_at);
    let updated_str = encode_dt(user.updated_at);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (
             username, email, password, full_name, role, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            username,
            email,
            password,
            full_name,
            role,
            created_str,
            updated_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(classify)?;

    debug!(user_id = id, "inserted user row");
    Ok(user.with_id(id))
  }

  async fn save(&self, user: User) -> Result<User> {
    let id          = user.id;
    let username    = user.username.clone();
    let email       = user.email.clone();
    let password    = user.credential_hash.clone();
    let full_name   = user.full_name.clone();
    let role        = user.role.clone();
    let created_str = encode_dt(user.created_at);
    let updated_str = encode_dt(user.updated_at);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE users
              SET username = ?1, email = ?2, password = ?3, full_name = ?4,
                  role = ?5, created_at = ?6, updated_at = ?7
            WHERE id = ?8",
          rusqlite::params![
            username,
            email,
            password,
            full_name,
            role,
            created_str,
            updated_str,
            id,
          ],
        )?)
      })
      .await
      .map_err(classify)?;

    if changed == 0 {
      return Err(Error::UserNotFound(id));
    }

    debug!(user_id = id, "saved user row");
    Ok(user)
  }

  async fn delete_by_id(&self, id: UserId) -> Result<u64> {
    let removed = self
      .conn
      .call(move |conn| Ok(conn.execute("DELETE FROM users WHERE id = ?1", rusqlite::params![id])?))
      .await?;

    Ok(removed as u64)
  }

  async fn count(&self) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?))
      .await?;

    Ok(count as u64)
  }
}
