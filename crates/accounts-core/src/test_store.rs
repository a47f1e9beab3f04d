//! In-memory [`UserStore`] double for unit tests.

use std::sync::{
  Mutex,
  atomic::{AtomicI64, Ordering},
};

use crate::{
  Error, Result,
  store::UserStore,
  user::{NewUser, User, UserId},
};

#[derive(Default)]
pub struct MemoryStore {
  rows:    Mutex<Vec<User>>,
  last_id: AtomicI64,
}

/// Mirror the message SQLite gives for a unique violation.
fn check_unique(rows: &[User], id: Option<UserId>, username: &str, email: &str) -> Result<()> {
  for row in rows.iter().filter(|r| Some(r.id) != id) {
    if row.username == username {
      return Err(Error::Conflict("UNIQUE constraint failed: users.username".into()));
    }
    if row.email == email {
      return Err(Error::Conflict("UNIQUE constraint failed: users.email".into()));
    }
  }
  Ok(())
}

impl UserStore for MemoryStore {
  type Error = Error;

  async fn find_all(&self) -> Result<Vec<User>> {
    Ok(self.rows.lock().unwrap().clone())
  }

  async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
    Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
  }

  async fn insert(&self, user: NewUser) -> Result<User> {
    let mut rows = self.rows.lock().unwrap();
    check_unique(&rows, None, &user.username, &user.email)?;

    let user = user.with_id(self.last_id.fetch_add(1, Ordering::SeqCst) + 1);
    rows.push(user.clone());
    Ok(user)
  }

  async fn save(&self, user: User) -> Result<User> {
    let mut rows = self.rows.lock().unwrap();
    check_unique(&rows, Some(user.id), &user.username, &user.email)?;

    let slot = rows
      .iter_mut()
      .find(|r| r.id == user.id)
      .ok_or(Error::NotFound(user.id))?;
    *slot = user.clone();
    Ok(user)
  }

  async fn delete_by_id(&self, id: UserId) -> Result<u64> {
    let mut rows = self.rows.lock().unwrap();
    let before = rows.len();
    rows.retain(|r| r.id != id);
    Ok((before - rows.len()) as u64)
  }

  async fn count(&self) -> Result<u64> {
    Ok(self.rows.lock().unwrap().len() as u64)
  }
}
