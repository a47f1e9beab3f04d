//! Handlers for `/users` endpoints.
//!
//! | Method   | Path          | Notes |
//! |----------|---------------|-------|
//! | `GET`    | `/users`      | Every user, primary-key order |
//! | `POST`   | `/users`      | Body: `{username, email, password, fullName?, role?}`; 201 |
//! | `GET`    | `/users/{id}` | 400 if `id` is not an integer, 404 if absent |
//! | `PUT`    | `/users/{id}` | Body: any subset of the create keys; empty means unchanged |
//! | `DELETE` | `/users/{id}` | Hard delete |

use accounts_core::{
  User, UserId,
  service::UserService,
  store::UserStore,
  user::{CreateUserRequest, UpdateUserRequest},
};
use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};

use crate::{envelope::Envelope, error::ApiError};

fn parse_id(raw: &str) -> Result<UserId, ApiError> {
  raw.parse().map_err(ApiError::invalid_id)
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /users`
pub async fn list<S>(
  State(service): State<UserService<S>>,
) -> Result<Json<Envelope<Vec<User>>>, ApiError>
where
  S: UserStore + 'static,
{
  let users = service
    .list_users()
    .await
    .map_err(|e| ApiError::from_service("Failed to fetch users", e))?;
  let message = format!("Retrieved {} users", users.len());
  Ok(Json(Envelope::ok(users, message)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /users/{id}`
pub async fn get_one<S>(
  State(service): State<UserService<S>>,
  Path(id): Path<String>,
) -> Result<Json<Envelope<User>>, ApiError>
where
  S: UserStore + 'static,
{
  let id = parse_id(&id)?;
  let user = service
    .get_user(id)
    .await
    .map_err(|e| ApiError::from_service("Failed to fetch user", e))?;
  Ok(Json(Envelope::ok(user, "User retrieved successfully")))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /users`
pub async fn create<S>(
  State(service): State<UserService<S>>,
  body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: UserStore + 'static,
{
  let Json(request) = body.map_err(ApiError::invalid_body)?;
  let user = service
    .create_user(request)
    .await
    .map_err(|e| ApiError::from_service("Failed to create user", e))?;
  Ok((StatusCode::CREATED, Json(Envelope::ok(user, "User created successfully"))))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /users/{id}`
pub async fn update<S>(
  State(service): State<UserService<S>>,
  Path(id): Path<String>,
  body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<Envelope<User>>, ApiError>
where
  S: UserStore + 'static,
{
  let id = parse_id(&id)?;
  // An unknown id wins over a malformed body.
  service
    .get_user(id)
    .await
    .map_err(|e| ApiError::from_service("Failed to fetch user", e))?;
  let Json(request) = body.map_err(ApiError::invalid_body)?;
  let user = service
    .update_user(id, request)
    .await
    .map_err(|e| ApiError::from_service("Failed to update user", e))?;
  Ok(Json(Envelope::ok(user, "User updated successfully")))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /users/{id}`
pub async fn delete_one<S>(
  State(service): State<UserService<S>>,
  Path(id): Path<String>,
) -> Result<Json<Envelope<()>>, ApiError>
where
  S: UserStore + 'static,
{
  let id = parse_id(&id)?;
  service
    .delete_user(id)
    .await
    .map_err(|e| ApiError::from_service("Failed to delete user", e))?;
  Ok(Json(Envelope::done("User deleted successfully")))
}
