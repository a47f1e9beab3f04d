//! JSON REST API for the accounts service.
//!
//! Exposes an axum [`Router`] backed by a [`UserService`] over any
//! [`UserStore`]. Every response, success or failure, is an
//! [`Envelope`](envelope::Envelope). TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", accounts_api::api_router(service.clone()))
//! ```

pub mod envelope;
pub mod error;
pub mod users;

use accounts_core::{service::UserService, store::UserStore};
use axum::{Json, Router, routing::get};

pub use error::ApiError;

use envelope::Envelope;

/// Build the API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(service: UserService<S>) -> Router<()>
where
  S: UserStore + 'static,
{
  Router::new()
    .route("/health", get(health))
    .route("/users", get(users::list::<S>).post(users::create::<S>))
    .route(
      "/users/{id}",
      get(users::get_one::<S>)
        .put(users::update::<S>)
        .delete(users::delete_one::<S>),
    )
    .with_state(service)
}

/// `GET /health`
async fn health() -> Json<Envelope<()>> { Json(Envelope::done("API is running")) }

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use accounts_core::{
    credential::{self, BCRYPT_MAX_PASSWORD_LEN},
    seed::seed_if_empty,
    store::UserStore,
  };
  use accounts_store_sqlite::SqliteStore;
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::*;

  async fn service() -> UserService<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    UserService::new(Arc::new(store))
  }

  async fn send(
    service: &UserService<SqliteStore>,
    method:  &str,
    uri:     &str,
    body:    Option<&str>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let req = builder
      .body(body.map(|b| Body::from(b.to_owned())).unwrap_or_else(Body::empty))
      .unwrap();

    let resp = api_router(service.clone()).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
  }

  async fn create(service: &UserService<SqliteStore>, body: Value) -> (StatusCode, Value) {
    send(service, "POST", "/users", Some(&body.to_string())).await
  }

  // ── Health ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn health_reports_running() {
    let svc = service().await;
    let (status, body) = send(&svc, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "message": "API is running" }));
  }

  // ── List ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn list_returns_seeded_users() {
    let svc = service().await;
    seed_if_empty(svc.store().as_ref()).await.unwrap();

    let (status, body) = send(&svc, "GET", "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Retrieved 3 users");
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
    assert_eq!(body["data"][0]["username"], "admin");
    assert!(body.get("error").is_none());
  }

  // ── Get one ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn get_with_non_integer_id_is_400() {
    let svc = service().await;
    let (status, body) = send(&svc, "GET", "/users/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid user ID");
    assert!(body["error"].is_string());
  }

  #[tokio::test]
  async fn put_and_delete_with_non_integer_id_are_400() {
    let svc = service().await;
    for (method, body) in [("PUT", Some(r#"{"email":"x@x.com"}"#)), ("DELETE", None)] {
      let (status, body) = send(&svc, method, "/users/abc", body).await;
      assert_eq!(status, StatusCode::BAD_REQUEST, "{method}");
      assert_eq!(body["success"], false);
      assert_eq!(body["message"], "Invalid user ID");
      assert!(body["error"].is_string());
    }
  }

  #[tokio::test]
  async fn get_missing_is_404() {
    let svc = service().await;
    let (status, body) = send(&svc, "GET", "/users/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "success": false, "message": "User not found" }));
  }

  // ── Create ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_returns_201_with_user() {
    let svc = service().await;
    let (status, body) = create(
      &svc,
      json!({ "username": "ann", "email": "ann@x.com", "password": "user123", "fullName": "Ann" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["data"]["username"], "ann");
    assert_eq!(body["data"]["fullName"], "Ann");
    assert_eq!(body["data"]["role"], "user");
    assert!(body["data"]["id"].is_i64());
    assert!(body["data"]["password"].as_str().unwrap().starts_with("$argon2id$"));
  }

  #[tokio::test]
  async fn create_admin_stores_bcrypt_hash() {
    let svc = service().await;
    let (status, body) = create(
      &svc,
      json!({ "username": "root", "email": "root@x.com", "password": "admin123", "role": "admin" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(credential::verify("admin123", body["data"]["password"].as_str().unwrap()));
  }

  #[tokio::test]
  async fn create_missing_fields_is_400() {
    let svc = service().await;
    let (status, body) = create(&svc, json!({ "username": "ann", "email": "ann@x.com" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Username, email, and password are required");
  }

  #[tokio::test]
  async fn create_with_malformed_body_is_400() {
    let svc = service().await;
    let (status, body) = send(&svc, "POST", "/users", Some("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid request body");
  }

  #[tokio::test]
  async fn create_duplicate_is_409_and_store_unchanged() {
    let svc = service().await;
    let user = json!({ "username": "ann", "email": "ann@x.com", "password": "pw" });
    create(&svc, user.clone()).await;

    let (status, body) = create(&svc, json!({ "username": "ann", "email": "other@x.com", "password": "pw" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Failed to create user");
    assert!(body["error"].as_str().unwrap().contains("users.username"));

    let (_, list) = send(&svc, "GET", "/users", None).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn create_accepts_null_optional_fields() {
    let svc = service().await;
    let (status, body) = send(
      &svc,
      "POST",
      "/users",
      Some(r#"{"username":"a","email":"a@x.com","password":"p","fullName":null,"role":null}"#),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["fullName"], Value::Null);
    assert_eq!(body["data"]["role"], "user");
  }

  #[tokio::test]
  async fn create_admin_with_overlong_password_is_500_and_writes_nothing() {
    let svc = service().await;
    let too_long = "a".repeat(BCRYPT_MAX_PASSWORD_LEN + 1);
    let (status, body) = create(
      &svc,
      json!({ "username": "root", "email": "root@x.com", "password": too_long, "role": "admin" }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Failed to hash password");
    assert!(body["error"].is_string());
    assert_eq!(svc.store().count().await.unwrap(), 0);
  }

  // ── Update ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn update_changes_only_supplied_fields() {
    let svc = service().await;
    let (_, created) = create(
      &svc,
      json!({ "username": "jane", "email": "jane@x.com", "password": "pw", "fullName": "Jane Smith" }),
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
      &svc,
      "PUT",
      &format!("/users/{id}"),
      Some(&json!({ "email": "new@x.com" }).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User updated successfully");
    let data = &body["data"];
    assert_eq!(data["email"], "new@x.com");
    assert_eq!(data["fullName"], "Jane Smith");
    assert_eq!(data["username"], "jane");
    assert_eq!(data["password"], created["data"]["password"]);
    assert_eq!(data["createdAt"], created["data"]["createdAt"]);
  }

  #[tokio::test]
  async fn update_echoing_a_fetched_user_is_accepted() {
    let svc = service().await;
    let (_, created) = create(&svc, json!({ "username": "a", "email": "a@x.com", "password": "pw" })).await;
    let id = created["data"]["id"].as_i64().unwrap();
    assert_eq!(created["data"]["fullName"], Value::Null);

    let mut echo = created["data"].clone();
    echo["password"] = Value::Null;
    echo["email"] = json!("b@x.com");
    let (status, body) = send(&svc, "PUT", &format!("/users/{id}"), Some(&echo.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "b@x.com");
    assert_eq!(body["data"]["password"], created["data"]["password"]);
    assert_eq!(body["data"]["fullName"], Value::Null);
  }

  #[tokio::test]
  async fn update_admin_with_overlong_password_is_500_and_keeps_record() {
    let svc = service().await;
    let (_, created) = create(
      &svc,
      json!({ "username": "root", "email": "root@x.com", "password": "admin123", "role": "admin" }),
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let too_long = "a".repeat(BCRYPT_MAX_PASSWORD_LEN + 1);
    let (status, body) = send(
      &svc,
      "PUT",
      &format!("/users/{id}"),
      Some(&json!({ "role": "user", "password": too_long }).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to hash password");

    let (_, fetched) = send(&svc, "GET", &format!("/users/{id}"), None).await;
    assert_eq!(fetched["data"], created["data"]);
  }

  #[tokio::test]
  async fn update_malformed_body_for_missing_user_is_404() {
    let svc = service().await;
    let (status, body) = send(&svc, "PUT", "/users/7", Some("{not json")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
  }

  #[tokio::test]
  async fn update_malformed_body_for_existing_user_is_400() {
    let svc = service().await;
    let (_, created) = create(&svc, json!({ "username": "a", "email": "a@x.com", "password": "pw" })).await;
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, body) = send(&svc, "PUT", &format!("/users/{id}"), Some("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid request body");
  }

  #[tokio::test]
  async fn update_missing_is_404() {
    let svc = service().await;
    let (status, _) = send(&svc, "PUT", "/users/7", Some(r#"{"email":"x@x.com"}"#)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn update_into_taken_username_is_409() {
    let svc = service().await;
    create(&svc, json!({ "username": "a", "email": "a@x.com", "password": "pw" })).await;
    let (_, b) = create(&svc, json!({ "username": "b", "email": "b@x.com", "password": "pw" })).await;
    let id = b["data"]["id"].as_i64().unwrap();

    let (status, body) =
      send(&svc, "PUT", &format!("/users/{id}"), Some(r#"{"username":"a"}"#)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Failed to update user");
  }

  // ── Delete ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn delete_then_get_is_404() {
    let svc = service().await;
    let (_, created) = create(&svc, json!({ "username": "a", "email": "a@x.com", "password": "pw" })).await;
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, body) = send(&svc, "DELETE", &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "message": "User deleted successfully" }));

    let (status, _) = send(&svc, "GET", &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&svc, "DELETE", &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }
}
