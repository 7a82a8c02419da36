/* demos/standalone/server-rust/src/pages/users.rs */

use axum::extract::Path;
use axum::http::StatusCode;
use axum::http::header::LOCATION;
use axum::response::{IntoResponse, Redirect};
use inertia_server::{InertiaError, PageProps, Prop};
use inertia_server_axum::{AxumError, InertiaContext, InertiaReply};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct User {
  pub id: u32,
  pub name: &'static str,
}

const USERS: [User; 3] =
  [User { id: 1, name: "Ada" }, User { id: 2, name: "Grace" }, User { id: 3, name: "Linus" }];

pub async fn index(cx: InertiaContext) -> Result<InertiaReply, AxumError> {
  let props = PageProps::new()
    .with("users", Prop::merge(|| async { Ok(USERS.to_vec()) }))
    .with("total", serde_json::json!(USERS.len()));
  cx.render("Users/Index", props).await
}

pub async fn show(cx: InertiaContext, Path(id): Path<u32>) -> Result<InertiaReply, AxumError> {
  let user = USERS
    .iter()
    .find(|u| u.id == id)
    .cloned()
    .ok_or_else(|| InertiaError::not_found(format!("user {id} not found")))?;
  let props = PageProps::from_serialize(&serde_json::json!({ "user": user }))?;
  cx.render("Users/Show", props).await
}

pub async fn create() -> Redirect {
  Redirect::to("/users")
}

/// Plain 302; the layer turns it into 303 for Inertia visits.
pub async fn destroy(Path(id): Path<u32>) -> impl IntoResponse {
  tracing::info!(id, "user deleted");
  (StatusCode::FOUND, [(LOCATION, "/users")])
}
