/* src/server/adapter/axum/src/error.rs */

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use inertia_server::InertiaError;

/// Newtype wrapper to implement `IntoResponse` for `InertiaError`.
/// Required because Rust's orphan rule prevents `impl IntoResponse for InertiaError`
/// when both types are foreign to this crate.
#[derive(Debug)]
pub struct AxumError(pub InertiaError);

/// Error summary attached to error responses so the middleware can re-render
/// it as an HTML page for plain browser requests.
#[derive(Debug, Clone)]
pub(crate) struct ErrorDetails {
  pub code: String,
  pub message: String,
}

impl IntoResponse for AxumError {
  fn into_response(self) -> Response {
    let err = self.0;
    let status = StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
      tracing::error!(code = err.code(), error = %err, "request failed");
    }
    let details = ErrorDetails { code: err.code().to_string(), message: err.message() };
    let body = serde_json::json!({
      "ok": false,
      "error": {
        "code": details.code,
        "message": details.message,
      }
    });
    let mut response = (status, axum::Json(body)).into_response();
    response.extensions_mut().insert(details);
    response
  }
}

impl From<InertiaError> for AxumError {
  fn from(err: InertiaError) -> Self {
    Self(err)
  }
}

/// Plain error page served to document requests.
pub(crate) fn error_page(status: StatusCode, details: &ErrorDetails) -> String {
  let title = inertia_server::escape_html(&status.to_string());
  let message = inertia_server::escape_html(&details.message);
  let code = inertia_server::escape_html(&details.code);
  format!(
    "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{title}</title></head>\
     <body><h1>{title}</h1><p>{message}</p><p><code>{code}</code></p></body></html>"
  )
}
