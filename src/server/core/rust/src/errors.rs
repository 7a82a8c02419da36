/* src/server/core/rust/src/errors.rs */

fn default_status(code: &str) -> u16 {
  match code {
    "VALIDATION_ERROR" => 400,
    "UNAUTHORIZED" => 401,
    "FORBIDDEN" => 403,
    "NOT_FOUND" => 404,
    "RATE_LIMITED" => 429,
    _ => 500,
  }
}

#[derive(Debug, thiserror::Error)]
pub enum InertiaError {
  /// Raised by application code (prop producers, shared-data factories).
  #[error("{code}: {message}")]
  Handler { code: String, message: String, status: u16 },

  /// A prop producer failed; the whole page build is abandoned.
  #[error("prop '{prop}' failed to resolve: {source}")]
  PropResolution {
    prop: String,
    #[source]
    source: Box<InertiaError>,
  },

  #[error("SSR render failed: {0}")]
  SsrRender(String),

  #[error("asset version computation failed: {0}")]
  VersionComputation(String),

  #[error("root view '{0}' is not registered")]
  ViewNotFound(String),

  #[error("invalid inertia config: {0}")]
  Config(String),

  #[error("serialization failed: {0}")]
  Serialize(#[from] serde_json::Error),
}

impl InertiaError {
  pub fn new(code: impl Into<String>, message: impl Into<String>, status: u16) -> Self {
    Self::Handler { code: code.into(), message: message.into(), status }
  }

  pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
    let code = code.into();
    let status = default_status(&code);
    Self::Handler { code, message: message.into(), status }
  }

  pub fn validation(msg: impl Into<String>) -> Self {
    Self::with_code("VALIDATION_ERROR", msg)
  }

  pub fn not_found(msg: impl Into<String>) -> Self {
    Self::with_code("NOT_FOUND", msg)
  }

  pub fn internal(msg: impl Into<String>) -> Self {
    Self::with_code("INTERNAL_ERROR", msg)
  }

  pub fn unauthorized(msg: impl Into<String>) -> Self {
    Self::with_code("UNAUTHORIZED", msg)
  }

  pub fn forbidden(msg: impl Into<String>) -> Self {
    Self::with_code("FORBIDDEN", msg)
  }

  pub(crate) fn prop(name: &str, source: InertiaError) -> Self {
    Self::PropResolution { prop: name.to_string(), source: Box::new(source) }
  }

  pub fn code(&self) -> &str {
    match self {
      Self::Handler { code, .. } => code,
      Self::PropResolution { .. } => "PROP_RESOLUTION_FAILED",
      Self::SsrRender(_) => "SSR_RENDER_FAILED",
      Self::VersionComputation(_) => "VERSION_COMPUTATION_FAILED",
      Self::ViewNotFound(_) => "VIEW_NOT_FOUND",
      Self::Config(_) => "CONFIG_ERROR",
      Self::Serialize(_) => "SERIALIZATION_ERROR",
    }
  }

  /// HTTP status for this error. A failed prop is a server error whatever its
  /// cause; the cause stays reachable through `source`.
  pub fn status(&self) -> u16 {
    match self {
      Self::Handler { status, .. } => *status,
      _ => 500,
    }
  }

  /// Message without the code prefix, for response bodies.
  pub fn message(&self) -> String {
    match self {
      Self::Handler { message, .. } => message.clone(),
      other => other.to_string(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_status_known_codes() {
    assert_eq!(default_status("VALIDATION_ERROR"), 400);
    assert_eq!(default_status("UNAUTHORIZED"), 401);
    assert_eq!(default_status("FORBIDDEN"), 403);
    assert_eq!(default_status("NOT_FOUND"), 404);
    assert_eq!(default_status("RATE_LIMITED"), 429);
    assert_eq!(default_status("INTERNAL_ERROR"), 500);
    assert_eq!(default_status("CUSTOM_ERROR"), 500);
  }

  #[test]
  fn handler_error_keeps_explicit_status() {
    let err = InertiaError::new("RATE_LIMITED", "too fast", 429);
    assert_eq!(err.code(), "RATE_LIMITED");
    assert_eq!(err.message(), "too fast");
    assert_eq!(err.status(), 429);
    assert_eq!(err.to_string(), "RATE_LIMITED: too fast");
  }

  #[test]
  fn prop_failure_is_server_error() {
    let err = InertiaError::prop("user", InertiaError::not_found("no such user"));
    assert_eq!(err.code(), "PROP_RESOLUTION_FAILED");
    assert_eq!(err.status(), 500);
    let InertiaError::PropResolution { source, .. } = &err else { panic!("expected prop failure") };
    assert_eq!(source.status(), 404);
    assert_eq!(err.to_string(), "prop 'user' failed to resolve: NOT_FOUND: no such user");
  }

  #[test]
  fn protocol_failures_are_server_errors() {
    assert_eq!(InertiaError::SsrRender("boom".into()).status(), 500);
    assert_eq!(InertiaError::VersionComputation("io".into()).code(), "VERSION_COMPUTATION_FAILED");
    assert_eq!(InertiaError::ViewNotFound("root".into()).status(), 500);
  }

  #[test]
  fn convenience_constructors() {
    assert_eq!(InertiaError::validation("x").status(), 400);
    assert_eq!(InertiaError::not_found("x").status(), 404);
    assert_eq!(InertiaError::internal("x").status(), 500);
    assert_eq!(InertiaError::unauthorized("x").status(), 401);
    assert_eq!(InertiaError::forbidden("x").status(), 403);
  }
}
