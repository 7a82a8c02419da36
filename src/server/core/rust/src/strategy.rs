/* src/server/core/rust/src/strategy.rs */

use http::{Method, StatusCode};

use crate::directives::RequestDirectives;
use crate::version::AssetsVersion;

/// How a request is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
  /// Stale client assets: 409 with `X-Inertia-Location`, nothing resolved.
  ForceReload,
  /// Plain browser request: full HTML document.
  Document,
  /// Inertia request: JSON page object.
  Page,
}

/// Whether the client's asset version is out of date for this request.
/// Only GET Inertia requests that sent a version are checked.
pub fn is_stale(directives: &RequestDirectives, method: &Method, current: &AssetsVersion) -> bool {
  directives.is_inertia_request
    && *method == Method::GET
    && directives.current_version.as_deref().is_some_and(|token| !current.matches(token))
}

pub fn decide(
  directives: &RequestDirectives,
  method: &Method,
  current: &AssetsVersion,
) -> ResponseMode {
  if is_stale(directives, method, current) {
    tracing::debug!(
      client = ?directives.current_version,
      server = %current,
      "asset version mismatch, forcing reload"
    );
    ResponseMode::ForceReload
  } else if !directives.is_inertia_request {
    ResponseMode::Document
  } else {
    ResponseMode::Page
  }
}

/// Status to emit for a handler response. Redirects answering PUT, PATCH or
/// DELETE Inertia requests become 303 so the client follows up with GET.
pub fn redirect_status(
  is_inertia_request: bool,
  method: &Method,
  status: StatusCode,
) -> StatusCode {
  let mutating = [Method::PUT, Method::PATCH, Method::DELETE].contains(method);
  let redirect = status.is_redirection() && status != StatusCode::NOT_MODIFIED;
  if is_inertia_request && mutating && redirect {
    StatusCode::SEE_OTHER
  } else {
    status
  }
}
