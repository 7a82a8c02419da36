/* src/server/core/rust/src/context.rs */

use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method, Uri};

/// Framework-independent view of the request being answered.
/// Adapters build one per request; shared-data factories and SSR predicates receive it.
#[derive(Debug, Clone)]
pub struct RequestContext {
  pub method: Method,
  pub uri: Uri,
  pub headers: HeaderMap,
}

impl RequestContext {
  pub fn new(method: Method, uri: Uri, headers: HeaderMap) -> Self {
    Self { method, uri, headers }
  }

  pub fn from_parts(parts: &http::request::Parts) -> Self {
    Self::new(parts.method.clone(), parts.uri.clone(), parts.headers.clone())
  }

  /// Path and query of the request, as echoed in the page object `url`.
  pub fn url(&self) -> String {
    self
      .uri
      .path_and_query()
      .map_or_else(|| self.uri.path().to_string(), |pq| pq.as_str().to_string())
  }

  pub fn header(&self, name: &str) -> Option<&str> {
    self.headers.get(name).and_then(|v| v.to_str().ok())
  }

  /// Append a header; names or values that are not valid header text are dropped.
  pub fn with_header(mut self, name: &str, value: &str) -> Self {
    if let (Ok(name), Ok(value)) =
      (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value))
    {
      self.headers.append(name, value);
    }
    self
  }
}
