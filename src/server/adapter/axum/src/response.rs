/* src/server/adapter/axum/src/response.rs */

use axum::http::header::LOCATION;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use inertia_server::headers;
use inertia_server::{InertiaError, InertiaResponse};

use crate::error::AxumError;

/// `IntoResponse` wrapper for a core [`InertiaResponse`].
#[derive(Debug)]
pub struct InertiaReply(pub InertiaResponse);

impl From<InertiaResponse> for InertiaReply {
  fn from(resp: InertiaResponse) -> Self {
    Self(resp)
  }
}

fn location_value(location: &str) -> Result<HeaderValue, AxumError> {
  HeaderValue::from_str(location)
    .map_err(|_| InertiaError::internal(format!("invalid redirect location: {location:?}")).into())
}

impl IntoResponse for InertiaReply {
  fn into_response(self) -> Response {
    match self.0 {
      InertiaResponse::Page(page) => {
        ([(headers::INERTIA, HeaderValue::from_static("true"))], axum::Json(page)).into_response()
      }
      InertiaResponse::Document(html) => Html(html).into_response(),
      InertiaResponse::Conflict { location } => match location_value(&location) {
        Ok(value) => (StatusCode::CONFLICT, [(headers::LOCATION, value)]).into_response(),
        Err(e) => e.into_response(),
      },
      InertiaResponse::Redirect { location } => match location_value(&location) {
        Ok(value) => (StatusCode::FOUND, [(LOCATION, value)]).into_response(),
        Err(e) => e.into_response(),
      },
    }
  }
}
