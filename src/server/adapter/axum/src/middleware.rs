/* src/server/adapter/axum/src/middleware.rs */

use axum::extract::{Request, State};
use axum::http::header::VARY;
use axum::http::{HeaderValue, Method};
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Response};
use inertia_server::{Inertia, RequestContext, RequestDirectives, redirect_status};

use crate::error::{AxumError, ErrorDetails, error_page};
use crate::response::InertiaReply;

/// Protocol layer around every route.
///
/// Stale GET Inertia requests are answered with 409 before the handler runs.
/// Other requests get the [`Inertia`] handle in their extensions. On the way
/// out mutation redirects to Inertia requests become 303 and error responses to
/// document requests become an HTML page. Every response carries
/// `Vary: X-Inertia`, since the HTML and JSON variants share a URL.
pub async fn inertia_middleware(
  State(inertia): State<Inertia>,
  req: Request,
  next: Next,
) -> Response {
  let (mut parts, body) = req.into_parts();
  let ctx = RequestContext::from_parts(&parts);
  let is_inertia = RequestDirectives::classify(&parts.headers).is_inertia_request;
  let method = parts.method.clone();

  let response = match inertia.check_version(&ctx).await {
    Ok(Some(conflict)) => InertiaReply(conflict).into_response(),
    Err(e) => AxumError(e).into_response(),
    Ok(None) => {
      parts.extensions.insert(inertia);
      next.run(Request::from_parts(parts, body)).await
    }
  };

  finish(response, is_inertia, &method)
}

fn finish(mut response: Response, is_inertia: bool, method: &Method) -> Response {
  if is_inertia {
    let status = redirect_status(true, method, response.status());
    if status != response.status() {
      tracing::debug!(from = %response.status(), %method, "redirect downgraded to 303");
      *response.status_mut() = status;
    }
  } else if let Some(details) = response.extensions_mut().remove::<ErrorDetails>() {
    let status = response.status();
    response = (status, Html(error_page(status, &details))).into_response();
  }

  response.headers_mut().append(VARY, HeaderValue::from_static("X-Inertia"));
  response
}
