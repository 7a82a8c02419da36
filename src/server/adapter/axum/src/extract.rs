/* src/server/adapter/axum/src/extract.rs */

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use inertia_server::{
  Inertia, InertiaError, PageProps, RenderOptions, RequestContext, RequestDirectives,
};

use crate::error::AxumError;
use crate::response::InertiaReply;

/// Per-request handle for answering with an Inertia page.
///
/// Requires the layer installed by [`crate::InertiaRouterExt::with_inertia`].
#[derive(Debug, Clone)]
pub struct InertiaContext {
  inertia: Inertia,
  request: RequestContext,
}

impl<S> FromRequestParts<S> for InertiaContext
where
  S: Send + Sync,
{
  type Rejection = AxumError;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    let inertia = parts
      .extensions
      .get::<Inertia>()
      .cloned()
      .ok_or_else(|| InertiaError::internal("inertia layer is not installed on this router"))?;
    Ok(Self { inertia, request: RequestContext::from_parts(parts) })
  }
}

impl InertiaContext {
  pub fn request(&self) -> &RequestContext {
    &self.request
  }

  pub fn is_inertia_request(&self) -> bool {
    RequestDirectives::classify(&self.request.headers).is_inertia_request
  }

  pub async fn render(&self, component: &str, props: PageProps) -> Result<InertiaReply, AxumError> {
    self.render_with(component, props, RenderOptions::default()).await
  }

  pub async fn render_with(
    &self,
    component: &str,
    props: PageProps,
    options: RenderOptions,
  ) -> Result<InertiaReply, AxumError> {
    let resp = self.inertia.render_with(&self.request, component, props, options).await?;
    Ok(InertiaReply(resp))
  }

  /// Redirect outside the single-page flow (external site, file download).
  pub fn location(&self, url: impl Into<String>) -> InertiaReply {
    InertiaReply(self.inertia.location(&self.request, url))
  }
}
