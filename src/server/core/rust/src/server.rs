/* src/server/core/rust/src/server.rs */

use std::fmt;
use std::sync::Arc;

use crate::builder::PageBuilder;
use crate::config::ResolvedConfig;
use crate::context::RequestContext;
use crate::directives::RequestDirectives;
use crate::errors::InertiaError;
use crate::page::PageObject;
use crate::props::PageProps;
use crate::ssr::{HttpSsrRenderer, SsrRenderer, render_into};
use crate::strategy::{ResponseMode, decide, is_stale};
use crate::version::AssetsVersion;
use crate::views::{RootView, Views};

/// Per-render overrides of the page flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
  encrypt_history: Option<bool>,
  clear_history: bool,
}

impl RenderOptions {
  pub fn new() -> Self {
    Self::default()
  }

  /// Override the configured `history.encrypt` for this response.
  pub fn encrypt_history(mut self, encrypt: bool) -> Self {
    self.encrypt_history = Some(encrypt);
    self
  }

  pub fn clear_history(mut self) -> Self {
    self.clear_history = true;
    self
  }
}

/// Framework-neutral outcome of a render; adapters turn it into HTTP.
#[derive(Debug, Clone, PartialEq)]
pub enum InertiaResponse {
  /// JSON page object, `X-Inertia: true`.
  Page(PageObject),
  /// Full HTML document.
  Document(String),
  /// 409 with `X-Inertia-Location`: the client does a full visit to `location`.
  Conflict { location: String },
  /// Plain 302 redirect.
  Redirect { location: String },
}

impl InertiaResponse {
  pub fn status(&self) -> u16 {
    match self {
      Self::Page(_) | Self::Document(_) => 200,
      Self::Conflict { .. } => 409,
      Self::Redirect { .. } => 302,
    }
  }
}

/// Builder for an [`Inertia`] handle.
pub struct InertiaServer {
  config: ResolvedConfig,
  views: Views,
  ssr: Option<Arc<dyn SsrRenderer>>,
}

impl InertiaServer {
  pub fn new(config: ResolvedConfig) -> Self {
    Self { config, views: Views::new(), ssr: None }
  }

  pub fn views(mut self, views: Views) -> Self {
    self.views = views;
    self
  }

  pub fn view(mut self, name: impl Into<String>, html: impl Into<String>) -> Self {
    self.views.insert(name, html);
    self
  }

  pub fn ssr_renderer(mut self, renderer: impl SsrRenderer + 'static) -> Self {
    self.ssr = Some(Arc::new(renderer));
    self
  }

  /// Check the setup and freeze it. With SSR enabled and no renderer given,
  /// an [`HttpSsrRenderer`] for `ssr.url` is used.
  pub fn build(self) -> Result<Inertia, InertiaError> {
    if let RootView::Static(name) = &self.config.root_view
      && !self.views.contains(name)
    {
      return Err(InertiaError::ViewNotFound(name.clone()));
    }

    let ssr = match self.ssr {
      Some(renderer) => Some(renderer),
      None if self.config.ssr.enabled => {
        let renderer: Arc<dyn SsrRenderer> =
          Arc::new(HttpSsrRenderer::new(&self.config.file.ssr.url));
        Some(renderer)
      }
      None => None,
    };

    Ok(Inertia { inner: Arc::new(Inner { config: self.config, views: self.views, ssr }) })
  }
}

struct Inner {
  config: ResolvedConfig,
  views: Views,
  ssr: Option<Arc<dyn SsrRenderer>>,
}

/// Shared, cheaply cloneable protocol handle. One per application.
#[derive(Clone)]
pub struct Inertia {
  inner: Arc<Inner>,
}

impl fmt::Debug for Inertia {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Inertia")
      .field("config", &self.inner.config)
      .field("views", &self.inner.views.len())
      .field("ssr", &self.inner.ssr.is_some())
      .finish()
  }
}

impl Inertia {
  pub fn config(&self) -> &ResolvedConfig {
    &self.inner.config
  }

  pub async fn version(&self) -> Result<AssetsVersion, InertiaError> {
    self.inner.config.version.get().await
  }

  /// Drop the memoized asset version; the next request recomputes it.
  pub fn invalidate_version(&self) {
    self.inner.config.version.invalidate();
  }

  /// Answer for a stale client before any handler work is done.
  pub async fn check_version(
    &self,
    ctx: &RequestContext,
  ) -> Result<Option<InertiaResponse>, InertiaError> {
    let directives = RequestDirectives::classify(&ctx.headers);
    if directives.current_version.is_none() {
      return Ok(None);
    }
    let version = self.version().await?;
    let stale = is_stale(&directives, &ctx.method, &version);
    Ok(stale.then(|| InertiaResponse::Conflict { location: ctx.url() }))
  }

  pub async fn render(
    &self,
    ctx: &RequestContext,
    component: &str,
    props: PageProps,
  ) -> Result<InertiaResponse, InertiaError> {
    self.render_with(ctx, component, props, RenderOptions::default()).await
  }

  pub async fn render_with(
    &self,
    ctx: &RequestContext,
    component: &str,
    props: PageProps,
    options: RenderOptions,
  ) -> Result<InertiaResponse, InertiaError> {
    let config = &self.inner.config;
    let directives = RequestDirectives::classify(&ctx.headers);
    let version = self.version().await?;

    let mode = decide(&directives, &ctx.method, &version);
    if mode == ResponseMode::ForceReload {
      return Ok(InertiaResponse::Conflict { location: ctx.url() });
    }

    let shared = config.shared.resolve(ctx, &props).await?;
    let mut page = PageBuilder::new(component, ctx.url(), version, &directives)
      .props(props.layered_over(shared))
      .encrypt_history(options.encrypt_history.unwrap_or(config.history.encrypt))
      .clear_history(options.clear_history)
      .build()
      .await?;

    if mode == ResponseMode::Page {
      return Ok(InertiaResponse::Page(page));
    }

    if let Some(renderer) = &self.inner.ssr
      && config.ssr.applies_to(ctx, component).await
    {
      render_into(renderer.as_ref(), &mut page).await?;
    }

    let view = config.root_view.name_for(ctx);
    let html = self.inner.views.render(&view, &page)?;
    tracing::debug!(component, view = %view, ssr = page.ssr_body.is_some(), "document rendered");
    Ok(InertiaResponse::Document(html))
  }

  /// Send the client to `url` outside the single-page flow.
  pub fn location(&self, ctx: &RequestContext, url: impl Into<String>) -> InertiaResponse {
    let location = url.into();
    if RequestDirectives::classify(&ctx.headers).is_inertia_request {
      InertiaResponse::Conflict { location }
    } else {
      InertiaResponse::Redirect { location }
    }
  }
}
