/* src/server/core/rust/src/ssr/mod.rs */

pub mod http;
pub mod process;

use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::context::RequestContext;
use crate::errors::InertiaError;
use crate::page::PageObject;
use crate::props::BoxFuture;

pub use self::http::HttpSsrRenderer;
pub use self::process::SsrProcess;

/// Markup produced by a server-side render of one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SsrOutput {
  #[serde(default)]
  pub head: Vec<String>,
  #[serde(default)]
  pub body: String,
}

impl SsrOutput {
  /// Copy the output onto the page: head tags joined by newlines.
  pub fn apply(self, page: &mut PageObject) {
    page.ssr_head = Some(self.head.join("\n"));
    page.ssr_body = Some(self.body);
  }
}

/// Renders a resolved page object to markup. Implementations must not
/// depend on anything but the page they are given.
#[async_trait]
pub trait SsrRenderer: Send + Sync {
  async fn render(&self, page: &PageObject) -> Result<SsrOutput, InertiaError>;
}

#[async_trait]
impl<F, Fut> SsrRenderer for F
where
  F: Fn(PageObject) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = Result<SsrOutput, InertiaError>> + Send + 'static,
{
  async fn render(&self, page: &PageObject) -> Result<SsrOutput, InertiaError> {
    self(page.clone()).await
  }
}

/// Per-request SSR check. Runs before the renderer and may await (a session
/// lookup, a feature flag); anything it needs from the request is copied out
/// before the returned future starts.
pub type SsrPredicate = Arc<dyn Fn(&RequestContext, &str) -> BoxFuture<bool> + Send + Sync>;

/// Which components are rendered on the server.
#[derive(Clone, Default)]
pub enum SsrPages {
  #[default]
  All,
  List(HashSet<String>),
  Predicate(SsrPredicate),
}

impl SsrPages {
  pub fn predicate<F, Fut>(f: F) -> Self
  where
    F: Fn(&RequestContext, &str) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + Send + 'static,
  {
    Self::Predicate(Arc::new(move |ctx, component| Box::pin(f(ctx, component))))
  }

  pub async fn includes(&self, ctx: &RequestContext, component: &str) -> bool {
    match self {
      Self::All => true,
      Self::List(names) => names.contains(component),
      Self::Predicate(f) => f(ctx, component).await,
    }
  }
}

impl fmt::Debug for SsrPages {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::All => f.write_str("All"),
      Self::List(names) => f.debug_tuple("List").field(names).finish(),
      Self::Predicate(_) => f.write_str("Predicate(..)"),
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct SsrSettings {
  pub enabled: bool,
  pub pages: SsrPages,
}

impl SsrSettings {
  pub async fn applies_to(&self, ctx: &RequestContext, component: &str) -> bool {
    self.enabled && self.pages.includes(ctx, component).await
  }
}

/// Render `page` and store the markup on it. Any renderer failure is
/// returned as [`InertiaError::SsrRender`]; there is no client-only fallback.
pub async fn render_into(
  renderer: &dyn SsrRenderer,
  page: &mut PageObject,
) -> Result<(), InertiaError> {
  let output = renderer.render(page).await.map_err(|e| {
    tracing::error!(component = %page.component, error = %e, "server-side render failed");
    match e {
      InertiaError::SsrRender(_) => e,
      other => InertiaError::SsrRender(other.message()),
    }
  })?;
  output.apply(page);
  Ok(())
}

#[cfg(test)]
mod tests {
  use ::http::{HeaderMap, Method, Uri};

  use super::*;
  use crate::version::AssetsVersion;

  fn page() -> PageObject {
    PageObject {
      component: "Home".into(),
      props: serde_json::Map::new(),
      url: "/".into(),
      version: AssetsVersion::from("v1"),
      deferred_props: None,
      merge_props: None,
      ssr_head: None,
      ssr_body: None,
      encrypt_history: false,
      clear_history: false,
    }
  }

  fn ctx() -> RequestContext {
    RequestContext::new(Method::GET, Uri::from_static("/"), HeaderMap::new())
  }

  #[tokio::test]
  async fn closure_renderer_fills_ssr_fields() {
    let renderer = |page: PageObject| async move {
      Ok::<_, InertiaError>(SsrOutput {
        head: vec!["<title>Home</title>".into(), "<meta name=\"x\">".into()],
        body: format!("<div>{}</div>", page.component),
      })
    };
    let mut p = page();
    render_into(&renderer, &mut p).await.expect("render");
    assert_eq!(p.ssr_head.as_deref(), Some("<title>Home</title>\n<meta name=\"x\">"));
    assert_eq!(p.ssr_body.as_deref(), Some("<div>Home</div>"));
  }

  #[tokio::test]
  async fn renderer_failure_is_fatal() {
    let renderer = |_page: PageObject| async move {
      Err::<SsrOutput, _>(InertiaError::internal("bundle crashed"))
    };
    let mut p = page();
    let err = render_into(&renderer, &mut p).await.err();
    assert_eq!(err.as_ref().map(InertiaError::code), Some("SSR_RENDER_FAILED"));
    assert!(p.ssr_body.is_none());
  }

  #[tokio::test]
  async fn page_selection() {
    let list = SsrPages::List(["Home".to_string()].into_iter().collect());
    assert!(list.includes(&ctx(), "Home").await);
    assert!(!list.includes(&ctx(), "Admin").await);

    let only_get = SsrPages::predicate(|ctx, component| {
      let public = ctx.method == Method::GET && component.starts_with("Public/");
      async move { public }
    });
    assert!(only_get.includes(&ctx(), "Public/About").await);
    assert!(!only_get.includes(&ctx(), "Admin/Users").await);
  }

  #[tokio::test]
  async fn predicate_may_await_a_lookup() {
    let (tx, rx) = tokio::sync::watch::channel(false);
    let pages = SsrPages::predicate(move |_, _| {
      let mut flag = rx.clone();
      async move { flag.wait_for(|on| *on).await.is_ok() }
    });

    let pending = tokio::spawn({
      let pages = pages.clone();
      async move { pages.includes(&ctx(), "Home").await }
    });
    tokio::task::yield_now().await;
    assert!(!pending.is_finished());

    tx.send(true).expect("send");
    assert!(pending.await.expect("join"));
  }

  #[tokio::test]
  async fn disabled_settings_never_apply() {
    let settings = SsrSettings { enabled: false, pages: SsrPages::All };
    assert!(!settings.applies_to(&ctx(), "Home").await);
    let settings = SsrSettings { enabled: true, ..settings };
    assert!(settings.applies_to(&ctx(), "Home").await);
  }
}
