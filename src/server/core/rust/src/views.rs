/* src/server/core/rust/src/views.rs */

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use inertia_engine::{SsrMarkup, render_document};

use crate::context::RequestContext;
use crate::errors::InertiaError;
use crate::page::PageObject;

/// Id of the element the client mounts into.
pub const ROOT_ID: &str = "app";

pub type RootViewFn = Arc<dyn Fn(&RequestContext) -> String + Send + Sync>;

/// Template used as the document shell for full page loads.
#[derive(Clone)]
pub enum RootView {
  Static(String),
  /// Chosen per request, e.g. a separate shell for an admin area.
  Select(RootViewFn),
}

impl RootView {
  pub fn select<F>(f: F) -> Self
  where
    F: Fn(&RequestContext) -> String + Send + Sync + 'static,
  {
    Self::Select(Arc::new(f))
  }

  pub fn name_for(&self, ctx: &RequestContext) -> String {
    match self {
      Self::Static(name) => name.clone(),
      Self::Select(f) => f(ctx),
    }
  }
}

impl fmt::Debug for RootView {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Static(name) => f.debug_tuple("Static").field(name).finish(),
      Self::Select(_) => f.write_str("Select(..)"),
    }
  }
}

impl From<&str> for RootView {
  fn from(name: &str) -> Self {
    Self::Static(name.to_string())
  }
}

/// Document shell templates, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Views {
  templates: HashMap<String, String>,
}

impl Views {
  pub fn new() -> Self {
    Self::default()
  }

  /// Load every `*.html` file directly under `dir`, keyed by file stem.
  pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, InertiaError> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir)
      .map_err(|e| InertiaError::Config(format!("cannot read views dir {}: {e}", dir.display())))?;

    let mut views = Self::new();
    for entry in entries {
      let path = entry.map_err(|e| InertiaError::Config(e.to_string()))?.path();
      if path.extension().and_then(|e| e.to_str()) != Some("html") {
        continue;
      }
      let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        continue;
      };
      let html = std::fs::read_to_string(&path)
        .map_err(|e| InertiaError::Config(format!("cannot read {}: {e}", path.display())))?;
      views.templates.insert(stem.to_string(), html);
    }
    tracing::debug!(dir = %dir.display(), count = views.templates.len(), "views loaded");
    Ok(views)
  }

  pub fn with(mut self, name: impl Into<String>, html: impl Into<String>) -> Self {
    self.insert(name, html);
    self
  }

  pub fn insert(&mut self, name: impl Into<String>, html: impl Into<String>) {
    self.templates.insert(name.into(), html.into());
  }

  pub fn contains(&self, name: &str) -> bool {
    self.templates.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.templates.len()
  }

  pub fn is_empty(&self) -> bool {
    self.templates.is_empty()
  }

  /// Render the document for `page` with template `name`. The `data-page`
  /// payload never carries the SSR markup itself.
  pub fn render(&self, name: &str, page: &PageObject) -> Result<String, InertiaError> {
    let template =
      self.templates.get(name).ok_or_else(|| InertiaError::ViewNotFound(name.to_string()))?;

    let mut json = page.to_json()?;
    if let Some(obj) = json.as_object_mut() {
      obj.remove("ssrHead");
      obj.remove("ssrBody");
    }

    let ssr = match (&page.ssr_head, &page.ssr_body) {
      (head, Some(body)) => Some(SsrMarkup { head: head.as_deref().unwrap_or_default(), body }),
      _ => None,
    };
    Ok(render_document(template, &json, ssr, ROOT_ID))
  }
}

#[cfg(test)]
mod tests {
  use http::{HeaderMap, Method, Uri};

  use super::*;
  use crate::version::AssetsVersion;

  const SHELL: &str =
    "<html><head><!--inertia:head--></head><body><!--inertia:app--></body></html>";

  fn page() -> PageObject {
    let mut props = serde_json::Map::new();
    props.insert("name".into(), serde_json::json!("Ada & Bob"));
    PageObject {
      component: "Home".into(),
      props,
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

  #[test]
  fn client_rendered_document() {
    let views = Views::new().with("app", SHELL);
    let html = views.render("app", &page()).expect("render");
    assert!(html.contains(r#"<div id="app" data-page="{&quot;component&quot;:&quot;Home&quot;"#));
    assert!(html.contains("Ada &amp; Bob"));
    assert!(!html.contains("inertia:"));
  }

  #[test]
  fn ssr_markup_fills_slots() {
    let views = Views::new().with("app", SHELL);
    let p = PageObject {
      ssr_head: Some("<title>Home</title>".into()),
      ssr_body: Some(r#"<div id="app" data-server-rendered="true">Home</div>"#.into()),
      ..page()
    };
    let html = views.render("app", &p).expect("render");
    assert!(html.contains("<head><title>Home</title></head>"));
    assert!(html.contains("data-server-rendered"));
    assert!(!html.contains("data-page"));
  }

  #[test]
  fn unknown_view() {
    let err = Views::new().render("missing", &page()).err();
    assert_eq!(err.as_ref().map(InertiaError::code), Some("VIEW_NOT_FOUND"));
  }

  #[test]
  fn load_dir_keys_by_stem() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("inertia_layout.html"), SHELL).expect("write");
    std::fs::write(dir.path().join("notes.txt"), "ignored").expect("write");

    let views = Views::load_dir(dir.path()).expect("load");
    assert_eq!(views.len(), 1);
    assert!(views.contains("inertia_layout"));
  }

  #[test]
  fn load_dir_missing_is_config_error() {
    let err = Views::load_dir("/nonexistent/views").err();
    assert_eq!(err.as_ref().map(InertiaError::code), Some("CONFIG_ERROR"));
  }

  #[test]
  fn root_view_selector() {
    let view = RootView::select(|ctx| {
      if ctx.uri.path().starts_with("/admin") { "admin".into() } else { "app".into() }
    });
    let admin =
      RequestContext::new(Method::GET, Uri::from_static("/admin/users"), HeaderMap::new());
    let home = RequestContext::new(Method::GET, Uri::from_static("/"), HeaderMap::new());
    assert_eq!(view.name_for(&admin), "admin");
    assert_eq!(view.name_for(&home), "app");
    assert_eq!(RootView::from("app").name_for(&home), "app");
  }
}
