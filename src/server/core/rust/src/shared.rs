/* src/server/core/rust/src/shared.rs */

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::try_join_all;
use indexmap::IndexMap;
use serde::Serialize;

use crate::context::RequestContext;
use crate::errors::InertiaError;
use crate::props::{BoxFuture, PageProps, Prop};

pub type SharedFactory =
  Arc<dyn Fn(&RequestContext) -> BoxFuture<Result<serde_json::Value, InertiaError>> + Send + Sync>;

#[derive(Clone)]
pub enum SharedDatum {
  Value(serde_json::Value),
  /// Evaluated once per request, before page props are partitioned.
  Factory(SharedFactory),
}

/// Data merged into every page. Props declared by the render call win on name collision.
#[derive(Clone, Default)]
pub struct SharedData {
  entries: IndexMap<String, SharedDatum>,
}

impl SharedData {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn value(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
    self.entries.insert(name.into(), SharedDatum::Value(value));
    self
  }

  pub fn factory<F, Fut, T>(mut self, name: impl Into<String>, f: F) -> Self
  where
    F: Fn(&RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, InertiaError>> + Send + 'static,
    T: Serialize,
  {
    let factory: SharedFactory = Arc::new(move |ctx: &RequestContext| {
      let fut = f(ctx);
      Box::pin(async move { Ok(serde_json::to_value(fut.await?)?) })
    });
    self.entries.insert(name.into(), SharedDatum::Factory(factory));
    self
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Evaluate every entry that `declared` does not shadow. Factories run
  /// concurrently; the first failure is returned, tagged with the entry name.
  pub async fn resolve(
    &self,
    ctx: &RequestContext,
    declared: &PageProps,
  ) -> Result<PageProps, InertiaError> {
    let pending = self.entries.iter().filter(|(name, _)| !declared.contains(name)).map(
      |(name, datum)| async move {
        let value = match datum {
          SharedDatum::Value(v) => v.clone(),
          SharedDatum::Factory(f) => f(ctx).await.map_err(|e| InertiaError::prop(name, e))?,
        };
        Ok::<_, InertiaError>((name.clone(), Prop::Value(value)))
      },
    );
    Ok(try_join_all(pending).await?.into_iter().collect())
  }
}

impl fmt::Debug for SharedData {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list().entries(self.entries.keys()).finish()
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};

  use http::{HeaderMap, Method, Uri};
  use serde_json::json;

  use super::*;

  fn ctx() -> RequestContext {
    RequestContext::new(Method::GET, Uri::from_static("/"), HeaderMap::new())
      .with_header("cookie", "session=abc")
  }

  #[tokio::test]
  async fn values_and_factories_resolve() {
    let shared = SharedData::new().value("app", json!("demo")).factory("session", |ctx| {
      let cookie = ctx.header("cookie").unwrap_or_default().to_string();
      async move { Ok(cookie) }
    });

    let props = shared.resolve(&ctx(), &PageProps::new()).await.expect("resolve");
    let names: Vec<&str> = props.iter().map(|(k, _)| k).collect();
    assert_eq!(names, vec!["app", "session"]);
    assert!(matches!(props.get("session"), Some(Prop::Value(v)) if v == "session=abc"));
  }

  #[tokio::test]
  async fn declared_props_shadow_and_skip_factories() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let shared = SharedData::new().factory("user", move |_| {
      counter.fetch_add(1, Ordering::SeqCst);
      async { Ok("guest") }
    });
    let declared = PageProps::new().with("user", json!("ada"));

    let props = shared.resolve(&ctx(), &declared).await.expect("resolve");
    assert!(props.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn factory_failure_names_entry() {
    let shared = SharedData::new()
      .factory("auth", |_| async { Err::<(), _>(InertiaError::unauthorized("expired")) });
    let err = shared.resolve(&ctx(), &PageProps::new()).await.err();
    assert!(matches!(err, Some(InertiaError::PropResolution { ref prop, .. }) if prop == "auth"));
    assert_eq!(err.map(|e| e.status()), Some(401));
  }
}
