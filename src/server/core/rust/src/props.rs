/* src/server/core/rust/src/props.rs */

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;

use crate::errors::InertiaError;

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

pub type PropFuture = BoxFuture<Result<serde_json::Value, InertiaError>>;

/// Zero-argument producer of a prop value. Invoked on every resolution, never cached.
pub type Producer = Arc<dyn Fn() -> PropFuture + Send + Sync>;

/// Group used by [`Prop::defer`] when none is given.
pub const DEFAULT_GROUP: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropKind {
  /// Resolved on every response, partial reloads included.
  Always,
  /// Resolved on full loads; on partial reloads only when named in `only`.
  Optional,
  /// Never on the initial load; fetched by a partial reload naming `group`.
  Deferred { group: String, merge: bool },
  /// Eager, and advertised to the client as mergeable.
  Merge,
}

/// One declared page prop: either a plain value or a producer tagged with its kind.
#[derive(Clone)]
pub enum Prop {
  Value(serde_json::Value),
  Lazy { kind: PropKind, producer: Producer },
}

fn producer<F, Fut, T>(f: F) -> Producer
where
  F: Fn() -> Fut + Send + Sync + 'static,
  Fut: Future<Output = Result<T, InertiaError>> + Send + 'static,
  T: Serialize,
{
  Arc::new(move || {
    let fut = f();
    Box::pin(async move {
      let value = fut.await?;
      Ok(serde_json::to_value(value)?)
    })
  })
}

impl Prop {
  pub fn value(value: serde_json::Value) -> Self {
    Self::Value(value)
  }

  pub fn always<F, Fut, T>(f: F) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, InertiaError>> + Send + 'static,
    T: Serialize,
  {
    Self::Lazy { kind: PropKind::Always, producer: producer(f) }
  }

  pub fn optional<F, Fut, T>(f: F) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, InertiaError>> + Send + 'static,
    T: Serialize,
  {
    Self::Lazy { kind: PropKind::Optional, producer: producer(f) }
  }

  /// Deferred prop in the `"default"` group.
  pub fn defer<F, Fut, T>(f: F) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, InertiaError>> + Send + 'static,
    T: Serialize,
  {
    Self::defer_to(DEFAULT_GROUP, f)
  }

  /// Deferred prop fetched together with the other members of `group`.
  pub fn defer_to<F, Fut, T>(group: impl Into<String>, f: F) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, InertiaError>> + Send + 'static,
    T: Serialize,
  {
    Self::Lazy {
      kind: PropKind::Deferred { group: group.into(), merge: false },
      producer: producer(f),
    }
  }

  pub fn merge<F, Fut, T>(f: F) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, InertiaError>> + Send + 'static,
    T: Serialize,
  {
    Self::Lazy { kind: PropKind::Merge, producer: producer(f) }
  }

  /// Mergeable prop around an already computed value.
  pub fn merge_value(value: serde_json::Value) -> Self {
    Self::Lazy {
      kind: PropKind::Merge,
      producer: Arc::new(move || {
        let value = value.clone();
        Box::pin(async move { Ok(value) })
      }),
    }
  }

  /// Mark a deferred prop as mergeable once loaded. Other props are returned unchanged.
  pub fn mergeable(self) -> Self {
    match self {
      Self::Lazy { kind: PropKind::Deferred { group, .. }, producer } => {
        Self::Lazy { kind: PropKind::Deferred { group, merge: true }, producer }
      }
      other => other,
    }
  }

  /// Wrapper kind, `None` for plain values.
  pub fn kind(&self) -> Option<&PropKind> {
    match self {
      Self::Value(_) => None,
      Self::Lazy { kind, .. } => Some(kind),
    }
  }

  pub fn group(&self) -> Option<&str> {
    match self.kind() {
      Some(PropKind::Deferred { group, .. }) => Some(group),
      _ => None,
    }
  }

  pub fn is_mergeable(&self) -> bool {
    matches!(self.kind(), Some(PropKind::Merge | PropKind::Deferred { merge: true, .. }))
  }

  /// Produce the value, invoking the producer for wrapped props.
  pub async fn resolve(&self) -> Result<serde_json::Value, InertiaError> {
    match self {
      Self::Value(value) => Ok(value.clone()),
      Self::Lazy { producer, .. } => producer().await,
    }
  }
}

impl fmt::Debug for Prop {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
      Self::Lazy { kind, .. } => f.debug_struct("Lazy").field("kind", kind).finish_non_exhaustive(),
    }
  }
}

impl From<serde_json::Value> for Prop {
  fn from(value: serde_json::Value) -> Self {
    Self::Value(value)
  }
}

/// Declared props of one render, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct PageProps {
  entries: IndexMap<String, Prop>,
}

impl PageProps {
  pub fn new() -> Self {
    Self::default()
  }

  /// Plain-value props from any serializable struct or map.
  pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, InertiaError> {
    match serde_json::to_value(value)? {
      serde_json::Value::Object(map) => {
        Ok(map.into_iter().map(|(k, v)| (k, Prop::Value(v))).collect())
      }
      other => Err(InertiaError::validation(format!("page props must be an object, got {other}"))),
    }
  }

  pub fn with(mut self, name: impl Into<String>, prop: impl Into<Prop>) -> Self {
    self.insert(name, prop);
    self
  }

  /// Insert or replace a prop. A replaced prop keeps its original position.
  pub fn insert(&mut self, name: impl Into<String>, prop: impl Into<Prop>) -> Option<Prop> {
    self.entries.insert(name.into(), prop.into())
  }

  pub fn get(&self, name: &str) -> Option<&Prop> {
    self.entries.get(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.entries.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &Prop)> {
    self.entries.iter().map(|(k, v)| (k.as_str(), v))
  }

  /// Layer `self` over `base`: names present in both take the value from `self`.
  pub fn layered_over(self, base: PageProps) -> PageProps {
    let mut merged = base;
    for (name, prop) in self.entries {
      merged.entries.insert(name, prop);
    }
    merged
  }
}

impl FromIterator<(String, Prop)> for PageProps {
  fn from_iter<I: IntoIterator<Item = (String, Prop)>>(iter: I) -> Self {
    Self { entries: iter.into_iter().collect() }
  }
}

impl IntoIterator for PageProps {
  type Item = (String, Prop);
  type IntoIter = indexmap::map::IntoIter<String, Prop>;

  fn into_iter(self) -> Self::IntoIter {
    self.entries.into_iter()
  }
}
