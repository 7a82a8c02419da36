/* src/server/core/rust/src/version.rs */

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::InertiaError;

/// Asset version token. Serialized as a bare JSON string or number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssetsVersion {
  Number(i64),
  Text(String),
}

impl AssetsVersion {
  /// Compare against the token a client sent in `X-Inertia-Version`.
  pub fn matches(&self, token: &str) -> bool {
    match self {
      Self::Text(s) => s == token,
      Self::Number(n) => token.trim().parse::<i64>().is_ok_and(|t| t == *n),
    }
  }
}

impl fmt::Display for AssetsVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Number(n) => write!(f, "{n}"),
      Self::Text(s) => f.write_str(s),
    }
  }
}

impl From<&str> for AssetsVersion {
  fn from(s: &str) -> Self {
    Self::Text(s.to_string())
  }
}

impl From<String> for AssetsVersion {
  fn from(s: String) -> Self {
    Self::Text(s)
  }
}

impl From<i64> for AssetsVersion {
  fn from(n: i64) -> Self {
    Self::Number(n)
  }
}

pub type VersionFn = Arc<dyn Fn() -> Result<AssetsVersion, InertiaError> + Send + Sync>;

/// Where the current asset version comes from.
#[derive(Clone)]
pub enum VersionSource {
  Static(AssetsVersion),
  /// SHA-256 of a bundler manifest file, hex encoded.
  Manifest(PathBuf),
  Custom(VersionFn),
}

impl VersionSource {
  async fn compute(&self) -> Result<AssetsVersion, InertiaError> {
    match self {
      Self::Static(version) => Ok(version.clone()),
      // Read on tokio's blocking pool, off the request's worker thread.
      Self::Manifest(path) => {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
          InertiaError::VersionComputation(format!("cannot read {}: {e}", path.display()))
        })?;
        Ok(AssetsVersion::Text(hex::encode(Sha256::digest(&bytes))))
      }
      Self::Custom(f) => f(),
    }
  }
}

impl fmt::Debug for VersionSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Static(v) => f.debug_tuple("Static").field(v).finish(),
      Self::Manifest(p) => f.debug_tuple("Manifest").field(p).finish(),
      Self::Custom(_) => f.write_str("Custom(..)"),
    }
  }
}

/// Process-wide memo of the asset version.
///
/// The first `get` computes and stores the version; later calls are a read
/// lock and a clone. A failed computation is not stored, so the next call
/// retries. `invalidate` drops the memo (e.g. after a deploy swapped assets).
#[derive(Debug)]
pub struct VersionCache {
  source: VersionSource,
  cached: RwLock<Option<AssetsVersion>>,
}

impl VersionCache {
  pub fn new(source: VersionSource) -> Self {
    Self { source, cached: RwLock::new(None) }
  }

  pub async fn get(&self) -> Result<AssetsVersion, InertiaError> {
    let cached = self.cached.read().clone();
    if let Some(version) = cached {
      return Ok(version);
    }

    // Computed outside the lock; concurrent first callers may both compute,
    // the first stored value wins.
    let computed = self.source.compute().await.inspect_err(|e| {
      tracing::warn!(error = %e, "asset version computation failed");
    })?;

    let mut slot = self.cached.write();
    let version = slot.get_or_insert_with(|| {
      tracing::debug!(version = %computed, "asset version computed");
      computed
    });
    Ok(version.clone())
  }

  pub fn invalidate(&self) {
    tracing::debug!("asset version invalidated");
    *self.cached.write() = None;
  }
}

#[cfg(test)]
mod tests {
  use std::io::Write;
  use std::sync::atomic::{AtomicUsize, Ordering};

  use super::*;

  fn counting_source(calls: Arc<AtomicUsize>) -> VersionSource {
    VersionSource::Custom(Arc::new(move || {
      let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
      Ok(AssetsVersion::Number(n as i64))
    }))
  }

  #[tokio::test]
  async fn static_version() {
    let cache = VersionCache::new(VersionSource::Static("v1".into()));
    assert_eq!(cache.get().await.ok(), Some(AssetsVersion::Text("v1".into())));
  }

  #[tokio::test]
  async fn computed_once_until_invalidated() {
    let calls = Arc::new(AtomicUsize::new(0));
    let cache = VersionCache::new(counting_source(calls.clone()));

    assert_eq!(cache.get().await.ok(), Some(AssetsVersion::Number(1)));
    assert_eq!(cache.get().await.ok(), Some(AssetsVersion::Number(1)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    cache.invalidate();
    assert_eq!(cache.get().await.ok(), Some(AssetsVersion::Number(2)));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn failure_is_not_memoized() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let cache = VersionCache::new(VersionSource::Custom(Arc::new(move || {
      if counter.fetch_add(1, Ordering::SeqCst) == 0 {
        Err(InertiaError::VersionComputation("manifest missing".into()))
      } else {
        Ok(AssetsVersion::from("abc"))
      }
    })));

    assert!(matches!(cache.get().await, Err(InertiaError::VersionComputation(_))));
    assert_eq!(cache.get().await.ok(), Some(AssetsVersion::Text("abc".into())));
    assert_eq!(cache.get().await.ok(), Some(AssetsVersion::Text("abc".into())));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn manifest_hash_is_stable_and_content_sensitive() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("manifest.json");
    std::fs::write(&path, r#"{"app.js":{"file":"app-1.js"}}"#).expect("write");

    let cache = VersionCache::new(VersionSource::Manifest(path.clone()));
    let first = cache.get().await.expect("version");
    assert!(matches!(&first, AssetsVersion::Text(h) if h.len() == 64));
    assert_eq!(cache.get().await.ok(), Some(first.clone()));

    let mut file = std::fs::OpenOptions::new().append(true).open(&path).expect("open");
    file.write_all(b"\n").expect("append");
    cache.invalidate();
    assert_ne!(cache.get().await.ok(), Some(first));
  }

  #[tokio::test]
  async fn manifest_read_runs_on_current_thread_runtime() {
    fn assert_send<T: Send>(value: T) -> T {
      value
    }

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("manifest.json");
    std::fs::write(&path, "{}").expect("write");
    let cache = VersionCache::new(VersionSource::Manifest(path));

    let version = assert_send(cache.get()).await.expect("version");
    assert_eq!(
      version,
      AssetsVersion::from("44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a")
    );
  }

  #[tokio::test]
  async fn missing_manifest_is_version_error() {
    let cache = VersionCache::new(VersionSource::Manifest("/nonexistent/manifest.json".into()));
    let err = cache.get().await.err();
    assert_eq!(err.as_ref().map(InertiaError::code), Some("VERSION_COMPUTATION_FAILED"));
  }

  #[test]
  fn version_matches_client_token() {
    assert!(AssetsVersion::Text("v1".into()).matches("v1"));
    assert!(!AssetsVersion::Text("v1".into()).matches("v2"));
    assert!(AssetsVersion::Number(42).matches("42"));
    assert!(!AssetsVersion::Number(42).matches("forty-two"));
  }

  #[test]
  fn serializes_untagged() {
    assert_eq!(serde_json::to_string(&AssetsVersion::Number(3)).ok().as_deref(), Some("3"));
    assert_eq!(serde_json::to_string(&AssetsVersion::from("a1")).ok().as_deref(), Some(r#""a1""#));
  }
}
