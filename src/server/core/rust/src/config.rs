/* src/server/core/rust/src/config.rs */

use std::collections::HashSet;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::context::RequestContext;
use crate::errors::InertiaError;
use crate::shared::SharedData;
use crate::ssr::{SsrPages, SsrSettings};
use crate::version::{AssetsVersion, VersionCache, VersionSource};
use crate::views::RootView;

/// Settings read from `inertia.toml`. Every key is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct InertiaConfig {
  #[serde(default = "default_root_view")]
  pub root_view: String,
  #[serde(default = "default_views_dir")]
  pub views_dir: PathBuf,
  /// Fixed asset version; when absent the manifest file is hashed.
  pub assets_version: Option<AssetsVersion>,
  #[serde(default = "default_manifest")]
  pub manifest: PathBuf,
  #[serde(default)]
  pub history: HistorySection,
  #[serde(default)]
  pub ssr: SsrSection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySection {
  #[serde(default)]
  pub encrypt: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SsrSection {
  #[serde(default)]
  pub enabled: bool,
  /// Components rendered on the server; all of them when absent.
  pub pages: Option<Vec<String>>,
  #[serde(default = "default_ssr_entrypoint")]
  pub entrypoint: PathBuf,
  #[serde(default = "default_ssr_bundle")]
  pub bundle: PathBuf,
  #[serde(default = "default_ssr_url")]
  pub url: String,
}

impl Default for SsrSection {
  fn default() -> Self {
    Self {
      enabled: false,
      pages: None,
      entrypoint: default_ssr_entrypoint(),
      bundle: default_ssr_bundle(),
      url: default_ssr_url(),
    }
  }
}

fn default_root_view() -> String {
  "inertia_layout".to_string()
}

fn default_views_dir() -> PathBuf {
  PathBuf::from("resources/views")
}

fn default_manifest() -> PathBuf {
  PathBuf::from("public/assets/.vite/manifest.json")
}

fn default_ssr_entrypoint() -> PathBuf {
  PathBuf::from("inertia/app/ssr.ts")
}

fn default_ssr_bundle() -> PathBuf {
  PathBuf::from("ssr/ssr.js")
}

fn default_ssr_url() -> String {
  "http://127.0.0.1:13714".to_string()
}

impl Default for InertiaConfig {
  fn default() -> Self {
    Self {
      root_view: default_root_view(),
      views_dir: default_views_dir(),
      assets_version: None,
      manifest: default_manifest(),
      history: HistorySection::default(),
      ssr: SsrSection::default(),
    }
  }
}

impl InertiaConfig {
  pub fn load(path: impl AsRef<Path>) -> Result<Self, InertiaError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
      .map_err(|e| InertiaError::Config(format!("cannot read {}: {e}", path.display())))?;
    Self::from_toml_str(&content)
  }

  pub fn from_toml_str(content: &str) -> Result<Self, InertiaError> {
    let config: Self = toml::from_str(content).map_err(|e| InertiaError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<(), InertiaError> {
    if self.root_view.trim().is_empty() {
      return Err(InertiaError::Config("root_view must not be empty".into()));
    }
    if self.ssr.enabled && self.ssr.url.trim().is_empty() {
      return Err(InertiaError::Config("ssr.url must be set when ssr is enabled".into()));
    }
    if let Some(AssetsVersion::Text(v)) = &self.assets_version
      && v.trim().is_empty()
    {
      return Err(InertiaError::Config("assets_version must not be blank".into()));
    }
    Ok(())
  }

  pub fn version_source(&self) -> VersionSource {
    match &self.assets_version {
      Some(version) => VersionSource::Static(version.clone()),
      None => VersionSource::Manifest(self.manifest.clone()),
    }
  }

  pub fn resolve(self) -> ResolvedConfig {
    let pages = match &self.ssr.pages {
      Some(names) => SsrPages::List(names.iter().cloned().collect::<HashSet<_>>()),
      None => SsrPages::All,
    };
    ResolvedConfig {
      root_view: RootView::Static(self.root_view.clone()),
      version: Arc::new(VersionCache::new(self.version_source())),
      shared: SharedData::new(),
      history: self.history,
      ssr: SsrSettings { enabled: self.ssr.enabled, pages },
      file: self,
    }
  }
}

/// Runtime settings: the file config plus code-only hooks.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
  pub file: InertiaConfig,
  pub root_view: RootView,
  pub version: Arc<VersionCache>,
  pub shared: SharedData,
  pub history: HistorySection,
  pub ssr: SsrSettings,
}

impl Default for ResolvedConfig {
  fn default() -> Self {
    InertiaConfig::default().resolve()
  }
}

impl ResolvedConfig {
  pub fn version_source(mut self, source: VersionSource) -> Self {
    self.version = Arc::new(VersionCache::new(source));
    self
  }

  pub fn share(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
    self.shared = self.shared.value(name, value);
    self
  }

  pub fn share_with<F, Fut, T>(mut self, name: impl Into<String>, f: F) -> Self
  where
    F: Fn(&RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, InertiaError>> + Send + 'static,
    T: Serialize,
  {
    self.shared = self.shared.factory(name, f);
    self
  }

  pub fn root_view_with<F>(mut self, f: F) -> Self
  where
    F: Fn(&RequestContext) -> String + Send + Sync + 'static,
  {
    self.root_view = RootView::select(f);
    self
  }

  pub fn ssr_enabled(mut self, enabled: bool) -> Self {
    self.ssr.enabled = enabled;
    self
  }

  pub fn ssr_pages_with<F, Fut>(mut self, f: F) -> Self
  where
    F: Fn(&RequestContext, &str) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + Send + 'static,
  {
    self.ssr.pages = SsrPages::predicate(f);
    self
  }

  pub fn encrypt_history(mut self, encrypt: bool) -> Self {
    self.history.encrypt = encrypt;
    self
  }
}
