/* src/server/core/rust/src/builder.rs */

use std::collections::HashMap;

use indexmap::IndexMap;
use tokio::task::JoinSet;

use crate::directives::RequestDirectives;
use crate::errors::InertiaError;
use crate::page::PageObject;
use crate::props::{PageProps, Prop, PropKind};
use crate::version::AssetsVersion;

/// Declared props split by what this request needs.
#[derive(Debug, Default)]
pub(crate) struct Selection {
  /// Props to resolve now, in declaration order.
  pub resolve: Vec<(String, Prop)>,
  /// Deferred props left for a follow-up request, grouped in first-seen order.
  pub deferred: IndexMap<String, Vec<String>>,
}

/// Partition declared props against the request directives.
///
/// Full loads resolve plain, merge, always and optional props and record
/// deferred ones. Partial reloads of `component` resolve plain and merge props
/// passing the `only`/`except` filter, optional props named in `only`, always
/// props unconditionally, and deferred props whose group was requested.
pub(crate) fn select(
  props: PageProps,
  directives: &RequestDirectives,
  component: &str,
) -> Selection {
  let partial = directives.is_partial_reload(component);
  let mut selection = Selection::default();

  for (name, prop) in props {
    let include = match prop.kind() {
      None | Some(PropKind::Merge) => !partial || passes_filter(directives, &name),
      Some(PropKind::Always) => true,
      Some(PropKind::Optional) => !partial || directives.only_contains(&name),
      Some(PropKind::Deferred { group, .. }) => {
        if partial {
          directives.requests_group(group)
        } else {
          selection.deferred.entry(group.clone()).or_default().push(name.clone());
          false
        }
      }
    };
    if include {
      selection.resolve.push((name, prop));
    }
  }

  selection
}

fn passes_filter(directives: &RequestDirectives, name: &str) -> bool {
  match (&directives.only, &directives.except) {
    (Some(only), _) => only.contains(name),
    (None, Some(except)) => !except.contains(name),
    (None, None) => true,
  }
}

/// Run every selected producer concurrently and collect values in declaration order.
///
/// The first failure is returned and the remaining tasks are aborted when the
/// `JoinSet` drops. Dropping the returned future aborts them the same way; a
/// producer that blocks its thread without yielding still runs to completion.
async fn resolve_all(
  entries: Vec<(String, Prop)>,
) -> Result<serde_json::Map<String, serde_json::Value>, InertiaError> {
  let mut order = Vec::with_capacity(entries.len());
  let mut values: HashMap<String, serde_json::Value> = HashMap::with_capacity(entries.len());
  let mut join_set = JoinSet::new();

  for (name, prop) in entries {
    order.push(name.clone());
    match prop {
      Prop::Value(value) => {
        values.insert(name, value);
      }
      Prop::Lazy { producer, .. } => {
        join_set.spawn(async move {
          let result = producer().await;
          (name, result)
        });
      }
    }
  }

  while let Some(joined) = join_set.join_next().await {
    let (name, result) = joined.map_err(|e| InertiaError::internal(e.to_string()))?; // task panic
    let value = result.map_err(|e| {
      tracing::warn!(prop = %name, error = %e, "prop producer failed, abandoning page build");
      InertiaError::prop(&name, e)
    })?;
    values.insert(name, value);
  }

  Ok(order.into_iter().filter_map(|name| values.remove(&name).map(|v| (name, v))).collect())
}

/// Assembles the page object for one response.
pub struct PageBuilder<'a> {
  component: String,
  url: String,
  version: AssetsVersion,
  directives: &'a RequestDirectives,
  props: PageProps,
  encrypt_history: bool,
  clear_history: bool,
}

impl<'a> PageBuilder<'a> {
  pub fn new(
    component: impl Into<String>,
    url: impl Into<String>,
    version: AssetsVersion,
    directives: &'a RequestDirectives,
  ) -> Self {
    Self {
      component: component.into(),
      url: url.into(),
      version,
      directives,
      props: PageProps::new(),
      encrypt_history: false,
      clear_history: false,
    }
  }

  /// Declared props, shared data already layered in.
  pub fn props(mut self, props: PageProps) -> Self {
    self.props = props;
    self
  }

  pub fn encrypt_history(mut self, encrypt: bool) -> Self {
    self.encrypt_history = encrypt;
    self
  }

  pub fn clear_history(mut self, clear: bool) -> Self {
    self.clear_history = clear;
    self
  }

  pub async fn build(self) -> Result<PageObject, InertiaError> {
    let directives = self.directives;
    let selection = select(self.props, directives, &self.component);

    let merge_props: Vec<String> = selection
      .resolve
      .iter()
      .filter(|(name, prop)| prop.is_mergeable() && !directives.is_reset(name))
      .map(|(name, _)| name.clone())
      .collect();

    tracing::debug!(
      component = %self.component,
      partial = directives.is_partial_reload(&self.component),
      resolving = selection.resolve.len(),
      deferred_groups = selection.deferred.len(),
      "building page object"
    );

    let props = resolve_all(selection.resolve).await?;

    Ok(PageObject {
      component: self.component,
      props,
      url: self.url,
      version: self.version,
      deferred_props: (!selection.deferred.is_empty()).then_some(selection.deferred),
      merge_props: (!merge_props.is_empty()).then_some(merge_props),
      ssr_head: None,
      ssr_body: None,
      encrypt_history: self.encrypt_history,
      clear_history: self.clear_history,
    })
  }
}
