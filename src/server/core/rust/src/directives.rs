/* src/server/core/rust/src/directives.rs */

use std::collections::HashSet;

use http::HeaderMap;

use crate::headers;

/// Protocol directives carried by one request's headers.
///
/// Parsing never fails: a header that is missing, not valid text, or lists no
/// names is treated as absent. The request then resolves everything it
/// otherwise would (fail open) instead of being rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestDirectives {
  pub is_inertia_request: bool,
  /// Component named by `X-Inertia-Partial-Component`.
  pub component: Option<String>,
  pub only: Option<HashSet<String>>,
  pub except: Option<HashSet<String>>,
  pub reset_props: Option<HashSet<String>>,
  /// Deferred groups whose members this request asks for.
  pub deferred_groups: Option<HashSet<String>>,
  pub current_version: Option<String>,
}

impl RequestDirectives {
  /// Classify a request from its headers alone.
  pub fn classify(headers: &HeaderMap) -> Self {
    let is_inertia_request = headers.contains_key(headers::INERTIA);
    if !is_inertia_request {
      return Self::default();
    }

    Self {
      is_inertia_request,
      component: text(headers, headers::PARTIAL_COMPONENT).map(String::from),
      only: name_list(headers, headers::PARTIAL_ONLY),
      except: name_list(headers, headers::PARTIAL_EXCEPT),
      reset_props: name_list(headers, headers::RESET),
      deferred_groups: name_list(headers, headers::PARTIAL_DEFERRED),
      current_version: text(headers, headers::VERSION).map(String::from),
    }
  }

  /// Whether this request partially reloads `component`. Requires the
  /// partial-component header to name exactly the component being rendered.
  pub fn is_partial_reload(&self, component: &str) -> bool {
    self.is_inertia_request && self.component.as_deref() == Some(component)
  }

  pub fn only_contains(&self, name: &str) -> bool {
    self.only.as_ref().is_some_and(|s| s.contains(name))
  }

  pub fn except_contains(&self, name: &str) -> bool {
    self.except.as_ref().is_some_and(|s| s.contains(name))
  }

  pub fn is_reset(&self, name: &str) -> bool {
    self.reset_props.as_ref().is_some_and(|s| s.contains(name))
  }

  pub fn requests_group(&self, group: &str) -> bool {
    self.deferred_groups.as_ref().is_some_and(|s| s.contains(group))
  }
}

fn text<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
  let value = headers.get(name)?.to_str().ok()?.trim();
  (!value.is_empty()).then_some(value)
}

/// Comma-separated names across every line of the header; blank entries and
/// non-text lines are dropped, an empty result is `None`.
fn name_list(headers: &HeaderMap, name: &str) -> Option<HashSet<String>> {
  let set: HashSet<String> = headers
    .get_all(name)
    .iter()
    .filter_map(|v| v.to_str().ok())
    .flat_map(|v| v.split(','))
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(String::from)
    .collect();
  (!set.is_empty()).then_some(set)
}
