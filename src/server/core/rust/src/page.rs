/* src/server/core/rust/src/page.rs */

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::version::AssetsVersion;

fn is_false(b: &bool) -> bool {
  !*b
}

/// The payload the client-side router swaps into the DOM.
///
/// Optional fields are left out of the JSON when they carry nothing:
/// no deferred groups, no mergeable props, no SSR output, false history flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageObject {
  pub component: String,
  pub props: serde_json::Map<String, serde_json::Value>,
  pub url: String,
  pub version: AssetsVersion,
  /// Deferred group -> prop names, groups in first-seen order.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub deferred_props: Option<IndexMap<String, Vec<String>>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub merge_props: Option<Vec<String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub ssr_head: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub ssr_body: Option<String>,
  #[serde(default, skip_serializing_if = "is_false")]
  pub encrypt_history: bool,
  #[serde(default, skip_serializing_if = "is_false")]
  pub clear_history: bool,
}

impl PageObject {
  pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(self)
  }
}
