/* src/server/engine/rust/src/document.rs */

use crate::escape::escape_html;

/// Slot replaced by server-rendered head tags.
pub const HEAD_SLOT: &str = "<!--inertia:head-->";
/// Slot replaced by the application root element.
pub const APP_SLOT: &str = "<!--inertia:app-->";

/// Head and body markup returned by a server-side render.
#[derive(Debug, Clone, Copy)]
pub struct SsrMarkup<'a> {
  pub head: &'a str,
  pub body: &'a str,
}

/// Client-rendered application root: an empty element carrying the page
/// object as an escaped `data-page` attribute.
pub fn app_root(root_id: &str, page: &serde_json::Value) -> String {
  let json = page.to_string();
  format!(r#"<div id="{}" data-page="{}"></div>"#, escape_html(root_id), escape_html(&json))
}

/// Assemble the HTML document for a full page load.
///
/// With SSR markup, the head tags fill `<!--inertia:head-->` and the rendered
/// body fills `<!--inertia:app-->`. Without it, the head slot is cleared and
/// the app slot receives the client-rendered root from [`app_root`].
pub fn render_document(
  template: &str,
  page: &serde_json::Value,
  ssr: Option<SsrMarkup<'_>>,
  root_id: &str,
) -> String {
  let head = ssr.map_or("", |m| m.head);
  let body = match ssr {
    Some(m) => m.body.to_string(),
    None => app_root(root_id, page),
  };

  let html = fill_slot(template, HEAD_SLOT, head, "</head>");
  fill_slot(&html, APP_SLOT, &body, "</body>")
}

/// Replace `slot` with `content`; when the template has no such slot, insert
/// before the last `anchor` tag, or append when the anchor is missing too.
fn fill_slot(html: &str, slot: &str, content: &str, anchor: &str) -> String {
  if html.contains(slot) {
    return html.replacen(slot, content, 1);
  }
  if content.is_empty() {
    return html.to_string();
  }
  if let Some(pos) = html.rfind(anchor) {
    let mut result = String::with_capacity(html.len() + content.len());
    result.push_str(&html[..pos]);
    result.push_str(content);
    result.push_str(&html[pos..]);
    result
  } else {
    format!("{html}{content}")
  }
}
