/* src/server/engine/rust/src/lib.rs */

pub mod document;
pub mod escape;

// Public API re-exports
pub use document::{APP_SLOT, HEAD_SLOT, SsrMarkup, app_root, render_document};
pub use escape::escape_html;
