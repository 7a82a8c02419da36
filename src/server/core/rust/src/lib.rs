/* src/server/core/rust/src/lib.rs */

pub mod builder;
pub mod config;
pub mod context;
pub mod directives;
pub mod errors;
pub mod headers;
pub mod page;
pub mod props;
pub mod server;
pub mod shared;
pub mod ssr;
pub mod strategy;
pub mod version;
pub mod views;

// Re-exports for ergonomic use
pub use builder::PageBuilder;
pub use config::{HistorySection, InertiaConfig, ResolvedConfig, SsrSection};
pub use context::RequestContext;
pub use directives::RequestDirectives;
pub use errors::InertiaError;
pub use inertia_engine::escape_html;
pub use page::PageObject;
pub use props::{BoxFuture, DEFAULT_GROUP, PageProps, Prop, PropKind};
pub use server::{Inertia, InertiaResponse, InertiaServer, RenderOptions};
pub use shared::SharedData;
pub use ssr::{HttpSsrRenderer, SsrOutput, SsrPages, SsrProcess, SsrRenderer, SsrSettings};
pub use strategy::{ResponseMode, redirect_status};
pub use version::{AssetsVersion, VersionCache, VersionSource};
pub use views::{RootView, Views};
