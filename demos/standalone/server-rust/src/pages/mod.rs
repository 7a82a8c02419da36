/* demos/standalone/server-rust/src/pages/mod.rs */

pub mod users;

use std::time::Duration;

use inertia_server::{PageProps, Prop, RenderOptions};
use inertia_server_axum::{AxumError, InertiaContext, InertiaReply};
use serde_json::json;

pub async fn home(cx: InertiaContext) -> Result<InertiaReply, AxumError> {
  let props = PageProps::new()
    .with("greeting", json!("Hello from Rust"))
    .with("now", Prop::always(|| async { Ok(format!("{:?}", std::time::SystemTime::now())) }));
  cx.render("Home", props).await
}

/// Slow widgets are deferred; the client fetches each group after first paint.
pub async fn dashboard(cx: InertiaContext) -> Result<InertiaReply, AxumError> {
  let props = PageProps::new()
    .with("title", json!("Dashboard"))
    .with(
      "stats",
      Prop::defer_to("metrics", || async {
        tokio::time::sleep(Duration::from_millis(150)).await;
        Ok(json!({ "visits": 1280, "signups": 42 }))
      }),
    )
    .with(
      "activity",
      Prop::defer(|| async { Ok(vec!["ada signed in", "grace opened a ticket"]) }).mergeable(),
    )
    .with("report", Prop::optional(|| async { Ok(json!({ "rows": [] })) }));
  cx.render_with("Dashboard", props, RenderOptions::new().encrypt_history(true)).await
}

pub async fn docs(cx: InertiaContext) -> InertiaReply {
  cx.location("https://inertiajs.com")
}
