/* demos/standalone/server-rust/src/main.rs */

mod pages;

use std::env;

use axum::Router;
use axum::routing::get;
use inertia_server::{InertiaConfig, InertiaServer, SsrProcess, Views};
use inertia_server_axum::InertiaRouterExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  let filter = tracing_subscriber::EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| "info,inertia_server=debug".into());
  tracing_subscriber::fmt().with_env_filter(filter).init();

  let config_path = env::var("INERTIA_CONFIG").unwrap_or_else(|_| "inertia.toml".to_string());
  let config = InertiaConfig::load(&config_path)?;
  let views = Views::load_dir(&config.views_dir)?;

  // Kept alive for the lifetime of the server; killed on drop.
  let _ssr = if config.ssr.enabled { Some(SsrProcess::spawn(&config.ssr.bundle)?) } else { None };

  let resolved = config
    .resolve()
    .share("app_name", serde_json::json!("Inertia demo"))
    .share_with("auth", |ctx| {
      let user = ctx.header("x-demo-user").map(String::from);
      async move { Ok(serde_json::json!({ "user": user })) }
    });
  let inertia = InertiaServer::new(resolved).views(views).build()?;

  let router = Router::new()
    .route("/", get(pages::home))
    .route("/users", get(pages::users::index).post(pages::users::create))
    .route("/users/{id}", get(pages::users::show).delete(pages::users::destroy))
    .route("/dashboard", get(pages::dashboard))
    .route("/docs", get(pages::docs))
    .with_inertia(inertia);

  let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
  inertia_server_axum::serve(router, &format!("0.0.0.0:{port}")).await
}
