/* src/server/adapter/axum/src/lib.rs */

mod error;
mod extract;
mod middleware;
mod response;

pub use error::AxumError;
pub use extract::InertiaContext;
pub use middleware::inertia_middleware;
pub use response::InertiaReply;

/// Re-export inertia-server core for convenience
pub use inertia_server;

use inertia_server::Inertia;

/// Extension trait installing the Inertia protocol layer on an Axum router.
pub trait InertiaRouterExt {
  fn with_inertia(self, inertia: Inertia) -> Self;
}

impl<S> InertiaRouterExt for axum::Router<S>
where
  S: Clone + Send + Sync + 'static,
{
  fn with_inertia(self, inertia: Inertia) -> Self {
    self.layer(axum::middleware::from_fn_with_state(inertia, inertia_middleware))
  }
}

/// Bind `addr` and serve `router` until the process stops.
pub async fn serve(router: axum::Router, addr: &str) -> Result<(), Box<dyn std::error::Error>> {
  let listener = tokio::net::TcpListener::bind(addr).await?;
  let local_addr = listener.local_addr()?;
  let port = local_addr.port();
  tracing::info!(port, "inertia server listening on http://localhost:{port}");
  axum::serve(listener, router).await?;
  Ok(())
}
