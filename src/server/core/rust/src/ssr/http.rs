/* src/server/core/rust/src/ssr/http.rs */

use async_trait::async_trait;

use super::{SsrOutput, SsrRenderer};
use crate::errors::InertiaError;
use crate::page::PageObject;

/// Client for a running SSR server: `POST {url}/render` with the page JSON,
/// answered by `{ "head": [..], "body": ".." }`.
#[derive(Debug, Clone)]
pub struct HttpSsrRenderer {
  client: reqwest::Client,
  base: String,
}

impl HttpSsrRenderer {
  pub fn new(url: &str) -> Self {
    Self::with_client(reqwest::Client::new(), url)
  }

  pub fn with_client(client: reqwest::Client, url: &str) -> Self {
    Self { client, base: url.trim_end_matches('/').to_string() }
  }

  pub fn render_url(&self) -> String {
    format!("{}/render", self.base)
  }

  /// Check `GET {url}/health`; any transport error or non-2xx answer is unhealthy.
  pub async fn is_healthy(&self) -> bool {
    match self.client.get(format!("{}/health", self.base)).send().await {
      Ok(resp) => resp.status().is_success(),
      Err(e) => {
        tracing::debug!(url = %self.base, error = %e, "ssr health check failed");
        false
      }
    }
  }
}

#[async_trait]
impl SsrRenderer for HttpSsrRenderer {
  async fn render(&self, page: &PageObject) -> Result<SsrOutput, InertiaError> {
    let url = self.render_url();
    let resp = self
      .client
      .post(&url)
      .json(page)
      .send()
      .await
      .map_err(|e| InertiaError::SsrRender(format!("request to {url} failed: {e}")))?;

    let status = resp.status();
    if !status.is_success() {
      return Err(InertiaError::SsrRender(format!("{url} answered {status}")));
    }

    let output = resp
      .json::<SsrOutput>()
      .await
      .map_err(|e| InertiaError::SsrRender(format!("invalid render response from {url}: {e}")))?;
    tracing::debug!(
      component = %page.component,
      head_tags = output.head.len(),
      "page rendered on server"
    );
    Ok(output)
  }
}
