/* src/server/core/rust/src/ssr/process.rs */

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use tokio::process::{Child, Command};

use crate::errors::InertiaError;

/// A supervised SSR server process (`node <bundle>` by default).
/// The child is killed when this handle drops.
#[derive(Debug)]
pub struct SsrProcess {
  bundle: PathBuf,
  child: Child,
}

impl SsrProcess {
  pub fn spawn(bundle: impl AsRef<Path>) -> Result<Self, InertiaError> {
    Self::spawn_with("node", bundle)
  }

  /// Start `program <bundle>`, inheriting stdout and stderr.
  pub fn spawn_with(
    program: impl AsRef<OsStr>,
    bundle: impl AsRef<Path>,
  ) -> Result<Self, InertiaError> {
    let bundle = bundle.as_ref().to_path_buf();
    let mut cmd = Command::new(program.as_ref());
    cmd.arg(&bundle);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::inherit());
    cmd.stderr(Stdio::inherit());
    cmd.kill_on_drop(true);

    let child = cmd.spawn().map_err(|e| {
      InertiaError::SsrRender(format!(
        "failed to start {} {}: {e}",
        program.as_ref().to_string_lossy(),
        bundle.display()
      ))
    })?;
    tracing::info!(pid = ?child.id(), bundle = %bundle.display(), "ssr server started");
    Ok(Self { bundle, child })
  }

  pub fn id(&self) -> Option<u32> {
    self.child.id()
  }

  pub fn bundle(&self) -> &Path {
    &self.bundle
  }

  /// Exit status if the process has already stopped.
  pub fn try_exited(&mut self) -> Result<Option<ExitStatus>, InertiaError> {
    self
      .child
      .try_wait()
      .map_err(|e| InertiaError::SsrRender(format!("cannot poll ssr server: {e}")))
  }

  pub async fn shutdown(mut self) -> Result<(), InertiaError> {
    if self.try_exited()?.is_some() {
      return Ok(());
    }
    self
      .child
      .kill()
      .await
      .map_err(|e| InertiaError::SsrRender(format!("cannot stop ssr server: {e}")))?;
    tracing::info!(bundle = %self.bundle.display(), "ssr server stopped");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn missing_program_is_an_error() {
    let err = SsrProcess::spawn_with("inertia-ssr-no-such-binary", "ssr/ssr.js").err();
    assert_eq!(err.as_ref().map(InertiaError::code), Some("SSR_RENDER_FAILED"));
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn long_running_child_is_stopped() {
    let mut proc = SsrProcess::spawn_with("sleep", "30").expect("spawn sleep");
    assert!(proc.id().is_some());
    assert!(proc.try_exited().expect("poll").is_none());
    proc.shutdown().await.expect("shutdown");
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn exited_child_is_reported() {
    let mut proc = SsrProcess::spawn_with("true", "ignored").expect("spawn true");
    let mut status = None;
    for _ in 0..50 {
      status = proc.try_exited().expect("poll");
      if status.is_some() {
        break;
      }
      tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert!(status.is_some_and(|s| s.success()));
    proc.shutdown().await.expect("shutdown of exited child");
  }
}
