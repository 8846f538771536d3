use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use hubbell_common::error::AppError;
use hubbell_engine::ports::TabOpener;

/// Opens URLs with the platform's default browser launcher.
pub struct SystemTabOpener {
    command: String,
}

impl SystemTabOpener {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
        }
    }
}

impl Default for SystemTabOpener {
    fn default() -> Self {
        #[cfg(target_os = "macos")]
        let command = "open";

        #[cfg(not(target_os = "macos"))]
        let command = "xdg-open";

        Self::new(command)
    }
}

#[async_trait]
impl TabOpener for SystemTabOpener {
    async fn open_tab(&self, url: &str) -> Result<(), AppError> {
        Command::new(&self.command)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| AppError::Tab(format!("failed to run {}: {}", self.command, e)))?;

        tracing::debug!(url = %url, "Browser launched");
        Ok(())
    }
}
