//! Short-lived browser session for one rendered fetch
//!
//! A session owns the browser process, its CDP handler task and a unique
//! profile directory. [`RenderSession::close`] shuts all three down in order;
//! `Drop` is the fallback for early returns and panics, killing the process
//! and removing the directory without awaiting.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chromiumoxide::{Browser, Page};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::browser_setup::{LaunchOptions, launch_browser};
use crate::config::FetchConfig;

const CDP_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Result of session teardown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupResult {
    /// All cleanup operations succeeded
    Success,
    /// Some cleanup operations failed, with error details
    PartialFailure(Vec<String>),
}

pub struct RenderSession {
    browser: Browser,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
}

impl RenderSession {
    /// Launch a fresh, isolated browser
    ///
    /// # Errors
    ///
    /// Returns an error if no browser can be found or downloaded, or the
    /// process fails to start.
    pub async fn launch(config: &FetchConfig) -> Result<Self> {
        let user_data_dir =
            std::env::temp_dir().join(format!("kodegen_pagediff_{}", uuid::Uuid::new_v4()));
        let options = LaunchOptions {
            headless: config.headless(),
            user_agent: config.user_agent().to_string(),
            chrome_executable: config.chrome_executable().map(PathBuf::from),
            user_data_dir: user_data_dir.clone(),
            request_intercept: true,
            request_timeout: std::time::Duration::from_secs(CDP_REQUEST_TIMEOUT_SECS),
        };

        match launch_browser(&options).await {
            Ok((browser, handler)) => Ok(Self {
                browser,
                handler,
                user_data_dir: Some(user_data_dir),
            }),
            Err(e) => {
                // profile dir may already exist if launch failed late
                let _ = std::fs::remove_dir_all(&user_data_dir);
                Err(e)
            }
        }
    }

    /// Open a blank page; listeners attach before the real navigation
    ///
    /// # Errors
    ///
    /// Returns an error if the browser refuses to create a target.
    pub async fn new_page(&self) -> Result<Page> {
        self.browser
            .new_page("about:blank")
            .await
            .context("Failed to create page")
    }

    /// Close the browser, wait for the process, then remove the profile
    pub async fn close(mut self) -> CleanupResult {
        let mut errors = Vec::new();

        debug!("Closing browser");
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser: {e}");
            errors.push(format!("Browser close failed: {e}"));
        }

        // Chrome must release profile file handles before the directory goes
        if let Err(e) = self.browser.wait().await {
            warn!("Failed to wait for browser exit: {e}");
            errors.push(format!("Browser wait failed: {e}"));
        }

        self.handler.abort();

        if let Some(dir) = self.user_data_dir.take()
            && let Err(e) = tokio::fs::remove_dir_all(&dir).await
        {
            warn!(
                "Failed to clean up browser profile {}: {e}",
                dir.display()
            );
            errors.push(format!("Directory cleanup failed: {e}"));
        }

        if errors.is_empty() {
            CleanupResult::Success
        } else {
            CleanupResult::PartialFailure(errors)
        }
    }
}

impl Drop for RenderSession {
    fn drop(&mut self) {
        self.handler.abort();
        // Browser's own Drop kills the child process

        if let Some(dir) = self.user_data_dir.take() {
            warn!("RenderSession dropped without close - removing profile in Drop");
            if let Err(e) = std::fs::remove_dir_all(&dir) {
                warn!(
                    "Failed to clean up browser profile {}: {e}. Manual cleanup may be required.",
                    dir.display()
                );
            }
        }
    }
}
