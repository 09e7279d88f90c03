use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tokio::sync::OnceCell;
use tokio::task::{self, JoinHandle};
use tracing::{error, info, trace, warn};

/// Executable resolved by the first launch, reused by every later session
static RESOLVED_EXECUTABLE: OnceCell<PathBuf> = OnceCell::const_new();

/// Settings for one isolated browser launch
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub headless: bool,
    pub user_agent: String,
    /// Explicit executable; skips discovery and download when set
    pub chrome_executable: Option<PathBuf>,
    /// Profile directory, created if missing, owned by the caller afterwards
    pub user_data_dir: PathBuf,
    /// Pause every request until the page continues or fails it
    pub request_intercept: bool,
    /// Upper bound for a single CDP command round trip
    pub request_timeout: Duration,
}

/// Find Chrome/Chromium executable on the system with platform-specific search paths.
pub async fn find_browser_executable() -> Result<PathBuf> {
    // Environment variable overrides all other methods
    if let Ok(path) = std::env::var("CHROMIUM_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            info!(
                "Using browser from CHROMIUM_PATH environment variable: {}",
                path.display()
            );
            return Ok(path);
        }
        warn!(
            "CHROMIUM_PATH environment variable points to non-existent file: {}",
            path.display()
        );
    }

    let paths: &[&str] = if cfg!(target_os = "windows") {
        &[
            r"%PROGRAMFILES%\Google\Chrome\Application\chrome.exe",
            r"%PROGRAMFILES(X86)%\Google\Chrome\Application\chrome.exe",
            r"%LOCALAPPDATA%\Google\Chrome\Application\chrome.exe",
            r"%PROGRAMFILES%\Chromium\Application\chrome.exe",
        ]
    } else if cfg!(target_os = "macos") {
        &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "~/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "~/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/opt/homebrew/bin/chromium",
        ]
    } else {
        &[
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/snap/bin/chromium",
            "/usr/local/bin/chromium",
            "/opt/google/chrome/chrome",
        ]
    };

    for path_str in paths {
        let path = if let Some(rest) = path_str.strip_prefix("~/") {
            match dirs::home_dir() {
                Some(home) => home.join(rest),
                None => continue,
            }
        } else if cfg!(target_os = "windows") {
            PathBuf::from(expand_windows_env_vars(path_str))
        } else {
            PathBuf::from(path_str)
        };

        if path.exists() {
            info!("Found browser at: {}", path.display());
            return Ok(path);
        }
    }

    if !cfg!(target_os = "windows") {
        for cmd in ["chromium", "chromium-browser", "google-chrome", "chrome"] {
            if let Ok(output) = Command::new("which").arg(cmd).output()
                && output.status.success()
            {
                let found = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !found.is_empty() {
                    info!("Found browser using 'which' command: {found}");
                    return Ok(PathBuf::from(found));
                }
            }
        }
    }

    warn!("No Chrome/Chromium executable found. Will download and use fetcher.");
    Err(anyhow::anyhow!("Chrome/Chromium executable not found"))
}

/// Replace `%VAR%` tokens with environment values; unknown tokens stay as-is
fn expand_windows_env_vars(path: &str) -> String {
    let mut result = String::with_capacity(path.len());
    let mut rest = path;

    while let Some(open) = rest.find('%') {
        result.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('%') {
            Some(close) => {
                let name = &after[..close];
                match std::env::var(name) {
                    Ok(value) if !name.is_empty() => result.push_str(&value),
                    _ => {
                        result.push('%');
                        result.push_str(name);
                        result.push('%');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                result.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    result.push_str(rest);
    result
}

/// Downloads a managed Chromium into the user cache directory.
/// Returns a path to the downloaded executable.
pub async fn download_managed_browser() -> Result<PathBuf> {
    info!("Downloading managed Chromium browser...");

    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(|| {
            let fallback = std::env::temp_dir();
            warn!(
                "Could not determine user cache directory, using temp directory fallback: {}",
                fallback.display()
            );
            fallback
        })
        .join("kodegen-pagediff")
        .join("chromium");

    tokio::fs::create_dir_all(&cache_dir)
        .await
        .context("Failed to create cache directory")?;

    let fetcher = BrowserFetcher::new(
        BrowserFetcherOptions::builder()
            .with_path(&cache_dir)
            .build()
            .context("Failed to build fetcher options")?,
    );

    let revision_info = fetcher.fetch().await.context("Failed to fetch browser")?;
    info!(
        "Downloaded Chromium to: {}",
        revision_info.folder_path.display()
    );

    Ok(revision_info.executable_path)
}

/// Resolve the executable once per process: override, then discovery, then download
pub async fn resolve_browser_executable(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        warn!(
            "Configured chrome executable does not exist: {}",
            path.display()
        );
    }

    RESOLVED_EXECUTABLE
        .get_or_try_init(|| async {
            match find_browser_executable().await {
                Ok(path) => Ok(path),
                Err(_) => download_managed_browser().await,
            }
        })
        .await
        .cloned()
}

/// Launch an isolated browser for a single fetch
///
/// Returns the browser and its CDP handler task. The caller owns
/// `options.user_data_dir` and must remove it after the browser exits.
pub async fn launch_browser(options: &LaunchOptions) -> Result<(Browser, JoinHandle<()>)> {
    let chrome_path = resolve_browser_executable(options.chrome_executable.as_deref()).await?;

    tokio::fs::create_dir_all(&options.user_data_dir)
        .await
        .context("Failed to create user data directory")?;

    let mut config_builder = BrowserConfigBuilder::default()
        .request_timeout(options.request_timeout)
        .window_size(1366, 900)
        .user_data_dir(options.user_data_dir.clone())
        .chrome_executable(chrome_path);

    config_builder = if options.headless {
        config_builder.headless_mode(HeadlessMode::default())
    } else {
        config_builder.with_head()
    };

    if options.request_intercept {
        config_builder = config_builder.enable_request_intercept();
    }

    config_builder = config_builder
        .arg(format!("--user-agent={}", options.user_agent))
        .arg("--disable-extensions")
        .arg("--disable-background-networking")
        .arg("--disable-background-timer-throttling")
        .arg("--disable-breakpad")
        .arg("--disable-component-update")
        .arg("--disable-default-apps")
        .arg("--disable-sync")
        .arg("--disable-notifications")
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .arg("--no-sandbox")
        .arg("--metrics-recording-only")
        .arg("--password-store=basic")
        .arg("--use-mock-keychain")
        .arg("--mute-audio");

    let browser_config = config_builder
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build browser config: {e}"))?;

    let (browser, mut handler) = Browser::launch(browser_config)
        .await
        .context("Failed to launch browser")?;

    let handler_task = task::spawn(async move {
        while let Some(h) = handler.next().await {
            if let Err(e) = h {
                let error_msg = e.to_string();

                // Chrome emits CDP events chromiumoxide cannot deserialize; harmless
                let is_benign_serialization_error = error_msg
                    .contains("data did not match any variant of untagged enum Message")
                    || error_msg.contains("Failed to deserialize WS response");

                if is_benign_serialization_error {
                    trace!("Suppressed benign CDP serialization error: {error_msg}");
                } else {
                    error!("Browser handler error: {e:?}");
                }
            }
        }
        trace!("Browser handler task completed");
    });

    Ok((browser, handler_task))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_known_and_keeps_unknown_tokens() {
        // PATH exists on every test host
        let path = std::env::var("PATH").unwrap_or_default();
        assert_eq!(expand_windows_env_vars("%PATH%\\x"), format!("{path}\\x"));
        assert_eq!(
            expand_windows_env_vars("%PAGEDIFF_SURELY_UNSET_VAR%\\chrome.exe"),
            "%PAGEDIFF_SURELY_UNSET_VAR%\\chrome.exe"
        );
        assert_eq!(expand_windows_env_vars("50%"), "50%");
        assert_eq!(expand_windows_env_vars("plain"), "plain");
    }
}
