//! Browser manager for coordinating headless browser sessions.
//!
//! This module provides the `BrowserManager` struct for reading live
//! element styles with semaphore-based session limiting.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::process::Stdio;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::computed::{live_style_from_computed, RawComputedStyle};
use super::playwright::{
    ensure_node_available, ensure_playwright_available, map_playwright_error, map_spawn_error,
    mock_computed_style_path, parse_script_output, COMPUTED_STYLE_SCRIPT, MOCK_COMPUTED_STYLE_ENV,
};
use crate::style::CanonicalStyle;
use crate::{Result, TpcError};

pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_NETWORK_IDLE_TIMEOUT: Duration = Duration::from_secs(10);
/// Default timeout for the entire Playwright process.
pub const DEFAULT_PROCESS_TIMEOUT: Duration = Duration::from_secs(45);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1440,
            height: 900,
        }
    }
}

impl FromStr for Viewport {
    type Err = TpcError;

    /// Parses `WIDTHxHEIGHT`, e.g. `1280x720`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            TpcError::Config(format!(
                "Invalid viewport {s:?}: expected WIDTHxHEIGHT (e.g., 1440x900)"
            ))
        };
        let (width, height) = s.split_once('x').ok_or_else(invalid)?;
        let width: u32 = width.trim().parse().map_err(|_| invalid())?;
        let height: u32 = height.trim().parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(TpcError::Config(
                "Viewport width and height must be positive".to_string(),
            ));
        }
        Ok(Self { width, height })
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A live element: the page to load and the CSS selector resolving it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementTarget {
    pub url: String,
    pub selector: String,
}

impl ElementTarget {
    pub fn new(url: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            selector: selector.into(),
        }
    }
}

impl fmt::Display for ElementTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.selector, self.url)
    }
}

/// Configuration options for browser sessions.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// The Node.js command to use (default: "node").
    pub node_command: String,
    pub viewport: Viewport,
    pub headless: bool,
    pub navigation_timeout: Duration,
    pub network_idle_timeout: Duration,
    /// Hard limit on the whole Playwright process.
    pub process_timeout: Duration,
    /// Maximum number of concurrent browser sessions.
    pub max_concurrent_sessions: usize,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            node_command: "node".to_string(),
            viewport: Viewport::default(),
            headless: true,
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            network_idle_timeout: DEFAULT_NETWORK_IDLE_TIMEOUT,
            process_timeout: DEFAULT_PROCESS_TIMEOUT,
            max_concurrent_sessions: 2,
        }
    }
}

/// Manages concurrent browser sessions with semaphore-based limiting.
#[derive(Debug, Clone)]
pub struct BrowserManager {
    options: BrowserOptions,
    semaphore: Arc<Semaphore>,
}

impl BrowserManager {
    pub fn new(options: BrowserOptions) -> Self {
        let permits = options.max_concurrent_sessions.max(1);
        Self {
            options,
            semaphore: Arc::new(Semaphore::new(permits)),
        }
    }

    pub fn options(&self) -> &BrowserOptions {
        &self.options
    }

    /// Load the target page and map the element's computed style.
    ///
    /// A missing or detached element is a [`TpcError::DomExtraction`];
    /// harness failures (Node, Playwright, timeouts) are [`TpcError::Browser`].
    pub async fn extract_live_style(&self, target: &ElementTarget) -> Result<CanonicalStyle> {
        if target.selector.trim().is_empty() {
            return Err(TpcError::Config(
                "A CSS selector is required to extract a live style".to_string(),
            ));
        }

        let raw = match mock_computed_style_path() {
            Some(path) => {
                warn!(path = %path, "using {MOCK_COMPUTED_STYLE_ENV}; browser not launched");
                load_mock_computed_style(&path)?
            }
            None => {
                let _permit = self
                    .semaphore
                    .acquire()
                    .await
                    .map_err(|_| TpcError::Browser("Browser manager unavailable".to_string()))?;
                self.run_playwright(target).await?
            }
        };

        let style = live_style_from_computed(&raw);
        debug!(target = %target, properties = style.len(), "extracted live style");
        Ok(style)
    }

    async fn run_playwright(&self, target: &ElementTarget) -> Result<RawComputedStyle> {
        // Fail fast if Node is missing to avoid spawning Playwright unnecessarily.
        ensure_node_available(&self.options.node_command).await?;
        ensure_playwright_available(&self.options.node_command).await?;

        let mut cmd = Command::new(&self.options.node_command);
        cmd.arg("-e")
            .arg(COMPUTED_STYLE_SCRIPT)
            .arg(&target.url)
            .arg(&target.selector)
            .arg(self.options.viewport.width.to_string())
            .arg(self.options.viewport.height.to_string())
            .arg(self.options.navigation_timeout.as_millis().to_string())
            .arg(self.options.network_idle_timeout.as_millis().to_string())
            .arg(if self.options.headless { "1" } else { "0" })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(
            url = %target.url,
            viewport = %self.options.viewport,
            "launching headless browser"
        );
        let start = Instant::now();
        let mut child = cmd
            .spawn()
            .map_err(|err| map_spawn_error(err, &self.options.node_command))?;

        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();

        let stdout_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(mut out) = stdout_pipe {
                let _ = out.read_to_end(&mut buf).await;
            }
            buf
        });

        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(mut err) = stderr_pipe {
                let _ = err.read_to_end(&mut buf).await;
            }
            buf
        });

        let status = match timeout(self.options.process_timeout, child.wait()).await {
            Ok(Ok(status)) => status,
            Ok(Err(err)) => return Err(TpcError::Io(err)),
            Err(_) => {
                let _ = child.kill().await;
                let _ = child.wait().await;
                return Err(TpcError::Browser(format!(
                    "Playwright timed out after {:?}",
                    self.options.process_timeout
                )));
            }
        };

        let stdout = stdout_task.await.unwrap_or_default();
        let stderr = stderr_task.await.unwrap_or_default();

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr);
            return Err(map_playwright_error(status.to_string(), &stderr));
        }

        let stdout = String::from_utf8_lossy(&stdout);
        let raw = parse_script_output(&stdout, &target.selector)?;
        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            "computed style captured"
        );
        Ok(raw)
    }
}

fn load_mock_computed_style(path: &str) -> Result<RawComputedStyle> {
    let data = std::fs::read_to_string(path).map_err(|e| {
        TpcError::Config(format!("Failed to read {MOCK_COMPUTED_STYLE_ENV} file {path}: {e}"))
    })?;
    serde_json::from_str(&data).map_err(TpcError::Serialization)
}
