//! TOML configuration for tolerance, the Figma API and the browser harness.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::browser::{
    BrowserOptions, Viewport, DEFAULT_NAVIGATION_TIMEOUT, DEFAULT_NETWORK_IDLE_TIMEOUT,
    DEFAULT_PROCESS_TIMEOUT,
};
use crate::figma::{FigmaClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::style::DEFAULT_TOLERANCE;
use crate::{Result, TpcError};

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "tpc.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub tolerance: f64,
    pub figma: FigmaConfig,
    pub browser: BrowserConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FigmaConfig {
    pub base_url: String,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrowserConfig {
    pub node_command: String,
    pub headless: bool,
    pub viewport: Viewport,
    #[serde(with = "humantime_serde")]
    pub navigation_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub network_idle_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub process_timeout: Duration,
    pub max_concurrent_sessions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            figma: FigmaConfig::default(),
            browser: BrowserConfig::default(),
        }
    }
}

impl Default for FigmaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        let options = BrowserOptions::default();
        Self {
            node_command: options.node_command,
            headless: options.headless,
            viewport: options.viewport,
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            network_idle_timeout: DEFAULT_NETWORK_IDLE_TIMEOUT,
            process_timeout: DEFAULT_PROCESS_TIMEOUT,
            max_concurrent_sessions: options.max_concurrent_sessions,
        }
    }
}

impl BrowserConfig {
    pub fn to_options(&self) -> BrowserOptions {
        BrowserOptions {
            node_command: self.node_command.clone(),
            viewport: self.viewport,
            headless: self.headless,
            navigation_timeout: self.navigation_timeout,
            network_idle_timeout: self.network_idle_timeout,
            process_timeout: self.process_timeout,
            max_concurrent_sessions: self.max_concurrent_sessions,
        }
    }
}

impl Config {
    /// Load from `path`, else `./tpc.toml` when present, else defaults.
    ///
    /// An explicit path that does not exist is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let source = match path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::local_config_path(),
        };

        let Some(source) = source else {
            return Ok(Self::default());
        };

        let text = std::fs::read_to_string(&source).map_err(|e| {
            TpcError::Config(format!("Failed to read config {}: {}", source.display(), e))
        })?;
        let config = Self::from_toml(&text).map_err(|e| {
            TpcError::Config(format!("Invalid config ({}): {}", source.display(), e))
        })?;
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn local_config_path() -> Option<PathBuf> {
        let candidate = PathBuf::from(DEFAULT_CONFIG_FILE);
        candidate.is_file().then_some(candidate)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(TpcError::Config(format!(
                "tolerance must be a non-negative number (got {})",
                self.tolerance
            )));
        }
        if self.figma.base_url.trim().is_empty() {
            return Err(TpcError::Config("figma.base_url must not be empty".to_string()));
        }
        url::Url::parse(&self.figma.base_url)?;
        if self.browser.node_command.trim().is_empty() {
            return Err(TpcError::Config(
                "browser.node_command must not be empty".to_string(),
            ));
        }
        if self.browser.viewport.width == 0 || self.browser.viewport.height == 0 {
            return Err(TpcError::Config(
                "browser.viewport width and height must be positive".to_string(),
            ));
        }
        if self.browser.max_concurrent_sessions == 0 {
            return Err(TpcError::Config(
                "browser.max_concurrent_sessions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Figma client from the environment token and this config's endpoint.
    pub fn figma_client(&self) -> Result<FigmaClient> {
        FigmaClient::from_env(&self.figma.base_url, self.figma.timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_match_expected() {
        let cfg = Config::default();

        assert_eq!(cfg.tolerance, 0.5);
        assert_eq!(cfg.figma.base_url, "https://api.figma.com");
        assert_eq!(cfg.figma.timeout, Duration::from_secs(30));
        assert_eq!(cfg.browser.viewport, Viewport::default());
        assert_eq!(cfg.browser.navigation_timeout, Duration::from_secs(30));
        assert_eq!(cfg.browser.network_idle_timeout, Duration::from_secs(10));
        assert_eq!(cfg.browser.process_timeout, Duration::from_secs(45));
        assert_eq!(cfg.browser.max_concurrent_sessions, 2);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn full_document_parses() {
        let cfg = Config::from_toml(
            r#"
tolerance = 1.0

[figma]
base_url = "http://localhost:9000"
timeout = "5s"

[browser]
node_command = "/usr/local/bin/node"
headless = false
viewport = { width = 1280, height = 720 }
navigation_timeout = "20s"
network_idle_timeout = "500ms"
process_timeout = "1m"
max_concurrent_sessions = 4
"#,
        )
        .expect("config");

        assert_eq!(cfg.tolerance, 1.0);
        assert_eq!(cfg.figma.base_url, "http://localhost:9000");
        assert_eq!(cfg.figma.timeout, Duration::from_secs(5));
        assert!(!cfg.browser.headless);
        assert_eq!(cfg.browser.viewport, Viewport { width: 1280, height: 720 });
        assert_eq!(cfg.browser.network_idle_timeout, Duration::from_millis(500));
        assert_eq!(cfg.browser.process_timeout, Duration::from_secs(60));

        let options = cfg.browser.to_options();
        assert_eq!(options.node_command, "/usr/local/bin/node");
        assert_eq!(options.max_concurrent_sessions, 4);
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let cfg = Config::from_toml("[browser]\nheadless = false\n").expect("config");
        assert_eq!(cfg.tolerance, DEFAULT_TOLERANCE);
        assert!(!cfg.browser.headless);
        assert_eq!(cfg.browser.node_command, "node");
    }

    #[test]
    fn invalid_values_are_rejected() {
        for doc in [
            "tolerance = -1.0",
            "[figma]\nbase_url = \"\"",
            "[browser]\nmax_concurrent_sessions = 0",
            "[browser]\nviewport = { width = 0, height = 900 }",
        ] {
            assert!(Config::from_toml(doc).is_err(), "accepted: {doc}");
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::from_toml("threshold = 0.9").unwrap_err();
        assert!(matches!(err, TpcError::Toml(_)));
    }

    #[test]
    fn load_reads_explicit_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tpc.toml");
        std::fs::write(&path, "tolerance = 2.0\n").expect("write");

        let cfg = Config::load(Some(&path)).expect("config");
        assert_eq!(cfg.tolerance, 2.0);
    }

    #[test]
    fn load_reports_missing_explicit_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        match err {
            TpcError::Config(msg) => assert!(msg.contains("nope.toml"), "got: {msg}"),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn load_wraps_invalid_documents_as_config_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "tolerance = \"loose\"\n").expect("write");

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("bad.toml"));
    }
}
