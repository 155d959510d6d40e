use std::path::Path;
use std::time::Duration;

use tpc_lib::{BrowserOptions, Config, Viewport};

/// Tracks which CLI flags were explicitly provided vs. defaulted.
#[derive(Debug, Default)]
pub struct FlagSources {
    pub tolerance: bool,
    pub viewport: bool,
    pub process_timeout: bool,
}

impl FlagSources {
    pub fn from_args(args: &[String]) -> Self {
        Self {
            tolerance: flag_present(args, "--tolerance"),
            viewport: flag_present(args, "--viewport"),
            process_timeout: flag_present(args, "--process-timeout"),
        }
    }
}

/// Checks if a flag was present in the command-line arguments.
pub fn flag_present(args: &[String], flag: &str) -> bool {
    args.iter()
        .any(|arg| arg == flag || arg.starts_with(&format!("{flag}=")))
}

/// Values given on the command line, defaulted or not.
#[derive(Debug, Clone, Copy)]
pub struct CliSettings {
    pub tolerance: f64,
    pub viewport: Viewport,
    pub process_timeout: u64,
}

/// Resolved settings after merging CLI args, manifest and config file.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    pub tolerance: f64,
    pub browser: BrowserOptions,
}

/// Merge CLI arguments with config, preferring CLI when flags are present.
///
/// Tolerance precedence: `--tolerance`, then the manifest, then the config.
pub fn resolve_settings(
    cli: CliSettings,
    manifest_tolerance: Option<f64>,
    config: &Config,
    flags: &FlagSources,
) -> ResolvedSettings {
    let tolerance = if flags.tolerance {
        cli.tolerance
    } else {
        manifest_tolerance.unwrap_or(config.tolerance)
    };

    let mut browser = config.browser.to_options();
    if flags.viewport {
        browser.viewport = cli.viewport;
    }
    if flags.process_timeout {
        browser.process_timeout = Duration::from_secs(cli.process_timeout);
    }

    ResolvedSettings { tolerance, browser }
}

/// Load config from an explicit path, ./tpc.toml, or built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config, tpc_lib::TpcError> {
    Config::load(path)
}

/// Format effective config as a single-line string.
pub fn format_effective_config(settings: &ResolvedSettings, config_source: Option<&Path>) -> String {
    let source = config_source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    let browser = &settings.browser;
    format!(
        "Effective config [{source}]: tolerance={:.2}, viewport={}, headless={}, timeouts: nav={}s, network-idle={}s, process={}s, sessions={}",
        settings.tolerance,
        browser.viewport,
        browser.headless,
        browser.navigation_timeout.as_secs(),
        browser.network_idle_timeout.as_secs(),
        browser.process_timeout.as_secs(),
        browser.max_concurrent_sessions,
    )
}
