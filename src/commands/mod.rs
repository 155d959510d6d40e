mod batch;
mod compare;
mod extract;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use tpc_lib::observer::{ArtifactObserver, ObserverSet, TracingObserver};
use tpc_lib::{BrowserManager, CompareOptions, Config, TpcError, TypographyChecker};

use crate::settings::{format_effective_config, ResolvedSettings};

pub use batch::run_batch;
pub use compare::{run_compare, CompareRequest};
pub use extract::{run_extract_design, run_extract_live};

/// Build a checker wired to tracing and, when requested, an artifacts directory.
pub(crate) fn build_checker(
    config: &Config,
    settings: &ResolvedSettings,
    artifacts_dir: Option<&Path>,
) -> Result<(TypographyChecker, Option<PathBuf>), TpcError> {
    let figma = config.figma_client()?;
    let browser = BrowserManager::new(settings.browser.clone());

    let mut observers = ObserverSet::new().with(TracingObserver);
    let mut artifacts = None;
    if let Some(dir) = artifacts_dir {
        let observer = ArtifactObserver::new(dir)?;
        artifacts = Some(observer.dir().to_path_buf());
        observers = observers.with(observer);
    }

    let checker = TypographyChecker::new(
        figma,
        browser,
        CompareOptions::with_tolerance(settings.tolerance),
    )
    .with_observer(Arc::new(observers));
    Ok((checker, artifacts))
}

pub(crate) fn log_settings(settings: &ResolvedSettings, config_path: Option<&Path>) {
    debug!("{}", format_effective_config(settings, config_path));
}
