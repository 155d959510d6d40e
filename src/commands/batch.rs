use std::path::PathBuf;
use std::process::ExitCode;

use tracing::info;

use tpc_lib::output::{BatchOutput, TPC_OUTPUT_VERSION};
use tpc_lib::{Manifest, TpcError, TpcOutput};

use super::compare::ensure_valid_tolerance;
use super::{build_checker, log_settings};
use crate::cli::OutputFormat;
use crate::formatting::{exit_code_for_run, render_error, write_output};
use crate::settings::{load_config, resolve_settings, CliSettings, FlagSources};

/// Run the batch command over every manifest element.
#[allow(clippy::too_many_arguments)]
pub async fn run_batch(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    manifest: PathBuf,
    cli: CliSettings,
    format: OutputFormat,
    output: Option<PathBuf>,
    artifacts_dir: Option<PathBuf>,
) -> ExitCode {
    match batch(raw_args, config_path, manifest, cli, artifacts_dir).await {
        Ok((body, passed)) => {
            if let Err(err) = write_output(&body, format, output.clone()) {
                return render_error(TpcError::Config(err.to_string()), format, output);
            }
            exit_code_for_run(passed)
        }
        Err(err) => render_error(err, format, output),
    }
}

async fn batch(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    manifest_path: PathBuf,
    cli: CliSettings,
    artifacts_dir: Option<PathBuf>,
) -> Result<(TpcOutput, bool), TpcError> {
    let config = load_config(config_path.as_deref())?;
    let manifest = Manifest::load(&manifest_path)?;
    let flags = FlagSources::from_args(raw_args);
    let settings = resolve_settings(cli, manifest.tolerance, &config, &flags);
    ensure_valid_tolerance(settings.tolerance)?;
    log_settings(&settings, config_path.as_deref());

    let (checker, artifacts_dir) = build_checker(&config, &settings, artifacts_dir.as_deref())?;
    info!(
        manifest = %manifest_path.display(),
        elements = manifest.elements.len(),
        "running batch"
    );
    let summary = checker.check_all(&manifest.elements).await;
    let passed = summary.passed();
    info!(
        matched = summary.matched,
        mismatched = summary.mismatched,
        incomplete = summary.incomplete,
        "batch finished"
    );

    let body = TpcOutput::Batch(BatchOutput {
        version: TPC_OUTPUT_VERSION.to_string(),
        tolerance: settings.tolerance,
        passed,
        summary,
        artifacts_dir,
    });
    Ok((body, passed))
}
