use std::path::PathBuf;
use std::process::ExitCode;

use tracing::info;

use tpc_lib::output::{CompareOutput, DesignSource, LiveSource, TPC_OUTPUT_VERSION};
use tpc_lib::resource::{parse_element_target, resolve_design_target};
use tpc_lib::{ElementSpec, TpcError, TpcOutput};

use super::{build_checker, log_settings};
use crate::cli::OutputFormat;
use crate::formatting::{exit_code_for_run, render_error, write_output};
use crate::settings::{load_config, resolve_settings, CliSettings, FlagSources};

/// Arguments of `tpc compare`, as parsed by clap.
pub struct CompareRequest {
    pub figma: Option<String>,
    pub file_key: Option<String>,
    pub node_id: Option<String>,
    pub url: String,
    pub selector: String,
    pub name: Option<String>,
    pub cli: CliSettings,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub artifacts_dir: Option<PathBuf>,
}

/// Run the compare command.
pub async fn run_compare(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    request: CompareRequest,
) -> ExitCode {
    let format = request.format;
    let output = request.output.clone();
    match compare(raw_args, config_path, request).await {
        Ok((body, passed)) => {
            if let Err(err) = write_output(&body, format, output.clone()) {
                return render_error(TpcError::Config(err.to_string()), format, output);
            }
            exit_code_for_run(passed)
        }
        Err(err) => render_error(err, format, output),
    }
}

async fn compare(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    request: CompareRequest,
) -> Result<(TpcOutput, bool), TpcError> {
    let config = load_config(config_path.as_deref())?;
    let flags = FlagSources::from_args(raw_args);
    let settings = resolve_settings(request.cli, None, &config, &flags);
    ensure_valid_tolerance(settings.tolerance)?;
    log_settings(&settings, config_path.as_deref());

    let design = resolve_design_target(
        request.figma.as_deref(),
        request.file_key.as_deref(),
        request.node_id.as_deref(),
    )?;
    let live = parse_element_target(&request.url, &request.selector)?;
    let name = request
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| live.selector.clone());
    let element = ElementSpec {
        name,
        design: design.clone(),
        live: live.clone(),
    };

    let (checker, artifacts_dir) =
        build_checker(&config, &settings, request.artifacts_dir.as_deref())?;
    info!(design = %design, live = %live, "comparing element");
    let report = checker.check_element(&element).await?;
    let passed = report.matches;

    let body = TpcOutput::Compare(CompareOutput {
        version: TPC_OUTPUT_VERSION.to_string(),
        design: DesignSource {
            file_key: design.file_key,
            node_id: design.node_id,
        },
        live: LiveSource {
            url: live.url,
            selector: live.selector,
        },
        tolerance: settings.tolerance,
        report,
        artifacts_dir,
    });
    Ok((body, passed))
}

pub(super) fn ensure_valid_tolerance(tolerance: f64) -> Result<(), TpcError> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(TpcError::Config(format!(
            "tolerance must be a non-negative number (got {tolerance})"
        )));
    }
    Ok(())
}
