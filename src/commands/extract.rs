use std::path::PathBuf;
use std::process::ExitCode;

use tpc_lib::figma::extract_design_style;
use tpc_lib::output::{ExtractOutput, StyleSide, TPC_OUTPUT_VERSION};
use tpc_lib::resource::{parse_element_target, resolve_design_target};
use tpc_lib::{BrowserManager, TpcError, TpcOutput};

use super::log_settings;
use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};
use crate::settings::{load_config, resolve_settings, CliSettings, FlagSources};

/// Print the canonical style of a Figma node.
pub async fn run_extract_design(
    config_path: Option<PathBuf>,
    figma: Option<String>,
    file_key: Option<String>,
    node_id: Option<String>,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let result = async {
        let config = load_config(config_path.as_deref())?;
        let target =
            resolve_design_target(figma.as_deref(), file_key.as_deref(), node_id.as_deref())?;
        let client = config.figma_client()?;
        let style = extract_design_style(&client, &target.file_key, &target.node_id).await?;
        Ok::<_, TpcError>(TpcOutput::Extract(ExtractOutput {
            version: TPC_OUTPUT_VERSION.to_string(),
            side: StyleSide::Design,
            source: target.to_string(),
            style,
        }))
    }
    .await;

    finish(result, format, output)
}

/// Print the canonical style of a live element.
pub async fn run_extract_live(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    url: String,
    selector: String,
    cli: CliSettings,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let result = async {
        let config = load_config(config_path.as_deref())?;
        let settings = resolve_settings(cli, None, &config, &FlagSources::from_args(raw_args));
        log_settings(&settings, config_path.as_deref());

        let target = parse_element_target(&url, &selector)?;
        let browser = BrowserManager::new(settings.browser);
        let style = browser.extract_live_style(&target).await?;
        Ok::<_, TpcError>(TpcOutput::Extract(ExtractOutput {
            version: TPC_OUTPUT_VERSION.to_string(),
            side: StyleSide::Live,
            source: target.to_string(),
            style,
        }))
    }
    .await;

    finish(result, format, output)
}

fn finish(
    result: Result<TpcOutput, TpcError>,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    match result {
        Ok(body) => match write_output(&body, format, output.clone()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => render_error(TpcError::Config(err.to_string()), format, output),
        },
        Err(err) => render_error(err, format, output),
    }
}
