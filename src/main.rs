mod cli;
mod commands;
mod formatting;
mod settings;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use cli::{Commands, ExtractSide};
use commands::{run_batch, run_compare, run_extract_design, run_extract_live, CompareRequest};
use settings::CliSettings;

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();
    init_tracing(args.verbose);
    run(args).await
}

/// Logs go to stderr so stdout stays a clean JSON payload.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(args: cli::Cli) -> ExitCode {
    let raw_args: Vec<String> = std::env::args().collect();

    match args.command {
        Commands::Compare {
            figma,
            file_key,
            node_id,
            url,
            selector,
            name,
            tolerance,
            viewport,
            process_timeout,
            format,
            output,
            artifacts_dir,
        } => {
            let request = CompareRequest {
                figma,
                file_key,
                node_id,
                url,
                selector,
                name,
                cli: CliSettings {
                    tolerance,
                    viewport,
                    process_timeout,
                },
                format,
                output,
                artifacts_dir,
            };
            run_compare(&raw_args, args.config, request).await
        }
        Commands::Batch {
            manifest,
            tolerance,
            viewport,
            process_timeout,
            format,
            output,
            artifacts_dir,
        } => {
            let cli = CliSettings {
                tolerance,
                viewport,
                process_timeout,
            };
            run_batch(
                &raw_args,
                args.config,
                manifest,
                cli,
                format,
                output,
                artifacts_dir,
            )
            .await
        }
        Commands::Extract { side } => match side {
            ExtractSide::Design {
                figma,
                file_key,
                node_id,
                format,
                output,
            } => run_extract_design(args.config, figma, file_key, node_id, format, output).await,
            ExtractSide::Live {
                url,
                selector,
                viewport,
                process_timeout,
                format,
                output,
            } => {
                let cli = CliSettings {
                    tolerance: tpc_lib::DEFAULT_TOLERANCE,
                    viewport,
                    process_timeout,
                };
                run_extract_live(&raw_args, args.config, url, selector, cli, format, output).await
            }
        },
    }
}
