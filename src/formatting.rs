use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tpc_lib::report::{ElementOutcome, ElementReport};
use tpc_lib::{ErrorOutput, TpcError, TpcOutput};

use crate::cli::OutputFormat;

/// Write output in the requested format.
pub fn write_output(
    body: &TpcOutput,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => write_json_output(body, output.as_deref())?,
        OutputFormat::Pretty => write_pretty_output(body, output.as_deref())?,
    };
    Ok(())
}

/// Render an error and return the appropriate exit code.
pub fn render_error(err: TpcError, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    let payload = TpcOutput::Error(ErrorOutput::new(err.to_payload()));

    match format {
        OutputFormat::Json => {
            let content =
                serde_json::to_string(&payload).unwrap_or_else(|_| "{\"mode\":\"error\"}".into());
            if let Some(path) = output {
                if let Err(write_err) = std::fs::write(&path, &content) {
                    eprintln!("Failed to write error output: {}", write_err);
                    println!("{content}");
                }
            } else {
                println!("{content}");
            }
        }
        OutputFormat::Pretty => {
            if let Err(write_err) = write_pretty_output(&payload, output.as_deref()) {
                eprintln!("Failed to write error output: {}", write_err);
            }
        }
    };

    // Exit code 2 is reserved for fatal errors; mismatches use 1.
    ExitCode::from(2)
}

/// Write JSON output to file or stdout.
fn write_json_output(body: &TpcOutput, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let content = serde_json::to_string(body)?;
    if let Some(path) = output {
        std::fs::write(path, content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Write pretty output to file or stdout.
fn write_pretty_output(body: &TpcOutput, output: Option<&Path>) -> io::Result<()> {
    let stdout_is_tty = std::io::stdout().is_terminal();
    let use_human = output.is_none() && stdout_is_tty;

    if use_human {
        let content = format_pretty(body, true);
        println!("{content}");
        return Ok(());
    }

    // Non-tty or file output: keep JSON shape for pipelines/files.
    let content =
        serde_json::to_string_pretty(body).unwrap_or_else(|_| "{\"mode\":\"error\"}".to_string());
    if let Some(path) = output {
        std::fs::write(path, &content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Format output for human consumption in a terminal.
pub fn format_pretty(body: &TpcOutput, colorize: bool) -> String {
    match body {
        TpcOutput::Compare(out) => {
            let mut buf = String::new();
            let status = status_label(out.report.matches, colorize);
            writeln!(buf, "{} Typography check: {}", status, out.report.element).ok();
            writeln!(
                buf,
                "Design: {}#{}  Live: {} @ {}",
                out.design.file_key, out.design.node_id, out.live.selector, out.live.url
            )
            .ok();
            writeln!(buf, "Tolerance: {}px", out.tolerance).ok();
            write_discrepancies(&mut buf, &out.report, colorize);
            if let Some(dir) = &out.artifacts_dir {
                writeln!(buf, "Artifacts: {}", dir.display()).ok();
            }
            buf
        }
        TpcOutput::Batch(out) => {
            let mut buf = String::new();
            let status = status_label(out.passed, colorize);
            let summary = &out.summary;
            writeln!(
                buf,
                "{} {} elements: {} matched, {} mismatched, {} incomplete (tolerance {}px)",
                status,
                summary.total,
                summary.matched,
                summary.mismatched,
                summary.incomplete,
                out.tolerance
            )
            .ok();
            for outcome in &summary.elements {
                match outcome {
                    ElementOutcome::Completed(report) => {
                        let label = status_label(report.matches, colorize);
                        writeln!(buf, "{} {}", label, report.element).ok();
                        write_discrepancies(&mut buf, report, colorize);
                    }
                    ElementOutcome::Incomplete { element, error } => {
                        let label = color("SKIP", "33", colorize);
                        writeln!(buf, "{} {}: {}", label, element, error.message).ok();
                    }
                }
            }
            if let Some(dir) = &out.artifacts_dir {
                writeln!(buf, "Artifacts: {}", dir.display()).ok();
            }
            buf
        }
        TpcOutput::Extract(out) => {
            let mut buf = String::new();
            let header = color("[EXTRACT]", "36", colorize);
            writeln!(buf, "{} {:?} style of {}", header, out.side, out.source).ok();
            if out.style.is_empty() {
                writeln!(buf, "(no typography properties)").ok();
            }
            for (property, value) in out.style.iter() {
                writeln!(buf, "  {:16} {}", property.as_str(), value).ok();
            }
            buf
        }
        TpcOutput::Error(out) => {
            let mut buf = String::new();
            let header = color("[ERROR]", "31", colorize);
            writeln!(buf, "{} {}", header, out.error.message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
            buf
        }
    }
}

fn status_label(passed: bool, colorize: bool) -> String {
    if passed {
        color("PASS", "32", colorize)
    } else {
        color("FAIL", "31", colorize)
    }
}

fn write_discrepancies(buf: &mut String, report: &ElementReport, colorize: bool) {
    for d in &report.result.discrepancies {
        let live = d
            .live_value
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "(unset)".to_string());
        writeln!(
            buf,
            "  - {:16} design {} vs live {}: {}",
            d.property.as_str(),
            d.design_value,
            color(&live, "31", colorize),
            d.reason
        )
        .ok();
    }
}

/// Apply ANSI color codes when enabled.
fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Exit code for a finished run: 0 when everything matched, else 1.
pub fn exit_code_for_run(passed: bool) -> ExitCode {
    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
