use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tpc_lib::Viewport;

#[derive(Parser)]
#[command(name = "tpc")]
#[command(
    version,
    about = "Typography Parity Checker - Compare Figma text styles against live web elements",
    long_about = "Typography Parity Checker (TPC)\n\nModes:\n- compare: check one Figma text node against one element on a live page.\n- batch: check every element listed in a TOML manifest.\n- extract: print the canonical style of a design node or a live element.\n\nExit codes: 0 all matched, 1 mismatches or incomplete elements, 2 fatal error.\nThe Figma token is read from FIGMA_TOKEN (or FIGMA_OAUTH_TOKEN)."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable debug logging on stderr")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Config file (TOML) for tolerance, Figma API and browser settings; defaults to ./tpc.toml when present"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare one design node against one live element
    Compare {
        #[arg(
            long,
            help = "Figma URL of the text layer (https://www.figma.com/design/<KEY>/...?node-id=1-2)",
            conflicts_with_all = ["file_key", "node_id"]
        )]
        figma: Option<String>,

        #[arg(long, help = "Figma file key (use with --node-id)", requires = "node_id")]
        file_key: Option<String>,

        #[arg(long, help = "Figma node id, 1:2 or 1-2 (use with --file-key)", requires = "file_key")]
        node_id: Option<String>,

        #[arg(long, help = "Page URL of the live element")]
        url: String,

        #[arg(long, help = "CSS selector resolving the live element")]
        selector: String,

        #[arg(long, help = "Element name used in reports and artifacts")]
        name: Option<String>,

        #[arg(
            long,
            default_value = "0.5",
            help = "Max absolute difference for pixel-like properties"
        )]
        tolerance: f64,

        #[arg(
            long,
            default_value = "1440x900",
            help = "Viewport dimensions (WIDTHxHEIGHT)"
        )]
        viewport: Viewport,

        #[arg(
            long,
            default_value = "45",
            help = "Process timeout (seconds) for the Playwright invocation"
        )]
        process_timeout: u64,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,

        #[arg(
            long,
            value_name = "PATH",
            help = "Write design/live/report JSON artifacts into this directory"
        )]
        artifacts_dir: Option<PathBuf>,
    },

    /// Compare every element listed in a TOML manifest
    Batch {
        #[arg(long, value_name = "PATH", help = "Manifest with [[element]] entries")]
        manifest: PathBuf,

        #[arg(
            long,
            default_value = "0.5",
            help = "Max absolute difference for pixel-like properties (overrides the manifest)"
        )]
        tolerance: f64,

        #[arg(
            long,
            default_value = "1440x900",
            help = "Viewport dimensions (WIDTHxHEIGHT)"
        )]
        viewport: Viewport,

        #[arg(
            long,
            default_value = "45",
            help = "Process timeout (seconds) for each Playwright invocation"
        )]
        process_timeout: u64,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,

        #[arg(
            long,
            value_name = "PATH",
            help = "Write design/live/report JSON artifacts into this directory"
        )]
        artifacts_dir: Option<PathBuf>,
    },

    /// Print the canonical style of one side
    Extract {
        #[command(subcommand)]
        side: ExtractSide,
    },
}

#[derive(Subcommand)]
pub enum ExtractSide {
    /// Canonical style of a Figma text node
    Design {
        #[arg(long, conflicts_with_all = ["file_key", "node_id"], help = "Figma URL of the text layer")]
        figma: Option<String>,

        #[arg(long, requires = "node_id", help = "Figma file key")]
        file_key: Option<String>,

        #[arg(long, requires = "file_key", help = "Figma node id")]
        node_id: Option<String>,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },

    /// Canonical style of a live element
    Live {
        #[arg(long, help = "Page URL")]
        url: String,

        #[arg(long, help = "CSS selector")]
        selector: String,

        #[arg(
            long,
            default_value = "1440x900",
            help = "Viewport dimensions (WIDTHxHEIGHT)"
        )]
        viewport: Viewport,

        #[arg(
            long,
            default_value = "45",
            help = "Process timeout (seconds) for the Playwright invocation"
        )]
        process_timeout: u64,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Pretty,
}

pub fn parse() -> Cli {
    Cli::parse()
}
