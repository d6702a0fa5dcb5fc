//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Browse cursor-paginated JSON APIs as lazy lists
#[derive(Parser, Debug)]
#[command(name = "pagewise")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Access token (falls back to the settings file, then PAGEWISE_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check the token against the API
    Ping,

    /// Stream the items of a paginated endpoint
    List {
        /// Endpoint path relative to the base URL (e.g. "transactions")
        endpoint: String,

        #[command(flatten)]
        paging: PagingArgs,

        #[command(flatten)]
        window: SliceArgs,
    },

    /// Count the items of a paginated endpoint
    Count {
        /// Endpoint path relative to the base URL
        endpoint: String,

        #[command(flatten)]
        paging: PagingArgs,
    },

    /// Run the engine over an in-memory source
    Demo {
        /// Number of items at the source
        #[arg(long, default_value = "50")]
        total: usize,

        /// Maximum items to surface
        #[arg(long)]
        limit: Option<usize>,

        /// Items requested per page
        #[arg(long)]
        page_size: Option<usize>,

        /// Largest page the source will serve
        #[arg(long)]
        max_page_len: Option<usize>,

        #[command(flatten)]
        window: SliceArgs,
    },
}

/// Limit, page size and filters of a listing
#[derive(Args, Debug, Clone, Default)]
pub struct PagingArgs {
    /// Maximum items to fetch
    #[arg(long)]
    pub limit: Option<usize>,

    /// Items requested per page
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Filter as name=value, sent as filter[name]=value (repeatable)
    #[arg(long = "filter", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,
}

/// Optional `[start:stop:step]` window
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct SliceArgs {
    /// First position, negative counts from the end
    #[arg(long, allow_negative_numbers = true)]
    pub start: Option<isize>,

    /// Exclusive end position, negative counts from the end
    #[arg(long, allow_negative_numbers = true)]
    pub stop: Option<isize>,

    /// Distance between positions
    #[arg(long, allow_negative_numbers = true)]
    pub step: Option<isize>,
}

impl SliceArgs {
    /// Check if any bound was given
    pub fn is_set(&self) -> bool {
        self.start.is_some() || self.stop.is_some() || self.step.is_some()
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one document per line)
    Json,
    /// Human-readable output
    Pretty,
}

fn parse_filter(pair: &str) -> std::result::Result<(String, String), String> {
    crate::http::Filters::parse_pair(pair).map_err(|e| e.to_string())
}
