use clap::Parser;

use crate::types::*;

#[derive(Parser, Debug)]
#[command(
    name = "nbexport",
    about = "Discover and export every notebook in a Databricks workspace"
)]
pub struct Cli {
    /// Workspace base URL, e.g. https://adb-123.azuredatabricks.net
    #[arg(long = "url", env = "DATABRICKS_URL")]
    pub base_url: String,

    /// Personal access token.
    /// WARNING: passing via --token is visible in process listings.
    /// Prefer the DATABRICKS_TOKEN environment variable instead.
    #[arg(long, env = "DATABRICKS_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Workspace path to start discovery from
    #[arg(short = 'w', long, default_value = "/")]
    pub workspace: String,

    /// Maximum simultaneous API connections
    #[arg(long, default_value_t = crate::api::DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: usize,

    /// Per-request timeout in seconds (no timeout if omitted)
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,

    /// Total attempts per export call (1 = no retries)
    #[arg(long, default_value_t = 1)]
    pub max_attempts: u32,

    /// Base delay between retries in seconds
    #[arg(long, default_value_t = 5)]
    pub retry_delay_secs: u64,

    /// What a single failed export does to the rest of the batch
    #[arg(long, value_enum, default_value = "abort-batch")]
    pub failure_mode: FailureMode,

    /// File receiving every discovered object_id, one per line
    #[arg(long, default_value = "all_notebooks.txt")]
    pub all_ids_file: String,

    /// File receiving each exported object_id as it completes
    #[arg(long, default_value = "finished_notebooks.txt")]
    pub checkpoint_file: String,

    /// Write the exported records as a JSON array to this file
    #[arg(short = 'o', long)]
    pub output: Option<String>,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Disable progress bar
    #[arg(long)]
    pub no_progress_bar: bool,
}
