use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryPolicy;
use crate::types::{FailureMode, LogLevel};

/// Application configuration, translated from the CLI so the pipelines
/// never touch `clap` types directly.
pub struct Config {
    pub base_url: String,
    pub token: String,
    pub workspace: String,
    pub all_ids_path: PathBuf,
    pub checkpoint_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub request_timeout: Option<Duration>,
    pub retry: RetryPolicy,
    pub max_connections: usize,
    pub failure_mode: FailureMode,
    pub log_level: LogLevel,
    pub no_progress_bar: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("workspace", &self.workspace)
            .field("max_connections", &self.max_connections)
            .field("failure_mode", &self.failure_mode)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_cli(cli: crate::cli::Cli) -> anyhow::Result<Self> {
        if cli.max_attempts == 0 {
            anyhow::bail!("--max-attempts must be at least 1");
        }
        if cli.max_connections == 0 {
            anyhow::bail!("--max-connections must be at least 1");
        }

        // A trailing slash would produce double slashes in endpoint and
        // notebook URLs.
        let base_url = cli.base_url.trim_end_matches('/').to_string();

        Ok(Self {
            base_url,
            token: cli.token,
            workspace: cli.workspace,
            all_ids_path: PathBuf::from(cli.all_ids_file),
            checkpoint_path: PathBuf::from(cli.checkpoint_file),
            output_path: cli.output.map(PathBuf::from),
            request_timeout: cli.request_timeout_secs.map(Duration::from_secs),
            retry: RetryPolicy {
                max_attempts: cli.max_attempts,
                base_delay_secs: cli.retry_delay_secs,
                max_delay_secs: 60,
            },
            max_connections: cli.max_connections,
            failure_mode: cli.failure_mode,
            log_level: cli.log_level,
            no_progress_bar: cli.no_progress_bar,
        })
    }
}
