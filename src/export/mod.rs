//! Export pipeline — one joined fan-out over the discovered notebook set.
//!
//! Every notebook's export is launched concurrently (the client's governor
//! bounds actual in-flight requests) and the pipeline suspends until all of
//! them settle. Records land in the shared output collection in completion
//! order, and each success appends its object_id to the checkpoint log.

pub mod checkpoint;
pub mod error;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use futures_util::future;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::api::WorkspaceClient;
use crate::discover::{DiscoveredNotebook, NotebookIndex};
use crate::retry::{self, RetryPolicy};
use crate::types::FailureMode;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use checkpoint::CheckpointLog;
pub use error::ExportError;

/// One fully materialized notebook.
#[derive(Debug, Clone, Serialize)]
pub struct ExportedNotebook {
    pub path: String,
    pub object_id: u64,
    pub language: Option<String>,
    pub url: String,
    pub content: String,
}

/// Browser URL for a notebook. Pure string construction.
pub fn notebook_url(base_url: &str, object_id: u64) -> String {
    format!("{base_url}/#notebook/{object_id}")
}

/// Subset of application config consumed by the export pipeline.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub checkpoint_path: PathBuf,
    pub failure_mode: FailureMode,
    pub retry: RetryPolicy,
    pub no_progress_bar: bool,
}

/// Outcome of a full export pass.
#[derive(Debug)]
pub struct ExportOutcome {
    /// The final record collection, in completion order.
    pub notebooks: Vec<ExportedNotebook>,
    /// Notebooks whose export response carried no content.
    pub skipped: usize,
    /// Failures kept out of the collection (skip-and-record mode only).
    pub failed: usize,
}

/// Hidden when the user asked for it or stdout is not a TTY, so piped
/// output stays clean.
fn create_progress_bar(no_progress_bar: bool, total: u64) -> ProgressBar {
    if no_progress_bar || !std::io::stdout().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .expect("valid template")
        .progress_chars("=> "),
    );
    pb
}

/// Export every notebook in `index`.
///
/// Truncates the checkpoint log first (fresh-run semantics), then fans out.
/// In `AbortBatch` mode the first error abandons the batch; in
/// `SkipAndRecord` mode failures are logged and counted.
pub async fn export_all(
    client: &WorkspaceClient,
    index: &NotebookIndex,
    config: &ExportConfig,
) -> Result<ExportOutcome, ExportError> {
    let notebooks = index.notebooks();
    let checkpoint = CheckpointLog::create(&config.checkpoint_path).await?;
    let results = Mutex::new(Vec::with_capacity(notebooks.len()));
    let skipped = AtomicUsize::new(0);
    let pb = create_progress_bar(config.no_progress_bar, notebooks.len() as u64);

    let started = Instant::now();
    let mut failed = 0usize;

    match config.failure_mode {
        FailureMode::AbortBatch => {
            future::try_join_all(notebooks.iter().map(|notebook| {
                let (checkpoint, results, skipped, pb) = (&checkpoint, &results, &skipped, &pb);
                async move {
                    let outcome =
                        export_one(client, notebook, config, checkpoint, results, skipped).await;
                    pb.inc(1);
                    outcome
                }
            }))
            .await?;
        }
        FailureMode::SkipAndRecord => {
            let outcomes = future::join_all(notebooks.iter().map(|notebook| {
                let (checkpoint, results, skipped, pb) = (&checkpoint, &results, &skipped, &pb);
                async move {
                    let outcome =
                        export_one(client, notebook, config, checkpoint, results, skipped).await;
                    if let Err(e) = &outcome {
                        pb.suspend(|| warn!("Export failed for {}: {}", notebook.path, e));
                    }
                    pb.inc(1);
                    outcome
                }
            }))
            .await;
            failed = outcomes.iter().filter(|o| o.is_err()).count();
        }
    }

    pb.finish_and_clear();
    let exported = results.into_inner().expect("results mutex poisoned");
    info!(
        "Exported {} notebooks in {:.2}s ({} skipped, {} failed)",
        exported.len(),
        started.elapsed().as_secs_f64(),
        skipped.load(Ordering::Relaxed),
        failed
    );

    Ok(ExportOutcome {
        notebooks: exported,
        skipped: skipped.load(Ordering::Relaxed),
        failed,
    })
}

async fn export_one(
    client: &WorkspaceClient,
    notebook: &DiscoveredNotebook,
    config: &ExportConfig,
    checkpoint: &CheckpointLog,
    results: &Mutex<Vec<ExportedNotebook>>,
    skipped: &AtomicUsize,
) -> Result<(), ExportError> {
    let response = retry::with_backoff(
        &config.retry,
        |e: &crate::api::ApiError| e.is_retryable(),
        || client.export(&notebook.path),
    )
    .await?;

    // Some entries legitimately export empty (permission-restricted or
    // malformed notebooks): no record, no checkpoint line, not an error.
    let Some(content) = response.content else {
        debug!(path = %notebook.path, "No content in export response, skipping");
        skipped.fetch_add(1, Ordering::Relaxed);
        return Ok(());
    };

    let bytes = BASE64
        .decode(content.as_bytes())
        .map_err(|source| ExportError::Decode {
            path: notebook.path.clone(),
            source,
        })?;
    let text = String::from_utf8(bytes).map_err(|source| ExportError::Utf8 {
        path: notebook.path.clone(),
        source,
    })?;

    let record = ExportedNotebook {
        path: notebook.path.clone(),
        object_id: notebook.object_id,
        language: notebook.language.clone(),
        url: notebook_url(client.base_url(), notebook.object_id),
        content: text,
    };
    results
        .lock()
        .expect("results mutex poisoned")
        .push(record);
    checkpoint.record(notebook.object_id).await?;
    Ok(())
}
