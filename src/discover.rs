//! Workspace tree walker — recursively enumerates every notebook under a
//! root path. Sibling directories fan out concurrently and each call awaits
//! its whole subtree, so a completed `discover` has seen everything.
//!
//! Any listing failure fails the entire discovery: a silently missing
//! subtree would under-report notebooks, which is worse than failing loudly.

use std::collections::HashSet;
use std::sync::Mutex;

use futures_util::future::{self, BoxFuture};
use tracing::debug;

use crate::api::responses::{ObjectType, WorkspaceObject};
use crate::api::{ApiError, WorkspaceClient};

/// The discovery result set: four parallel sequences, one slot per notebook,
/// guarded by a single mutex so each append is an atomic 4-tuple push even
/// under true parallel writers.
#[derive(Debug, Default)]
pub struct NotebookIndex {
    inner: Mutex<IndexInner>,
}

#[derive(Debug, Default)]
struct IndexInner {
    object_types: Vec<ObjectType>,
    paths: Vec<String>,
    object_ids: Vec<u64>,
    languages: Vec<Option<String>>,
    seen: HashSet<u64>,
}

/// One discovered notebook, snapshotted out of the index for export.
#[derive(Debug, Clone)]
pub struct DiscoveredNotebook {
    pub path: String,
    pub object_id: u64,
    pub language: Option<String>,
}

impl NotebookIndex {
    /// Append one discovered notebook. Duplicate object_ids are dropped so
    /// the index never double-counts a document.
    pub fn push(&self, object: &WorkspaceObject) {
        let mut inner = self.inner.lock().expect("index mutex poisoned");
        if !inner.seen.insert(object.object_id) {
            debug!(path = %object.path, id = object.object_id, "Duplicate object_id, ignoring");
            return;
        }
        inner.object_types.push(object.object_type);
        inner.paths.push(object.path.clone());
        inner.object_ids.push(object.object_id);
        inner.languages.push(object.language.clone());
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("index mutex poisoned").paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every discovered object_id, in insertion order.
    pub fn object_ids(&self) -> Vec<u64> {
        self.inner
            .lock()
            .expect("index mutex poisoned")
            .object_ids
            .clone()
    }

    /// Zip the parallel sequences into one struct per notebook.
    pub fn notebooks(&self) -> Vec<DiscoveredNotebook> {
        let inner = self.inner.lock().expect("index mutex poisoned");
        inner
            .paths
            .iter()
            .zip(&inner.object_ids)
            .zip(&inner.languages)
            .map(|((path, &object_id), language)| DiscoveredNotebook {
                path: path.clone(),
                object_id,
                language: language.clone(),
            })
            .collect()
    }
}

/// Walk the workspace tree rooted at `root` and return the index of every
/// notebook found. Fails whole if any listing call fails.
pub async fn discover(client: &WorkspaceClient, root: &str) -> Result<NotebookIndex, ApiError> {
    let index = NotebookIndex::default();
    walk(client, root.to_string(), &index).await?;
    Ok(index)
}

fn walk<'a>(
    client: &'a WorkspaceClient,
    path: String,
    index: &'a NotebookIndex,
) -> BoxFuture<'a, Result<(), ApiError>> {
    Box::pin(async move {
        let listing = client.list(&path).await?;

        let mut notebooks = Vec::new();
        let mut subdirs = Vec::new();
        for object in listing.objects {
            match object.object_type {
                ObjectType::Notebook => notebooks.push(object),
                ObjectType::Directory => subdirs.push(object.path),
                ObjectType::Other => {}
            }
        }

        // Joined fan-out: siblings recurse concurrently, and this call does
        // not return until the entire subtree below it has been walked.
        future::try_join_all(subdirs.into_iter().map(|sub| walk(client, sub, index))).await?;

        for object in &notebooks {
            index.push(object);
        }
        Ok(())
    })
}
