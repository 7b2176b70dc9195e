//! Workspace API client — authenticated GETs against the two workspace
//! endpoints, with a transport-level concurrency governor.
//!
//! The governor is a FIFO semaphore acquired around every request, so the
//! ceiling holds across both the discovery and export phases (they share
//! one client). Requests beyond the ceiling queue until a slot frees.

pub mod error;
pub mod responses;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Semaphore;

pub use error::ApiError;
use responses::{ExportResponse, ListResponse};

pub const LIST_ENDPOINT: &str = "/api/2.0/workspace/list";
pub const EXPORT_ENDPOINT: &str = "/api/2.0/workspace/export";

/// Ceiling on simultaneous outstanding connections, matching the limit the
/// workspace service tolerates without shedding load.
pub const DEFAULT_MAX_CONNECTIONS: usize = 18;

/// Raw HTTP outcome surfaced by a session: enough for the client to decide
/// success vs failure without knowing the transport.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub reason: String,
    pub body: String,
}

/// Minimal async session used by the workspace client.
///
/// `reqwest::Client` provides the real transport; tests substitute an
/// in-memory session serving a canned workspace tree.
#[async_trait]
pub trait ApiSession: Send + Sync {
    async fn get(
        &self,
        url: &str,
        path: &str,
        headers: &[(&str, &str)],
    ) -> Result<RawResponse, ApiError>;
}

#[async_trait]
impl ApiSession for reqwest::Client {
    async fn get(
        &self,
        url: &str,
        path: &str,
        headers: &[(&str, &str)],
    ) -> Result<RawResponse, ApiError> {
        let mut builder = reqwest::Client::get(self, url).query(&[("path", path)]);
        for &(k, v) in headers {
            builder = builder.header(k, v);
        }
        let resp = builder.send().await?;
        let status = resp.status();
        let reason = status.canonical_reason().unwrap_or_default().to_string();
        let body = resp.text().await?;
        Ok(RawResponse {
            status: status.as_u16(),
            reason,
            body,
        })
    }
}

/// Authenticated client for the workspace listing and export endpoints.
///
/// Base URL and bearer token are injected at construction; the client never
/// reads ambient configuration and never refreshes the token.
pub struct WorkspaceClient {
    session: Box<dyn ApiSession>,
    base_url: String,
    token: String,
    governor: Arc<Semaphore>,
    request_timeout: Option<Duration>,
}

impl WorkspaceClient {
    pub fn new(
        base_url: String,
        token: String,
        max_connections: usize,
        request_timeout: Option<Duration>,
    ) -> Self {
        Self::with_session(
            Box::new(reqwest::Client::new()),
            base_url,
            token,
            max_connections,
            request_timeout,
        )
    }

    pub fn with_session(
        session: Box<dyn ApiSession>,
        base_url: String,
        token: String,
        max_connections: usize,
        request_timeout: Option<Duration>,
    ) -> Self {
        Self {
            session,
            base_url,
            token,
            governor: Arc::new(Semaphore::new(max_connections)),
            request_timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one authenticated GET against `endpoint` for `path`.
    ///
    /// Any non-2xx status is fatal to this call only and carries the full
    /// response body for diagnostics.
    pub async fn call(&self, endpoint: &str, path: &str) -> Result<Value, ApiError> {
        let _permit = self
            .governor
            .acquire()
            .await
            .expect("governor semaphore closed");

        let url = format!("{}{}", self.base_url, endpoint);
        let auth = format!("Bearer {}", self.token);
        let headers = [("Authorization", auth.as_str())];

        let raw = match self.request_timeout {
            Some(limit) => tokio::time::timeout(limit, self.session.get(&url, path, &headers))
                .await
                .map_err(|_| ApiError::Timeout(limit))??,
            None => self.session.get(&url, path, &headers).await?,
        };

        if !(200..300).contains(&raw.status) {
            return Err(ApiError::Request {
                status: raw.status,
                reason: raw.reason,
                body: raw.body,
            });
        }
        Ok(serde_json::from_str(&raw.body)?)
    }

    pub async fn list(&self, path: &str) -> Result<ListResponse, ApiError> {
        let payload = self.call(LIST_ENDPOINT, path).await?;
        Ok(serde_json::from_value(payload)?)
    }

    pub async fn export(&self, path: &str) -> Result<ExportResponse, ApiError> {
        let payload = self.call(EXPORT_ENDPOINT, path).await?;
        Ok(serde_json::from_value(payload)?)
    }
}
