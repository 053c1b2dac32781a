use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn, Instrument};

use super::traits::Transport;
use crate::config::DESTINATION_ENV_KEY;
use crate::error::ReportError;

/// [`Transport`] over `reqwest`, relying on the client's default timeouts.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, body: Vec<u8>) -> Result<u16, ReportError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| ReportError::Transport(e.to_string()))?;
        Ok(response.status().as_u16())
    }
}

enum Target<T> {
    Unconfigured,
    Unavailable(String),
    Destination(String, Arc<T>),
}

/// Forwards serialized samples to the configured destination.
///
/// Each call to [`dispatch`](Self::dispatch) makes at most one send attempt in
/// a detached task. Failures are logged there and never reach the caller.
pub struct RemoteReporter<T> {
    target: Target<T>,
}

impl<T: Transport> RemoteReporter<T> {
    pub fn new(destination: Option<String>, transport: T) -> Self {
        let target = match destination {
            Some(url) => Target::Destination(url, Arc::new(transport)),
            None => Target::Unconfigured,
        };
        Self { target }
    }

    /// A reporter that never sends, e.g. because no transport could be built.
    pub fn disabled(reason: impl Into<String>) -> Self {
        Self {
            target: Target::Unavailable(reason.into()),
        }
    }

    pub fn destination(&self) -> Option<&str> {
        match &self.target {
            Target::Destination(url, _) => Some(url.as_str()),
            _ => None,
        }
    }

    pub fn disabled_reason(&self) -> Option<&str> {
        match &self.target {
            Target::Unavailable(reason) => Some(reason.as_str()),
            _ => None,
        }
    }

    /// Spawns the send and returns its handle, or `None` when there is
    /// nowhere to send to. Must be called from within a tokio runtime.
    pub fn dispatch(&self, payload: Vec<u8>) -> Option<JoinHandle<()>> {
        let (url, transport) = match &self.target {
            Target::Destination(url, transport) => (url.clone(), Arc::clone(transport)),
            Target::Unconfigured => {
                info!(
                    "{} environment variable not set. Sample will not be reported",
                    DESTINATION_ENV_KEY
                );
                return None;
            }
            Target::Unavailable(reason) => {
                warn!(%reason, "Remote reporting unavailable. Sample will not be reported");
                return None;
            }
        };

        let task = async move {
            match report(transport.as_ref(), &url, payload).await {
                Ok(()) => debug!(%url, "Sample reported"),
                Err(e) => error!(%url, error = %e, "Error sending sample to destination"),
            }
        };
        Some(tokio::spawn(task.in_current_span()))
    }
}

/// Gives an in-flight report up to `grace` to finish and returns whether it
/// did. A zero grace returns immediately, leaving the send racing process
/// exit. Giving up is not an error.
pub async fn wait_for_report(report: JoinHandle<()>, grace: Duration) -> bool {
    if grace.is_zero() {
        return report.is_finished();
    }
    match tokio::time::timeout(grace, report).await {
        Ok(_) => true,
        Err(_) => {
            debug!(grace_ms = grace.as_millis() as u64, "Report still in flight at exit");
            false
        }
    }
}

async fn report<T: Transport + ?Sized>(
    transport: &T,
    url: &str,
    payload: Vec<u8>,
) -> Result<(), ReportError> {
    let status = transport.post_json(url, payload).await?;
    if !(200..300).contains(&status) {
        return Err(ReportError::UnexpectedStatus(status));
    }
    Ok(())
}
