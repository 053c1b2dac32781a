use async_trait::async_trait;

use crate::error::{ReportError, SerializationError};
use crate::sample::Sample;

/// Delivers one JSON payload to a URL.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// POSTs `body` with `Content-Type: application/json` and returns the
    /// response status code. The response body is not consumed.
    async fn post_json(&self, url: &str, body: Vec<u8>) -> Result<u16, ReportError>;
}

/// Local output for a sample, written synchronously before any report.
pub trait LocalSink {
    /// Serializes and writes `sample`, returning the payload for reporting.
    /// Only a serialization failure is returned; write failures are logged.
    fn emit(&mut self, sample: &Sample) -> Result<Vec<u8>, SerializationError>;
}
