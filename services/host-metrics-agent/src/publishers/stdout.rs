use std::io::{self, Write};

use tracing::error;

use super::traits::LocalSink;
use crate::error::SerializationError;
use crate::sample::Sample;

/// Writes each sample as one compact JSON line.
pub struct StdoutEmitter<W = io::Stdout> {
    out: W,
}

impl StdoutEmitter<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> StdoutEmitter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, payload: &[u8]) -> io::Result<()> {
        self.out.write_all(payload)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

impl<W: Write> LocalSink for StdoutEmitter<W> {
    /// A failed write is logged and does not discard the payload.
    fn emit(&mut self, sample: &Sample) -> Result<Vec<u8>, SerializationError> {
        let payload = sample.to_json()?;
        if let Err(e) = self.write_line(&payload) {
            error!(error = %e, "Error writing sample to local output");
        }
        Ok(payload)
    }
}
