use crate::error::ReadError;

/// A synchronous probe for one OS-level metric.
///
/// Each reader is its own failure domain: an error from one never affects
/// another reader's result.
pub trait MetricReader: Send {
    type Output;

    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    fn read(&mut self) -> Result<Self::Output, ReadError>;
}
