//! One sampling-and-reporting cycle.

use tokio::task::JoinHandle;
use tracing::error;

use crate::assembler::{Clock, SampleAssembler};
use crate::collectors::MetricReader;
use crate::publishers::{LocalSink, RemoteReporter, Transport};
use crate::sample::{MemoryStats, Sample};

/// What happened during [`Agent::run_once`].
#[derive(Debug)]
pub struct RunOutcome {
    pub sample: Sample,
    /// Whether the sample was serialized and handed to the local sink.
    pub emitted: bool,
    /// The detached report, if one was started. Dropping it does not cancel
    /// the send.
    pub report: Option<JoinHandle<()>>,
}

pub struct Agent<C, M, K, E, T> {
    assembler: SampleAssembler<C, M, K>,
    sink: E,
    reporter: RemoteReporter<T>,
}

impl<C, M, K, E, T> Agent<C, M, K, E, T>
where
    C: MetricReader<Output = f64>,
    M: MetricReader<Output = MemoryStats>,
    K: Clock,
    E: LocalSink,
    T: Transport,
{
    pub fn new(assembler: SampleAssembler<C, M, K>, sink: E, reporter: RemoteReporter<T>) -> Self {
        Self {
            assembler,
            sink,
            reporter,
        }
    }

    /// Samples, emits locally, then forks the remote report. Never fails and
    /// never waits for the report.
    pub fn run_once(&mut self) -> RunOutcome {
        let sample = self.assembler.assemble();

        let payload = match self.sink.emit(&sample) {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "Error serializing sample");
                return RunOutcome {
                    sample,
                    emitted: false,
                    report: None,
                };
            }
        };

        RunOutcome {
            sample,
            emitted: true,
            report: self.reporter.dispatch(payload),
        }
    }

    pub fn into_parts(self) -> (SampleAssembler<C, M, K>, E, RemoteReporter<T>) {
        (self.assembler, self.sink, self.reporter)
    }
}
