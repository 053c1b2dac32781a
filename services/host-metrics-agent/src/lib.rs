//! Host metrics agent
//!
//! Samples CPU and memory utilization once, prints the sample as a JSON line
//! and, when a destination is configured, POSTs it there without waiting for
//! the result.

pub mod agent;
pub mod assembler;
pub mod collectors;
pub mod config;
pub mod error;
pub mod logging;
pub mod publishers;
pub mod sample;

pub use agent::{Agent, RunOutcome};
pub use assembler::{Clock, FixedClock, SampleAssembler, SystemClock};
pub use crate::config::AgentConfig;
pub use error::{ConfigLoadError, ReadError, ReportError, SerializationError};
pub use sample::{MemoryStats, Reading, Sample};
