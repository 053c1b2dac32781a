//! Sample publishers module
//!
//! This module contains the destinations a serialized sample is written to.
//!
//! - traits.rs: `Transport`, the seam between the reporter and the network,
//!   and `LocalSink` for the local output
//! - stdout.rs: local JSON-line emitter
//! - http.rs: reqwest transport, the fire-and-forget remote reporter and
//!   the bounded exit wait

pub mod http;
pub mod stdout;
pub mod traits;

pub use http::{wait_for_report, HttpTransport, RemoteReporter};
pub use stdout::StdoutEmitter;
pub use traits::{LocalSink, Transport};
