//! Metric collectors module
//!
//! This module contains the reader trait and the OS-backed readers that
//! produce the raw values for a sample.
//!
//! - traits.rs: `MetricReader`, the synchronous probe interface
//! - cpu.rs: aggregate CPU utilization over a short window
//! - memory.rs: free and total virtual memory

pub mod cpu;
pub mod memory;
pub mod traits;

pub use cpu::SysinfoCpuReader;
pub use memory::SysinfoMemoryReader;
pub use traits::MetricReader;
