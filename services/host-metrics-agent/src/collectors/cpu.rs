use std::time::Duration;

use sysinfo::{CpuRefreshKind, RefreshKind, System, MINIMUM_CPU_UPDATE_INTERVAL};
use tracing::debug;

use super::traits::MetricReader;
use crate::error::ReadError;

/// Shortest window sysinfo will compute a usage delta over. Refreshes closer
/// together than this are skipped, leaving the since-boot average in place.
pub const DEFAULT_CPU_WINDOW: Duration = MINIMUM_CPU_UPDATE_INTERVAL;

/// Samples aggregate CPU utilization across all cores.
pub struct SysinfoCpuReader {
    system: System,
    window: Duration,
}

impl SysinfoCpuReader {
    /// `window` is raised to [`DEFAULT_CPU_WINDOW`] if shorter.
    pub fn new(window: Duration) -> Self {
        Self {
            system: System::new_with_specifics(
                RefreshKind::new().with_cpu(CpuRefreshKind::new().with_cpu_usage()),
            ),
            window: window.max(DEFAULT_CPU_WINDOW),
        }
    }

    /// The window actually waited between the two refreshes.
    pub fn window(&self) -> Duration {
        self.window
    }
}

impl Default for SysinfoCpuReader {
    fn default() -> Self {
        Self::new(DEFAULT_CPU_WINDOW)
    }
}

impl MetricReader for SysinfoCpuReader {
    type Output = f64;

    fn name(&self) -> &'static str {
        "cpu"
    }

    fn read(&mut self) -> Result<f64, ReadError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(ReadError::Unsupported);
        }

        // Usage is a delta between two refreshes at least `window` apart. If
        // the first is skipped as too soon after construction, the baseline is
        // the construction-time reading, which is older still.
        self.system.refresh_cpu_usage();
        std::thread::sleep(self.window);
        self.system.refresh_cpu_usage();

        if self.system.cpus().is_empty() {
            return Err(ReadError::Unavailable(
                "failed to get CPU utilization: no CPUs reported".to_string(),
            ));
        }

        let usage = self.system.global_cpu_usage();
        if !usage.is_finite() {
            return Err(ReadError::Unavailable(format!(
                "failed to get CPU utilization: invalid reading {usage}"
            )));
        }

        debug!(
            cpus = self.system.cpus().len(),
            window_ms = self.window.as_millis() as u64,
            usage,
            "sampled cpu"
        );
        Ok(f64::from(usage).clamp(0.0, 100.0))
    }
}
