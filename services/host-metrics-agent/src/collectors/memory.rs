use sysinfo::{MemoryRefreshKind, RefreshKind, System};

use super::traits::MetricReader;
use crate::error::ReadError;
use crate::sample::MemoryStats;

/// Reads free and total virtual memory in bytes.
pub struct SysinfoMemoryReader {
    system: System,
}

impl SysinfoMemoryReader {
    pub fn new() -> Self {
        Self {
            system: System::new_with_specifics(
                RefreshKind::new().with_memory(MemoryRefreshKind::new().with_ram()),
            ),
        }
    }
}

impl Default for SysinfoMemoryReader {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricReader for SysinfoMemoryReader {
    type Output = MemoryStats;

    fn name(&self) -> &'static str {
        "memory"
    }

    fn read(&mut self) -> Result<MemoryStats, ReadError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(ReadError::Unsupported);
        }

        self.system.refresh_memory();
        let stats = MemoryStats {
            free_bytes: self.system.free_memory(),
            total_bytes: self.system.total_memory(),
        };

        if stats.total_bytes == 0 {
            return Err(ReadError::Unavailable(
                "failed to get memory info: total memory reported as zero".to_string(),
            ));
        }
        if stats.free_bytes > stats.total_bytes {
            return Err(ReadError::Unavailable(format!(
                "failed to get memory info: free {} exceeds total {}",
                stats.free_bytes, stats.total_bytes
            )));
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_never_exceeds_total() {
        let mut reader = SysinfoMemoryReader::new();
        match reader.read() {
            Ok(stats) => {
                assert!(stats.total_bytes > 0);
                assert!(stats.free_bytes <= stats.total_bytes);
            }
            Err(ReadError::Unsupported) => assert!(!sysinfo::IS_SUPPORTED_SYSTEM),
            Err(ReadError::Unavailable(msg)) => assert!(msg.starts_with("failed to get memory")),
        }
    }
}
