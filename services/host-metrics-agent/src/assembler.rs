//! Combines reader outputs and a timestamp into one [`Sample`].

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::collectors::MetricReader;
use crate::sample::{MemoryStats, Reading, Sample};

/// Source of the sample timestamp.
pub trait Clock: Send {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub struct SampleAssembler<C, M, K = SystemClock> {
    cpu: C,
    memory: M,
    clock: K,
}

impl<C, M, K> SampleAssembler<C, M, K>
where
    C: MetricReader<Output = f64>,
    M: MetricReader<Output = MemoryStats>,
    K: Clock,
{
    pub fn new(cpu: C, memory: M, clock: K) -> Self {
        Self { cpu, memory, clock }
    }

    /// Reads both metrics and stamps the result. Never fails: a reader error
    /// is logged and carried in the sample.
    pub fn assemble(&mut self) -> Sample {
        let cpu = read_metric(&mut self.cpu);
        let memory = read_metric(&mut self.memory);
        Sample::new(cpu, memory, self.clock.now())
    }
}

fn read_metric<R: MetricReader>(reader: &mut R) -> Reading<R::Output> {
    let reading = Reading::from(reader.read());
    if let Reading::Error(e) = &reading {
        warn!(metric = reader.name(), error = %e, "Error reading metric");
    }
    reading
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReadError;
    use chrono::TimeZone;

    struct StubCpu(Result<f64, ReadError>);

    impl MetricReader for StubCpu {
        type Output = f64;

        fn name(&self) -> &'static str {
            "cpu"
        }

        fn read(&mut self) -> Result<f64, ReadError> {
            self.0.clone()
        }
    }

    struct StubMemory(Result<MemoryStats, ReadError>);

    impl MetricReader for StubMemory {
        type Output = MemoryStats;

        fn name(&self) -> &'static str {
            "memory"
        }

        fn read(&mut self) -> Result<MemoryStats, ReadError> {
            self.0.clone()
        }
    }

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap())
    }

    const MEM: MemoryStats = MemoryStats {
        free_bytes: 2048,
        total_bytes: 8192,
    };

    #[test]
    fn test_assembles_successful_reads() {
        let mut assembler = SampleAssembler::new(StubCpu(Ok(42.5)), StubMemory(Ok(MEM)), clock());
        let sample = assembler.assemble();

        assert_eq!(sample.cpu(), &Reading::Value(42.5));
        assert_eq!(sample.memory(), &Reading::Value(MEM));
        assert_eq!(sample.timestamp(), clock().0);
    }

    #[test]
    fn test_cpu_failure_does_not_touch_memory() {
        let mut assembler = SampleAssembler::new(
            StubCpu(Err(ReadError::Unsupported)),
            StubMemory(Ok(MEM)),
            clock(),
        );
        let sample = assembler.assemble();

        assert_eq!(
            sample.cpu().error(),
            Some(ReadError::Unsupported.to_string().as_str())
        );
        assert_eq!(sample.memory().value(), Some(&MEM));
    }

    #[test]
    fn test_memory_failure_does_not_touch_cpu() {
        let mut assembler = SampleAssembler::new(
            StubCpu(Ok(3.0)),
            StubMemory(Err(ReadError::Unavailable("denied".into()))),
            clock(),
        );
        let sample = assembler.assemble();

        assert_eq!(sample.cpu().value(), Some(&3.0));
        assert_eq!(sample.memory().error(), Some("denied"));
    }

    #[test]
    fn test_both_failures_still_produce_a_sample() {
        let mut assembler = SampleAssembler::new(
            StubCpu(Err(ReadError::Unavailable("a".into()))),
            StubMemory(Err(ReadError::Unavailable("b".into()))),
            clock(),
        );
        let sample = assembler.assemble();

        assert_eq!(sample.cpu().error(), Some("a"));
        assert_eq!(sample.memory().error(), Some("b"));
        assert_eq!(sample.timestamp(), clock().0);
    }
}
