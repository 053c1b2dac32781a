//! The sample record and its wire format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{ReadError, SerializationError};

/// Format of the `timeStamp` field: UTC, second precision, no offset suffix.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Outcome of a single metric read.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading<T> {
    Value(T),
    Error(String),
}

impl<T> Reading<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Reading::Value(v) => Some(v),
            Reading::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Reading::Value(_) => None,
            Reading::Error(e) => Some(e.as_str()),
        }
    }
}

impl<T> From<Result<T, ReadError>> for Reading<T> {
    fn from(result: Result<T, ReadError>) -> Self {
        match result {
            Ok(v) => Reading::Value(v),
            Err(e) => Reading::Error(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryStats {
    pub free_bytes: u64,
    pub total_bytes: u64,
}

/// One snapshot of host CPU and memory state.
///
/// Immutable once assembled. Serializes to the flat six-field record the
/// collector expects, with a zero placeholder wherever a metric failed.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    cpu: Reading<f64>,
    memory: Reading<MemoryStats>,
    timestamp: DateTime<Utc>,
}

impl Sample {
    pub fn new(cpu: Reading<f64>, memory: Reading<MemoryStats>, timestamp: DateTime<Utc>) -> Self {
        Self {
            cpu,
            memory,
            timestamp,
        }
    }

    pub fn cpu(&self) -> &Reading<f64> {
        &self.cpu
    }

    pub fn memory(&self) -> &Reading<MemoryStats> {
        &self.memory
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn to_json(&self) -> Result<Vec<u8>, SerializationError> {
        Ok(serde_json::to_vec(self)?)
    }

    fn to_wire(&self) -> WireSample {
        let (cpu_utilization, cpu_error) = match &self.cpu {
            Reading::Value(v) => (*v, String::new()),
            Reading::Error(e) => (0.0, e.clone()),
        };
        let (free_memory, total_memory, memory_error) = match &self.memory {
            Reading::Value(m) => (m.free_bytes, m.total_bytes, String::new()),
            Reading::Error(e) => (0, 0, e.clone()),
        };

        WireSample {
            cpu_utilization_percentage: cpu_utilization,
            cpu_error,
            free_memory,
            total_memory,
            memory_error,
            timestamp: self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

impl Serialize for Sample {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_wire().serialize(serializer)
    }
}

/// Flat record as it travels over the wire. Field order is significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireSample {
    #[serde(rename = "CPUUtilizationPercentage")]
    pub cpu_utilization_percentage: f64,
    #[serde(rename = "CPUError")]
    pub cpu_error: String,
    #[serde(rename = "FreeMemory")]
    pub free_memory: u64,
    #[serde(rename = "TotalMemory")]
    pub total_memory: u64,
    #[serde(rename = "MemoryError")]
    pub memory_error: String,
    #[serde(rename = "timeStamp")]
    pub timestamp: String,
}
