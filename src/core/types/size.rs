//! Byte-count value object with derived display unit

use serde::Serialize;

/// Display unit chosen by log-1024 magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MemoryUnit {
    B,
    KB,
    MB,
    GB,
    TB,
}

impl MemoryUnit {
    fn from_exponent(exp: u32) -> Self {
        match exp {
            0 => MemoryUnit::B,
            1 => MemoryUnit::KB,
            2 => MemoryUnit::MB,
            3 => MemoryUnit::GB,
            // Clamped at the largest defined unit
            _ => MemoryUnit::TB,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryUnit::B => "B",
            MemoryUnit::KB => "KB",
            MemoryUnit::MB => "MB",
            MemoryUnit::GB => "GB",
            MemoryUnit::TB => "TB",
        }
    }
}

impl std::fmt::Display for MemoryUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A byte count plus its human-readable rendering.
///
/// The percentage is assigned once by the owning [`MemoryStats`] aggregate
/// and is zero until then.
///
/// [`MemoryStats`]: crate::core::types::MemoryStats
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MemorySize {
    bytes: u64,
    unit: MemoryUnit,
    value: f64,
    percentage: f64,
}

impl MemorySize {
    pub fn new(bytes: u64) -> Self {
        let exp = if bytes < 1024 {
            0
        } else {
            (bytes.ilog2() / 10).min(4)
        };
        let value = if exp == 0 {
            bytes as f64
        } else {
            bytes as f64 / (1u64 << (10 * exp)) as f64
        };
        MemorySize {
            bytes,
            unit: MemoryUnit::from_exponent(exp),
            value,
            percentage: 0.0,
        }
    }

    pub(crate) fn with_percentage(mut self, percentage: f64) -> Self {
        self.percentage = percentage;
        self
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    pub fn unit(&self) -> MemoryUnit {
        self.unit
    }

    /// Fractional value in the derived unit
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn percentage(&self) -> f64 {
        self.percentage
    }
}

impl std::fmt::Display for MemorySize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} {}", self.value, self.unit)
    }
}
