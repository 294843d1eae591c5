//! Per-pool memory statistics and the full snapshot aggregate

use super::size::MemorySize;
use serde::Serialize;

/// Free/Total/Used byte counts for one memory pool.
///
/// Used is |Total - Free|. The free and used percentages always sum to 100:
/// when the OS reports a load percentage it is taken verbatim (the OS may
/// round differently than a naive used/total ratio), otherwise the split is
/// derived arithmetically.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MemoryStats {
    free: MemorySize,
    total: MemorySize,
    used: MemorySize,
}

impl MemoryStats {
    pub fn new(free_bytes: u64, total_bytes: u64, os_load_percent: Option<u32>) -> Self {
        let used_bytes = total_bytes.abs_diff(free_bytes);
        let used_percent = match os_load_percent {
            Some(load) => f64::from(load.min(100)),
            None if total_bytes > 0 => 100.0 - (free_bytes as f64 / total_bytes as f64) * 100.0,
            None => 0.0,
        };
        let free_percent = 100.0 - used_percent;

        MemoryStats {
            free: MemorySize::new(free_bytes).with_percentage(free_percent),
            total: MemorySize::new(total_bytes),
            used: MemorySize::new(used_bytes).with_percentage(used_percent),
        }
    }

    pub fn free(&self) -> &MemorySize {
        &self.free
    }

    pub fn total(&self) -> &MemorySize {
        &self.total
    }

    pub fn used(&self) -> &MemorySize {
        &self.used
    }
}

/// Physical and virtual pool statistics, built fresh per snapshot request
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Memory {
    pub physical: MemoryStats,
    pub virtual_memory: MemoryStats,
}

impl std::fmt::Display for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "physical {} free of {} ({:.0}% used), virtual {} free of {} ({:.0}% used)",
            self.physical.free(),
            self.physical.total(),
            self.physical.used().percentage(),
            self.virtual_memory.free(),
            self.virtual_memory.total(),
            self.virtual_memory.used().percentage(),
        )
    }
}
