//! Memory snapshot building
//!
//! One OS query yields the raw counters; the builder turns them into the
//! immutable `Memory` aggregate. A failed query is a hard error — there is
//! no meaningful partial snapshot, since the percentages cannot be derived
//! from incomplete data.

use crate::core::types::{Memory, MemoryResult, MemoryStats};

/// Raw counters from one memory-status query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryCounters {
    pub total_physical: u64,
    pub available_physical: u64,
    /// OS-reported physical load percentage, used verbatim
    pub memory_load: u32,
    pub total_page_file: u64,
    pub available_page_file: u64,
}

/// Source of raw memory counters; the orchestrator depends on this seam so
/// tests can supply fixed counters.
pub trait SnapshotSource: Send + Sync {
    fn counters(&self) -> MemoryResult<MemoryCounters>;
}

/// Build the snapshot aggregate from raw counters.
///
/// The physical pool takes the OS load percentage as-is; the virtual pool
/// has no OS-reported figure, so its split is derived arithmetically.
pub fn build(counters: &MemoryCounters) -> Memory {
    Memory {
        physical: MemoryStats::new(
            counters.available_physical,
            counters.total_physical,
            Some(counters.memory_load),
        ),
        virtual_memory: MemoryStats::new(
            counters.available_page_file,
            counters.total_page_file,
            None,
        ),
    }
}

/// Snapshot source backed by `GlobalMemoryStatusEx`
#[cfg(windows)]
#[derive(Debug, Default)]
pub struct NativeSnapshotSource;

#[cfg(windows)]
impl SnapshotSource for NativeSnapshotSource {
    fn counters(&self) -> MemoryResult<MemoryCounters> {
        crate::windows::bindings::kernel32::global_memory_status()
    }
}

/// Capture a fresh snapshot from the OS
#[cfg(windows)]
pub fn capture() -> MemoryResult<Memory> {
    Ok(build(&NativeSnapshotSource.counters()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counters() -> MemoryCounters {
        MemoryCounters {
            total_physical: 16 * 1024 * 1024 * 1024,
            available_physical: 4 * 1024 * 1024 * 1024,
            memory_load: 74,
            total_page_file: 24 * 1024 * 1024 * 1024,
            available_page_file: 12 * 1024 * 1024 * 1024,
        }
    }

    #[test]
    fn test_physical_pool_uses_os_load() {
        let memory = build(&counters());
        // 4/16 free is 75% used arithmetically, but the OS said 74
        assert_eq!(memory.physical.used().percentage(), 74.0);
        assert_eq!(memory.physical.free().percentage(), 26.0);
    }

    #[test]
    fn test_virtual_pool_derives_percentage() {
        let memory = build(&counters());
        assert_eq!(memory.virtual_memory.used().percentage(), 50.0);
        assert_eq!(memory.virtual_memory.free().percentage(), 50.0);
    }

    #[test]
    fn test_byte_counts_carried_through() {
        let memory = build(&counters());
        assert_eq!(memory.physical.total().bytes(), 16 * 1024 * 1024 * 1024);
        assert_eq!(memory.physical.used().bytes(), 12 * 1024 * 1024 * 1024);
        assert_eq!(memory.virtual_memory.free().bytes(), 12 * 1024 * 1024 * 1024);
    }

    #[test]
    #[cfg(windows)]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_native_capture() {
        let memory = capture().unwrap();
        assert!(memory.physical.total().bytes() > 0);
    }
}
