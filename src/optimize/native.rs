//! Native strategy implementations, one per memory area
//!
//! Each strategy wraps exactly one native operation from the Windows layer.
//! The table is built in the fixed execution order; the orchestrator filters
//! it against the effective mask at run time.

use super::strategy::AreaStrategy;
use crate::capability::OperatingSystemCapabilities;
use crate::core::types::{MemoryArea, MemoryResult};
use crate::process;
use crate::windows::bindings::kernel32;
use crate::windows::bindings::ntdll::{
    self, FileCacheInformation, MemoryListCommand,
};

/// Settings for the per-process working set trim
#[derive(Debug, Clone)]
pub struct TrimOptions {
    /// Process image names never trimmed (case-insensitive)
    pub exclusions: Vec<String>,
    pub max_threads: usize,
}

impl Default for TrimOptions {
    fn default() -> Self {
        TrimOptions {
            exclusions: Vec::new(),
            max_threads: num_cpus::get().min(8),
        }
    }
}

struct PurgeStandbyList;

impl AreaStrategy for PurgeStandbyList {
    fn area(&self) -> MemoryArea {
        MemoryArea::STANDBY_LIST
    }

    fn execute(&self) -> MemoryResult<()> {
        ntdll::set_memory_list_command(MemoryListCommand::MemoryPurgeStandbyList)
    }
}

struct PurgeLowPriorityStandbyList;

impl AreaStrategy for PurgeLowPriorityStandbyList {
    fn area(&self) -> MemoryArea {
        MemoryArea::STANDBY_LIST_LOW_PRIORITY
    }

    fn execute(&self) -> MemoryResult<()> {
        ntdll::set_memory_list_command(MemoryListCommand::MemoryPurgeLowPriorityStandbyList)
    }
}

struct FlushModifiedPageList;

impl AreaStrategy for FlushModifiedPageList {
    fn area(&self) -> MemoryArea {
        MemoryArea::MODIFIED_PAGE_LIST
    }

    fn execute(&self) -> MemoryResult<()> {
        ntdll::set_memory_list_command(MemoryListCommand::MemoryFlushModifiedList)
    }
}

struct CombinePageList;

impl AreaStrategy for CombinePageList {
    fn area(&self) -> MemoryArea {
        MemoryArea::COMBINED_PAGE_LIST
    }

    fn execute(&self) -> MemoryResult<()> {
        // The kernel walks the combinable ranges itself; the combined page
        // count is informational only.
        ntdll::combine_physical_memory().map(|_pages| ())
    }
}

struct TrimSystemWorkingSet;

impl AreaStrategy for TrimSystemWorkingSet {
    fn area(&self) -> MemoryArea {
        MemoryArea::SYSTEM_WORKING_SET
    }

    fn execute(&self) -> MemoryResult<()> {
        kernel32::trim_system_file_cache()
    }
}

/// Cache-info layout is fixed once at table build from the detector's
/// bitness flag.
struct TrimSystemFileCache {
    is_64_bit: bool,
}

impl AreaStrategy for TrimSystemFileCache {
    fn area(&self) -> MemoryArea {
        MemoryArea::SYSTEM_FILE_CACHE
    }

    fn execute(&self) -> MemoryResult<()> {
        let _current = kernel32::get_system_file_cache_size()?;
        ntdll::set_file_cache_information(FileCacheInformation::trim_request(self.is_64_bit))
    }
}

struct TrimProcessesWorkingSet {
    options: TrimOptions,
}

impl AreaStrategy for TrimProcessesWorkingSet {
    fn area(&self) -> MemoryArea {
        MemoryArea::PROCESSES_WORKING_SET
    }

    fn execute(&self) -> MemoryResult<()> {
        process::trim_all_working_sets(&self.options.exclusions, self.options.max_threads)
            .map(|_summary| ())
    }
}

/// Build the full strategy table in execution order
pub fn build_strategies(
    capabilities: &OperatingSystemCapabilities,
    trim: TrimOptions,
) -> Vec<Box<dyn AreaStrategy>> {
    vec![
        Box::new(PurgeStandbyList),
        Box::new(PurgeLowPriorityStandbyList),
        Box::new(FlushModifiedPageList),
        Box::new(CombinePageList),
        Box::new(TrimSystemWorkingSet),
        Box::new(TrimSystemFileCache {
            is_64_bit: capabilities.is_64_bit,
        }),
        Box::new(TrimProcessesWorkingSet { options: trim }),
    ]
}
