//! Default configuration values

use crate::core::types::MemoryArea;

pub fn default_areas() -> u32 {
    // Everything except the plain standby purge, which the low-priority
    // variant supersedes when both are on
    (MemoryArea::all() - MemoryArea::STANDBY_LIST).bits()
}

pub fn default_max_threads() -> usize {
    num_cpus::get().min(8)
}

pub fn default_exclusions() -> Vec<String> {
    Vec::new()
}

pub fn default_log_level() -> String {
    "info".to_string()
}
