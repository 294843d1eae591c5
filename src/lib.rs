//! Memsweep library for Windows memory optimization

pub mod capability;
pub mod config;
pub mod core;
pub mod optimize;
pub mod privilege;
#[cfg(windows)]
pub mod process;
pub mod snapshot;
#[cfg(windows)]
pub mod windows;

// Re-export main types from core module
pub use crate::core::types::{
    Memory, MemoryArea, MemoryError, MemoryResult, MemorySize, MemoryStats, MemoryUnit,
    OptimizationOutcome, OptimizationReason, OptimizationReport,
};

pub use capability::{detect, OperatingSystemCapabilities, WindowsVersion};
pub use optimize::{AreaStrategy, Optimizer};
pub use privilege::PrivilegeElevator;
pub use snapshot::{MemoryCounters, SnapshotSource};
