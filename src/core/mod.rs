//! Core module containing fundamental types for the optimization engine
//!
//! Provides the building blocks used throughout Memsweep: the area mask,
//! memory value objects, run reports, and error types.

pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    Memory, MemoryArea, MemoryError, MemoryResult, MemorySize, MemoryStats, OptimizationOutcome,
    OptimizationReason, OptimizationReport,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
