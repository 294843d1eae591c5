//! Fundamental types shared across the engine

pub mod area;
pub mod error;
pub mod report;
pub mod size;
pub mod stats;

pub use area::MemoryArea;
pub use error::{MemoryError, MemoryResult};
pub use report::{OptimizationOutcome, OptimizationReason, OptimizationReport};
pub use size::{MemorySize, MemoryUnit};
pub use stats::{Memory, MemoryStats};
