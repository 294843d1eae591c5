//! Strategy seam between the orchestrator and the native operations

use crate::core::types::{MemoryArea, MemoryResult};

/// One memory-reclamation operation bound to a single area flag.
///
/// Strategies are pure side-effecting operations: they perform no logging
/// and report failure through the result; the orchestrator records and logs
/// outcomes.
pub trait AreaStrategy: Send + Sync {
    /// The single area flag this strategy serves
    fn area(&self) -> MemoryArea;

    /// Perform the native operation
    fn execute(&self) -> MemoryResult<()>;
}
