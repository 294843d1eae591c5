//! Optimization engine: strategies and orchestrator

#[cfg(windows)]
pub mod native;
pub mod orchestrator;
pub mod strategy;

pub use orchestrator::{Optimizer, ProgressCallback};
pub use strategy::AreaStrategy;

#[cfg(windows)]
pub use native::{build_strategies, TrimOptions};
