//! Windows API layer for the optimization engine
//!
//! Provides safe wrappers around the native calls the strategies use. All
//! unsafe FFI is contained within this module with proper error handling.

pub mod bindings;
pub mod utils;

pub use bindings::{kernel32, ntdll, psapi};
pub use utils::{ErrorCode, string_to_wide, wide_to_string};
