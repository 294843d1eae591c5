//! PSAPI bindings for working set control

use crate::core::types::{MemoryError, MemoryResult};
use winapi::shared::minwindef::FALSE;
use winapi::um::psapi::EmptyWorkingSet;
use winapi::um::winnt::HANDLE;

/// Release the pages of a process's working set back to the OS.
///
/// # Safety
/// The handle must be a valid process handle opened with
/// PROCESS_SET_QUOTA | PROCESS_QUERY_INFORMATION.
pub unsafe fn empty_working_set(handle: HANDLE) -> MemoryResult<()> {
    if EmptyWorkingSet(handle) == FALSE {
        Err(MemoryError::last_os_error())
    } else {
        Ok(())
    }
}
