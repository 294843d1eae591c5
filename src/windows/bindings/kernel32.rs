//! Kernel32.dll bindings: memory counters, file cache size, process handles

use crate::core::types::{MemoryError, MemoryResult};
use crate::snapshot::MemoryCounters;
use std::mem;
use winapi::shared::basetsd::SIZE_T;
use winapi::shared::minwindef::{BOOL, DWORD, FALSE};
use winapi::um::handleapi::CloseHandle;
use winapi::um::processthreadsapi::OpenProcess;
use winapi::um::sysinfoapi::{GlobalMemoryStatusEx, MEMORYSTATUSEX};
use winapi::um::winnt::HANDLE;

// Declared here because winapi does not expose the cache-size controls
#[link(name = "kernel32")]
extern "system" {
    fn GetSystemFileCacheSize(
        minimum_file_cache_size: *mut SIZE_T,
        maximum_file_cache_size: *mut SIZE_T,
        flags: *mut DWORD,
    ) -> BOOL;

    fn SetSystemFileCacheSize(
        minimum_file_cache_size: SIZE_T,
        maximum_file_cache_size: SIZE_T,
        flags: DWORD,
    ) -> BOOL;
}

/// Query total/available physical memory, load percentage, and page file
/// counters in a single call.
pub fn global_memory_status() -> MemoryResult<MemoryCounters> {
    let mut status: MEMORYSTATUSEX = unsafe { mem::zeroed() };
    status.dwLength = mem::size_of::<MEMORYSTATUSEX>() as u32;

    let ok = unsafe { GlobalMemoryStatusEx(&mut status) };
    if ok == FALSE {
        return Err(MemoryError::SnapshotFailed(format!(
            "GlobalMemoryStatusEx: {}",
            MemoryError::last_os_error()
        )));
    }

    Ok(MemoryCounters {
        total_physical: status.ullTotalPhys,
        available_physical: status.ullAvailPhys,
        memory_load: status.dwMemoryLoad,
        total_page_file: status.ullTotalPageFile,
        available_page_file: status.ullAvailPageFile,
    })
}

/// Current system file cache limits
pub fn get_system_file_cache_size() -> MemoryResult<(usize, usize, u32)> {
    let mut min: SIZE_T = 0;
    let mut max: SIZE_T = 0;
    let mut flags: DWORD = 0;

    let ok = unsafe { GetSystemFileCacheSize(&mut min, &mut max, &mut flags) };
    if ok == FALSE {
        return Err(MemoryError::last_os_error());
    }
    Ok((min, max, flags))
}

/// Shrink the system file-cache working set to its minimum by setting both
/// limits to -1 with no flags.
pub fn trim_system_file_cache() -> MemoryResult<()> {
    let ok = unsafe { SetSystemFileCacheSize(SIZE_T::MAX, SIZE_T::MAX, 0) };
    if ok == FALSE {
        return Err(MemoryError::last_os_error());
    }
    Ok(())
}

/// Open a process handle with the given access rights
pub fn open_process(pid: u32, desired_access: u32) -> MemoryResult<HANDLE> {
    let handle = unsafe { OpenProcess(desired_access, FALSE, pid) };
    if handle.is_null() {
        Err(MemoryError::PermissionDenied(format!(
            "OpenProcess failed for pid {}",
            pid
        )))
    } else {
        Ok(handle)
    }
}

/// RAII guard closing a process or token handle on drop
pub struct HandleGuard(pub HANDLE);

impl Drop for HandleGuard {
    fn drop(&mut self) {
        if !self.0.is_null() {
            unsafe {
                CloseHandle(self.0);
            }
        }
    }
}
