//! NTDLL.dll bindings for the privileged memory-list system calls

use crate::capability::WindowsVersion;
use crate::core::types::{MemoryError, MemoryResult};
use std::mem;
use winapi::shared::minwindef::ULONG;
use winapi::shared::ntdef::{NTSTATUS, PVOID};
use winapi::um::winnt::OSVERSIONINFOW;

// NT Status codes
pub const STATUS_SUCCESS: NTSTATUS = 0x00000000;
pub const STATUS_ACCESS_DENIED: NTSTATUS = 0xC0000022_u32 as i32;
pub const STATUS_PRIVILEGE_NOT_HELD: NTSTATUS = 0xC0000061_u32 as i32;

/// System information classes used by the engine
#[repr(u32)]
pub enum SystemInfoClass {
    SystemFileCacheInformation = 21,
    SystemMemoryListInformation = 80,
    SystemCombinePhysicalMemoryInformation = 130,
}

/// Commands accepted by `SystemMemoryListInformation`
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryListCommand {
    MemoryFlushModifiedList = 3,
    MemoryPurgeStandbyList = 4,
    MemoryPurgeLowPriorityStandbyList = 5,
}

/// MEMORY_COMBINE_INFORMATION_EX — zeroed on input, the kernel walks all
/// combinable ranges itself and reports the combined page count back.
#[repr(C)]
#[derive(Default)]
pub struct MemoryCombineInformationEx {
    pub handle: usize,
    pub pages_combined: usize,
    pub flags: ULONG,
}

/// SYSTEM_FILECACHE_INFORMATION, 32-bit layout (SIZE_T fields are 4 bytes)
#[repr(C)]
pub struct FileCacheInformation32 {
    pub current_size: u32,
    pub peak_size: u32,
    pub page_fault_count: ULONG,
    pub minimum_working_set: u32,
    pub maximum_working_set: u32,
    pub current_size_including_transition_in_pages: u32,
    pub peak_size_including_transition_in_pages: u32,
    pub transition_repurpose_count: ULONG,
    pub flags: ULONG,
}

/// SYSTEM_FILECACHE_INFORMATION, 64-bit layout
#[repr(C)]
pub struct FileCacheInformation64 {
    pub current_size: u64,
    pub peak_size: u64,
    pub page_fault_count: ULONG,
    pub minimum_working_set: u64,
    pub maximum_working_set: u64,
    pub current_size_including_transition_in_pages: u64,
    pub peak_size_including_transition_in_pages: u64,
    pub transition_repurpose_count: ULONG,
    pub flags: ULONG,
}

/// Bitness-tagged cache-info payload, selected once from the capability
/// detector's pointer-width flag rather than by runtime type inspection.
pub enum FileCacheInformation {
    Bits32(FileCacheInformation32),
    Bits64(FileCacheInformation64),
}

impl FileCacheInformation {
    /// Payload requesting the cache working set be trimmed to its minimum:
    /// minimum and maximum working set both set to -1.
    pub fn trim_request(is_64_bit: bool) -> Self {
        if is_64_bit {
            FileCacheInformation::Bits64(FileCacheInformation64 {
                current_size: 0,
                peak_size: 0,
                page_fault_count: 0,
                minimum_working_set: u64::MAX,
                maximum_working_set: u64::MAX,
                current_size_including_transition_in_pages: 0,
                peak_size_including_transition_in_pages: 0,
                transition_repurpose_count: 0,
                flags: 0,
            })
        } else {
            FileCacheInformation::Bits32(FileCacheInformation32 {
                current_size: 0,
                peak_size: 0,
                page_fault_count: 0,
                minimum_working_set: u32::MAX,
                maximum_working_set: u32::MAX,
                current_size_including_transition_in_pages: 0,
                peak_size_including_transition_in_pages: 0,
                transition_repurpose_count: 0,
                flags: 0,
            })
        }
    }
}

#[link(name = "ntdll")]
extern "system" {
    fn NtSetSystemInformation(
        system_info_class: ULONG,
        system_info: PVOID,
        system_info_length: ULONG,
    ) -> NTSTATUS;

    fn RtlGetVersion(version_info: *mut OSVERSIONINFOW) -> NTSTATUS;
}

/// Check if NTSTATUS indicates success
pub fn nt_success(status: NTSTATUS) -> bool {
    status >= 0
}

/// Query the true kernel version. Unlike `GetVersionExW` this is not subject
/// to manifest-based version lying.
pub fn windows_version() -> MemoryResult<WindowsVersion> {
    let mut info: OSVERSIONINFOW = unsafe { mem::zeroed() };
    info.dwOSVersionInfoSize = mem::size_of::<OSVERSIONINFOW>() as u32;

    let status = unsafe { RtlGetVersion(&mut info) };
    if nt_success(status) {
        Ok(WindowsVersion {
            major: info.dwMajorVersion,
            minor: info.dwMinorVersion,
            build: info.dwBuildNumber,
        })
    } else {
        Err(MemoryError::nt_status("RtlGetVersion", status))
    }
}

/// Issue a memory-list command (purge standby list, flush modified list).
/// Requires SeProfileSingleProcessPrivilege.
pub fn set_memory_list_command(command: MemoryListCommand) -> MemoryResult<()> {
    let mut payload = command as i32;
    let status = unsafe {
        NtSetSystemInformation(
            SystemInfoClass::SystemMemoryListInformation as ULONG,
            &mut payload as *mut _ as PVOID,
            mem::size_of::<i32>() as ULONG,
        )
    };
    if nt_success(status) {
        Ok(())
    } else if status == STATUS_PRIVILEGE_NOT_HELD {
        Err(MemoryError::InsufficientPrivileges(format!(
            "memory list command {:?} requires SeProfileSingleProcessPrivilege",
            command
        )))
    } else {
        Err(MemoryError::nt_status("NtSetSystemInformation", status))
    }
}

/// Ask the kernel to combine identical physical pages across all eligible
/// ranges. Returns the number of pages combined.
pub fn combine_physical_memory() -> MemoryResult<usize> {
    let mut info = MemoryCombineInformationEx::default();
    let status = unsafe {
        NtSetSystemInformation(
            SystemInfoClass::SystemCombinePhysicalMemoryInformation as ULONG,
            &mut info as *mut _ as PVOID,
            mem::size_of::<MemoryCombineInformationEx>() as ULONG,
        )
    };
    if nt_success(status) {
        Ok(info.pages_combined)
    } else {
        Err(MemoryError::nt_status("NtSetSystemInformation", status))
    }
}

/// Write a file-cache information payload, forcing a trim of the system
/// cache working set. Requires SeIncreaseQuotaPrivilege.
pub fn set_file_cache_information(info: FileCacheInformation) -> MemoryResult<()> {
    let status = match info {
        FileCacheInformation::Bits32(mut payload) => unsafe {
            NtSetSystemInformation(
                SystemInfoClass::SystemFileCacheInformation as ULONG,
                &mut payload as *mut _ as PVOID,
                mem::size_of::<FileCacheInformation32>() as ULONG,
            )
        },
        FileCacheInformation::Bits64(mut payload) => unsafe {
            NtSetSystemInformation(
                SystemInfoClass::SystemFileCacheInformation as ULONG,
                &mut payload as *mut _ as PVOID,
                mem::size_of::<FileCacheInformation64>() as ULONG,
            )
        },
    };
    if nt_success(status) {
        Ok(())
    } else if status == STATUS_PRIVILEGE_NOT_HELD {
        Err(MemoryError::InsufficientPrivileges(
            "file cache trim requires SeIncreaseQuotaPrivilege".to_string(),
        ))
    } else {
        Err(MemoryError::nt_status("NtSetSystemInformation", status))
    }
}
