//! Process token privilege elevation
//!
//! The reclamation syscalls need two privileges: SeIncreaseQuotaPrivilege
//! (working set and file cache controls) and SeProfileSingleProcessPrivilege
//! (memory list commands). Both are enabled with a single token adjustment;
//! the result is cached process-wide so repeat calls before every run are
//! cheap and idempotent.

use crate::core::types::MemoryResult;

pub const SE_INCREASE_QUOTA: &str = "SeIncreaseQuotaPrivilege";
pub const SE_PROFILE_SINGLE_PROCESS: &str = "SeProfileSingleProcessPrivilege";

/// Enables the privileges the optimization strategies rely on
#[derive(Debug, Default)]
pub struct PrivilegeElevator;

impl PrivilegeElevator {
    pub fn new() -> Self {
        PrivilegeElevator
    }

    /// Enable both required privileges on the current process token.
    ///
    /// Idempotent: a privilege already enabled is not an error, and the
    /// first outcome is cached for the life of the process. Failure is
    /// reported to the caller, which treats it as non-fatal — operations
    /// that do not strictly need elevation may still succeed.
    #[cfg(windows)]
    pub fn ensure_elevated(&self) -> MemoryResult<()> {
        imp::ensure_elevated()
    }

    #[cfg(not(windows))]
    pub fn ensure_elevated(&self) -> MemoryResult<()> {
        Ok(())
    }
}

#[cfg(windows)]
mod imp {
    use super::{SE_INCREASE_QUOTA, SE_PROFILE_SINGLE_PROCESS};
    use crate::core::types::{MemoryError, MemoryResult};
    use crate::windows::utils::error_codes::ErrorCode;
    use crate::windows::utils::string_conv::string_to_wide;
    use std::ptr;
    use std::sync::Mutex;
    use winapi::shared::minwindef::{DWORD, FALSE};
    use winapi::um::handleapi::CloseHandle;
    use winapi::um::processthreadsapi::{GetCurrentProcess, OpenProcessToken};
    use winapi::um::securitybaseapi::AdjustTokenPrivileges;
    use winapi::um::winbase::LookupPrivilegeValueW;
    use winapi::um::winnt::{
        HANDLE, LUID, LUID_AND_ATTRIBUTES, SE_PRIVILEGE_ENABLED, TOKEN_ADJUST_PRIVILEGES,
        TOKEN_QUERY,
    };

    lazy_static::lazy_static! {
        static ref ELEVATION_RESULT: Mutex<Option<bool>> = Mutex::new(None);
    }

    /// TOKEN_PRIVILEGES with room for both privileges, so one
    /// AdjustTokenPrivileges call covers the pair.
    #[repr(C)]
    struct TokenPrivilegePair {
        privilege_count: DWORD,
        privileges: [LUID_AND_ATTRIBUTES; 2],
    }

    pub fn ensure_elevated() -> MemoryResult<()> {
        {
            let cached = ELEVATION_RESULT.lock().unwrap();
            match *cached {
                Some(true) => return Ok(()),
                Some(false) => {
                    return Err(MemoryError::InsufficientPrivileges(
                        "privilege elevation previously failed".to_string(),
                    ))
                }
                None => {}
            }
        }

        let result = unsafe { elevate_pair() };
        *ELEVATION_RESULT.lock().unwrap() = Some(result.is_ok());
        result
    }

    unsafe fn elevate_pair() -> MemoryResult<()> {
        let mut token: HANDLE = ptr::null_mut();
        if OpenProcessToken(
            GetCurrentProcess(),
            TOKEN_ADJUST_PRIVILEGES | TOKEN_QUERY,
            &mut token,
        ) == FALSE
        {
            return Err(MemoryError::PermissionDenied(
                "Failed to open process token for elevation".to_string(),
            ));
        }
        let _guard = TokenGuard(token);

        let mut privileges = TokenPrivilegePair {
            privilege_count: 2,
            privileges: [LUID_AND_ATTRIBUTES {
                Luid: LUID {
                    LowPart: 0,
                    HighPart: 0,
                },
                Attributes: SE_PRIVILEGE_ENABLED,
            }; 2],
        };

        for (slot, name) in [SE_INCREASE_QUOTA, SE_PROFILE_SINGLE_PROCESS]
            .iter()
            .enumerate()
        {
            let wide_name = string_to_wide(name);
            if LookupPrivilegeValueW(
                ptr::null(),
                wide_name.as_ptr(),
                &mut privileges.privileges[slot].Luid,
            ) == FALSE
            {
                return Err(MemoryError::InsufficientPrivileges(format!(
                    "Failed to look up {}",
                    name
                )));
            }
        }

        if AdjustTokenPrivileges(
            token,
            FALSE,
            &mut privileges as *mut _ as *mut _,
            std::mem::size_of::<TokenPrivilegePair>() as DWORD,
            ptr::null_mut(),
            ptr::null_mut(),
        ) == FALSE
        {
            return Err(MemoryError::InsufficientPrivileges(
                "Failed to adjust token privileges".to_string(),
            ));
        }

        // AdjustTokenPrivileges reports success even when some privileges
        // were not assigned; the last error distinguishes that case.
        if ErrorCode::last_error() == ErrorCode::NotAllAssigned {
            return Err(MemoryError::InsufficientPrivileges(
                "Not all requested privileges were assigned to the token".to_string(),
            ));
        }

        Ok(())
    }

    /// Token handle guard for RAII cleanup
    struct TokenGuard(HANDLE);

    impl Drop for TokenGuard {
        fn drop(&mut self) {
            if !self.0.is_null() {
                unsafe {
                    CloseHandle(self.0);
                }
            }
        }
    }

    #[cfg(test)]
    pub fn clear_cache() {
        *ELEVATION_RESULT.lock().unwrap() = None;
    }
}
