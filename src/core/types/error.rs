//! Custom error types for Memsweep

use thiserror::Error;

/// Main error type for optimization and snapshot operations
#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Memory snapshot failed: {0}")]
    SnapshotFailed(String),

    #[error("Insufficient privileges: {0}")]
    InsufficientPrivileges(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("{call} failed with status 0x{status:08X}")]
    NtStatus { call: &'static str, status: i32 },

    #[error("Windows API: {0}")]
    WindowsApi(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("An optimization run is already in progress")]
    OptimizationInProgress,

    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    WindowsApiError(#[from] windows::core::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Result type alias for engine operations
pub type MemoryResult<T> = Result<T, MemoryError>;

impl MemoryError {
    /// Creates a new Windows API error with the last error code
    #[cfg(windows)]
    pub fn last_os_error() -> Self {
        MemoryError::WindowsApiError(windows::core::Error::from_win32())
    }

    /// Creates an error for a rejected native system call
    pub fn nt_status(call: &'static str, status: i32) -> Self {
        MemoryError::NtStatus { call, status }
    }

    /// True when the failure is a privilege problem rather than a hard
    /// API error; callers use this to downgrade log severity.
    pub fn is_privilege_error(&self) -> bool {
        matches!(
            self,
            MemoryError::InsufficientPrivileges(_) | MemoryError::PermissionDenied(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MemoryError::SnapshotFailed("GlobalMemoryStatusEx".to_string());
        assert_eq!(err.to_string(), "Memory snapshot failed: GlobalMemoryStatusEx");

        let err = MemoryError::InsufficientPrivileges("SeProfileSingleProcessPrivilege".to_string());
        assert!(err.to_string().contains("Insufficient privileges"));
    }

    #[test]
    fn test_nt_status_formatting() {
        let err = MemoryError::nt_status("NtSetSystemInformation", 0xC0000061_u32 as i32);
        assert_eq!(
            err.to_string(),
            "NtSetSystemInformation failed with status 0xC0000061"
        );
    }

    #[test]
    fn test_busy_error_display() {
        assert_eq!(
            MemoryError::OptimizationInProgress.to_string(),
            "An optimization run is already in progress"
        );
    }

    #[test]
    fn test_is_privilege_error() {
        assert!(MemoryError::InsufficientPrivileges("x".into()).is_privilege_error());
        assert!(MemoryError::PermissionDenied("x".into()).is_privilege_error());
        assert!(!MemoryError::SnapshotFailed("x".into()).is_privilege_error());
        assert!(!MemoryError::OptimizationInProgress.is_privilege_error());
    }

    #[test]
    fn test_from_implementations() {
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "test");
        let mem_err: MemoryError = io_err.into();
        assert!(matches!(mem_err, MemoryError::IoError(_)));

        let json_err = serde_json::from_str::<String>("invalid json").unwrap_err();
        let mem_err: MemoryError = json_err.into();
        assert!(matches!(mem_err, MemoryError::JsonError(_)));
    }

    #[test]
    fn test_memory_result_type() {
        fn succeeds() -> MemoryResult<u32> {
            Ok(42)
        }

        fn fails() -> MemoryResult<u32> {
            Err(MemoryError::Unknown("test".to_string()))
        }

        assert_eq!(succeeds().unwrap(), 42);
        assert!(fails().is_err());
    }
}
