//! Operating system capability detection
//!
//! Probes the host Windows version and pointer width once per process and
//! maps them to the set of optimization areas the OS can actually perform.
//! Version probing never aborts startup: if it fails, the most conservative
//! capability set is assumed and only the always-available areas remain.

use crate::core::types::MemoryArea;

/// Kernel version triple as reported by `RtlGetVersion`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowsVersion {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
}

impl WindowsVersion {
    pub const XP: WindowsVersion = WindowsVersion {
        major: 5,
        minor: 1,
        build: 0,
    };
    pub const VISTA: WindowsVersion = WindowsVersion {
        major: 6,
        minor: 0,
        build: 0,
    };
    pub const WINDOWS_8: WindowsVersion = WindowsVersion {
        major: 6,
        minor: 2,
        build: 0,
    };

    fn at_least(&self, other: WindowsVersion) -> bool {
        (self.major, self.minor) >= (other.major, other.minor)
    }
}

/// Immutable snapshot of what the host OS supports, derived once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatingSystemCapabilities {
    pub has_combined_page_list: bool,
    pub has_modified_page_list: bool,
    pub has_processes_working_set: bool,
    pub has_standby_list: bool,
    pub has_system_file_cache: bool,
    pub has_system_working_set: bool,
    pub is_64_bit: bool,
}

impl OperatingSystemCapabilities {
    /// Derives the capability set from a kernel version.
    ///
    /// Standby/modified list purging and the system working set control need
    /// Vista; page combining needs Windows 8; per-process trimming and the
    /// file cache control go back to XP.
    pub fn from_version(version: WindowsVersion, is_64_bit: bool) -> Self {
        let vista = version.at_least(WindowsVersion::VISTA);
        let win8 = version.at_least(WindowsVersion::WINDOWS_8);
        let xp = version.at_least(WindowsVersion::XP);

        OperatingSystemCapabilities {
            has_combined_page_list: win8,
            has_modified_page_list: vista,
            has_processes_working_set: xp,
            has_standby_list: vista,
            has_system_file_cache: xp,
            has_system_working_set: vista,
            is_64_bit,
        }
    }

    /// Conservative fallback when version probing fails: no optional
    /// capabilities at all.
    pub fn none(is_64_bit: bool) -> Self {
        OperatingSystemCapabilities {
            has_combined_page_list: false,
            has_modified_page_list: false,
            has_processes_working_set: false,
            has_standby_list: false,
            has_system_file_cache: false,
            has_system_working_set: false,
            is_64_bit,
        }
    }

    /// The areas this OS can perform, as a mask to intersect with requests
    pub fn supported_areas(&self) -> MemoryArea {
        let mut mask = MemoryArea::empty();
        if self.has_standby_list {
            mask |= MemoryArea::STANDBY_LIST | MemoryArea::STANDBY_LIST_LOW_PRIORITY;
        }
        if self.has_modified_page_list {
            mask |= MemoryArea::MODIFIED_PAGE_LIST;
        }
        if self.has_combined_page_list {
            mask |= MemoryArea::COMBINED_PAGE_LIST;
        }
        if self.has_system_working_set {
            mask |= MemoryArea::SYSTEM_WORKING_SET;
        }
        if self.has_system_file_cache {
            mask |= MemoryArea::SYSTEM_FILE_CACHE;
        }
        if self.has_processes_working_set {
            mask |= MemoryArea::PROCESSES_WORKING_SET;
        }
        mask
    }

    pub fn supports(&self, area: MemoryArea) -> bool {
        self.supported_areas().contains(area)
    }
}

const IS_64_BIT: bool = cfg!(target_pointer_width = "64");

/// Detects host capabilities. Called once per process lifetime; the result
/// is a pure function of OS version and bitness.
#[cfg(windows)]
pub fn detect() -> OperatingSystemCapabilities {
    match crate::windows::bindings::ntdll::windows_version() {
        Ok(version) => OperatingSystemCapabilities::from_version(version, IS_64_BIT),
        Err(_) => OperatingSystemCapabilities::none(IS_64_BIT),
    }
}

#[cfg(not(windows))]
pub fn detect() -> OperatingSystemCapabilities {
    OperatingSystemCapabilities::none(IS_64_BIT)
}
