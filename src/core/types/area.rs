//! Memory area bit flags

use bitflags::bitflags;
use serde::{Serialize, Serializer};

bitflags! {
    /// Selectable memory areas, combinable by bitwise OR.
    ///
    /// Bit order is the execution order: when a run iterates the selected
    /// areas it always does so from `STANDBY_LIST` down to
    /// `PROCESSES_WORKING_SET`, regardless of how the caller built the mask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MemoryArea: u32 {
        const STANDBY_LIST              = 1 << 0;
        const STANDBY_LIST_LOW_PRIORITY = 1 << 1;
        const MODIFIED_PAGE_LIST        = 1 << 2;
        const COMBINED_PAGE_LIST        = 1 << 3;
        const SYSTEM_WORKING_SET        = 1 << 4;
        const SYSTEM_FILE_CACHE         = 1 << 5;
        const PROCESSES_WORKING_SET     = 1 << 6;
    }
}

impl MemoryArea {
    /// Applies the supersession rule: the low-priority standby purge covers
    /// a strict subset of the full purge, so selecting both collapses to the
    /// more specific low-priority variant.
    pub fn normalize(self) -> Self {
        if self.contains(Self::STANDBY_LIST | Self::STANDBY_LIST_LOW_PRIORITY) {
            self - Self::STANDBY_LIST
        } else {
            self
        }
    }

    /// Display name for a single flag.
    ///
    /// Composite masks fall back to `Combined`; callers that need per-flag
    /// names should iterate first.
    pub fn name(self) -> &'static str {
        if self == Self::STANDBY_LIST {
            "StandbyList"
        } else if self == Self::STANDBY_LIST_LOW_PRIORITY {
            "StandbyListLowPriority"
        } else if self == Self::MODIFIED_PAGE_LIST {
            "ModifiedPageList"
        } else if self == Self::COMBINED_PAGE_LIST {
            "CombinedPageList"
        } else if self == Self::SYSTEM_WORKING_SET {
            "SystemWorkingSet"
        } else if self == Self::SYSTEM_FILE_CACHE {
            "SystemFileCache"
        } else if self == Self::PROCESSES_WORKING_SET {
            "ProcessesWorkingSet"
        } else {
            "Combined"
        }
    }

    /// Number of individual flags set in the mask.
    pub fn count(self) -> usize {
        self.bits().count_ones() as usize
    }
}

impl std::fmt::Display for MemoryArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "None");
        }
        let mut first = true;
        for area in self.iter() {
            if !first {
                write!(f, "|")?;
            }
            write!(f, "{}", area.name())?;
            first = false;
        }
        Ok(())
    }
}

impl Serialize for MemoryArea {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}
