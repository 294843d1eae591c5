//! Process enumeration and working set trimming
//!
//! Enumerates every visible process with the ToolHelp32 API and empties each
//! working set individually. The trim is embarrassingly parallel and shares
//! no mutable state between handles, so failures stay isolated per process
//! and are only counted, never propagated.

use crate::core::types::{MemoryError, MemoryResult};
use crate::windows::bindings::kernel32::{open_process, HandleGuard};
use crate::windows::bindings::psapi::empty_working_set;
use crate::windows::utils::error_codes::last_error_as_memory_error;
use crate::windows::utils::string_conv::wide_to_string;
use rayon::prelude::*;
use std::mem;
use winapi::shared::minwindef::FALSE;
use winapi::um::handleapi::{CloseHandle, INVALID_HANDLE_VALUE};
use winapi::um::tlhelp32::{
    CreateToolhelp32Snapshot, Process32FirstW, Process32NextW, PROCESSENTRY32W,
    TH32CS_SNAPPROCESS,
};
use winapi::um::winnt::{HANDLE, PROCESS_QUERY_INFORMATION, PROCESS_SET_QUOTA};

/// One row from the process snapshot
#[derive(Debug, Clone)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: String,
}

/// Result of a full working-set trim pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrimSummary {
    pub attempted: usize,
    pub trimmed: usize,
    pub failed: usize,
}

/// Process enumerator over a ToolHelp32 snapshot
pub struct ProcessEnumerator {
    snapshot: HANDLE,
    first_called: bool,
}

impl ProcessEnumerator {
    pub fn new() -> MemoryResult<Self> {
        unsafe {
            let snapshot = CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0);
            if snapshot.is_null() || snapshot == INVALID_HANDLE_VALUE {
                return Err(last_error_as_memory_error("CreateToolhelp32Snapshot"));
            }
            Ok(ProcessEnumerator {
                snapshot,
                first_called: false,
            })
        }
    }

    fn next_process(&mut self) -> Option<ProcessEntry> {
        unsafe {
            let mut entry: PROCESSENTRY32W = mem::zeroed();
            entry.dwSize = mem::size_of::<PROCESSENTRY32W>() as u32;

            let success = if !self.first_called {
                self.first_called = true;
                Process32FirstW(self.snapshot, &mut entry)
            } else {
                Process32NextW(self.snapshot, &mut entry)
            };

            if success == FALSE {
                return None;
            }

            Some(ProcessEntry {
                pid: entry.th32ProcessID,
                name: wide_to_string(&entry.szExeFile),
            })
        }
    }
}

impl Drop for ProcessEnumerator {
    fn drop(&mut self) {
        if !self.snapshot.is_null() && self.snapshot != INVALID_HANDLE_VALUE {
            unsafe {
                let _ = CloseHandle(self.snapshot);
            }
        }
    }
}

impl Iterator for ProcessEnumerator {
    type Item = ProcessEntry;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_process()
    }
}

/// Enumerate all running processes
pub fn enumerate_processes() -> MemoryResult<Vec<ProcessEntry>> {
    Ok(ProcessEnumerator::new()?.collect())
}

fn is_excluded(entry: &ProcessEntry, exclusions: &[String]) -> bool {
    // Idle and System pseudo-processes never accept a working-set trim
    if entry.pid == 0 || entry.pid == 4 {
        return true;
    }
    exclusions
        .iter()
        .any(|name| entry.name.eq_ignore_ascii_case(name))
}

fn trim_one(pid: u32) -> MemoryResult<()> {
    let handle = open_process(pid, PROCESS_SET_QUOTA | PROCESS_QUERY_INFORMATION)?;
    let guard = HandleGuard(handle);
    unsafe { empty_working_set(guard.0) }
}

/// Trim the working set of every visible process, in parallel.
///
/// Processes that cannot be opened (protected, exited, insufficient rights)
/// count as failed and are otherwise ignored.
pub fn trim_all_working_sets(exclusions: &[String], max_threads: usize) -> MemoryResult<TrimSummary> {
    let targets: Vec<ProcessEntry> = enumerate_processes()?
        .into_iter()
        .filter(|entry| !is_excluded(entry, exclusions))
        .collect();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(max_threads.max(1))
        .build()
        .map_err(|e| MemoryError::Unknown(format!("Failed to build trim pool: {}", e)))?;

    let trimmed = pool.install(|| {
        targets
            .par_iter()
            .filter(|entry| trim_one(entry.pid).is_ok())
            .count()
    });

    Ok(TrimSummary {
        attempted: targets.len(),
        trimmed,
        failed: targets.len() - trimmed,
    })
}
