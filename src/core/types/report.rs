//! Per-run optimization report types

use super::area::MemoryArea;
use super::stats::Memory;
use crate::core::types::MemoryResult;
use serde::Serialize;
use std::time::Duration;

/// What triggered an optimization run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OptimizationReason {
    Manual,
    Hotkey,
    Scheduled,
    LowMemory,
}

impl OptimizationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptimizationReason::Manual => "manual",
            OptimizationReason::Hotkey => "hotkey",
            OptimizationReason::Scheduled => "scheduled",
            OptimizationReason::LowMemory => "low-memory",
        }
    }
}

/// Outcome of one attempted area, immutable once recorded
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationOutcome {
    pub area: MemoryArea,
    pub duration: Duration,
    pub error: Option<String>,
}

impl OptimizationOutcome {
    pub fn success(area: MemoryArea, duration: Duration) -> Self {
        OptimizationOutcome {
            area,
            duration,
            error: None,
        }
    }

    pub fn failure(area: MemoryArea, duration: Duration, error: impl Into<String>) -> Self {
        OptimizationOutcome {
            area,
            duration,
            error: Some(error.into()),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregated result of one `optimize()` call.
///
/// Outcomes keep execution order; rendering for the log sorts them
/// alphabetically so runs with different masks still line up.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationReport {
    pub outcomes: Vec<OptimizationOutcome>,
    pub duration: Duration,
    pub reason: OptimizationReason,
    pub snapshot: Memory,
}

impl OptimizationReport {
    /// Mask of every area that was attempted in this run
    pub fn attempted(&self) -> MemoryArea {
        self.outcomes
            .iter()
            .fold(MemoryArea::empty(), |mask, outcome| mask | outcome.area)
    }

    pub fn succeeded_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.succeeded_count()
    }

    /// Human-readable rendering for the log, outcomes alphabetized by area
    pub fn to_log_string(&self) -> String {
        let mut sorted: Vec<&OptimizationOutcome> = self.outcomes.iter().collect();
        sorted.sort_by_key(|o| o.area.name());

        let mut lines = Vec::with_capacity(sorted.len() + 1);
        for outcome in sorted {
            match &outcome.error {
                None => lines.push(format!(
                    "{}: ok ({} ms)",
                    outcome.area.name(),
                    outcome.duration.as_millis()
                )),
                Some(error) => lines.push(format!(
                    "{}: failed ({} ms): {}",
                    outcome.area.name(),
                    outcome.duration.as_millis(),
                    error
                )),
            }
        }
        lines.push(format!(
            "total: {} ms, reason: {}",
            self.duration.as_millis(),
            self.reason.as_str()
        ));
        lines.join("\n")
    }

    /// Structured serialization for log consumers
    pub fn to_json(&self) -> MemoryResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::MemoryStats;

    fn snapshot() -> Memory {
        Memory {
            physical: MemoryStats::new(1024, 4096, Some(75)),
            virtual_memory: MemoryStats::new(2048, 8192, None),
        }
    }

    fn report(outcomes: Vec<OptimizationOutcome>) -> OptimizationReport {
        OptimizationReport {
            outcomes,
            duration: Duration::from_millis(120),
            reason: OptimizationReason::Manual,
            snapshot: snapshot(),
        }
    }

    #[test]
    fn test_outcome_success_flag() {
        let ok = OptimizationOutcome::success(MemoryArea::STANDBY_LIST, Duration::ZERO);
        assert!(ok.succeeded());

        let failed =
            OptimizationOutcome::failure(MemoryArea::STANDBY_LIST, Duration::ZERO, "denied");
        assert!(!failed.succeeded());
        assert_eq!(failed.error.as_deref(), Some("denied"));
    }

    #[test]
    fn test_attempted_mask() {
        let r = report(vec![
            OptimizationOutcome::success(MemoryArea::MODIFIED_PAGE_LIST, Duration::ZERO),
            OptimizationOutcome::failure(MemoryArea::SYSTEM_FILE_CACHE, Duration::ZERO, "x"),
        ]);
        assert_eq!(
            r.attempted(),
            MemoryArea::MODIFIED_PAGE_LIST | MemoryArea::SYSTEM_FILE_CACHE
        );
        assert_eq!(r.succeeded_count(), 1);
        assert_eq!(r.failed_count(), 1);
    }

    #[test]
    fn test_log_string_sorted_alphabetically() {
        // Execution order here is ProcessesWorkingSet last; the rendering
        // must still list CombinedPageList first.
        let r = report(vec![
            OptimizationOutcome::success(MemoryArea::STANDBY_LIST, Duration::from_millis(5)),
            OptimizationOutcome::success(MemoryArea::COMBINED_PAGE_LIST, Duration::from_millis(9)),
            OptimizationOutcome::success(
                MemoryArea::PROCESSES_WORKING_SET,
                Duration::from_millis(30),
            ),
        ]);
        let log = r.to_log_string();
        let combined = log.find("CombinedPageList").unwrap();
        let processes = log.find("ProcessesWorkingSet").unwrap();
        let standby = log.find("StandbyList").unwrap();
        assert!(combined < processes && processes < standby);
        assert!(log.ends_with("total: 120 ms, reason: manual"));
    }

    #[test]
    fn test_execution_order_preserved_in_outcomes() {
        let r = report(vec![
            OptimizationOutcome::success(MemoryArea::SYSTEM_WORKING_SET, Duration::ZERO),
            OptimizationOutcome::success(MemoryArea::STANDBY_LIST, Duration::ZERO),
        ]);
        assert_eq!(r.outcomes[0].area, MemoryArea::SYSTEM_WORKING_SET);
        assert_eq!(r.outcomes[1].area, MemoryArea::STANDBY_LIST);
    }

    #[test]
    fn test_json_serialization() {
        let r = report(vec![OptimizationOutcome::failure(
            MemoryArea::STANDBY_LIST,
            Duration::from_millis(3),
            "status 0xC0000061",
        )]);
        let json = r.to_json().unwrap();
        assert!(json.contains("\"StandbyList\""));
        assert!(json.contains("0xC0000061"));
        assert!(json.contains("\"Manual\""));
    }

    #[test]
    fn test_reason_labels() {
        assert_eq!(OptimizationReason::Manual.as_str(), "manual");
        assert_eq!(OptimizationReason::Hotkey.as_str(), "hotkey");
        assert_eq!(OptimizationReason::Scheduled.as_str(), "scheduled");
        assert_eq!(OptimizationReason::LowMemory.as_str(), "low-memory");
    }
}
