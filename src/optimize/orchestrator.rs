//! Optimization orchestrator
//!
//! Runs the selected strategies in fixed order, isolates per-area failures,
//! reports progress, and finishes with a fresh memory snapshot. Runs are
//! single-flight: a second call while one is in progress is rejected.

use crate::capability::OperatingSystemCapabilities;
use crate::core::types::{
    MemoryArea, MemoryError, MemoryResult, OptimizationOutcome, OptimizationReason,
    OptimizationReport,
};
use crate::optimize::strategy::AreaStrategy;
use crate::privilege::PrivilegeElevator;
use crate::snapshot::{self, SnapshotSource};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Progress notification: percent complete (0-100) and the label of the
/// area just attempted. Invoked from whatever thread runs the optimization;
/// the UI layer is responsible for marshalling.
pub type ProgressCallback = Box<dyn Fn(u8, &str) + Send + Sync>;

pub struct Optimizer {
    capabilities: OperatingSystemCapabilities,
    elevator: PrivilegeElevator,
    strategies: Vec<Box<dyn AreaStrategy>>,
    snapshot_source: Box<dyn SnapshotSource>,
    progress: Option<ProgressCallback>,
    busy: AtomicBool,
}

impl Optimizer {
    pub fn new(
        capabilities: OperatingSystemCapabilities,
        strategies: Vec<Box<dyn AreaStrategy>>,
        snapshot_source: Box<dyn SnapshotSource>,
    ) -> Self {
        Optimizer {
            capabilities,
            elevator: PrivilegeElevator::new(),
            strategies,
            snapshot_source,
            progress: None,
            busy: AtomicBool::new(false),
        }
    }

    /// Optimizer wired to the real OS: detected capabilities, native
    /// strategy table, `GlobalMemoryStatusEx` snapshots.
    #[cfg(windows)]
    pub fn native(trim: crate::optimize::native::TrimOptions) -> Self {
        let capabilities = crate::capability::detect();
        let strategies = crate::optimize::native::build_strategies(&capabilities, trim);
        Optimizer::new(
            capabilities,
            strategies,
            Box::new(snapshot::NativeSnapshotSource),
        )
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn capabilities(&self) -> &OperatingSystemCapabilities {
        &self.capabilities
    }

    /// True while a run is in progress on some thread
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Run the requested areas and return the per-area report.
    ///
    /// The mask is normalized and intersected with the capability mask;
    /// unsupported areas are dropped silently and never appear in the
    /// report. No area failure aborts the run. The only hard errors are a
    /// concurrent-run rejection and a failed final snapshot.
    pub fn optimize(
        &self,
        requested: MemoryArea,
        reason: OptimizationReason,
    ) -> MemoryResult<OptimizationReport> {
        let _busy = self.acquire()?;

        let effective = requested.normalize() & self.capabilities.supported_areas();
        let dropped = requested.normalize() - effective;
        if !dropped.is_empty() {
            info!(areas = %dropped, "dropping areas unsupported on this OS");
        }

        // Elevation is cheap and idempotent, so it runs once per call even
        // when the effective mask is empty.
        if let Err(error) = self.elevator.ensure_elevated() {
            warn!(%error, "privilege elevation failed; privileged areas may be rejected");
        }

        let scheduled: Vec<&dyn AreaStrategy> = self
            .strategies
            .iter()
            .map(|s| s.as_ref())
            .filter(|s| effective.contains(s.area()))
            .collect();

        let run_start = Instant::now();
        let total = scheduled.len();
        let mut outcomes = Vec::with_capacity(total);

        for (index, strategy) in scheduled.iter().enumerate() {
            let area = strategy.area();
            let area_start = Instant::now();
            let outcome = match strategy.execute() {
                Ok(()) => {
                    let elapsed = area_start.elapsed();
                    info!(
                        area = area.name(),
                        elapsed_ms = elapsed.as_millis() as u64,
                        "area optimized"
                    );
                    OptimizationOutcome::success(area, elapsed)
                }
                Err(error) => {
                    let elapsed = area_start.elapsed();
                    warn!(
                        area = area.name(),
                        elapsed_ms = elapsed.as_millis() as u64,
                        %error,
                        "area failed"
                    );
                    OptimizationOutcome::failure(area, elapsed, error.to_string())
                }
            };
            outcomes.push(outcome);

            if let Some(callback) = &self.progress {
                let percent = (((index + 1) * 100) / total) as u8;
                callback(percent, area.name());
            }
        }

        let snapshot = snapshot::build(&self.snapshot_source.counters()?);
        let report = OptimizationReport {
            outcomes,
            duration: run_start.elapsed(),
            reason,
            snapshot,
        };

        info!(
            reason = reason.as_str(),
            attempted = report.outcomes.len(),
            succeeded = report.succeeded_count(),
            failed = report.failed_count(),
            elapsed_ms = report.duration.as_millis() as u64,
            "optimization run complete"
        );
        info!("\n{}", report.to_log_string());
        if let Ok(json) = report.to_json() {
            debug!(%json, "run report");
        }

        Ok(report)
    }

    fn acquire(&self) -> MemoryResult<BusyGuard<'_>> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(MemoryError::OptimizationInProgress);
        }
        Ok(BusyGuard(&self.busy))
    }
}

/// Releases the busy flag on every exit path, including snapshot failure
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
