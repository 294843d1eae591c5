//! Integration tests for the optimization orchestrator
//!
//! All strategies here are mocks, so the contract is exercised identically
//! on every platform: effective-mask computation, fault isolation, progress
//! reporting, and the single-flight guarantee.

use memsweep::optimize::AreaStrategy;
use memsweep::snapshot::{MemoryCounters, SnapshotSource};
use memsweep::{
    MemoryArea, MemoryError, MemoryResult, OperatingSystemCapabilities, OptimizationReason,
    Optimizer, WindowsVersion,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};

struct FixedSnapshot;

impl SnapshotSource for FixedSnapshot {
    fn counters(&self) -> MemoryResult<MemoryCounters> {
        Ok(MemoryCounters {
            total_physical: 16 << 30,
            available_physical: 4 << 30,
            memory_load: 75,
            total_page_file: 32 << 30,
            available_page_file: 16 << 30,
        })
    }
}

#[derive(Clone)]
struct MockStrategy {
    area: MemoryArea,
    fail: bool,
    hits: Arc<AtomicUsize>,
}

impl MockStrategy {
    fn new(area: MemoryArea) -> Self {
        MockStrategy {
            area,
            fail: false,
            hits: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn failing(area: MemoryArea) -> Self {
        MockStrategy {
            fail: true,
            ..MockStrategy::new(area)
        }
    }
}

impl AreaStrategy for MockStrategy {
    fn area(&self) -> MemoryArea {
        self.area
    }

    fn execute(&self) -> MemoryResult<()> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(MemoryError::nt_status(
                "NtSetSystemInformation",
                0xC0000061_u32 as i32,
            ))
        } else {
            Ok(())
        }
    }
}

fn full_capabilities() -> OperatingSystemCapabilities {
    OperatingSystemCapabilities::from_version(
        WindowsVersion {
            major: 10,
            minor: 0,
            build: 19045,
        },
        true,
    )
}

fn mock_table() -> (Vec<MockStrategy>, Vec<Box<dyn AreaStrategy>>) {
    let mocks: Vec<MockStrategy> = MemoryArea::all().iter().map(MockStrategy::new).collect();
    let boxed = mocks
        .iter()
        .map(|m| Box::new(m.clone()) as Box<dyn AreaStrategy>)
        .collect();
    (mocks, boxed)
}

#[test]
fn test_report_contains_exactly_the_effective_areas() {
    let (_, strategies) = mock_table();
    let optimizer = Optimizer::new(full_capabilities(), strategies, Box::new(FixedSnapshot));

    let requested = MemoryArea::MODIFIED_PAGE_LIST | MemoryArea::PROCESSES_WORKING_SET;
    let report = optimizer
        .optimize(requested, OptimizationReason::Manual)
        .unwrap();

    assert_eq!(report.attempted(), requested);
    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.failed_count(), 0);
}

#[test]
fn test_supersession_applied_before_execution() {
    let (mocks, strategies) = mock_table();
    let optimizer = Optimizer::new(full_capabilities(), strategies, Box::new(FixedSnapshot));

    let requested = MemoryArea::STANDBY_LIST | MemoryArea::STANDBY_LIST_LOW_PRIORITY;
    let report = optimizer
        .optimize(requested, OptimizationReason::Manual)
        .unwrap();

    assert_eq!(report.attempted(), MemoryArea::STANDBY_LIST_LOW_PRIORITY);
    // The plain standby strategy must never have run
    assert_eq!(mocks[0].hits.load(Ordering::SeqCst), 0);
    assert_eq!(mocks[1].hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unsupported_areas_never_appear_in_the_report() {
    let (_, strategies) = mock_table();
    // XP supports only the process trim and the file cache control
    let caps = OperatingSystemCapabilities::from_version(WindowsVersion::XP, false);
    let optimizer = Optimizer::new(caps, strategies, Box::new(FixedSnapshot));

    let report = optimizer
        .optimize(MemoryArea::all(), OptimizationReason::Manual)
        .unwrap();

    assert_eq!(
        report.attempted(),
        MemoryArea::SYSTEM_FILE_CACHE | MemoryArea::PROCESSES_WORKING_SET
    );
}

#[test]
fn test_one_failing_area_never_stops_the_rest() {
    let mut mocks: Vec<MockStrategy> = MemoryArea::all().iter().map(MockStrategy::new).collect();
    mocks[2] = MockStrategy::failing(MemoryArea::MODIFIED_PAGE_LIST);
    let strategies: Vec<Box<dyn AreaStrategy>> = mocks
        .iter()
        .map(|m| Box::new(m.clone()) as Box<dyn AreaStrategy>)
        .collect();
    let optimizer = Optimizer::new(full_capabilities(), strategies, Box::new(FixedSnapshot));

    let report = optimizer
        .optimize(MemoryArea::all(), OptimizationReason::Scheduled)
        .unwrap();

    // Normalization drops the plain standby purge from all()
    assert_eq!(report.outcomes.len(), 6);
    assert_eq!(report.failed_count(), 1);
    assert_eq!(report.succeeded_count(), 5);

    for (i, mock) in mocks.iter().enumerate() {
        let expected = if i == 0 { 0 } else { 1 };
        assert_eq!(mock.hits.load(Ordering::SeqCst), expected);
    }

    let failed = report.outcomes.iter().find(|o| !o.succeeded()).unwrap();
    assert_eq!(failed.area, MemoryArea::MODIFIED_PAGE_LIST);
    assert!(failed.error.as_ref().unwrap().contains("0xC0000061"));
}

#[test]
fn test_outcomes_follow_fixed_execution_order() {
    let (_, strategies) = mock_table();
    let optimizer = Optimizer::new(full_capabilities(), strategies, Box::new(FixedSnapshot));

    let requested = MemoryArea::PROCESSES_WORKING_SET
        | MemoryArea::STANDBY_LIST_LOW_PRIORITY
        | MemoryArea::SYSTEM_WORKING_SET;
    let report = optimizer
        .optimize(requested, OptimizationReason::Hotkey)
        .unwrap();

    let order: Vec<MemoryArea> = report.outcomes.iter().map(|o| o.area).collect();
    assert_eq!(
        order,
        vec![
            MemoryArea::STANDBY_LIST_LOW_PRIORITY,
            MemoryArea::SYSTEM_WORKING_SET,
            MemoryArea::PROCESSES_WORKING_SET,
        ]
    );
}

#[test]
fn test_progress_fires_once_per_area_and_reaches_100() {
    let (_, strategies) = mock_table();
    let events: Arc<Mutex<Vec<(u8, String)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);

    let optimizer = Optimizer::new(full_capabilities(), strategies, Box::new(FixedSnapshot))
        .with_progress(Box::new(move |percent, label| {
            sink.lock().unwrap().push((percent, label.to_string()));
        }));

    let requested = MemoryArea::STANDBY_LIST
        | MemoryArea::MODIFIED_PAGE_LIST
        | MemoryArea::SYSTEM_FILE_CACHE;
    let report = optimizer
        .optimize(requested, OptimizationReason::Manual)
        .unwrap();

    let events = events.lock().unwrap();
    assert_eq!(events.len(), report.outcomes.len());

    // Monotonically non-decreasing, terminating at exactly 100
    for pair in events.windows(2) {
        assert!(pair[0].0 <= pair[1].0);
    }
    assert_eq!(events.last().unwrap().0, 100);
    assert_eq!(events[0].1, "StandbyList");
}

#[test]
fn test_empty_mask_returns_empty_report_with_valid_snapshot() {
    let (mocks, strategies) = mock_table();
    let optimizer = Optimizer::new(full_capabilities(), strategies, Box::new(FixedSnapshot));

    let report = optimizer
        .optimize(MemoryArea::empty(), OptimizationReason::LowMemory)
        .unwrap();

    assert!(report.outcomes.is_empty());
    assert_eq!(report.snapshot.physical.used().percentage(), 75.0);
    for mock in &mocks {
        assert_eq!(mock.hits.load(Ordering::SeqCst), 0);
    }
}

struct BlockingStrategy {
    entered: Arc<Barrier>,
    release: Arc<Barrier>,
}

impl AreaStrategy for BlockingStrategy {
    fn area(&self) -> MemoryArea {
        MemoryArea::STANDBY_LIST
    }

    fn execute(&self) -> MemoryResult<()> {
        self.entered.wait();
        self.release.wait();
        Ok(())
    }
}

#[test]
fn test_concurrent_optimize_is_rejected_not_interleaved() {
    let entered = Arc::new(Barrier::new(2));
    let release = Arc::new(Barrier::new(2));
    let strategies: Vec<Box<dyn AreaStrategy>> = vec![Box::new(BlockingStrategy {
        entered: Arc::clone(&entered),
        release: Arc::clone(&release),
    })];
    let optimizer = Optimizer::new(full_capabilities(), strategies, Box::new(FixedSnapshot));

    std::thread::scope(|scope| {
        let first = scope.spawn(|| {
            optimizer.optimize(MemoryArea::STANDBY_LIST, OptimizationReason::Manual)
        });

        // Wait until the first run is inside a strategy, then try again
        entered.wait();
        assert!(optimizer.is_busy());
        let second = optimizer.optimize(MemoryArea::STANDBY_LIST, OptimizationReason::Hotkey);
        assert!(matches!(second, Err(MemoryError::OptimizationInProgress)));

        release.wait();
        let report = first.join().unwrap().unwrap();
        assert_eq!(report.outcomes.len(), 1);
    });

    // Flag released; a later run goes through (single strategy already
    // consumed its barriers, so use an empty mask)
    assert!(!optimizer.is_busy());
    let rerun = optimizer.optimize(MemoryArea::empty(), OptimizationReason::Manual);
    assert!(rerun.is_ok());
}
