use std::ops::Range;

use super::state::Process;
use super::timeline::{Runner, Timeline};

/// Checks timeline and admission-window invariants after every engine step.
/// All checks are debug assertions.
#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
}

impl Observer {
    pub fn new() -> Self {
        Self { step: 0 }
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, timeline: &Timeline, processes: &[Process], window: Range<usize>) {
        self.step += 1;
        if !cfg!(debug_assertions) {
            return;
        }

        let intervals = timeline.intervals();
        if let Some(first) = intervals.first() {
            debug_assert_eq!(first.start, 0, "timeline must start at t=0");
        }
        for interval in intervals {
            debug_assert!(
                interval.start < interval.end,
                "empty interval {interval:?} at step {}",
                self.step
            );
        }
        for pair in intervals.windows(2) {
            debug_assert_eq!(
                pair[0].end, pair[1].start,
                "gap between {:?} and {:?}",
                pair[0], pair[1]
            );
            debug_assert_ne!(
                pair[0].runner, pair[1].runner,
                "unmerged neighbours {:?} and {:?}",
                pair[0], pair[1]
            );
        }
        debug_assert_eq!(
            intervals.last().map_or(0, |interval| interval.end),
            timeline.now(),
            "timeline clock out of sync with last interval"
        );

        for (index, process) in processes.iter().enumerate() {
            let pid = process.id;
            debug_assert!(
                process.burst_left() <= process.burst,
                "process {pid} gained burst"
            );
            debug_assert_eq!(
                process.finished_time().is_some(),
                process.is_finished(),
                "process {pid} finished_time out of sync with remaining burst"
            );
            if let Some(finished) = process.finished_time() {
                debug_assert!(
                    finished >= process.arrival_time + process.burst,
                    "process {pid} finished at {finished} before arrival + burst"
                );
            }

            if index < window.start {
                debug_assert!(process.is_finished(), "retired process {pid} unfinished");
            } else if index < window.end {
                debug_assert!(!process.is_finished(), "finished process {pid} still admitted");
            } else {
                debug_assert_eq!(
                    process.burst_left(),
                    process.burst,
                    "unadmitted process {pid} already ran"
                );
            }
        }

        let busy: u64 = intervals
            .iter()
            .filter(|interval| interval.runner != Runner::Idle)
            .map(|interval| interval.duration())
            .sum();
        let consumed: u64 = processes.iter().map(|p| p.burst - p.burst_left()).sum();
        debug_assert_eq!(busy, consumed, "timeline busy time != consumed burst");
    }
}
