use std::fmt;

use average::{Estimate, Mean};
use rustc_hash::FxHashMap;
use serde::Serialize;

use super::driver::RunOutcome;
use crate::core::{Priority, ProcessId, Runner, Ticks, Timeline};
use crate::scheduler::Criterion;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessStats {
    pub id: ProcessId,
    pub burst: Ticks,
    pub io_burst: Ticks,
    pub arrival_time: Ticks,
    pub given_priority: Priority,
    pub final_priority: Priority,
    pub first_run: Ticks,
    pub finished_time: Ticks,
    pub turnaround: Ticks,
    pub waiting: Ticks,
    pub response: Ticks,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub label: String,
    pub criterion: Criterion,
    pub preemptive: bool,
    pub makespan: Ticks,
    pub busy_time: Ticks,
    pub idle_time: Ticks,
    pub context_switches: u64,
    pub switch_overhead: Ticks,
    pub mean_turnaround: f64,
    pub mean_waiting: f64,
    pub mean_response: f64,
    pub processes: Vec<ProcessStats>,
}

impl RunReport {
    pub fn from_outcome(label: impl Into<String>, outcome: &RunOutcome) -> Self {
        let timeline = &outcome.timeline;

        // First dispatch per process
        let mut first_run: FxHashMap<ProcessId, Ticks> = FxHashMap::default();
        for interval in timeline.intervals() {
            if let Runner::Process(id) = interval.runner {
                first_run.entry(id).or_insert(interval.start);
            }
        }

        let processes: Vec<ProcessStats> = outcome
            .processes
            .iter()
            .map(|p| {
                let finished_time = p.finished_time().unwrap_or(timeline.now());
                let first_run = first_run.get(&p.id).copied().unwrap_or(finished_time);
                let turnaround = finished_time.saturating_sub(p.arrival_time);
                ProcessStats {
                    id: p.id,
                    burst: p.burst,
                    io_burst: p.io_burst,
                    arrival_time: p.arrival_time,
                    given_priority: p.given_priority,
                    final_priority: p.priority(),
                    first_run,
                    finished_time,
                    turnaround,
                    waiting: turnaround.saturating_sub(p.burst),
                    response: first_run.saturating_sub(p.arrival_time),
                }
            })
            .collect();

        let idle_time = timeline.idle_time();
        Self {
            label: label.into(),
            criterion: outcome.params.criterion,
            preemptive: outcome.params.preemptive,
            makespan: timeline.now(),
            busy_time: timeline.now() - idle_time,
            idle_time,
            context_switches: timeline.context_switches(),
            switch_overhead: timeline.switch_overhead(),
            mean_turnaround: avg(processes.iter().map(|p| p.turnaround as f64)),
            mean_waiting: avg(processes.iter().map(|p| p.waiting as f64)),
            mean_response: avg(processes.iter().map(|p| p.response as f64)),
            processes,
        }
    }

    pub fn utilization(&self) -> f64 {
        if self.makespan == 0 {
            return 0.0;
        }
        self.busy_time as f64 / self.makespan as f64
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({}, preemptive={})", self.label, self.criterion, self.preemptive)?;
        for p in &self.processes {
            writeln!(
                f,
                "  [#{:03}: CPU {:03}, I/O {:03}, arrival {:03}, prio {:03}, turnaround {:03}, waiting {:03}]",
                p.id, p.burst, p.io_burst, p.arrival_time, p.given_priority, p.turnaround, p.waiting
            )?;
        }
        write!(
            f,
            "  average turnaround {:.2}, average waiting {:.2}, average response {:.2}, utilization {:.1}%",
            self.mean_turnaround,
            self.mean_waiting,
            self.mean_response,
            self.utilization() * 100.0
        )
    }
}

/// Vertical text chart of a timeline.
pub struct GanttChart<'a>(pub &'a Timeline);

impl fmt::Display for GanttChart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let intervals = self.0.intervals();
        let Some(last) = intervals.last() else {
            return writeln!(f, "(empty timeline)");
        };

        for interval in intervals {
            writeln!(f, "{:4} +-----------+", interval.start)?;
            match interval.runner {
                Runner::Idle => writeln!(f, "     | PID = --- |")?,
                Runner::Process(id) => writeln!(f, "     | PID = {id:03} |")?,
            }
        }
        writeln!(f, "{:4} +-----------+", last.end)
    }
}

fn avg(iter: impl Iterator<Item = f64>) -> f64 {
    iter.collect::<Mean>().estimate()
}
