use std::fmt;

use serde::Serialize;
use tracing::{debug, trace};

use super::error::{SimError, SimResult};
use super::state::{Process, ProcessId, Ticks};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Runner {
    Idle,
    Process(ProcessId),
}

impl fmt::Display for Runner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Runner::Idle => f.write_str("idle"),
            Runner::Process(id) => write!(f, "process #{id}"),
        }
    }
}

/// `runner` held the CPU over `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interval {
    pub runner: Runner,
    pub start: Ticks,
    pub end: Ticks,
}

impl Interval {
    pub fn duration(&self) -> Ticks {
        self.end - self.start
    }
}

/// Run-length compressed record of who ran when.
///
/// Intervals are contiguous from t=0 and adjacent intervals never share a
/// runner. `run_for` is the only mutator, so the clock only moves forward.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Timeline {
    intervals: Vec<Interval>,
    now: Ticks,
    context_switch_cost: Ticks,
    context_switches: u64,
}

impl Timeline {
    pub fn new(context_switch_cost: Ticks) -> Self {
        Self {
            context_switch_cost,
            ..Self::default()
        }
    }

    pub fn now(&self) -> Ticks {
        self.now
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn last_runner(&self) -> Option<Runner> {
        self.intervals.last().map(|interval| interval.runner)
    }

    pub fn context_switch_cost(&self) -> Ticks {
        self.context_switch_cost
    }

    /// Number of process-to-different-process handovers.
    pub fn context_switches(&self) -> u64 {
        self.context_switches
    }

    pub fn switch_overhead(&self) -> Ticks {
        self.context_switches * self.context_switch_cost
    }

    pub fn idle_time(&self) -> Ticks {
        self.intervals
            .iter()
            .filter(|interval| interval.runner == Runner::Idle)
            .map(Interval::duration)
            .sum()
    }

    pub fn run_idle(&mut self, duration: Ticks) -> SimResult<()> {
        self.run_for(None, duration).map(|_| ())
    }

    /// Give the CPU to `process` (or to nobody) for `duration` ticks and
    /// return the ticks actually run.
    ///
    /// A duration longer than the remaining burst is clamped. A zero duration
    /// or an exhausted process is a scheduling bug and fails the run.
    pub fn run_for(&mut self, process: Option<&mut Process>, duration: Ticks) -> SimResult<Ticks> {
        let Some(process) = process else {
            if duration == 0 {
                return Err(SimError::ZeroDuration {
                    runner: Runner::Idle,
                    at: self.now,
                });
            }
            self.extend(Runner::Idle, duration);
            return Ok(duration);
        };

        let runner = Runner::Process(process.id);
        if duration == 0 {
            return Err(SimError::ZeroDuration {
                runner,
                at: self.now,
            });
        }
        if process.is_finished() {
            return Err(SimError::ProcessExhausted {
                id: process.id,
                at: self.now,
            });
        }

        let duration = if duration > process.burst_left() {
            debug!(
                pid = process.id,
                requested = duration,
                left = process.burst_left(),
                "clamping run to remaining burst"
            );
            process.burst_left()
        } else {
            duration
        };

        if let Some(Runner::Process(prev)) = self.last_runner() {
            if prev != process.id {
                self.context_switches += 1;
                if self.context_switch_cost > 0 {
                    trace!(from = prev, to = process.id, cost = self.context_switch_cost, "context switch");
                    self.extend(Runner::Idle, self.context_switch_cost);
                }
            }
        }

        self.extend(runner, duration);
        process.consume(duration, self.now);
        Ok(duration)
    }

    fn extend(&mut self, runner: Runner, duration: Ticks) {
        let start = self.now;
        self.now += duration;
        match self.intervals.last_mut() {
            Some(last) if last.runner == runner => last.end = self.now,
            _ => self.intervals.push(Interval {
                runner,
                start,
                end: self.now,
            }),
        }
    }
}
