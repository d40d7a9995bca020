use serde::Serialize;

pub type ProcessId = u32;
pub type Ticks = u64;
// Smaller value means more urgent
pub type Priority = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Process {
    pub id: ProcessId,
    pub burst: Ticks,
    pub io_burst: Ticks,
    pub arrival_time: Ticks,
    pub given_priority: Priority,

    // Runtime state; only the timeline and the engine touch these
    priority: Priority,
    burst_left: Ticks,
    finished_time: Option<Ticks>,
    cycle_used: bool,
}

impl Process {
    fn new(
        id: ProcessId,
        burst: Ticks,
        io_burst: Ticks,
        arrival_time: Ticks,
        priority: Priority,
    ) -> Self {
        Self {
            id,
            burst,
            io_burst,
            arrival_time,
            given_priority: priority,
            priority,
            burst_left: burst,
            finished_time: None,
            cycle_used: false,
        }
    }

    /// Copy with the same identity and inputs but fresh runtime state, so a
    /// run never observes another run's mutations.
    pub fn clone_for_run(&self) -> Self {
        Self::new(
            self.id,
            self.burst,
            self.io_burst,
            self.arrival_time,
            self.given_priority,
        )
    }

    /// Effective priority. Differs from `given_priority` only after dynamic
    /// perturbation.
    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn burst_left(&self) -> Ticks {
        self.burst_left
    }

    pub fn finished_time(&self) -> Option<Ticks> {
        self.finished_time
    }

    pub fn cycle_used(&self) -> bool {
        self.cycle_used
    }

    pub fn is_finished(&self) -> bool {
        self.burst_left == 0
    }

    // Caller guarantees 0 < duration <= burst_left. Returns true if this call
    // exhausted the burst.
    pub(crate) fn consume(&mut self, duration: Ticks, now: Ticks) -> bool {
        debug_assert!(
            duration > 0 && duration <= self.burst_left,
            "Process {} asked to consume {duration} with {} left",
            self.id,
            self.burst_left
        );

        self.burst_left -= duration;
        self.cycle_used = true;
        if self.burst_left == 0 {
            debug_assert!(
                self.finished_time.is_none(),
                "Process {} finished twice",
                self.id
            );
            self.finished_time = Some(now);
            return true;
        }
        false
    }

    pub(crate) fn reset_cycle(&mut self) {
        self.cycle_used = false;
    }

    pub(crate) fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }
}

/// Hands out process ids in creation order, starting at 1.
#[derive(Debug)]
pub struct ProcessFactory {
    // Increment upon process creation
    next_id: ProcessId,
}

impl Default for ProcessFactory {
    fn default() -> Self {
        Self { next_id: 1 }
    }
}

impl ProcessFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(
        &mut self,
        burst: Ticks,
        io_burst: Ticks,
        arrival_time: Ticks,
        priority: Priority,
    ) -> Process {
        let id = self.next_id;
        self.next_id += 1;
        Process::new(id, burst, io_burst, arrival_time, priority)
    }
}
