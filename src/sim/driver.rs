use serde::Serialize;
use tracing::{debug, info};

use super::config::RunParams;
use crate::{
    core::{Observer, Process, SimError, SimResult, Ticks, Timeline},
    scheduler::{Criterion, Perturber, pick_best, selection_sort},
};

/// A finished run: the timeline plus every process's final state, by id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOutcome {
    pub params: RunParams,
    pub timeline: Timeline,
    pub processes: Vec<Process>,
}

/// One scheduling run over a private copy of the workload.
///
/// Processes are kept sorted by arrival outside the admission window
/// `[start, end)`; inside it selection swaps the chosen process to `start`.
pub struct Sim<P: Perturber> {
    pub timeline: Timeline,
    processes: Vec<Process>,
    params: RunParams,
    perturber: P,
    start: usize,
    end: usize,
    observer: Observer,
}

impl<P: Perturber> Sim<P> {
    pub fn new(processes: &[Process], params: RunParams, perturber: P) -> SimResult<Self> {
        params.validate()?;
        if processes.is_empty() {
            return Err(SimError::EmptyWorkload);
        }
        if let Some(p) = processes.iter().find(|p| p.burst == 0) {
            return Err(SimError::ZeroBurst { id: p.id });
        }

        let mut processes: Vec<Process> = processes.iter().map(Process::clone_for_run).collect();
        selection_sort(&mut processes, Criterion::Fcfs, 0);

        info!(
            criterion = %params.criterion,
            preemptive = params.preemptive,
            processes = processes.len(),
            context_switch_cost = params.context_switch_cost,
            quantum = params.quantum,
            "starting run"
        );

        Ok(Self {
            timeline: Timeline::new(params.context_switch_cost),
            processes,
            params,
            perturber,
            start: 0,
            end: 0,
            observer: Observer::new(),
        })
    }

    pub fn now(&self) -> Ticks {
        self.timeline.now()
    }

    pub fn params(&self) -> &RunParams {
        &self.params
    }

    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn all_processes_finished(&self) -> bool {
        self.start == self.processes.len()
    }

    /// Admit, select, and dispatch once.
    pub fn step(&mut self) -> SimResult<()> {
        self.handle_arrivals();

        let now = self.timeline.now();
        let next_arrival = self.processes.get(self.end).map(|p| p.arrival_time);

        if self.start == self.end {
            let Some(next) = next_arrival else {
                return Err(SimError::ArrivalsExhausted {
                    criterion: self.params.criterion,
                    at: now,
                    remaining: self.processes.len() - self.start,
                });
            };
            self.timeline.run_idle(next.saturating_sub(now))?;
            self.observer
                .observe(&self.timeline, &self.processes, self.start..self.end);
            return Ok(());
        }

        if self.params.criterion == Criterion::DynamicPriority {
            self.perturb_priority();
        }

        self.select_front(now);

        let duration = self.dispatch_len(&self.processes[self.start], now, next_arrival);
        let running = &mut self.processes[self.start];
        let ran = self.timeline.run_for(Some(&mut *running), duration)?;
        debug!(pid = running.id, at = now, ran, left = running.burst_left(), "dispatched");

        if running.is_finished() {
            if running.io_burst != 0 {
                info!(pid = running.id, io_burst = running.io_burst, "random I/O performing");
            }
            self.start += 1;
        }

        self.observer
            .observe(&self.timeline, &self.processes, self.start..self.end);
        Ok(())
    }

    pub fn run(mut self) -> SimResult<RunOutcome> {
        while !self.all_processes_finished() {
            self.step()?;
        }

        info!(
            criterion = %self.params.criterion,
            preemptive = self.params.preemptive,
            makespan = self.timeline.now(),
            intervals = self.timeline.intervals().len(),
            steps = self.observer.steps(),
            "run complete"
        );

        let mut processes = self.processes;
        processes.sort_by_key(|p| p.id);
        Ok(RunOutcome {
            params: self.params,
            timeline: self.timeline,
            processes,
        })
    }

    // Processes past `end` are sorted by arrival, so arrivals are contiguous
    fn handle_arrivals(&mut self) {
        let now = self.timeline.now();
        let admitted = self.processes[self.end..]
            .iter()
            .take_while(|p| p.arrival_time <= now)
            .count();
        self.end += admitted;
    }

    fn perturb_priority(&mut self) {
        let window_len = self.end - self.start;
        let index = self.start + self.perturber.pick(window_len).min(window_len - 1);
        let process = &mut self.processes[index];
        let old = process.priority();
        let new = self.perturber.reprioritize(old);
        process.set_priority(new);
        debug!(pid = process.id, old, new, "priority perturbed");
    }

    // Moves the most urgent admitted process to `start`
    fn select_front(&mut self, now: Ticks) {
        let criterion = self.params.criterion;
        let window = self.start..self.end;
        let Some(mut best) = pick_best(&self.processes[window.clone()], criterion, now) else {
            return;
        };

        if criterion == Criterion::RoundRobin && self.processes[self.start + best].cycle_used() {
            debug!(at = now, "round robin cycle exhausted, resetting");
            for process in &mut self.processes[window.clone()] {
                process.reset_cycle();
            }
            best = pick_best(&self.processes[window], criterion, now).unwrap_or(best);
        }

        self.processes.swap(self.start, self.start + best);
    }

    fn dispatch_len(&self, process: &Process, now: Ticks, next_arrival: Option<Ticks>) -> Ticks {
        let left = process.burst_left();
        let criterion = self.params.criterion;

        if criterion == Criterion::RoundRobin {
            left.min(self.params.quantum)
        } else if self.params.preemptive && criterion.is_ticking() {
            1
        } else if self.params.preemptive {
            match next_arrival {
                Some(next) => left.min(next.saturating_sub(now)).max(1),
                None => left,
            }
        } else {
            left
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Priority, ProcessFactory, Runner};
    use crate::scheduler::{FrozenPerturber, SeededPerturber};
    use pretty_assertions::assert_eq;

    fn runners(outcome: &RunOutcome) -> Vec<(Runner, Ticks, Ticks)> {
        outcome
            .timeline
            .intervals()
            .iter()
            .map(|iv| (iv.runner, iv.start, iv.end))
            .collect()
    }

    fn run(processes: &[Process], params: RunParams) -> RunOutcome {
        Sim::new(processes, params, FrozenPerturber)
            .unwrap()
            .run()
            .unwrap()
    }

    #[test]
    fn test_sjf_non_preemptive_order() {
        let mut factory = ProcessFactory::new();
        let processes = vec![
            factory.create(5, 0, 0, 1),
            factory.create(2, 0, 0, 1),
            factory.create(8, 0, 0, 1),
        ];

        let outcome = run(&processes, RunParams::new(Criterion::Sjf, false));
        assert_eq!(
            runners(&outcome),
            vec![
                (Runner::Process(2), 0, 2),
                (Runner::Process(1), 2, 7),
                (Runner::Process(3), 7, 15),
            ]
        );
    }

    #[test]
    fn test_fcfs_idles_until_first_arrival() {
        let mut factory = ProcessFactory::new();
        let processes = vec![factory.create(3, 0, 10, 1), factory.create(2, 0, 4, 1)];

        let outcome = run(&processes, RunParams::new(Criterion::Fcfs, false));
        assert_eq!(
            runners(&outcome),
            vec![
                (Runner::Idle, 0, 4),
                (Runner::Process(2), 4, 6),
                (Runner::Idle, 6, 10),
                (Runner::Process(1), 10, 13),
            ]
        );
        assert_eq!(outcome.processes[0].finished_time(), Some(13));
        assert_eq!(outcome.processes[1].finished_time(), Some(6));
    }

    #[test]
    fn test_preemptive_sjf_yields_to_shorter_arrival() {
        let mut factory = ProcessFactory::new();
        let processes = vec![factory.create(8, 0, 0, 1), factory.create(2, 0, 3, 1)];

        let outcome = run(&processes, RunParams::new(Criterion::Sjf, true));
        assert_eq!(
            runners(&outcome),
            vec![
                (Runner::Process(1), 0, 3),
                (Runner::Process(2), 3, 5),
                (Runner::Process(1), 5, 10),
            ]
        );
    }

    #[test]
    fn test_non_preemptive_priority_ignores_urgent_arrival() {
        let mut factory = ProcessFactory::new();
        let processes = vec![factory.create(6, 0, 0, 5), factory.create(2, 0, 1, 1)];

        let outcome = run(&processes, RunParams::new(Criterion::Priority, false));
        assert_eq!(
            runners(&outcome),
            vec![(Runner::Process(1), 0, 6), (Runner::Process(2), 6, 8)]
        );

        let outcome = run(&processes, RunParams::new(Criterion::Priority, true));
        assert_eq!(
            runners(&outcome),
            vec![
                (Runner::Process(1), 0, 1),
                (Runner::Process(2), 1, 3),
                (Runner::Process(1), 3, 8),
            ]
        );
    }

    #[test]
    fn test_round_robin_alternates() {
        let mut factory = ProcessFactory::new();
        let processes = vec![factory.create(5, 0, 0, 1), factory.create(5, 0, 0, 1)];

        let outcome = run(
            &processes,
            RunParams::new(Criterion::RoundRobin, false).with_quantum(2),
        );
        assert_eq!(
            runners(&outcome),
            vec![
                (Runner::Process(1), 0, 2),
                (Runner::Process(2), 2, 4),
                (Runner::Process(1), 4, 6),
                (Runner::Process(2), 6, 8),
                (Runner::Process(1), 8, 9),
                (Runner::Process(2), 9, 10),
            ]
        );
    }

    #[test]
    fn test_aging_preemptive_ticks_every_unit() {
        let mut factory = ProcessFactory::new();
        let processes = vec![factory.create(3, 0, 0, 1), factory.create(3, 0, 1, 1)];

        let mut sim = Sim::new(
            &processes,
            RunParams::new(Criterion::Aging, true),
            FrozenPerturber,
        )
        .unwrap();
        sim.step().unwrap();
        assert_eq!(sim.now(), 1);
        sim.step().unwrap();
        assert_eq!(sim.now(), 2);

        let outcome = sim.run().unwrap();
        assert_eq!(outcome.timeline.now(), 6);
        assert!(outcome.processes.iter().all(Process::is_finished));
    }

    #[test]
    fn test_context_switch_cost_between_processes() {
        let mut factory = ProcessFactory::new();
        let processes = vec![factory.create(2, 0, 0, 1), factory.create(2, 0, 0, 1)];

        let outcome = run(
            &processes,
            RunParams::new(Criterion::Fcfs, false).with_context_switch_cost(3),
        );
        assert_eq!(
            runners(&outcome),
            vec![
                (Runner::Process(1), 0, 2),
                (Runner::Idle, 2, 5),
                (Runner::Process(2), 5, 7),
            ]
        );
    }

    #[test]
    fn test_dynamic_priority_uses_perturber() {
        struct Demote;
        impl Perturber for Demote {
            fn pick(&mut self, _window_len: usize) -> usize {
                0
            }
            fn reprioritize(&mut self, current: Priority) -> Priority {
                current + 10
            }
        }

        let mut factory = ProcessFactory::new();
        let processes = vec![factory.create(2, 0, 0, 1), factory.create(2, 0, 0, 2)];

        // front process is demoted before selection, so #2 runs first
        let outcome = Sim::new(
            &processes,
            RunParams::new(Criterion::DynamicPriority, false),
            Demote,
        )
        .unwrap()
        .run()
        .unwrap();

        assert_eq!(
            runners(&outcome),
            vec![(Runner::Process(2), 0, 2), (Runner::Process(1), 2, 4)]
        );
        assert_eq!(outcome.processes[0].given_priority, 1);
        // demoted once while waiting and once more when it ran alone
        assert_eq!(outcome.processes[0].priority(), 21);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let mut factory = ProcessFactory::new();
        let processes = vec![factory.create(4, 0, 0, 3), factory.create(1, 0, 0, 1)];

        let _ = run(&processes, RunParams::new(Criterion::Sjf, true));
        assert!(processes.iter().all(|p| p.burst_left() == p.burst));
        assert!(processes.iter().all(|p| p.finished_time().is_none()));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            Sim::new(&[], RunParams::new(Criterion::Fcfs, false), FrozenPerturber),
            Err(SimError::EmptyWorkload)
        ));

        let mut factory = ProcessFactory::new();
        let processes = vec![factory.create(1, 0, 0, 1), factory.create(0, 0, 0, 1)];
        assert!(matches!(
            Sim::new(&processes, RunParams::new(Criterion::Fcfs, false), FrozenPerturber),
            Err(SimError::ZeroBurst { id: 2 })
        ));

        assert!(matches!(
            Sim::new(
                &processes[..1],
                RunParams::new(Criterion::RoundRobin, false).with_quantum(0),
                SeededPerturber::new(0),
            ),
            Err(SimError::Config(_))
        ));
    }
}
