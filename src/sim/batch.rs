use std::borrow::Cow;

use tracing::info;

use super::config::{RunParams, SimConfig};
use super::driver::{RunOutcome, Sim};
use super::report::RunReport;
use crate::core::{Process, SimResult};
use crate::scheduler::{Criterion, SeededPerturber};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub label: Cow<'static, str>,
    pub criterion: Criterion,
    pub preemptive: bool,
}

const fn variant(label: &'static str, criterion: Criterion, preemptive: bool) -> Variant {
    Variant {
        label: Cow::Borrowed(label),
        criterion,
        preemptive,
    }
}

/// The comparison set run by `--all`.
pub const STANDARD_SUITE: [Variant; 8] = [
    variant("FCFS", Criterion::Fcfs, false),
    variant("SJF", Criterion::Sjf, false),
    variant("SJF-preemptive", Criterion::Sjf, true),
    variant("Priority", Criterion::Priority, false),
    variant("Priority-preemptive", Criterion::Priority, true),
    variant("Aging-preemptive", Criterion::Aging, true),
    variant("RoundRobin", Criterion::RoundRobin, false),
    variant("DynamicPriority-preemptive", Criterion::DynamicPriority, true),
];

impl Variant {
    /// Single-criterion variant labelled like `sjf` or `sjf-preemptive`.
    pub fn single(criterion: Criterion, preemptive: bool) -> Self {
        let label = if preemptive {
            format!("{criterion}-preemptive")
        } else {
            criterion.to_string()
        };
        Self {
            label: Cow::Owned(label),
            criterion,
            preemptive,
        }
    }

    pub fn params(&self, config: &SimConfig) -> RunParams {
        RunParams::new(self.criterion, self.preemptive)
            .with_context_switch_cost(config.context_switch_cost)
            .with_quantum(config.round_robin_quantum)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuiteRun {
    pub outcome: RunOutcome,
    pub report: RunReport,
}

/// Run every variant in order, each on its own copy of `processes` and with a
/// perturber seeded from `config.seed`.
pub fn run_suite(
    processes: &[Process],
    config: &SimConfig,
    variants: &[Variant],
) -> SimResult<Vec<SuiteRun>> {
    config.validate()?;

    let mut runs = Vec::with_capacity(variants.len());
    for variant in variants {
        let sim = Sim::new(
            processes,
            variant.params(config),
            SeededPerturber::new(config.seed),
        )?;
        let outcome = sim.run()?;
        let report = RunReport::from_outcome(variant.label.clone(), &outcome);
        info!(
            variant = %variant.label,
            mean_turnaround = report.mean_turnaround,
            mean_waiting = report.mean_waiting,
            "variant finished"
        );
        runs.push(SuiteRun { outcome, report });
    }
    Ok(runs)
}
