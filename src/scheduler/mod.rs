pub mod perturb;
pub mod policy;
pub mod select;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{ConfigError, Ticks};
pub use perturb::{FrozenPerturber, Perturber, SeededPerturber};
pub use policy::{is_more_urgent, urgency};
pub use select::{pick_best, selection_sort};

/// Base of the aging score; must lie in (0, 1).
pub const AGING_FACTOR: f64 = 0.75;

pub const DEFAULT_QUANTUM: Ticks = 10;

/// Ordering key used to pick the next process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Fcfs,
    Sjf,
    Priority,
    Aging,
    RoundRobin,
    DynamicPriority,
}

impl Criterion {
    pub const ALL: [Criterion; 6] = [
        Criterion::Fcfs,
        Criterion::Sjf,
        Criterion::Priority,
        Criterion::Aging,
        Criterion::RoundRobin,
        Criterion::DynamicPriority,
    ];

    /// Ticking criteria change their ranking as time passes, so preemptive
    /// runs re-evaluate them every tick.
    pub const fn is_ticking(self) -> bool {
        matches!(self, Criterion::Aging)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Criterion::Fcfs => "fcfs",
            Criterion::Sjf => "sjf",
            Criterion::Priority => "priority",
            Criterion::Aging => "aging",
            Criterion::RoundRobin => "round_robin",
            Criterion::DynamicPriority => "dynamic_priority",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Criterion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fcfs" | "fifo" => Ok(Criterion::Fcfs),
            "sjf" => Ok(Criterion::Sjf),
            "priority" | "prio" => Ok(Criterion::Priority),
            "aging" => Ok(Criterion::Aging),
            "round_robin" | "roundrobin" | "rr" => Ok(Criterion::RoundRobin),
            "dynamic_priority" | "dynamic" => Ok(Criterion::DynamicPriority),
            _ => Err(ConfigError::UnknownCriterion(s.to_string())),
        }
    }
}
