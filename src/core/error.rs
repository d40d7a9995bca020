use std::path::PathBuf;

use thiserror::Error;

use super::state::{ProcessId, Ticks};
use super::timeline::Runner;
use crate::scheduler::Criterion;

pub type SimResult<T> = Result<T, SimError>;

/// Rejected before any simulation state exists.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("process count must be positive")]
    ZeroProcessCount,

    #[error("burst scale must be positive")]
    ZeroBurstScale,

    #[error("I/O scale must be positive")]
    ZeroIoScale,

    #[error("round-robin quantum must be positive")]
    ZeroQuantum,

    #[error("unknown criterion '{0}'. Valid: fcfs, sjf, priority, aging, rr, dynamic")]
    UnknownCriterion(String),

    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("workload contains no processes")]
    EmptyWorkload,

    #[error("process #{id} has a zero CPU burst")]
    ZeroBurst { id: ProcessId },

    #[error("zero-length run requested for {runner} at t={at}")]
    ZeroDuration { runner: Runner, at: Ticks },

    #[error("process #{id} is already exhausted at t={at}")]
    ProcessExhausted { id: ProcessId, at: Ticks },

    #[error("{criterion} stalled at t={at}: {remaining} processes unfinished but no arrivals left")]
    ArrivalsExhausted {
        criterion: Criterion,
        at: Ticks,
        remaining: usize,
    },
}
