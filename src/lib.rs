pub mod core;
pub mod scheduler;
pub mod sim;

pub use crate::core::{ConfigError, Process, ProcessFactory, SimError, Timeline};
pub use crate::scheduler::{Criterion, Perturber};
pub use crate::sim::{RunOutcome, RunParams, RunReport, Sim, SimConfig};
