pub mod batch;
pub mod config;
pub mod driver;
pub mod report;
pub mod workload;

pub use batch::{STANDARD_SUITE, SuiteRun, Variant, run_suite};
pub use config::{RunParams, SimConfig};
pub use driver::{RunOutcome, Sim};
pub use report::{GanttChart, ProcessStats, RunReport};
pub use workload::WorkloadGen;
