pub mod error;
pub mod observer;
pub mod state;
pub mod timeline;

pub use error::{ConfigError, SimError, SimResult};
pub use observer::Observer;
pub use state::{Priority, Process, ProcessFactory, ProcessId, Ticks};
pub use timeline::{Interval, Runner, Timeline};
