use rand::prelude::*;

use super::config::SimConfig;
use crate::core::{ConfigError, Priority, Process, ProcessFactory};

pub const MIN_PRIORITY: Priority = 1;
pub const MAX_PRIORITY: Priority = 5;

/// Seeded source of synthetic processes.
pub struct WorkloadGen {
    rng: StdRng,
    factory: ProcessFactory,
}

impl WorkloadGen {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            factory: ProcessFactory::new(),
        }
    }

    /// The i-th process arrives somewhere in `[0, i * arrival_scale]`, so
    /// later processes spread over a wider window.
    pub fn generate(&mut self, config: &SimConfig) -> Result<Vec<Process>, ConfigError> {
        config.validate()?;

        let mut processes = Vec::with_capacity(config.process_count);
        for i in 0..config.process_count as u64 {
            let burst = self.rng.random_range(1..=config.burst_scale);
            let io_burst = self.rng.random_range(0..=config.io_scale);
            let arrival_time = self
                .rng
                .random_range(0..=i.saturating_mul(config.arrival_scale));
            let priority = self.rng.random_range(MIN_PRIORITY..=MAX_PRIORITY);

            processes.push(self.factory.create(burst, io_burst, arrival_time, priority));
        }

        Ok(processes)
    }
}
