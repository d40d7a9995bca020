use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{ConfigError, Ticks};
use crate::scheduler::{Criterion, DEFAULT_QUANTUM};

/// Everything one scheduling run needs besides the processes themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunParams {
    pub criterion: Criterion,
    pub preemptive: bool,
    pub context_switch_cost: Ticks,
    pub quantum: Ticks,
}

impl RunParams {
    pub fn new(criterion: Criterion, preemptive: bool) -> Self {
        Self {
            criterion,
            preemptive,
            context_switch_cost: 0,
            quantum: DEFAULT_QUANTUM,
        }
    }

    pub fn with_context_switch_cost(mut self, cost: Ticks) -> Self {
        self.context_switch_cost = cost;
        self
    }

    pub fn with_quantum(mut self, quantum: Ticks) -> Self {
        self.quantum = quantum;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quantum == 0 {
            return Err(ConfigError::ZeroQuantum);
        }
        Ok(())
    }
}

/// Workload shape plus run parameters, as read from the CLI or a JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SimConfig {
    pub process_count: usize,
    pub burst_scale: Ticks,
    pub io_scale: Ticks,
    pub arrival_scale: Ticks,
    pub context_switch_cost: Ticks,
    pub round_robin_quantum: Ticks,
    pub preemptive: bool,
    pub criterion: Criterion,
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            process_count: 10,
            burst_scale: 20,
            io_scale: 2,
            arrival_scale: 5,
            context_switch_cost: 0,
            round_robin_quantum: DEFAULT_QUANTUM,
            preemptive: false,
            criterion: Criterion::Fcfs,
            seed: 0,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.process_count == 0 {
            return Err(ConfigError::ZeroProcessCount);
        }
        if self.burst_scale == 0 {
            return Err(ConfigError::ZeroBurstScale);
        }
        if self.io_scale == 0 {
            return Err(ConfigError::ZeroIoScale);
        }
        if self.round_robin_quantum == 0 {
            return Err(ConfigError::ZeroQuantum);
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn run_params(&self) -> RunParams {
        RunParams::new(self.criterion, self.preemptive)
            .with_context_switch_cost(self.context_switch_cost)
            .with_quantum(self.round_robin_quantum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_values() {
        let cases = [
            (
                SimConfig {
                    process_count: 0,
                    ..SimConfig::default()
                },
                "process count",
            ),
            (
                SimConfig {
                    burst_scale: 0,
                    ..SimConfig::default()
                },
                "burst scale",
            ),
            (
                SimConfig {
                    io_scale: 0,
                    ..SimConfig::default()
                },
                "I/O scale",
            ),
            (
                SimConfig {
                    round_robin_quantum: 0,
                    ..SimConfig::default()
                },
                "quantum",
            ),
        ];

        for (config, needle) in cases {
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains(needle), "{err}");
        }
    }

    #[test]
    fn test_zero_arrival_scale_and_cost_are_fine() {
        let config = SimConfig {
            arrival_scale: 0,
            context_switch_cost: 0,
            ..SimConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config =
            SimConfig::from_json(r#"{"criterion": "round_robin", "round_robin_quantum": 4}"#)
                .unwrap();
        assert_eq!(config.criterion, Criterion::RoundRobin);
        assert_eq!(config.round_robin_quantum, 4);
        assert_eq!(config.process_count, 10);

        let params = config.run_params();
        assert_eq!(params.quantum, 4);
        assert!(!params.preemptive);
    }

    #[test]
    fn test_from_json_rejects_negative_and_invalid() {
        assert!(matches!(
            SimConfig::from_json(r#"{"context_switch_cost": -1}"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SimConfig::from_json(r#"{"process_count": 0}"#),
            Err(ConfigError::ZeroProcessCount)
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = SimConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_run_params_quantum() {
        assert!(RunParams::new(Criterion::RoundRobin, false).validate().is_ok());
        assert!(matches!(
            RunParams::new(Criterion::RoundRobin, false)
                .with_quantum(0)
                .validate(),
            Err(ConfigError::ZeroQuantum)
        ));
    }
}
