use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("number of cells must be a non-zero perfect square, got {0}")]
    CellGrid(usize),
    #[error("cannot infect {infected} frogs out of {frogs}")]
    TooManyInfected { infected: u32, frogs: u32 },
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
    #[error("population cap must be greater than zero")]
    ZeroCap,
}

/// Immutable simulation parameters, built once at startup and handed to every role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub num_cells: usize,
    pub initial_frogs: u32,
    pub initial_infected: u32,
    pub years: u32,
    /// Living frogs at or above this count abort the run.
    pub max_alive: usize,
    pub print_interval: Duration,
    pub year_interval: Duration,
    /// Upper bound on one coordinator poll when the pool is quiet.
    pub poll_interval: Duration,
    pub shutdown_grace: Duration,
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_cells: 16,
            initial_frogs: 34,
            initial_infected: 4,
            years: 100,
            max_alive: 100,
            print_interval: Duration::from_secs(1),
            year_interval: Duration::from_secs(2),
            poll_interval: Duration::from_millis(10),
            shutdown_grace: Duration::from_secs(1),
            seed: 1,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_cells == 0 || grid_side(self.num_cells).pow(2) != self.num_cells {
            return Err(ConfigError::CellGrid(self.num_cells));
        }
        if self.initial_infected > self.initial_frogs {
            return Err(ConfigError::TooManyInfected {
                infected: self.initial_infected,
                frogs: self.initial_frogs,
            });
        }
        if self.max_alive == 0 {
            return Err(ConfigError::ZeroCap);
        }
        for (name, interval) in [
            ("print interval", self.print_interval),
            ("year interval", self.year_interval),
            ("poll interval", self.poll_interval),
        ] {
            if interval.is_zero() {
                return Err(ConfigError::ZeroInterval(name));
            }
        }
        Ok(())
    }

    pub fn grid_side(&self) -> usize {
        grid_side(self.num_cells)
    }

    /// Living agents are every active worker that is not an aggregator.
    pub fn alive_agents(&self, active_units: usize) -> usize {
        active_units.saturating_sub(self.num_cells)
    }
}

fn grid_side(cells: usize) -> usize {
    let mut side = (cells as f64).sqrt() as usize;
    while side * side > cells {
        side -= 1;
    }
    while (side + 1) * (side + 1) <= cells {
        side += 1;
    }
    side
}
