use thiserror::Error;

use crate::config::ConfigError;
use crate::lifecycle::{CoordinatorEvent, CoordinatorState};
use crate::types::UnitId;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("worker pool is closed")]
    Closed,
    #[error("unit {0} does not exist")]
    UnknownUnit(UnitId),
    #[error("only the coordinator may poll the pool")]
    NotCoordinator,
}

#[derive(Debug, Error)]
pub enum SimulationError {
    /// Fatal: the population outgrew the pool's capacity.
    #[error("MORE THAN {cap} FROGS! EXITING... ({alive} alive)")]
    PopulationCap { alive: usize, cap: usize },
    #[error("invalid coordinator transition from {from:?} on {event:?}")]
    InvalidTransition {
        from: CoordinatorState,
        event: CoordinatorEvent,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Pool(#[from] PoolError),
}
