pub mod types;
pub mod engine;
pub mod lifecycle;
pub mod model;
pub mod pool;
pub mod config;
pub mod error;

pub use config::{ConfigError, SimConfig};
pub use engine::Simulation;
pub use error::{PoolError, SimulationError};
pub use types::*;
