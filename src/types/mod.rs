pub mod cell;
pub mod frog;
pub mod message;
pub mod report;
pub mod window;

pub use cell::{Cell, CellAction, CellStats};
pub use frog::Frog;
pub use message::{CellCommand, Envelope, HopReply, Message, Tag};
pub use report::{Outcome, SimulationReport};
pub use window::RollingWindow;

use serde::{Deserialize, Serialize};
use std::fmt;

pub type RunId = uuid::Uuid;

/// Rank of an execution unit inside the worker pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub usize);

impl UnitId {
    pub const COORDINATOR: UnitId = UnitId(0);

    /// Aggregators occupy the first `num_cells` worker ranks, in cell order.
    pub fn for_cell(index: usize) -> Self {
        UnitId(index + 1)
    }

    pub fn rank(&self) -> usize {
        self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationStatus {
    Inactive,
    Worker,
    Master,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Coordinator,
    Aggregator { cell: usize },
    Agent,
    Idle,
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Coordinator => "Coordinator",
            Role::Aggregator { .. } => "Aggregator",
            Role::Agent => "Agent",
            Role::Idle => "Idle",
        }
    }
}

/// Who activated a unit: the coordinator (root agents, aggregators) or a
/// parent agent giving birth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    Coordinator,
    Parent(UnitId),
}

impl Origin {
    pub fn from_spawner(spawner: UnitId) -> Self {
        if spawner == UnitId::COORDINATOR {
            Origin::Coordinator
        } else {
            Origin::Parent(spawner)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
