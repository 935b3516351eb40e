use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RunId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The year limit was reached and every frog retired.
    Completed,
    /// The population died out before the year limit.
    Extinct,
}

impl Outcome {
    pub fn as_str(&self) -> &str {
        match self {
            Outcome::Completed => "completed",
            Outcome::Extinct => "extinct",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub run_id: RunId,
    pub outcome: Outcome,
    pub years_simulated: u32,
    pub frogs_left: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SimulationReport {
    pub fn new(run_id: RunId, started_at: DateTime<Utc>) -> Self {
        Self {
            run_id,
            outcome: Outcome::Completed,
            years_simulated: 0,
            frogs_left: 0,
            started_at,
            finished_at: started_at,
        }
    }

    pub fn is_extinct(&self) -> bool {
        self.outcome == Outcome::Extinct
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.finished_at
            .signed_duration_since(self.started_at)
            .num_milliseconds() as f64
            / 1000.0
    }

    pub fn summary_line(&self) -> String {
        format!(
            "SIMULATION {} AFTER {} YEARS ({:.1}s). FROGS LEFT: {}",
            self.outcome.as_str().to_uppercase(),
            self.years_simulated,
            self.elapsed_secs(),
            self.frogs_left
        )
    }
}
