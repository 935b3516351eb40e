use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordinatorState {
    Bootstrapping, // Spawning aggregators and the initial population
    Running,       // Advancing years
    Draining,      // Year limit reached, waiting for agents to retire
    Terminated,    // Aggregators told to stop
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordinatorEvent {
    SpawnsIssued,
    YearLimitReached,
    Extinct,
    Drained,
}

pub struct CoordinatorStateMachine;

impl CoordinatorStateMachine {
    pub fn transition(
        state: &mut CoordinatorState,
        event: CoordinatorEvent,
    ) -> Result<CoordinatorState, SimulationError> {
        let new_state = match (*state, event) {
            (CoordinatorState::Bootstrapping, CoordinatorEvent::SpawnsIssued) => {
                CoordinatorState::Running
            }
            (CoordinatorState::Running, CoordinatorEvent::YearLimitReached) => {
                CoordinatorState::Draining
            }
            (CoordinatorState::Running, CoordinatorEvent::Extinct) => CoordinatorState::Terminated,
            (CoordinatorState::Draining, CoordinatorEvent::Drained) => CoordinatorState::Terminated,
            (from, event) => return Err(SimulationError::InvalidTransition { from, event }),
        };

        *state = new_state;
        Ok(new_state)
    }
}
