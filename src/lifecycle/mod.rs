pub mod dispatch;
pub mod state_machine;

pub use dispatch::assign_role;
pub use state_machine::{CoordinatorEvent, CoordinatorState, CoordinatorStateMachine};
