pub mod agent;
pub mod aggregator;
pub mod coordinator;
pub mod progress;
pub mod runner;

pub use agent::{run_agent, AgentExit};
pub use aggregator::run_aggregator;
pub use coordinator::Coordinator;
pub use progress::{ProgressSink, StdoutSink};
pub use runner::{RoleRunner, Simulation};
