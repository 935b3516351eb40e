pub mod mailbox;
pub mod tasks;
pub mod traits;

#[cfg(test)]
pub(crate) mod mock;

pub use mailbox::Mailbox;
pub use tasks::{PoolEvent, PoolOptions, TaskPool, UnitBody, UnitContext};
pub use traits::PoolContext;
