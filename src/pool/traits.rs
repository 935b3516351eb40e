use async_trait::async_trait;
use rand::rngs::StdRng;

use crate::error::PoolError;
use crate::types::{Envelope, Message, Origin, Tag, UnitId};

/// One execution unit's view of the worker pool.
///
/// Roles only talk to each other through this contract: they never touch the
/// slot table directly, they ask the pool to allocate a unit or deliver a
/// message.
#[async_trait]
pub trait PoolContext: Send {
    fn rank(&self) -> UnitId;

    /// Who activated this unit for its current life.
    fn origin(&self) -> Origin;

    /// Active worker units, never counting the coordinator.
    fn active_unit_count(&self) -> usize;

    /// Activates a unit whose origin is this unit.
    fn spawn_unit(&mut self) -> Result<UnitId, PoolError>;

    fn send(&mut self, to: UnitId, message: Message) -> Result<(), PoolError>;

    /// Blocks until a message with `tag` (and sender `from`, if given) arrives.
    async fn recv(&mut self, from: Option<UnitId>, tag: Tag) -> Result<Envelope, PoolError>;

    /// Coordinator only. Waits for pool activity; `false` once the pool is closed.
    async fn poll_once(&mut self) -> Result<bool, PoolError>;

    fn seed_rng(&mut self, seed: u64);

    fn rng(&mut self) -> &mut StdRng;

    /// Gives other units a chance to run when this one has nothing to send.
    async fn idle(&mut self) {
        tokio::task::yield_now().await;
    }
}
