use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::VecDeque;
use std::time::Duration;

use super::traits::PoolContext;
use crate::error::PoolError;
use crate::types::{CellCommand, Envelope, Message, Origin, Tag, UnitId};

/// Scripted pool for driving a single role without tasks.
///
/// `recv` serves queued envelopes and fails with [`PoolError::Closed`] once
/// nothing matches, which ends role loops deterministically.
pub struct MockContext {
    pub rank: UnitId,
    pub origin: Origin,
    pub active: usize,
    pub next_rank: usize,
    pub inbox: VecDeque<Envelope>,
    pub sent: Vec<Envelope>,
    pub spawned: Vec<UnitId>,
    pub polls: usize,
    pub poll_delay: Duration,
    pub on_poll: Option<fn(&mut MockContext)>,
    rng: StdRng,
}

impl MockContext {
    pub fn new(rank: UnitId, origin: Origin) -> Self {
        Self {
            rank,
            origin,
            active: 0,
            next_rank: 1,
            inbox: VecDeque::new(),
            sent: Vec::new(),
            spawned: Vec::new(),
            polls: 0,
            poll_delay: Duration::ZERO,
            on_poll: None,
            rng: StdRng::seed_from_u64(42),
        }
    }

    pub fn coordinator() -> Self {
        Self::new(UnitId::COORDINATOR, Origin::Coordinator)
    }

    pub fn push_inbox(&mut self, from: UnitId, message: Message) {
        let to = self.rank;
        self.inbox.push_back(Envelope::new(from, to, message));
    }

    pub fn commands_sent(&self, command: CellCommand) -> usize {
        self.sent
            .iter()
            .filter(|e| e.message == Message::Command(command))
            .count()
    }

    pub fn hops_sent(&self) -> Vec<bool> {
        self.sent
            .iter()
            .filter_map(|e| match e.message {
                Message::Hop { infected } => Some(infected),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl PoolContext for MockContext {
    fn rank(&self) -> UnitId {
        self.rank
    }

    fn origin(&self) -> Origin {
        self.origin
    }

    fn active_unit_count(&self) -> usize {
        self.active
    }

    fn spawn_unit(&mut self) -> Result<UnitId, PoolError> {
        let unit = UnitId(self.next_rank);
        self.next_rank += 1;
        self.active += 1;
        self.spawned.push(unit);
        Ok(unit)
    }

    fn send(&mut self, to: UnitId, message: Message) -> Result<(), PoolError> {
        let from = self.rank;
        self.sent.push(Envelope::new(from, to, message));
        Ok(())
    }

    async fn recv(&mut self, from: Option<UnitId>, tag: Tag) -> Result<Envelope, PoolError> {
        let index = self
            .inbox
            .iter()
            .position(|e| e.matches(from, tag))
            .ok_or(PoolError::Closed)?;
        self.inbox.remove(index).ok_or(PoolError::Closed)
    }

    async fn poll_once(&mut self) -> Result<bool, PoolError> {
        self.polls += 1;
        if !self.poll_delay.is_zero() {
            tokio::time::sleep(self.poll_delay).await;
        }
        if let Some(hook) = self.on_poll {
            hook(self);
        }
        Ok(true)
    }

    fn seed_rng(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    async fn idle(&mut self) {}
}
