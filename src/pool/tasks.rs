use async_trait::async_trait;
use futures::future::join_all;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use super::mailbox::Mailbox;
use super::traits::PoolContext;
use crate::config::SimConfig;
use crate::error::PoolError;
use crate::types::{ActivationStatus, Envelope, Message, Origin, Tag, UnitId};

/// Work a unit performs each time it is activated. Returning parks the unit.
#[async_trait]
pub trait UnitBody: Send + Sync + 'static {
    async fn run(&self, status: ActivationStatus, ctx: &mut UnitContext) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolEvent {
    Activated(UnitId),
    Parked(UnitId),
}

#[derive(Debug, Clone)]
pub struct PoolOptions {
    /// Worker ranks `1..=reserved` are never handed out again once parked.
    pub reserved: usize,
    pub seed: u64,
    pub poll_interval: Duration,
}

impl From<&SimConfig> for PoolOptions {
    fn from(config: &SimConfig) -> Self {
        Self {
            reserved: config.num_cells,
            seed: config.seed,
            poll_interval: config.poll_interval,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotStatus {
    Active,
    Parked,
}

struct Slot {
    status: SlotStatus,
    mailbox: UnboundedSender<Envelope>,
    wake: Option<UnboundedSender<Origin>>,
    handle: Option<JoinHandle<()>>,
}

#[derive(Default)]
struct SlotTable {
    slots: Vec<Slot>,
    closed: bool,
}

impl SlotTable {
    fn active_workers(&self) -> usize {
        self.slots
            .iter()
            .skip(1)
            .filter(|slot| slot.status == SlotStatus::Active)
            .count()
    }

    fn reusable(&self, reserved: usize) -> Option<usize> {
        self.slots
            .iter()
            .enumerate()
            .skip(reserved + 1)
            .find(|(_, slot)| slot.status == SlotStatus::Parked && slot.wake.is_some())
            .map(|(rank, _)| rank)
    }
}

struct PoolShared {
    table: Mutex<SlotTable>,
    events: UnboundedSender<PoolEvent>,
    body: Arc<dyn UnitBody>,
    options: PoolOptions,
}

impl PoolShared {
    fn table(&self) -> MutexGuard<'_, SlotTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn activate(self: &Arc<Self>, spawner: UnitId) -> Result<UnitId, PoolError> {
        let origin = Origin::from_spawner(spawner);
        let mut table = self.table();
        if table.closed {
            return Err(PoolError::Closed);
        }

        let rank = match table.reusable(self.options.reserved) {
            Some(rank) => {
                let slot = &mut table.slots[rank];
                let wake = slot.wake.as_ref().ok_or(PoolError::Closed)?;
                wake.send(origin).map_err(|_| PoolError::Closed)?;
                slot.status = SlotStatus::Active;
                UnitId(rank)
            }
            None => {
                let rank = UnitId(table.slots.len());
                let (mailbox_tx, mailbox) = Mailbox::channel();
                let (wake_tx, wake_rx) = mpsc::unbounded_channel();
                let ctx = UnitContext::new(
                    rank,
                    ActivationStatus::Worker,
                    origin,
                    mailbox,
                    None,
                    Arc::clone(self),
                );
                let handle = tokio::spawn(drive_unit(ctx, wake_rx));
                table.slots.push(Slot {
                    status: SlotStatus::Active,
                    mailbox: mailbox_tx,
                    wake: Some(wake_tx),
                    handle: Some(handle),
                });
                rank
            }
        };
        drop(table);

        let _ = self.events.send(PoolEvent::Activated(rank));
        Ok(rank)
    }

    fn park(&self, rank: UnitId) {
        if let Some(slot) = self.table().slots.get_mut(rank.rank()) {
            slot.status = SlotStatus::Parked;
        }
        let _ = self.events.send(PoolEvent::Parked(rank));
    }

    fn deliver(&self, envelope: Envelope) -> Result<(), PoolError> {
        let table = self.table();
        let slot = table
            .slots
            .get(envelope.to.rank())
            .ok_or(PoolError::UnknownUnit(envelope.to))?;
        slot.mailbox.send(envelope).map_err(|_| PoolError::Closed)
    }

    fn active_workers(&self) -> usize {
        self.table().active_workers()
    }
}

async fn drive_unit(mut ctx: UnitContext, mut wake: UnboundedReceiver<Origin>) {
    let shared = Arc::clone(&ctx.shared);
    loop {
        if let Err(err) = shared.body.run(ctx.status, &mut ctx).await {
            log::warn!("unit {} stopped with error: {:#}", ctx.rank, err);
        }

        let dropped = ctx.mailbox.clear_stash();
        if dropped > 0 {
            log::debug!("unit {} dropped {} stale messages", ctx.rank, dropped);
        }
        shared.park(ctx.rank);

        match wake.recv().await {
            Some(origin) => ctx.origin = origin,
            None => break,
        }
    }
    log::trace!("unit {} exiting", ctx.rank);
}

/// Handle a unit uses to reach the pool; implements [`PoolContext`].
pub struct UnitContext {
    rank: UnitId,
    status: ActivationStatus,
    origin: Origin,
    mailbox: Mailbox,
    events: Option<UnboundedReceiver<PoolEvent>>,
    rng: StdRng,
    shared: Arc<PoolShared>,
}

impl UnitContext {
    fn new(
        rank: UnitId,
        status: ActivationStatus,
        origin: Origin,
        mailbox: Mailbox,
        events: Option<UnboundedReceiver<PoolEvent>>,
        shared: Arc<PoolShared>,
    ) -> Self {
        let seed = shared.options.seed.wrapping_add(rank.rank() as u64);
        let mut ctx = Self {
            rank,
            status,
            origin,
            mailbox,
            events,
            rng: StdRng::seed_from_u64(0),
            shared,
        };
        ctx.seed_rng(seed);
        ctx
    }
}

#[async_trait]
impl PoolContext for UnitContext {
    fn rank(&self) -> UnitId {
        self.rank
    }

    fn origin(&self) -> Origin {
        self.origin
    }

    fn active_unit_count(&self) -> usize {
        self.shared.active_workers()
    }

    fn spawn_unit(&mut self) -> Result<UnitId, PoolError> {
        self.shared.activate(self.rank)
    }

    fn send(&mut self, to: UnitId, message: Message) -> Result<(), PoolError> {
        self.shared.deliver(Envelope::new(self.rank, to, message))
    }

    async fn recv(&mut self, from: Option<UnitId>, tag: Tag) -> Result<Envelope, PoolError> {
        self.mailbox.recv(from, tag).await
    }

    async fn poll_once(&mut self) -> Result<bool, PoolError> {
        let poll_interval = self.shared.options.poll_interval;
        let events = self.events.as_mut().ok_or(PoolError::NotCoordinator)?;

        match tokio::time::timeout(poll_interval, events.recv()).await {
            Ok(Some(event)) => {
                log::trace!("pool event {:?}", event);
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(_) => Ok(true),
        }
    }

    fn seed_rng(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

/// Worker pool backed by tokio tasks. Rank 0 is reserved for the coordinator,
/// which runs on the caller's task through [`TaskPool::master_context`].
pub struct TaskPool {
    shared: Arc<PoolShared>,
    master: Option<(Mailbox, UnboundedReceiver<PoolEvent>)>,
}

impl TaskPool {
    pub fn new(options: PoolOptions, body: Arc<dyn UnitBody>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (master_tx, master_mailbox) = Mailbox::channel();

        let table = SlotTable {
            slots: vec![Slot {
                status: SlotStatus::Active,
                mailbox: master_tx,
                wake: None,
                handle: None,
            }],
            closed: false,
        };

        Self {
            shared: Arc::new(PoolShared {
                table: Mutex::new(table),
                events: events_tx,
                body,
                options,
            }),
            master: Some((master_mailbox, events_rx)),
        }
    }

    pub fn master_context(&mut self) -> Result<UnitContext, PoolError> {
        let (mailbox, events) = self.master.take().ok_or(PoolError::Closed)?;
        Ok(UnitContext::new(
            UnitId::COORDINATOR,
            ActivationStatus::Master,
            Origin::Coordinator,
            mailbox,
            Some(events),
            Arc::clone(&self.shared),
        ))
    }

    fn close(&self) -> Vec<JoinHandle<()>> {
        let mut table = self.shared.table();
        table.closed = true;
        table
            .slots
            .iter_mut()
            .filter_map(|slot| {
                slot.wake = None;
                slot.handle.take()
            })
            .collect()
    }

    /// Releases parked units and waits for every unit task to finish,
    /// aborting whatever is still running after `grace`.
    pub async fn shutdown(self, grace: Duration) {
        let handles = self.close();
        let aborts: Vec<_> = handles.iter().map(|h| h.abort_handle()).collect();

        if tokio::time::timeout(grace, join_all(handles)).await.is_err() {
            log::warn!("worker pool did not drain within {:?}, aborting", grace);
            for abort in aborts {
                abort.abort();
            }
        }
    }

    /// Stops every unit immediately.
    pub fn abort(self) {
        for handle in self.close() {
            handle.abort();
        }
    }
}
