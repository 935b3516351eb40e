use std::collections::VecDeque;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::error::PoolError;
use crate::types::{Envelope, Tag, UnitId};

/// Inbound queue for one unit with selective receive.
///
/// Messages that do not match the current receive are stashed in arrival order
/// and offered to later receives first, so order between any pair of units is
/// preserved.
pub struct Mailbox {
    receiver: UnboundedReceiver<Envelope>,
    stash: VecDeque<Envelope>,
}

impl Mailbox {
    pub fn channel() -> (UnboundedSender<Envelope>, Self) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            sender,
            Self {
                receiver,
                stash: VecDeque::new(),
            },
        )
    }

    pub async fn recv(&mut self, from: Option<UnitId>, tag: Tag) -> Result<Envelope, PoolError> {
        if let Some(index) = self.stash.iter().position(|e| e.matches(from, tag)) {
            if let Some(envelope) = self.stash.remove(index) {
                return Ok(envelope);
            }
        }

        loop {
            match self.receiver.recv().await {
                Some(envelope) if envelope.matches(from, tag) => return Ok(envelope),
                Some(envelope) => self.stash.push_back(envelope),
                None => return Err(PoolError::Closed),
            }
        }
    }

    /// Drops stashed messages left over from a finished life.
    pub fn clear_stash(&mut self) -> usize {
        let dropped = self.stash.len();
        self.stash.clear();
        dropped
    }
}
