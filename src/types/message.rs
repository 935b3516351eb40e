use serde::{Deserialize, Serialize};

use super::{Point, UnitId};

/// Channel a message travels on. Receives select on tag and, optionally, sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    Hop,
    Infection,
    Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellCommand {
    Print,
    StopCell,
    StopFrogs,
}

/// Aggregator answer to a hop report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HopReply {
    Stats {
        population_influx: u64,
        infection_level: u64,
    },
    /// The `{-1, -1}` sentinel pair: the agent must retire.
    Retire,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message {
    /// Agent -> Aggregator: the agent's infection flag for this hop.
    Hop { infected: bool },
    /// Coordinator -> Aggregator broadcast.
    Command(CellCommand),
    /// Aggregator -> Agent.
    Reply(HopReply),
    /// Coordinator -> root Agent.
    InitialInfection(bool),
    /// Parent Agent -> child Agent.
    BirthPosition(Point),
}

impl Message {
    pub fn tag(&self) -> Tag {
        match self {
            Message::Hop { .. } | Message::Command(_) | Message::Reply(_) => Tag::Hop,
            Message::InitialInfection(_) => Tag::Infection,
            Message::BirthPosition(_) => Tag::Position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub from: UnitId,
    pub to: UnitId,
    pub message: Message,
}

impl Envelope {
    pub fn new(from: UnitId, to: UnitId, message: Message) -> Self {
        Self { from, to, message }
    }

    pub fn tag(&self) -> Tag {
        self.message.tag()
    }

    pub fn matches(&self, from: Option<UnitId>, tag: Tag) -> bool {
        self.tag() == tag && from.map_or(true, |source| source == self.from)
    }
}
