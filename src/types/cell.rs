use serde::{Deserialize, Serialize};

use super::{CellCommand, HopReply, Message};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CellStats {
    pub population_influx: u64,
    pub infection_level: u64,
}

/// What an aggregator does after folding one inbound message into its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellAction {
    Reply(HopReply),
    Report(CellStats),
    Ignore,
    Stop,
}

/// Running statistics for one spatial cell since its last report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cell {
    pub stats: CellStats,
    pub closing: bool,
}

impl Cell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, message: &Message) -> CellAction {
        match message {
            Message::Command(CellCommand::StopCell) => CellAction::Stop,
            Message::Command(CellCommand::Print) => CellAction::Report(self.take_report()),
            Message::Command(CellCommand::StopFrogs) => {
                self.closing = true;
                CellAction::Ignore
            }
            Message::Hop { infected } => CellAction::Reply(self.record_hop(*infected)),
            other => {
                log::warn!("cell ignoring unexpected message {:?}", other);
                CellAction::Ignore
            }
        }
    }

    /// Closing cells stop accumulating and answer every hop with the retire sentinel.
    pub fn record_hop(&mut self, infected: bool) -> HopReply {
        if self.closing {
            return HopReply::Retire;
        }

        self.stats.population_influx += 1;
        self.stats.infection_level += u64::from(infected);

        HopReply::Stats {
            population_influx: self.stats.population_influx,
            infection_level: self.stats.infection_level,
        }
    }

    pub fn take_report(&mut self) -> CellStats {
        std::mem::take(&mut self.stats)
    }
}
