use serde::{Deserialize, Serialize};

use super::window::RollingWindow;
use super::Point;

pub const BIRTH_PERIOD: u32 = 300;
pub const INFECTION_WINDOW: usize = 500;
pub const DEATH_PERIOD: u32 = 700;

/// State owned by one agent for the length of a single life.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frog {
    pub position: Point,
    pub infected: bool,
    pub hops: u32,
    pub influx_sum: u64,
    pub infection_window: RollingWindow,
}

impl Frog {
    pub fn new(position: Point, infected: bool) -> Self {
        Self {
            position,
            infected,
            hops: 0,
            influx_sum: 0,
            infection_window: RollingWindow::new(INFECTION_WINDOW),
        }
    }

    pub fn record_reply(&mut self, population_influx: u64, infection_level: u64) {
        self.influx_sum += population_influx;
        self.infection_window.push(infection_level);
    }

    pub fn birth_due(&self) -> bool {
        self.hops >= BIRTH_PERIOD && self.hops % BIRTH_PERIOD == 0
    }

    pub fn average_influx(&self) -> f64 {
        self.influx_sum as f64 / f64::from(BIRTH_PERIOD)
    }

    pub fn reset_influx(&mut self) {
        self.influx_sum = 0;
    }

    pub fn infection_due(&self) -> bool {
        !self.infected && self.hops as usize >= INFECTION_WINDOW
    }

    pub fn average_infection_level(&self) -> f64 {
        self.infection_window.mean()
    }

    pub fn infect(&mut self) {
        self.infected = true;
    }

    pub fn death_due(&self) -> bool {
        self.infected && self.hops >= DEATH_PERIOD && self.hops % DEATH_PERIOD == 0
    }

    pub fn complete_hop(&mut self) {
        self.hops += 1;
    }
}
