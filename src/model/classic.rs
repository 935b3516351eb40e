use rand::rngs::StdRng;
use rand::Rng;

use super::LifeModel;
use crate::types::Point;

pub const BIRTH_INFLUX_SCALE: f64 = 10_000.0;
pub const INFECTION_LEVEL_CAP: f64 = 40_000.0;
pub const DEATH_PROBABILITY: f64 = 1.0 / 6.0;

/// Unit-square frog model: hops of at most a quarter side, arctangent-shaped
/// birth and infection curves, and a flat death chance.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicModel;

impl ClassicModel {
    pub fn new() -> Self {
        Self
    }
}

fn step(rng: &mut StdRng) -> f32 {
    (rng.random::<f32>() - 0.5) / 2.0
}

fn wrap(coordinate: f32) -> f32 {
    let wrapped = coordinate.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

impl LifeModel for ClassicModel {
    fn hop(&self, from: Point, rng: &mut StdRng) -> Point {
        let dx = step(rng);
        let dy = step(rng);
        Point::new(wrap(from.x + dx), wrap(from.y + dy))
    }

    fn cell_of(&self, position: Point, grid_side: usize) -> usize {
        let side = grid_side.max(1);
        let column = ((position.x * side as f32) as usize).min(side - 1);
        let row = ((position.y * side as f32) as usize).min(side - 1);
        column + side * row
    }

    fn will_give_birth(&self, average_influx: f64, rng: &mut StdRng) -> bool {
        let probability = (average_influx / BIRTH_INFLUX_SCALE).atan() / 4.0;
        rng.random::<f64>() < probability
    }

    fn will_catch_disease(&self, average_infection_level: f64, rng: &mut StdRng) -> bool {
        let level = average_infection_level.min(INFECTION_LEVEL_CAP);
        let probability = (level / INFECTION_LEVEL_CAP).atan() / 4.0;
        rng.random::<f64>() < probability
    }

    fn will_die(&self, rng: &mut StdRng) -> bool {
        rng.random::<f64>() < DEATH_PROBABILITY
    }
}
