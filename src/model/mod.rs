pub mod classic;

pub use classic::ClassicModel;

use rand::rngs::StdRng;

use crate::types::Point;

/// The numeric side of the simulation: movement, cell lookup and the
/// birth/infection/death draws. Roles only decide *when* to ask.
pub trait LifeModel: Send + Sync {
    fn hop(&self, from: Point, rng: &mut StdRng) -> Point;

    fn cell_of(&self, position: Point, grid_side: usize) -> usize;

    fn will_give_birth(&self, average_influx: f64, rng: &mut StdRng) -> bool;

    fn will_catch_disease(&self, average_infection_level: f64, rng: &mut StdRng) -> bool;

    fn will_die(&self, rng: &mut StdRng) -> bool;
}
