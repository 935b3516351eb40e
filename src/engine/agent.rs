use rand::Rng;

use crate::config::SimConfig;
use crate::error::PoolError;
use crate::model::LifeModel;
use crate::pool::PoolContext;
use crate::types::{Frog, HopReply, Message, Origin, Point, Tag, UnitId};

/// Chance that an agent moves on a given tick.
pub const HOP_PROBABILITY: f64 = 4.0 / 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentExit {
    /// The owning cell answered with the retire sentinel.
    Retired { hops: u32 },
    Died { hops: u32 },
}

/// Runs one frog's life from birth to retirement or death.
pub async fn run_agent<C: PoolContext>(
    ctx: &mut C,
    config: &SimConfig,
    model: &dyn LifeModel,
) -> Result<AgentExit, PoolError> {
    let mut frog = start_frog(ctx, model).await?;
    let grid_side = config.grid_side();

    log::debug!(
        "frog {} starting at ({:.4}, {:.4}), infected: {}",
        ctx.rank(),
        frog.position.x,
        frog.position.y,
        frog.infected
    );

    loop {
        if !ctx.rng().random_bool(HOP_PROBABILITY) {
            ctx.idle().await;
            continue;
        }

        frog.position = model.hop(frog.position, ctx.rng());
        let cell = UnitId::for_cell(model.cell_of(frog.position, grid_side));

        ctx.send(
            cell,
            Message::Hop {
                infected: frog.infected,
            },
        )?;
        let reply = ctx.recv(Some(cell), Tag::Hop).await?;

        let (population_influx, infection_level) = match reply.message {
            Message::Reply(HopReply::Stats {
                population_influx,
                infection_level,
            }) => (population_influx, infection_level),
            Message::Reply(HopReply::Retire) => {
                return Ok(AgentExit::Retired { hops: frog.hops })
            }
            other => {
                log::warn!("frog {} ignoring {:?} from cell {}", ctx.rank(), other, cell);
                continue;
            }
        };

        frog.record_reply(population_influx, infection_level);

        if frog.birth_due() {
            if model.will_give_birth(frog.average_influx(), ctx.rng()) {
                let child = ctx.spawn_unit()?;
                ctx.send(child, Message::BirthPosition(frog.position))?;
                log::debug!("frog {} gave birth to {}", ctx.rank(), child);
            }
            frog.reset_influx();
        }

        if frog.infection_due()
            && model.will_catch_disease(frog.average_infection_level(), ctx.rng())
        {
            log::debug!("frog {} infected after {} hops", ctx.rank(), frog.hops);
            frog.infect();
        }

        if frog.death_due() && model.will_die(ctx.rng()) {
            log::debug!("frog {} dying after {} hops", ctx.rank(), frog.hops);
            return Ok(AgentExit::Died { hops: frog.hops });
        }

        frog.complete_hop();
    }
}

async fn start_frog<C: PoolContext>(ctx: &mut C, model: &dyn LifeModel) -> Result<Frog, PoolError> {
    match ctx.origin() {
        Origin::Coordinator => {
            let position = model.hop(Point::ORIGIN, ctx.rng());
            let envelope = ctx.recv(Some(UnitId::COORDINATOR), Tag::Infection).await?;
            let infected = matches!(envelope.message, Message::InitialInfection(true));
            Ok(Frog::new(position, infected))
        }
        Origin::Parent(parent) => {
            let envelope = ctx.recv(Some(parent), Tag::Position).await?;
            let position = match envelope.message {
                Message::BirthPosition(position) => position,
                other => {
                    log::warn!("frog {} got {:?} instead of a birth position", ctx.rank(), other);
                    Point::ORIGIN
                }
            };
            Ok(Frog::new(position, false))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::mock::MockContext;
    use rand::rngs::StdRng;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Deterministic model: every frog stays in cell 0 and outcomes are fixed.
    #[derive(Default)]
    struct ScriptedModel {
        birth: bool,
        infect: bool,
        die: bool,
        birth_checks: AtomicUsize,
        infection_checks: AtomicUsize,
        death_checks: AtomicUsize,
    }

    impl LifeModel for ScriptedModel {
        fn hop(&self, from: Point, _rng: &mut StdRng) -> Point {
            Point::new((from.x + 0.01) % 1.0, from.y)
        }

        fn cell_of(&self, _position: Point, _grid_side: usize) -> usize {
            0
        }

        fn will_give_birth(&self, _average_influx: f64, _rng: &mut StdRng) -> bool {
            self.birth_checks.fetch_add(1, Ordering::SeqCst);
            self.birth
        }

        fn will_catch_disease(&self, _average_infection_level: f64, _rng: &mut StdRng) -> bool {
            self.infection_checks.fetch_add(1, Ordering::SeqCst);
            self.infect
        }

        fn will_die(&self, _rng: &mut StdRng) -> bool {
            self.death_checks.fetch_add(1, Ordering::SeqCst);
            self.die
        }
    }

    fn create_test_config() -> SimConfig {
        SimConfig {
            num_cells: 1,
            ..Default::default()
        }
    }

    fn create_root_frog(infected: bool, replies: usize) -> MockContext {
        let mut ctx = MockContext::new(UnitId(2), Origin::Coordinator);
        ctx.next_rank = 3;
        ctx.push_inbox(UnitId::COORDINATOR, Message::InitialInfection(infected));
        for i in 0..replies {
            ctx.push_inbox(
                UnitId::for_cell(0),
                Message::Reply(HopReply::Stats {
                    population_influx: i as u64 + 1,
                    infection_level: 1,
                }),
            );
        }
        ctx
    }

    #[tokio::test]
    async fn test_retires_on_sentinel() {
        let model = ScriptedModel::default();
        let mut ctx = create_root_frog(false, 0);
        ctx.push_inbox(UnitId::for_cell(0), Message::Reply(HopReply::Retire));

        let exit = run_agent(&mut ctx, &create_test_config(), &model)
            .await
            .unwrap();

        assert_eq!(exit, AgentExit::Retired { hops: 0 });
        assert_eq!(ctx.hops_sent(), vec![false]);
        assert_eq!(ctx.sent[0].to, UnitId(1));
    }

    #[tokio::test]
    async fn test_root_frog_reports_initial_infection() {
        let model = ScriptedModel::default();
        let mut ctx = create_root_frog(true, 3);
        ctx.push_inbox(UnitId::for_cell(0), Message::Reply(HopReply::Retire));

        run_agent(&mut ctx, &create_test_config(), &model)
            .await
            .unwrap();

        assert_eq!(ctx.hops_sent(), vec![true; 4]);
    }

    #[tokio::test]
    async fn test_child_starts_from_birth_position() {
        let model = ScriptedModel::default();
        let mut ctx = MockContext::new(UnitId(40), Origin::Parent(UnitId(22)));
        ctx.push_inbox(UnitId(22), Message::BirthPosition(Point::new(0.5, 0.25)));
        ctx.push_inbox(UnitId::for_cell(0), Message::Reply(HopReply::Retire));

        let exit = run_agent(&mut ctx, &create_test_config(), &model)
            .await
            .unwrap();

        assert_eq!(exit, AgentExit::Retired { hops: 0 });
        assert_eq!(ctx.hops_sent(), vec![false]);
    }

    #[tokio::test]
    async fn test_birth_checked_once_per_300_hops() {
        let model = ScriptedModel {
            birth: true,
            ..Default::default()
        };
        let mut ctx = create_root_frog(false, 901);
        ctx.push_inbox(UnitId::for_cell(0), Message::Reply(HopReply::Retire));

        let exit = run_agent(&mut ctx, &create_test_config(), &model)
            .await
            .unwrap();

        assert_eq!(exit, AgentExit::Retired { hops: 901 });
        assert_eq!(model.birth_checks.load(Ordering::SeqCst), 3);
        assert_eq!(ctx.spawned.len(), 3);

        let births: Vec<_> = ctx
            .sent
            .iter()
            .filter(|e| matches!(e.message, Message::BirthPosition(_)))
            .map(|e| e.to)
            .collect();
        assert_eq!(births, ctx.spawned);
    }

    #[tokio::test]
    async fn test_infection_evaluated_from_hop_500() {
        let model = ScriptedModel {
            infect: true,
            ..Default::default()
        };
        let mut ctx = create_root_frog(false, 520);
        ctx.push_inbox(UnitId::for_cell(0), Message::Reply(HopReply::Retire));

        run_agent(&mut ctx, &create_test_config(), &model)
            .await
            .unwrap();

        let hops = ctx.hops_sent();
        assert!(hops[..=500].iter().all(|infected| !infected));
        assert!(hops[501..].iter().all(|infected| *infected));
        assert_eq!(model.infection_checks.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_infected_frog_dies_at_700() {
        let model = ScriptedModel {
            die: true,
            ..Default::default()
        };
        let mut ctx = create_root_frog(true, 800);

        let exit = run_agent(&mut ctx, &create_test_config(), &model)
            .await
            .unwrap();

        assert_eq!(exit, AgentExit::Died { hops: 700 });
        assert_eq!(ctx.hops_sent().len(), 701);
        assert_eq!(model.death_checks.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_uninfected_frog_never_dies() {
        let model = ScriptedModel {
            die: true,
            ..Default::default()
        };
        let mut ctx = create_root_frog(false, 1_500);
        ctx.push_inbox(UnitId::for_cell(0), Message::Reply(HopReply::Retire));

        let exit = run_agent(&mut ctx, &create_test_config(), &model)
            .await
            .unwrap();

        assert_eq!(exit, AgentExit::Retired { hops: 1_500 });
        assert_eq!(model.death_checks.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_reply_surfaces_pool_error() {
        let model = ScriptedModel::default();
        let mut ctx = create_root_frog(false, 2);

        let result = run_agent(&mut ctx, &create_test_config(), &model).await;
        assert!(matches!(result, Err(PoolError::Closed)));
    }
}
