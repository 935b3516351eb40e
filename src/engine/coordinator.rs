use chrono::Utc;
use std::sync::Arc;
use tokio::time::Instant;

use super::progress::{ProgressSink, StdoutSink};
use crate::config::SimConfig;
use crate::error::SimulationError;
use crate::lifecycle::{CoordinatorEvent, CoordinatorState, CoordinatorStateMachine};
use crate::pool::PoolContext;
use crate::types::{CellCommand, Message, Outcome, RunId, SimulationReport, UnitId};

struct Timers {
    print_at: Instant,
    year_at: Instant,
}

/// Drives simulated time: bootstraps the population, advances years,
/// broadcasts cell commands and enforces the population cap.
pub struct Coordinator {
    config: SimConfig,
    state: CoordinatorState,
    year: u32,
    cells: Vec<UnitId>,
    report: SimulationReport,
    sink: Arc<dyn ProgressSink>,
}

impl Coordinator {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            state: CoordinatorState::Bootstrapping,
            year: 0,
            cells: Vec::new(),
            report: SimulationReport::new(RunId::new_v4(), Utc::now()),
            sink: Arc::new(StdoutSink),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn run_id(&self) -> RunId {
        self.report.run_id
    }

    pub async fn run<C: PoolContext>(
        &mut self,
        ctx: &mut C,
    ) -> Result<SimulationReport, SimulationError> {
        self.bootstrap(ctx)?;
        ctx.poll_once().await?;

        let now = Instant::now();
        let mut timers = Timers {
            print_at: now + self.config.print_interval,
            year_at: now + self.config.year_interval,
        };

        loop {
            let alive = self.observe(ctx)?;
            if alive == 0 {
                self.population_gone()?;
                break;
            }

            if !ctx.poll_once().await? {
                log::warn!("worker pool closed while {} frogs were alive", alive);
                break;
            }

            let alive = self.observe(ctx)?;
            if self.state == CoordinatorState::Running {
                self.tick(ctx, &mut timers, alive)?;
            }
        }

        self.broadcast(ctx, CellCommand::StopCell)?;

        self.report.years_simulated = self.year;
        self.report.frogs_left = self.config.alive_agents(ctx.active_unit_count());
        self.report.finished_at = Utc::now();
        Ok(self.report.clone())
    }

    fn bootstrap<C: PoolContext>(&mut self, ctx: &mut C) -> Result<(), SimulationError> {
        for i in 0..self.config.num_cells {
            let unit = ctx.spawn_unit()?;
            debug_assert_eq!(unit, UnitId::for_cell(i));
            self.sink
                .line(&format!("Coordinator started cell worker {} on unit {}", i + 1, unit));
            self.cells.push(unit);
        }

        for i in 0..self.config.initial_frogs {
            let unit = ctx.spawn_unit()?;
            let infected = i < self.config.initial_infected;
            self.sink.line(&format!(
                "Coordinator started frog worker {} on unit {} (infected: {})",
                i + 1,
                unit,
                u8::from(infected)
            ));
            ctx.send(unit, Message::InitialInfection(infected))?;
        }

        self.transition(CoordinatorEvent::SpawnsIssued)?;
        Ok(())
    }

    /// Current living population, aborting the run once it reaches the cap.
    fn observe<C: PoolContext>(&self, ctx: &C) -> Result<usize, SimulationError> {
        let alive = self.config.alive_agents(ctx.active_unit_count());
        if alive >= self.config.max_alive {
            log::debug!(
                "population cap reached: {} alive, cap {}",
                alive,
                self.config.max_alive
            );
            return Err(SimulationError::PopulationCap {
                alive,
                cap: self.config.max_alive,
            });
        }
        Ok(alive)
    }

    fn population_gone(&mut self) -> Result<(), SimulationError> {
        match self.state {
            CoordinatorState::Running => {
                self.sink.line("ALL FROGS ARE DEAD. EXITING...");
                self.report.outcome = Outcome::Extinct;
                self.transition(CoordinatorEvent::Extinct)
            }
            _ => self.transition(CoordinatorEvent::Drained),
        }
    }

    fn tick<C: PoolContext>(
        &mut self,
        ctx: &mut C,
        timers: &mut Timers,
        alive: usize,
    ) -> Result<(), SimulationError> {
        let now = Instant::now();

        if now >= timers.year_at {
            self.sink.line(&format!("YEAR {}", self.year));
            self.broadcast(ctx, CellCommand::Print)?;
            self.year += 1;
            timers.year_at = now + self.config.year_interval;
        }

        if self.year >= self.config.years {
            self.sink
                .line(&format!("SIMULATION END. NUMBER OF FROGS LEFT: {}", alive));
            self.broadcast(ctx, CellCommand::StopFrogs)?;
            return self.transition(CoordinatorEvent::YearLimitReached);
        }

        if now >= timers.print_at {
            self.sink.line(&format!("Alive frogs: {}", alive));
            timers.print_at = now + self.config.print_interval;
        }

        Ok(())
    }

    fn broadcast<C: PoolContext>(
        &self,
        ctx: &mut C,
        command: CellCommand,
    ) -> Result<(), SimulationError> {
        for cell in &self.cells {
            ctx.send(*cell, Message::Command(command))?;
        }
        Ok(())
    }

    fn transition(&mut self, event: CoordinatorEvent) -> Result<(), SimulationError> {
        let state = CoordinatorStateMachine::transition(&mut self.state, event)?;
        log::debug!("coordinator {:?} -> {:?}", event, state);
        Ok(())
    }
}
