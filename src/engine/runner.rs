use anyhow::bail;
use async_trait::async_trait;
use std::sync::Arc;

use super::agent::run_agent;
use super::aggregator::run_aggregator;
use super::coordinator::Coordinator;
use super::progress::{ProgressSink, StdoutSink};
use crate::config::{ConfigError, SimConfig};
use crate::error::SimulationError;
use crate::lifecycle::assign_role;
use crate::model::{ClassicModel, LifeModel};
use crate::pool::{PoolContext, PoolOptions, TaskPool, UnitBody, UnitContext};
use crate::types::{ActivationStatus, Role, SimulationReport};

/// Body every worker unit runs on activation: pick a role, then play it.
pub struct RoleRunner {
    config: SimConfig,
    model: Arc<dyn LifeModel>,
    sink: Arc<dyn ProgressSink>,
}

impl RoleRunner {
    pub fn new(config: SimConfig, model: Arc<dyn LifeModel>, sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            config,
            model,
            sink,
        }
    }
}

#[async_trait]
impl UnitBody for RoleRunner {
    async fn run(&self, status: ActivationStatus, ctx: &mut UnitContext) -> anyhow::Result<()> {
        let role = assign_role(status, ctx.rank(), self.config.num_cells);
        log::trace!("unit {} activated as {}", ctx.rank(), role.as_str());

        match role {
            Role::Aggregator { cell } => {
                let left = run_aggregator(ctx, cell, self.sink.as_ref()).await?;
                log::debug!(
                    "cell {} closed with {} unreported visits",
                    cell,
                    left.population_influx
                );
            }
            Role::Agent => {
                let exit = run_agent(ctx, &self.config, self.model.as_ref()).await?;
                log::debug!("frog {} finished: {:?}", ctx.rank(), exit);
            }
            Role::Coordinator => bail!("unit {} cannot coordinate from a worker slot", ctx.rank()),
            Role::Idle => {}
        }

        Ok(())
    }
}

/// Entry point: owns a validated configuration and runs one simulation on a
/// fresh task pool.
pub struct Simulation {
    config: SimConfig,
    model: Arc<dyn LifeModel>,
    sink: Arc<dyn ProgressSink>,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            model: Arc::new(ClassicModel::new()),
            sink: Arc::new(StdoutSink),
        })
    }

    pub fn with_model(mut self, model: Arc<dyn LifeModel>) -> Self {
        self.model = model;
        self
    }

    /// Where progress lines go; stdout unless replaced.
    pub fn with_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Runs to completion or extinction. On a population cap every unit is
    /// aborted and no report is produced.
    pub async fn run(&self) -> Result<SimulationReport, SimulationError> {
        let body = Arc::new(RoleRunner::new(
            self.config.clone(),
            Arc::clone(&self.model),
            Arc::clone(&self.sink),
        ));
        let mut pool = TaskPool::new(PoolOptions::from(&self.config), body);
        let mut master = pool.master_context()?;

        let mut coordinator =
            Coordinator::new(self.config.clone()).with_sink(Arc::clone(&self.sink));
        log::info!(
            "simulation {} starting: {} cells, {} frogs ({} infected), {} years",
            coordinator.run_id(),
            self.config.num_cells,
            self.config.initial_frogs,
            self.config.initial_infected,
            self.config.years
        );

        match coordinator.run(&mut master).await {
            Ok(report) => {
                pool.shutdown(self.config.shutdown_grace).await;
                log::info!(
                    "simulation {} finished in {:.1}s",
                    report.run_id,
                    report.elapsed_secs()
                );
                Ok(report)
            }
            Err(err) => {
                log::debug!("simulation {} aborted: {}", coordinator.run_id(), err);
                pool.abort();
                Err(err)
            }
        }
    }
}
