use super::progress::ProgressSink;
use crate::error::PoolError;
use crate::pool::PoolContext;
use crate::types::{Cell, CellAction, CellStats, Message, Tag};

/// Serves hop reports and coordinator commands for one cell until told to stop.
///
/// Returns whatever was accumulated since the last report.
pub async fn run_aggregator<C: PoolContext>(
    ctx: &mut C,
    cell_index: usize,
    sink: &dyn ProgressSink,
) -> Result<CellStats, PoolError> {
    let mut cell = Cell::new();
    log::debug!("cell {} serving on unit {}", cell_index, ctx.rank());

    loop {
        let envelope = ctx.recv(None, Tag::Hop).await?;

        match cell.handle(&envelope.message) {
            CellAction::Reply(reply) => ctx.send(envelope.from, Message::Reply(reply))?,
            CellAction::Report(stats) => sink.line(&format!(
                "Cell {}: \tpopulationInflux = {}\tinfectionLevel = {}",
                ctx.rank(),
                stats.population_influx,
                stats.infection_level
            )),
            CellAction::Ignore => {}
            CellAction::Stop => {
                log::debug!("cell {} stopping", cell_index);
                return Ok(cell.stats);
            }
        }
    }
}
