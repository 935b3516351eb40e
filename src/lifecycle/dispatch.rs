use crate::types::{ActivationStatus, Role, UnitId};

/// Decides the role a unit plays from its activation status and rank.
///
/// Aggregators hold the first `num_cells` worker ranks, so a worker's rank
/// alone tells whether it owns a cell.
pub fn assign_role(status: ActivationStatus, rank: UnitId, num_cells: usize) -> Role {
    match status {
        ActivationStatus::Master => Role::Coordinator,
        ActivationStatus::Worker if (1..=num_cells).contains(&rank.rank()) => Role::Aggregator {
            cell: rank.rank() - 1,
        },
        ActivationStatus::Worker => Role::Agent,
        ActivationStatus::Inactive => Role::Idle,
    }
}
