//! Extremal entity lookup and global statistics over one viewport query.

use crate::cell::CellName;
use crate::entity::Entity;
use crate::grid::Grid;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Entity with the smallest metric across the grid's full entity list,
/// including entities that fell outside every cell.
pub fn find_min(entities: &[Entity]) -> Result<&Entity, String> {
    entities
        .iter()
        .min_by(|a, b| a.metric.partial_cmp(&b.metric).unwrap_or(Ordering::Equal))
        .ok_or_else(|| "no entities loaded".to_string())
}

/// Entity with the largest metric across the grid's full entity list.
pub fn find_max(entities: &[Entity]) -> Result<&Entity, String> {
    entities
        .iter()
        .max_by(|a, b| a.metric.partial_cmp(&b.metric).unwrap_or(Ordering::Equal))
        .ok_or_else(|| "no entities loaded".to_string())
}

/// Arithmetic mean of the nine cell means. This is a property of the
/// regionalization, not of the raw data: every cell weighs the same
/// regardless of how many entities it holds.
pub fn mean_of_cell_means(cell_means: &HashMap<CellName, f64>) -> f64 {
    let total: f64 = CellName::CANONICAL
        .iter()
        .map(|name| cell_means.get(name).copied().unwrap_or(0.0))
        .sum();
    total / CellName::CANONICAL.len() as f64
}

/// Median of the raw per-entity metrics. Even counts pick the lower-middle
/// element without interpolation.
pub fn median_metric(entities: &[Entity]) -> Result<f64, String> {
    if entities.is_empty() {
        return Err("no entities loaded".to_string());
    }

    let mut metrics: Vec<f64> = entities.iter().map(|e| e.metric).collect();
    metrics.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let n = metrics.len();
    let idx = if n % 2 == 0 { n / 2 - 1 } else { n / 2 };
    Ok(metrics[idx])
}

/// The four global statistics of the output contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub min: Entity,
    pub max: Entity,
    pub mean: f64,
    pub median: f64,
}

impl Summary {
    /// Build the summary from an analyzed grid. Fails with a no-data error
    /// when the grid holds no entities. Call after [`Grid::analyze`] so the
    /// cell means are populated.
    pub fn from_grid(grid: &Grid) -> Result<Self, String> {
        Ok(Self {
            min: find_min(&grid.entities)?.clone(),
            max: find_max(&grid.entities)?.clone(),
            mean: mean_of_cell_means(&grid.cell_means),
            median: median_metric(&grid.entities)?,
        })
    }
}
