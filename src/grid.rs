//! The 3x3 viewport grid: cell construction, entity assignment, per-cell
//! aggregation and ranking.
//!
//! A grid is built fresh for every viewport query and discarded with the
//! response. Concurrent requests each get their own instance; nothing here
//! is shared or session-scoped.

use crate::bbox::BoundingBox;
use crate::cell::{Cell, CellName};
use crate::entity::Entity;
use crate::trend::{self, TrendReport};
use std::cmp::Ordering;
use std::collections::HashMap;

use CellName::*;

/// Row-major cell layout, bottom row first. Only the internal iteration
/// order; no reported result depends on it beyond boundary-point claims.
const CELL_LAYOUT: [[CellName; 3]; 3] = [[SW, S, SE], [W, C, E], [NW, N, NE]];

/// One viewport query's worth of state: the nine cells, the entities under
/// analysis, and the aggregation products in pipeline order.
#[derive(Debug, Clone)]
pub struct Grid {
    pub bbox: BoundingBox,
    /// The nine cells in enumeration order `SW,S,SE,W,C,E,NW,N,NE`.
    pub cells: Vec<Cell>,
    /// Every entity supplied to the grid, assigned or not.
    pub entities: Vec<Entity>,
    /// Indices into `entities`, keyed by the owning cell.
    pub cell_entities: HashMap<CellName, Vec<usize>>,
    /// Mean metric per cell; an empty cell carries 0.0.
    pub cell_means: HashMap<CellName, f64>,
    /// Rank 1 (highest mean) through 9, a bijection over the cell names.
    pub cell_ranks: HashMap<CellName, u32>,
    pub trends: TrendReport,
    unassigned: usize,
}

impl Grid {
    /// Build the nine cells by splitting the box into thirds on each axis.
    pub fn new(bbox: BoundingBox) -> Self {
        let mut cell_entities = HashMap::new();
        for name in CellName::CANONICAL {
            cell_entities.insert(name, Vec::new());
        }
        Self {
            bbox,
            cells: Self::build_cells(&bbox),
            entities: Vec::new(),
            cell_entities,
            cell_means: HashMap::new(),
            cell_ranks: HashMap::new(),
            trends: TrendReport::new(),
            unassigned: 0,
        }
    }

    fn build_cells(bbox: &BoundingBox) -> Vec<Cell> {
        let lon_splits = [
            bbox.min_lon,
            bbox.min_lon + bbox.width() / 3.0,
            bbox.min_lon + 2.0 * bbox.width() / 3.0,
            bbox.max_lon,
        ];
        let lat_splits = [
            bbox.min_lat,
            bbox.min_lat + bbox.height() / 3.0,
            bbox.min_lat + 2.0 * bbox.height() / 3.0,
            bbox.max_lat,
        ];

        let mut cells = Vec::with_capacity(9);
        for (row, row_names) in CELL_LAYOUT.iter().enumerate() {
            for (col, name) in row_names.iter().enumerate() {
                cells.push(Cell::new(
                    lon_splits[col],
                    lon_splits[col + 1],
                    lat_splits[row],
                    lat_splits[row + 1],
                    *name,
                ));
            }
        }
        cells
    }

    /// The cell carrying a given name.
    pub fn cell(&self, name: CellName) -> Option<&Cell> {
        self.cells.iter().find(|c| c.name == name)
    }

    /// First cell in enumeration order containing the point. Points on a
    /// shared cell boundary satisfy two cells' membership tests; the first
    /// match claims them. Accepted ambiguity, see DESIGN.md.
    pub fn find_cell(&self, x: f64, y: f64) -> Option<CellName> {
        self.cells.iter().find(|c| c.contains(x, y)).map(|c| c.name)
    }

    /// Take ownership of the query's entities and assign each to a cell by
    /// centroid. Entities outside every cell are kept in the global list
    /// for summary statistics but excluded from per-cell aggregation and
    /// counted in [`unassigned_count`](Grid::unassigned_count).
    pub fn load_entities(&mut self, entities: Vec<Entity>) {
        for list in self.cell_entities.values_mut() {
            list.clear();
        }
        self.cell_means.clear();
        self.cell_ranks.clear();
        self.trends = TrendReport::new();
        self.unassigned = 0;
        self.entities = entities;

        for i in 0..self.entities.len() {
            let (x, y) = (self.entities[i].centroid.x, self.entities[i].centroid.y);
            match self.find_cell(x, y) {
                Some(name) => {
                    self.entities[i].assign_cell(name);
                    if let Some(list) = self.cell_entities.get_mut(&name) {
                        list.push(i);
                    }
                }
                None => {
                    self.unassigned += 1;
                    eprintln!(
                        "entity {} centroid ({}, {}) is outside the viewport grid",
                        self.entities[i].id, x, y
                    );
                }
            }
        }
    }

    /// Entities whose centroid fell outside all nine cells.
    pub fn unassigned_count(&self) -> usize {
        self.unassigned
    }

    /// Entities currently assigned to some cell.
    pub fn assigned_count(&self) -> usize {
        self.cell_entities.values().map(Vec::len).sum()
    }

    /// Arithmetic mean of the assigned entities' metrics per cell. A cell
    /// with no entities gets mean 0.0 so it still participates in ranking.
    pub fn calculate_cell_means(&mut self) {
        let mut means = HashMap::new();
        for name in CellName::CANONICAL {
            let mean = match self.cell_entities.get(&name) {
                Some(indices) if !indices.is_empty() => {
                    let total: f64 = indices.iter().map(|&i| self.entities[i].metric).sum();
                    total / indices.len() as f64
                }
                _ => 0.0,
            };
            means.insert(name, mean);
        }
        self.cell_means = means;
    }

    /// Sort the nine cells by mean descending and assign ranks 1 through 9.
    /// Equal means are broken by the canonical cell order so repeated runs
    /// on the same input produce the same table.
    pub fn rank_cells(&mut self) {
        if self.cell_means.is_empty() {
            self.calculate_cell_means();
        }

        let mut ordered: Vec<(CellName, f64)> = CellName::CANONICAL
            .iter()
            .map(|name| (*name, self.cell_means.get(name).copied().unwrap_or(0.0)))
            .collect();
        ordered.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.canonical_index().cmp(&b.0.canonical_index()))
        });

        let mut ranks = HashMap::new();
        for (i, (name, _)) in ordered.iter().enumerate() {
            ranks.insert(*name, (i + 1) as u32);
        }
        self.cell_ranks = ranks;
    }

    /// Match the grouping catalogs against the rank table, filling
    /// `self.trends`. Recorded entries survive re-detection untouched.
    pub fn detect_trends(&mut self) {
        if self.cell_ranks.is_empty() {
            self.rank_cells();
        }
        trend::find_clusters(&self.cell_ranks, &mut self.trends);
    }

    /// Run the aggregation pipeline in its fixed order:
    /// means, then ranks, then trend detection.
    pub fn analyze(&mut self) {
        self.calculate_cell_means();
        self.rank_cells();
        self.detect_trends();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use more_asserts::{assert_ge, assert_le};

    fn seattle_box() -> BoundingBox {
        BoundingBox::new(-122.6, 47.2, -122.0, 47.8)
    }

    fn unit_box() -> BoundingBox {
        BoundingBox::new(0.0, 0.0, 9.0, 9.0)
    }

    /// One entity centered in each cell, metrics descending in canonical
    /// cell order: NW 100, N 90, ... SE 20.
    fn one_entity_per_cell(grid: &Grid) -> Vec<Entity> {
        let metrics: HashMap<CellName, f64> = CellName::CANONICAL
            .iter()
            .enumerate()
            .map(|(i, name)| (*name, 100.0 - 10.0 * i as f64))
            .collect();

        grid.cells
            .iter()
            .map(|cell| {
                let cx = (cell.left + cell.right) / 2.0;
                let cy = (cell.bottom + cell.top) / 2.0;
                Entity::new(format!("cell-{}", cell.name), metrics[&cell.name], cx, cy)
            })
            .collect()
    }

    #[test]
    fn test_nine_cells_tile_the_box() {
        let bbox = seattle_box();
        let grid = Grid::new(bbox);
        assert_eq!(grid.cells.len(), 9);

        // enumeration order is bottom-to-top, left-to-right
        let order: Vec<CellName> = grid.cells.iter().map(|c| c.name).collect();
        assert_eq!(order, vec![SW, S, SE, W, C, E, NW, N, NE]);

        // outer edges coincide with the box
        let sw = grid.cell(SW).unwrap();
        let ne = grid.cell(NE).unwrap();
        assert_abs_diff_eq!(sw.left, bbox.min_lon, epsilon = 1e-12);
        assert_abs_diff_eq!(sw.bottom, bbox.min_lat, epsilon = 1e-12);
        assert_abs_diff_eq!(ne.right, bbox.max_lon, epsilon = 1e-12);
        assert_abs_diff_eq!(ne.top, bbox.max_lat, epsilon = 1e-12);

        // adjacent cells share their boundary rows and columns exactly
        let s = grid.cell(S).unwrap();
        let c = grid.cell(C).unwrap();
        assert_abs_diff_eq!(s.top, c.bottom, epsilon = 1e-12);
        assert_abs_diff_eq!(sw.right, s.left, epsilon = 1e-12);

        // every interior point lands in at least one cell
        for i in 0..=10 {
            for j in 0..=10 {
                let x = bbox.min_lon + bbox.width() * i as f64 / 10.0;
                let y = bbox.min_lat + bbox.height() * j as f64 / 10.0;
                assert!(grid.find_cell(x, y).is_some(), "gap at ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_boundary_points_claimed_by_enumeration_order() {
        let grid = Grid::new(unit_box());
        // (3,3) sits on the SW/S/W/C corner; SW is enumerated first
        assert_eq!(grid.find_cell(3.0, 3.0), Some(SW));
        // (4.5,3) is on the S/C edge; S comes before C
        assert_eq!(grid.find_cell(4.5, 3.0), Some(S));
    }

    #[test]
    fn test_assignment_keeps_out_of_bounds_entities_global() {
        let mut grid = Grid::new(unit_box());
        let mut entities = one_entity_per_cell(&grid);
        entities.push(Entity::new("outside", 500.0, 42.0, 42.0));
        grid.load_entities(entities);

        assert_eq!(grid.entities.len(), 10);
        assert_eq!(grid.assigned_count(), 9);
        assert_eq!(grid.unassigned_count(), 1);
        let outside = grid.entities.iter().find(|e| e.id == "outside").unwrap();
        assert!(outside.cell.is_none());
    }

    #[test]
    fn test_each_entity_assigned_to_its_cell() {
        let mut grid = Grid::new(seattle_box());
        let entities = one_entity_per_cell(&grid);
        grid.load_entities(entities);

        assert_eq!(grid.assigned_count(), 9);
        assert_eq!(grid.unassigned_count(), 0);
        for name in CellName::CANONICAL {
            assert_eq!(grid.cell_entities[&name].len(), 1, "cell {name}");
            let idx = grid.cell_entities[&name][0];
            assert_eq!(grid.entities[idx].cell, Some(name));
        }
    }

    #[test]
    fn test_means_and_empty_cell_placeholder() {
        let mut grid = Grid::new(unit_box());
        // two entities in SW, none anywhere else
        grid.load_entities(vec![
            Entity::new("a", 10.0, 1.0, 1.0),
            Entity::new("b", 20.0, 2.0, 2.0),
        ]);
        grid.calculate_cell_means();

        assert_abs_diff_eq!(grid.cell_means[&SW], 15.0, epsilon = 1e-12);
        for name in CellName::CANONICAL {
            if name != SW {
                assert_eq!(grid.cell_means[&name], 0.0, "cell {name}");
            }
        }
    }

    #[test]
    fn test_ranks_are_a_permutation() {
        let mut grid = Grid::new(seattle_box());
        grid.load_entities(one_entity_per_cell(&grid));
        grid.calculate_cell_means();
        grid.rank_cells();

        let mut seen: Vec<u32> = grid.cell_ranks.values().copied().collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
        for rank in grid.cell_ranks.values() {
            assert_ge!(*rank, 1);
            assert_le!(*rank, 9);
        }

        // metrics descend in canonical order, so ranks follow it exactly
        for (i, name) in CellName::CANONICAL.iter().enumerate() {
            assert_eq!(grid.cell_ranks[name], (i + 1) as u32, "cell {name}");
        }
    }

    #[test]
    fn test_equal_means_break_ties_canonically() {
        let mut grid = Grid::new(unit_box());
        grid.load_entities(Vec::new());
        grid.rank_cells();

        // all means are zero; the canonical order decides the whole table
        for (i, name) in CellName::CANONICAL.iter().enumerate() {
            assert_eq!(grid.cell_ranks[name], (i + 1) as u32);
        }

        // and the result is stable across runs on identical input
        let mut again = Grid::new(unit_box());
        again.load_entities(Vec::new());
        again.rank_cells();
        assert_eq!(grid.cell_ranks, again.cell_ranks);
    }

    #[test]
    fn test_degenerate_box_still_builds_nine_cells() {
        let grid = Grid::new(BoundingBox::new(5.0, 3.0, 5.0, 3.0));
        assert_eq!(grid.cells.len(), 9);
        for cell in &grid.cells {
            assert_eq!(cell.width(), 0.0);
            assert_eq!(cell.height(), 0.0);
        }
        // only the exact corner is a member
        assert_eq!(grid.find_cell(5.0, 3.0), Some(SW));
        assert_eq!(grid.find_cell(5.0, 3.0000001), None);
    }

    #[test]
    fn test_analyze_pipeline_is_repeatable() {
        let mut grid = Grid::new(seattle_box());
        grid.load_entities(one_entity_per_cell(&grid));
        grid.analyze();

        let means = grid.cell_means.clone();
        let ranks = grid.cell_ranks.clone();
        let trends = grid.trends.clone();

        grid.analyze();
        assert_eq!(grid.cell_means, means);
        assert_eq!(grid.cell_ranks, ranks);
        assert_eq!(grid.trends, trends);
    }
}
