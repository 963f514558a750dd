//! Directional trend detection over a ranked cell table.
//!
//! Three fixed catalogs map groupings of adjacent cells to named regions.
//! A grouping whose sorted ranks occupy the top of the 1-9 range marks its
//! region as a "high" cluster, the bottom of the range marks a "low" one.
//! Catalogs are evaluated largest first and a recorded entry is never
//! overwritten, so the most specific supporting cluster wins and re-running
//! detection on the same rank table changes nothing.

use crate::cell::CellName;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use CellName::*;

/// One of the 13 named regions a trend can be reported for.
///
/// The nine compass regions share labels with cell names but denote
/// super-regions spanning several cells; the four axis regions cut across
/// the grid.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Region {
    NW,
    N,
    NE,
    W,
    C,
    E,
    SW,
    S,
    SE,
    #[serde(rename = "left_diagonal")]
    LeftDiagonal,
    #[serde(rename = "right_diagonal")]
    RightDiagonal,
    #[serde(rename = "horizontal")]
    Horizontal,
    #[serde(rename = "vertical")]
    Vertical,
}

impl Region {
    pub const ALL: [Region; 13] = [
        Region::NW,
        Region::N,
        Region::NE,
        Region::W,
        Region::C,
        Region::E,
        Region::SW,
        Region::S,
        Region::SE,
        Region::LeftDiagonal,
        Region::RightDiagonal,
        Region::Horizontal,
        Region::Vertical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::NW => "NW",
            Region::N => "N",
            Region::NE => "NE",
            Region::W => "W",
            Region::C => "C",
            Region::E => "E",
            Region::SW => "SW",
            Region::S => "S",
            Region::SE => "SE",
            Region::LeftDiagonal => "left_diagonal",
            Region::RightDiagonal => "right_diagonal",
            Region::Horizontal => "horizontal",
            Region::Vertical => "vertical",
        }
    }

    /// Axis regions are phrased differently in narrative output
    /// ("diagonally from..." rather than "in the ...").
    pub fn is_axis(&self) -> bool {
        matches!(
            self,
            Region::LeftDiagonal | Region::RightDiagonal | Region::Horizontal | Region::Vertical
        )
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Quadrant super-regions: each grouping spans a 2x2 block of cells.
pub const FOUR_CELL_CATALOG: [(&[CellName], Region); 4] = [
    (&[NW, W, N, C], Region::NW),
    (&[N, NE, C, E], Region::NE),
    (&[W, SW, C, S], Region::SW),
    (&[C, E, S, SE], Region::SE),
];

/// L-shaped corner triples, edge triples, and the four axis triples.
pub const THREE_CELL_CATALOG: [(&[CellName], Region); 12] = [
    (&[NW, N, W], Region::NW),
    (&[W, SW, S], Region::SW),
    (&[N, NE, E], Region::NE),
    (&[S, SE, E], Region::SE),
    (&[NW, W, SW], Region::W),
    (&[NE, E, SE], Region::E),
    (&[NW, N, NE], Region::N),
    (&[SW, S, SE], Region::S),
    (&[NW, C, SE], Region::LeftDiagonal),
    (&[NE, C, SW], Region::RightDiagonal),
    (&[W, C, E], Region::Horizontal),
    (&[N, C, S], Region::Vertical),
];

/// Edge-adjacent pairs flanking each corner; two groupings per quadrant.
pub const TWO_CELL_CATALOG: [(&[CellName], Region); 8] = [
    (&[NW, W], Region::NW),
    (&[NW, N], Region::NW),
    (&[N, NE], Region::NE),
    (&[NE, E], Region::NE),
    (&[E, SE], Region::SE),
    (&[SE, S], Region::SE),
    (&[S, SW], Region::SW),
    (&[SW, W], Region::SW),
];

const FOUR_CELL_HIGH: &[&[u32]] = &[&[1, 2, 3, 4]];
const FOUR_CELL_LOW: &[&[u32]] = &[&[6, 7, 8, 9]];
const THREE_CELL_HIGH: &[&[u32]] = &[&[1, 2, 3], &[2, 3, 4]];
const THREE_CELL_LOW: &[&[u32]] = &[&[7, 8, 9], &[6, 7, 8]];
const TWO_CELL_HIGH: &[&[u32]] = &[&[1, 2], &[2, 3], &[3, 4]];
const TWO_CELL_LOW: &[&[u32]] = &[&[6, 7], &[7, 8], &[8, 9]];

/// Recorded high/low clusters for one region. Both slots may be absent;
/// a single grouping can never set both.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RegionTrend {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Vec<CellName>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<Vec<CellName>>,
}

/// The trends mapping of the output contract: every one of the 13 regions is
/// present, each with its (possibly absent) high and low grouping.
///
/// This map is the single source of truth for dedup across overlapping
/// catalogs: [`record_high`](TrendReport::record_high) and
/// [`record_low`](TrendReport::record_low) insert only into empty slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrendReport {
    regions: BTreeMap<Region, RegionTrend>,
}

impl TrendReport {
    pub fn new() -> Self {
        let mut regions = BTreeMap::new();
        for region in Region::ALL {
            regions.insert(region, RegionTrend::default());
        }
        Self { regions }
    }

    pub fn get(&self, region: Region) -> &RegionTrend {
        &self.regions[&region]
    }

    /// Record a high cluster unless the region already has one.
    /// Returns whether the grouping was recorded.
    pub fn record_high(&mut self, region: Region, grouping: &[CellName]) -> bool {
        let slot = self.regions.entry(region).or_default();
        if slot.high.is_none() {
            slot.high = Some(grouping.to_vec());
            true
        } else {
            false
        }
    }

    /// Record a low cluster unless the region already has one.
    pub fn record_low(&mut self, region: Region, grouping: &[CellName]) -> bool {
        let slot = self.regions.entry(region).or_default();
        if slot.low.is_none() {
            slot.low = Some(grouping.to_vec());
            true
        } else {
            false
        }
    }

    /// Regions with a recorded high cluster, in stable region order.
    pub fn high_regions(&self) -> Vec<Region> {
        self.regions
            .iter()
            .filter(|(_, t)| t.high.is_some())
            .map(|(r, _)| *r)
            .collect()
    }

    /// Regions with a recorded low cluster, in stable region order.
    pub fn low_regions(&self) -> Vec<Region> {
        self.regions
            .iter()
            .filter(|(_, t)| t.low.is_some())
            .map(|(r, _)| *r)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.values().all(|t| t.high.is_none() && t.low.is_none())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Region, &RegionTrend)> {
        self.regions.iter()
    }
}

impl Default for TrendReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect the ranks of a grouping's members, sorted ascending.
/// `None` if any member is missing from the rank table.
fn sorted_ranks(grouping: &[CellName], ranks: &HashMap<CellName, u32>) -> Option<Vec<u32>> {
    let mut collected = Vec::with_capacity(grouping.len());
    for name in grouping {
        collected.push(*ranks.get(name)?);
    }
    collected.sort_unstable();
    Some(collected)
}

fn matches_any(sorted: &[u32], rules: &[&[u32]]) -> bool {
    rules.iter().any(|rule| sorted == *rule)
}

fn apply_catalog(
    catalog: &[(&[CellName], Region)],
    high_rules: &[&[u32]],
    low_rules: &[&[u32]],
    ranks: &HashMap<CellName, u32>,
    report: &mut TrendReport,
) {
    for (grouping, region) in catalog {
        let Some(sorted) = sorted_ranks(grouping, ranks) else {
            continue;
        };
        if matches_any(&sorted, high_rules) {
            report.record_high(*region, grouping);
        } else if matches_any(&sorted, low_rules) {
            report.record_low(*region, grouping);
        }
    }
}

/// Match every catalog against the rank table, recording clusters into
/// `report`. Four-cell groupings run first, then three-, then two-cell, and
/// existing entries are never replaced.
pub fn find_clusters(ranks: &HashMap<CellName, u32>, report: &mut TrendReport) {
    apply_catalog(&FOUR_CELL_CATALOG, FOUR_CELL_HIGH, FOUR_CELL_LOW, ranks, report);
    apply_catalog(&THREE_CELL_CATALOG, THREE_CELL_HIGH, THREE_CELL_LOW, ranks, report);
    apply_catalog(&TWO_CELL_CATALOG, TWO_CELL_HIGH, TWO_CELL_LOW, ranks, report);
}
