//! The nine named cells a viewport splits into.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label of one of the nine fixed grid cells.
///
/// The compass names refer to position inside the current viewport, not to
/// absolute geography: `NW` is the top-left third of whatever box the grid
/// was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CellName {
    NW,
    N,
    NE,
    W,
    C,
    E,
    SW,
    S,
    SE,
}

impl CellName {
    /// Canonical order used for deterministic rank tie-breaking.
    pub const CANONICAL: [CellName; 9] = [
        CellName::NW,
        CellName::N,
        CellName::NE,
        CellName::W,
        CellName::C,
        CellName::E,
        CellName::SW,
        CellName::S,
        CellName::SE,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CellName::NW => "NW",
            CellName::N => "N",
            CellName::NE => "NE",
            CellName::W => "W",
            CellName::C => "C",
            CellName::E => "E",
            CellName::SW => "SW",
            CellName::S => "S",
            CellName::SE => "SE",
        }
    }

    /// Position in [`CellName::CANONICAL`], the tie-break key for ranking.
    pub fn canonical_index(&self) -> usize {
        Self::CANONICAL.iter().position(|c| c == self).unwrap_or(0)
    }
}

impl fmt::Display for CellName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One rectangular cell of the 3x3 viewport grid, closed on all four edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
    pub name: CellName,
}

impl Cell {
    pub fn new(left: f64, right: f64, bottom: f64, top: f64, name: CellName) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
            name,
        }
    }

    /// Closed-interval membership on both axes. Points on a shared boundary
    /// satisfy this for two (or four) cells; the grid resolves the overlap
    /// by taking the first match in its enumeration order.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.left <= x && x <= self.right && self.bottom <= y && y <= self.top
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }
}
