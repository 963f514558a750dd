//! Spatial features carrying one scalar metric and a point centroid.

use crate::cell::CellName;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One spatial feature extracted from a viewport query row.
///
/// The geometry itself stays with the data-access layer; the core only sees
/// the already-computed centroid and metric. An entity is owned by exactly
/// one [`Grid`](crate::grid::Grid) for the duration of one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Stable feature identifier (e.g. a census GEOID).
    pub id: String,
    /// The scalar being regionalized (e.g. population density).
    pub metric: f64,
    /// Point centroid as (lon, lat).
    pub centroid: DVec2,
    /// Descriptive attributes carried through to the report (region name,
    /// sub-region name, ...). May be empty.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, String>,
    /// Cell this entity was assigned to; set once by the grid, `None` until
    /// assignment runs or when the centroid fell outside every cell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell: Option<CellName>,
}

impl Entity {
    pub fn new(id: impl Into<String>, metric: f64, lon: f64, lat: f64) -> Self {
        Self {
            id: id.into(),
            metric,
            centroid: DVec2::new(lon, lat),
            attributes: HashMap::new(),
            cell: None,
        }
    }

    /// Attach a descriptive attribute, builder-style.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Build an entity from a raw query row where metric and centroid may be
    /// missing. Rows without either are rejected here so the rest of the
    /// core can assume well-formed entities.
    pub fn from_record(
        id: impl Into<String>,
        metric: Option<f64>,
        centroid: Option<(f64, f64)>,
    ) -> Result<Self, String> {
        let id = id.into();
        let metric = metric.ok_or_else(|| format!("row {}: missing metric value", id))?;
        let (lon, lat) = centroid.ok_or_else(|| format!("row {}: missing centroid", id))?;
        Ok(Self::new(id, metric, lon, lat))
    }

    /// Record the owning cell. The grid calls this exactly once per entity;
    /// a later call is ignored so an assignment can never be re-pointed.
    pub fn assign_cell(&mut self, name: CellName) {
        if self.cell.is_none() {
            self.cell = Some(name);
        }
    }
}
