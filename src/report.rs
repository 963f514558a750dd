//! The per-viewport response payload and its console / narrative renderings.

use crate::grid::Grid;
use crate::summary::Summary;
use crate::trend::{Region, TrendReport};
use colored::Colorize;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::cell::CellName;
use crate::entity::Entity;

/// Human phrases for each region, used when rendering trends as prose.
static REGION_PHRASES: Lazy<HashMap<Region, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (Region::NW, "Northwest"),
        (Region::N, "North"),
        (Region::NE, "Northeast"),
        (Region::W, "West"),
        (Region::C, "Central"),
        (Region::E, "East"),
        (Region::SW, "Southwest"),
        (Region::S, "South"),
        (Region::SE, "Southeast"),
        (Region::LeftDiagonal, "diagonally from Northwest to Southeast"),
        (Region::RightDiagonal, "diagonally from Southwest to Northeast"),
        (Region::Horizontal, "horizontally across the center"),
        (Region::Vertical, "vertically through the center"),
    ])
});

/// Everything the presentation layer needs from one viewport query:
/// the trends mapping over all 13 regions, the extremal entities, and the
/// mean/median scalars. Serialization-agnostic; serde covers whatever wire
/// format the caller picks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportReport {
    pub trends: TrendReport,
    pub min: Entity,
    pub max: Entity,
    pub mean: f64,
    pub median: f64,
}

impl ViewportReport {
    /// Assemble the response from an analyzed grid. Fails with the summary
    /// module's no-data error when the grid holds no entities.
    pub fn from_grid(grid: &Grid) -> Result<Self, String> {
        let summary = Summary::from_grid(grid)?;
        Ok(Self {
            trends: grid.trends.clone(),
            min: summary.min,
            max: summary.max,
            mean: summary.mean,
            median: summary.median,
        })
    }
}

/// Join region phrases the way the map overlay words them: directional
/// regions get an article ("in the Northwest, the North"), axis regions
/// stand alone ("diagonally from Northwest to Southeast").
fn phrase_list(regions: &[Region]) -> String {
    let mut parts = Vec::with_capacity(regions.len());
    let mut saw_directional = false;
    for region in regions {
        let phrase = REGION_PHRASES[region];
        if region.is_axis() {
            parts.push(phrase.to_string());
        } else if saw_directional {
            parts.push(format!("the {phrase}"));
        } else {
            saw_directional = true;
            parts.push(format!("in the {phrase}"));
        }
    }

    match parts.len() {
        0 => String::new(),
        1 => parts.remove(0),
        2 => format!("{} and {}", parts[0], parts[1]),
        _ => {
            let last = parts.pop().unwrap_or_default();
            format!("{}, and {}", parts.join(", "), last)
        }
    }
}

/// English sentences describing the detected trends, e.g.
/// "Population density is high in the Northwest and the North."
pub fn narrative(trends: &TrendReport, metric_label: &str) -> String {
    let mut lines = Vec::new();

    let highs = trends.high_regions();
    if highs.is_empty() {
        lines.push(format!("No regions with particularly high {metric_label}."));
    } else {
        lines.push(format!(
            "{metric_label} is high {}.",
            phrase_list(&highs)
        ));
    }

    let lows = trends.low_regions();
    if lows.is_empty() {
        lines.push(format!("No regions with particularly low {metric_label}."));
    } else {
        lines.push(format!("{metric_label} is low {}.", phrase_list(&lows)));
    }

    lines.join("\n")
}

/// Aligned console report: the 3x3 mean/rank table, recorded clusters, and
/// the global statistics.
pub fn print_report(grid: &Grid, report: &ViewportReport, metric_label: &str) {
    println!("🗺️  Viewport trend report ({metric_label})");
    println!(
        "   viewport: ({:.4}, {:.4}) .. ({:.4}, {:.4}), {} entities, {} outside",
        grid.bbox.min_lon,
        grid.bbox.min_lat,
        grid.bbox.max_lon,
        grid.bbox.max_lat,
        grid.entities.len(),
        grid.unassigned_count()
    );

    println!();
    println!("   {:>4} {:>12} {:>5} {:>8}", "cell", "mean", "rank", "entities");
    println!("   {:->4} {:->12} {:->5} {:->8}", "", "", "", "");
    for name in CellName::CANONICAL {
        let mean = grid.cell_means.get(&name).copied().unwrap_or(0.0);
        let rank = grid.cell_ranks.get(&name).copied().unwrap_or(0);
        let count = grid.cell_entities.get(&name).map_or(0, Vec::len);
        println!("   {:>4} {:>12.2} {:>5} {:>8}", name.to_string(), mean, rank, count);
    }

    println!();
    for (region, trend) in report.trends.iter() {
        if let Some(grouping) = &trend.high {
            let cells: Vec<String> = grouping.iter().map(|c| c.to_string()).collect();
            println!(
                "   {} {:<14} {}",
                "high".green().bold(),
                region.to_string(),
                cells.join("+")
            );
        }
        if let Some(grouping) = &trend.low {
            let cells: Vec<String> = grouping.iter().map(|c| c.to_string()).collect();
            println!(
                "   {}  {:<14} {}",
                "low".red().bold(),
                region.to_string(),
                cells.join("+")
            );
        }
    }
    if report.trends.is_empty() {
        println!("   no directional clusters detected");
    }

    println!();
    println!("{}", narrative(&report.trends, metric_label));
    println!();
    println!(
        "   mean {:.2} | median {:.2} | max {} = {:.2} | min {} = {:.2}",
        report.mean, report.median, report.max.id, report.max.metric, report.min.id,
        report.min.metric
    );
}
