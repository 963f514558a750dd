// Walks the full pipeline on a fixed Seattle-ish viewport and prints the
// console report: a dense northwest corner against a sparse southeast.

use map_trends_rust::bbox::BoundingBox;
use map_trends_rust::entity::Entity;
use map_trends_rust::grid::Grid;
use map_trends_rust::report::{print_report, ViewportReport};

fn main() -> Result<(), String> {
    let bbox = BoundingBox::new(-122.6, 47.2, -122.0, 47.8);
    let mut grid = Grid::new(bbox);

    // tract centroids hand-placed per cell, density falling toward the SE
    let rows = vec![
        ("53033000100", Some(9800.0), Some((-122.55, 47.75))), // NW
        ("53033000200", Some(9100.0), Some((-122.52, 47.72))), // NW
        ("53033000300", Some(8000.0), Some((-122.35, 47.76))), // N
        ("53033000400", Some(7400.0), Some((-122.12, 47.74))), // NE
        ("53033000500", Some(6900.0), Some((-122.55, 47.50))), // W
        ("53033000600", Some(5200.0), Some((-122.30, 47.52))), // C
        ("53033000700", Some(4100.0), Some((-122.10, 47.48))), // E
        ("53033000800", Some(2600.0), Some((-122.56, 47.28))), // SW
        ("53033000900", Some(1900.0), Some((-122.32, 47.25))), // S
        ("53033001000", Some(800.0), Some((-122.05, 47.26))),  // SE
    ];

    let mut entities = Vec::with_capacity(rows.len());
    for (id, metric, centroid) in rows {
        entities.push(Entity::from_record(id, metric, centroid)?);
    }

    grid.load_entities(entities);
    grid.analyze();

    let report = ViewportReport::from_grid(&grid)?;
    print_report(&grid, &report, "Population density");

    println!();
    println!("wire payload:");
    let json = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
    println!("{json}");

    Ok(())
}
