// Scatters random entities over a viewport with a northwest density bias
// and reports whatever trends the detector finds.

use map_trends_rust::bbox::BoundingBox;
use map_trends_rust::entity::Entity;
use map_trends_rust::grid::Grid;
use map_trends_rust::report::{print_report, ViewportReport};
use rand::Rng;

const ENTITY_COUNT: usize = 200;

fn main() -> Result<(), String> {
    let bbox = BoundingBox::new(-122.6, 47.2, -122.0, 47.8);
    let mut grid = Grid::new(bbox);
    let mut rng = rand::rng();

    let mut entities = Vec::with_capacity(ENTITY_COUNT);
    for i in 0..ENTITY_COUNT {
        let lon = rng.random_range(bbox.min_lon..=bbox.max_lon);
        let lat = rng.random_range(bbox.min_lat..=bbox.max_lat);

        // bias: density falls off with distance from the NW corner
        let dx = (lon - bbox.min_lon) / bbox.width();
        let dy = (bbox.max_lat - lat) / bbox.height();
        let falloff = 1.0 - (dx * dx + dy * dy).sqrt() / std::f64::consts::SQRT_2;
        let metric = 500.0 + 9000.0 * falloff + rng.random_range(0.0..500.0);

        entities.push(Entity::new(format!("tract-{i:04}"), metric, lon, lat));
    }

    grid.load_entities(entities);
    grid.analyze();

    let report = ViewportReport::from_grid(&grid)?;
    print_report(&grid, &report, "Population density");

    Ok(())
}
