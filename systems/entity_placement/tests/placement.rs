use std::collections::BTreeSet;

use maze_runner_core::{CellCoord, EntityKind, EntityLayout, Grid, MazeDimensions};
use maze_runner_system_entity_placement::{
    place, populate, random_spawn, ExclusionZone, SpawnRates,
};
use maze_runner_system_maze_generation::generate;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn maze(width: u32, height: u32, seed: u64) -> Grid {
    let dimensions = MazeDimensions::try_new(width, height).expect("non-zero dimensions");
    generate(dimensions, &mut ChaCha8Rng::seed_from_u64(seed))
}

fn populated(grid: &Grid, rates: SpawnRates, seed: u64) -> EntityLayout {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    populate(grid, rates, ExclusionZone::default(), &mut rng)
}

fn cell_set(layout: &EntityLayout, kind: EntityKind) -> BTreeSet<CellCoord> {
    layout.cells(kind).iter().copied().collect()
}

#[test]
fn entities_avoid_the_starting_area() {
    let grid = maze(15, 15, 11);
    let zone = ExclusionZone::default();
    for seed in 0..10 {
        let layout = populated(&grid, SpawnRates::new(0.5, 0.5, 0.5, 0.5), seed);
        for entity in layout.iter() {
            assert!(
                !zone.contains(entity.cell),
                "{:?} placed inside the exclusion zone at {:?}",
                entity.kind,
                entity.cell
            );
            assert!(entity.cell.column() >= 9 || entity.cell.row() >= 9);
        }
    }
}

#[test]
fn entities_only_occupy_walkable_cells() {
    let grid = maze(12, 12, 4);
    let layout = populated(&grid, SpawnRates::new(0.3, 0.3, 0.3, 0.3), 8);
    assert!(!layout.is_empty());
    for entity in layout.iter() {
        assert!(!grid.is_wall(entity.cell), "{entity:?} sits inside a wall");
    }
}

#[test]
fn pickups_never_share_cells_with_traps_or_each_other() {
    let grid = maze(14, 14, 21);
    for seed in 0..10 {
        let layout = populated(&grid, SpawnRates::new(0.2, 0.3, 0.4, 0.6), seed);
        let traps = cell_set(&layout, EntityKind::Trap);
        let powerups = cell_set(&layout, EntityKind::Powerup);
        let pyramids = cell_set(&layout, EntityKind::Pyramid);

        assert!(traps.is_disjoint(&powerups), "seed {seed}: powerup on a trap");
        assert!(traps.is_disjoint(&pyramids), "seed {seed}: pyramid on a trap");
        assert!(powerups.is_disjoint(&pyramids), "seed {seed}: pyramid on a powerup");
    }
}

#[test]
fn placement_order_gives_traps_priority() {
    let grid = maze(10, 10, 2);
    let layout = populated(&grid, SpawnRates::new(0.0, 1.0, 1.0, 1.0), 3);
    let eligible = grid
        .iter()
        .filter(|(cell, kind)| kind.is_walkable() && !ExclusionZone::default().contains(*cell))
        .count();

    assert_eq!(layout.cells(EntityKind::Trap).len(), eligible);
    assert!(layout.cells(EntityKind::Powerup).is_empty());
    assert!(layout.cells(EntityKind::Pyramid).is_empty());
}

#[test]
fn eyes_ignore_the_occupied_set() {
    let grid = maze(10, 10, 6);
    let layout = populated(&grid, SpawnRates::new(1.0, 1.0, 0.0, 0.0), 9);
    let eyes = cell_set(&layout, EntityKind::Eye);
    let traps = cell_set(&layout, EntityKind::Trap);

    assert!(!eyes.is_empty());
    assert_eq!(eyes, traps, "every trap cell should also host an eye");
}

#[test]
fn occupied_cells_are_skipped() {
    let grid = maze(10, 10, 1);
    let zone = ExclusionZone::default();
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    let first = place(&grid, 1.0, zone, &BTreeSet::new(), &mut rng);
    let occupied: BTreeSet<CellCoord> = first.iter().copied().take(first.len() / 2).collect();

    let second = place(&grid, 1.0, zone, &occupied, &mut rng);
    assert_eq!(second.len(), first.len() - occupied.len());
    assert!(second.iter().all(|cell| !occupied.contains(cell)));
}

#[test]
fn placement_is_reproducible_for_a_seed() {
    let grid = maze(16, 12, 5);
    assert_eq!(
        populated(&grid, SpawnRates::default(), 77),
        populated(&grid, SpawnRates::default(), 77)
    );
}

#[test]
fn default_rates_match_gameplay_tuning() {
    let rates = SpawnRates::default();
    assert_eq!(rates.probability(EntityKind::Eye), 0.05);
    assert_eq!(rates.probability(EntityKind::Trap), 0.10);
    assert_eq!(rates.probability(EntityKind::Powerup), 0.05);
    assert_eq!(rates.probability(EntityKind::Pyramid), 0.03);
}

#[test]
fn random_spawn_lands_on_walkable_cells_outside_the_zone() {
    let grid = maze(12, 10, 13);
    let zone = ExclusionZone::default();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    for _ in 0..200 {
        let cell = random_spawn(&grid, zone, &mut rng).expect("maze extends past the zone");
        assert!(!grid.is_wall(cell));
        assert!(!zone.contains(cell));
    }
}

#[test]
fn random_spawn_reports_mazes_without_destinations() {
    let grid = maze(4, 4, 13);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert_eq!(random_spawn(&grid, ExclusionZone::default(), &mut rng), None);
}
