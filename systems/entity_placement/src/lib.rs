#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Probabilistic placement of hazards and pickups over a generated maze.
//!
//! Placement order is part of the contract. Traps claim cells first,
//! powerups skip anything already claimed, and pyramids skip both. Eyes are
//! scattered in an independent pass and may share a cell with any other
//! entity.

use std::collections::BTreeSet;

use maze_runner_core::{CellCoord, EntityKind, EntityLayout, Grid};
use rand::{seq::SliceRandom, Rng};

/// Chance that any eligible cell receives an eye.
pub const EYE_PROBABILITY: f64 = 0.05;
/// Chance that any eligible cell receives a trap.
pub const TRAP_PROBABILITY: f64 = 0.10;
/// Chance that any eligible cell receives a powerup.
pub const POWERUP_PROBABILITY: f64 = 0.05;
/// Chance that any eligible cell receives a pyramid.
pub const PYRAMID_PROBABILITY: f64 = 0.03;
/// Rooms along each axis of the hazard-free area around the start.
pub const EXCLUSION_ROOMS: u32 = 4;

/// Per-kind Bernoulli probabilities used when populating a maze.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnRates {
    eye: f64,
    trap: f64,
    powerup: f64,
    pyramid: f64,
}

impl SpawnRates {
    /// Creates a new set of spawn rates.
    #[must_use]
    pub const fn new(eye: f64, trap: f64, powerup: f64, pyramid: f64) -> Self {
        Self {
            eye,
            trap,
            powerup,
            pyramid,
        }
    }

    /// Probability that an eligible cell receives an entity of the given kind.
    #[must_use]
    pub const fn probability(&self, kind: EntityKind) -> f64 {
        match kind {
            EntityKind::Eye => self.eye,
            EntityKind::Trap => self.trap,
            EntityKind::Powerup => self.powerup,
            EntityKind::Pyramid => self.pyramid,
        }
    }
}

impl Default for SpawnRates {
    fn default() -> Self {
        Self::new(
            EYE_PROBABILITY,
            TRAP_PROBABILITY,
            POWERUP_PROBABILITY,
            PYRAMID_PROBABILITY,
        )
    }
}

/// Square area anchored at the maze origin that never hosts entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExclusionZone {
    rooms: u32,
}

impl ExclusionZone {
    /// Creates a zone covering the first `rooms × rooms` rooms.
    #[must_use]
    pub const fn new(rooms: u32) -> Self {
        Self { rooms }
    }

    /// Reports whether the cell lies inside the zone, including its surrounding walls.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        let bound = self.rooms * 2 + 1;
        cell.column() < bound && cell.row() < bound
    }
}

impl Default for ExclusionZone {
    fn default() -> Self {
        Self::new(EXCLUSION_ROOMS)
    }
}

/// Selects walkable cells outside the zone and the occupied set with independent probability.
///
/// Cells are visited in row-major order and each eligible cell consumes exactly
/// one Bernoulli draw. Ineligible cells consume no randomness.
pub fn place<R>(
    grid: &Grid,
    probability: f64,
    zone: ExclusionZone,
    occupied: &BTreeSet<CellCoord>,
    rng: &mut R,
) -> Vec<CellCoord>
where
    R: Rng + ?Sized,
{
    if probability.is_nan() || probability <= 0.0 {
        return Vec::new();
    }
    let probability = probability.min(1.0);

    grid.iter()
        .filter(|(cell, kind)| {
            kind.is_walkable() && !zone.contains(*cell) && !occupied.contains(cell)
        })
        .filter(|_| rng.gen_bool(probability))
        .map(|(cell, _)| cell)
        .collect()
}

/// Scatters every entity kind over the grid in the contractual order.
pub fn populate<R>(grid: &Grid, rates: SpawnRates, zone: ExclusionZone, rng: &mut R) -> EntityLayout
where
    R: Rng + ?Sized,
{
    let mut occupied = BTreeSet::new();

    let traps = place(grid, rates.probability(EntityKind::Trap), zone, &occupied, rng);
    occupied.extend(traps.iter().copied());

    let powerups = place(grid, rates.probability(EntityKind::Powerup), zone, &occupied, rng);
    occupied.extend(powerups.iter().copied());

    let pyramids = place(grid, rates.probability(EntityKind::Pyramid), zone, &occupied, rng);

    let eyes = place(
        grid,
        rates.probability(EntityKind::Eye),
        zone,
        &BTreeSet::new(),
        rng,
    );

    EntityLayout::new(eyes, traps, powerups, pyramids)
}

/// Draws a uniformly random walkable cell outside the zone.
///
/// Returns `None` when the whole maze lies inside the zone.
pub fn random_spawn<R>(grid: &Grid, zone: ExclusionZone, rng: &mut R) -> Option<CellCoord>
where
    R: Rng + ?Sized,
{
    let candidates: Vec<CellCoord> = grid
        .iter()
        .filter(|(cell, kind)| kind.is_walkable() && !zone.contains(*cell))
        .map(|(cell, _)| cell)
        .collect();
    candidates.choose(rng).copied()
}
