#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomized depth-first maze carving.
//!
//! Rooms sit on odd grid indices and are separated by connector cells. The
//! generator walks the room lattice with an explicit stack, knocking out the
//! connector between the current room and a randomly chosen unvisited
//! neighbour until every room has been visited. The carved cells therefore
//! form a spanning tree: exactly one simple path joins any two rooms.

use maze_runner_core::{CellCoord, CellKind, Grid, MazeDimensions};
use rand::Rng;

/// Builds a perfect maze of the requested size from the provided random source.
///
/// The same random stream always yields the same grid. Room `(1, 1)` becomes
/// the start and the bottom-right room becomes the finish; for a single-room
/// maze both coincide and the finish wins.
pub fn generate<R>(dimensions: MazeDimensions, rng: &mut R) -> Grid
where
    R: Rng + ?Sized,
{
    let mut grid = Grid::walls_for(dimensions);
    let start = dimensions.start_cell();
    grid.set(start, CellKind::Open);

    let mut stack = vec![start];
    let mut candidates: Vec<CellCoord> = Vec::with_capacity(4);
    while let Some(&current) = stack.last() {
        candidates.clear();
        candidates.extend(
            room_neighbours(current, &grid)
                .into_iter()
                .flatten()
                .filter(|neighbour| grid.get(*neighbour) == Some(CellKind::Wall)),
        );

        if candidates.is_empty() {
            let _ = stack.pop();
            continue;
        }

        let next = candidates[rng.gen_range(0..candidates.len())];
        grid.set(connector_between(current, next), CellKind::Open);
        grid.set(next, CellKind::Open);
        stack.push(next);
    }

    grid.set(start, CellKind::Start);
    grid.set(dimensions.finish_cell(), CellKind::Finish);
    grid
}

/// Rooms two cells away in the order up, down, left, right.
fn room_neighbours(room: CellCoord, grid: &Grid) -> [Option<CellCoord>; 4] {
    let column = room.column();
    let row = room.row();
    let inside = |cell: CellCoord| {
        (cell.column() < grid.columns().saturating_sub(1)
            && cell.row() < grid.rows().saturating_sub(1))
        .then_some(cell)
    };

    [
        row.checked_sub(2)
            .filter(|row| *row >= 1)
            .map(|row| CellCoord::new(column, row)),
        inside(CellCoord::new(column, row + 2)),
        column
            .checked_sub(2)
            .filter(|column| *column >= 1)
            .map(|column| CellCoord::new(column, row)),
        inside(CellCoord::new(column + 2, row)),
    ]
}

fn connector_between(from: CellCoord, to: CellCoord) -> CellCoord {
    CellCoord::new(
        (from.column() + to.column()) / 2,
        (from.row() + to.row()) / 2,
    )
}
