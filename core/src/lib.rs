#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Runner engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems compute [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! changed. Renderers only ever observe immutable snapshots.

use std::{fmt, num::NonZeroU32, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Maze Runner.";

/// Side length of a single grid cell expressed in world units.
pub const CELL_SIZE: f32 = 2.0;

/// Heading, in degrees, assigned to the player whenever a run starts.
pub const START_YAW_DEGREES: f32 = 90.0;

/// Describes whether the run is still in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// The player is exploring the maze and the clock is running.
    Playing,
    /// The finish was reached; the clock is frozen until a reset.
    GameOver,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the maze and its entities, restarting the run from scratch.
    InstallMaze {
        /// Freshly generated maze grid.
        grid: Grid,
        /// Entities placed over the grid.
        entities: EntityLayout,
    },
    /// Restarts the run on the current maze, restoring the originally placed entities.
    ResetRun,
    /// Advances the session clock by the provided delta time.
    Tick {
        /// Duration of time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Replaces the player's pose with the outcome of a movement update.
    SetPlayerPose {
        /// Pose computed by the player controller.
        pose: PlayerPose,
    },
    /// Consumes a pickup the player touched, activating its effect.
    CollectPickup {
        /// Kind of entity that was touched.
        kind: EntityKind,
        /// Cell hosting the touched entity.
        cell: CellCoord,
    },
    /// Blinds the player and schedules a teleport for when the fade-in completes.
    BeginTeleport {
        /// Destination cell, or `None` when the maze offers no valid destination.
        destination: Option<CellCoord>,
    },
    /// Flips the manual slow-walk modifier.
    ToggleSlowWalk,
    /// Flips the visibility of a heads-up display element.
    ToggleHud {
        /// Element whose visibility should change.
        element: HudElement,
    },
    /// Freezes the clock and ends the run.
    DeclareVictory,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the session clock advanced.
    TimeAdvanced {
        /// Duration of time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that a new maze replaced the previous one.
    MazeInstalled {
        /// Number of grid columns in the new maze.
        columns: u32,
        /// Number of grid rows in the new maze.
        rows: u32,
    },
    /// Announces that the run restarted on the current maze.
    RunReset,
    /// Confirms that the player's pose changed.
    PlayerMoved {
        /// Pose before the update.
        from: PlayerPose,
        /// Pose after the update.
        to: PlayerPose,
    },
    /// Confirms that a pickup was consumed.
    PickupCollected {
        /// Kind of entity that was consumed.
        kind: EntityKind,
        /// Cell that hosted the consumed entity.
        cell: CellCoord,
    },
    /// Announces that a timed effect became active.
    EffectActivated {
        /// Effect that started.
        effect: EffectKind,
    },
    /// Announces that a timed effect ran out.
    EffectExpired {
        /// Effect that ended.
        effect: EffectKind,
    },
    /// Confirms that the player was moved to a teleport destination.
    PlayerTeleported {
        /// Cell the player now stands on.
        destination: CellCoord,
    },
    /// Reports the new state of the slow-walk modifier.
    SlowWalkToggled {
        /// Whether slow walk is now enabled.
        enabled: bool,
    },
    /// Reports the new visibility of a heads-up display element.
    HudToggled {
        /// Element whose visibility changed.
        element: HudElement,
        /// Whether the element is now visible.
        visible: bool,
    },
    /// Announces that the player reached the finish.
    GameWon {
        /// Elapsed time frozen at the moment of victory.
        final_time: Duration,
    },
}

/// Timed effects that can be active on the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Screen fades to black and back while the player is teleported.
    Blindness,
    /// Movement speed is doubled regardless of terrain.
    SpeedBoost,
    /// The player is thrown into the air and cannot move.
    Launch,
}

impl EffectKind {
    /// Total lifetime of the effect from activation to expiry.
    #[must_use]
    pub const fn duration(self) -> Duration {
        match self {
            Self::Blindness => Duration::from_millis(3_000),
            Self::SpeedBoost => Duration::from_millis(2_000),
            Self::Launch => Duration::from_millis(4_000),
        }
    }
}

/// Heads-up display elements the player may show or hide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HudElement {
    /// Top-down overview of the maze.
    Minimap,
    /// Entity markers drawn on the minimap.
    Icons,
    /// Explanation of the entity markers.
    Legend,
}

/// Visibility flags for every [`HudElement`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudToggles {
    minimap: bool,
    icons: bool,
    legend: bool,
}

impl HudToggles {
    /// Reports whether the element is currently visible.
    #[must_use]
    pub const fn is_visible(&self, element: HudElement) -> bool {
        match element {
            HudElement::Minimap => self.minimap,
            HudElement::Icons => self.icons,
            HudElement::Legend => self.legend,
        }
    }

    /// Flips the element's visibility and returns the new value.
    pub fn toggle(&mut self, element: HudElement) -> bool {
        let flag = match element {
            HudElement::Minimap => &mut self.minimap,
            HudElement::Icons => &mut self.icons,
            HudElement::Legend => &mut self.legend,
        };
        *flag = !*flag;
        *flag
    }
}

impl Default for HudToggles {
    fn default() -> Self {
        Self {
            minimap: true,
            icons: true,
            legend: false,
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// World-space centre of the cell.
    #[must_use]
    pub fn world_position(self) -> WorldPoint {
        WorldPoint::new(
            self.column as f32 * CELL_SIZE,
            self.row as f32 * CELL_SIZE,
        )
    }
}

/// Point on the maze floor expressed in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    /// Offset along the column axis.
    pub x: f32,
    /// Offset along the row axis.
    pub z: f32,
}

impl WorldPoint {
    /// Creates a new world point.
    #[must_use]
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Euclidean distance between two points on the floor plane.
    #[must_use]
    pub fn distance(self, other: WorldPoint) -> f32 {
        (self.x - other.x).hypot(self.z - other.z)
    }
}

/// Position and heading of the player.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerPose {
    /// Position on the maze floor.
    pub position: WorldPoint,
    /// Heading in degrees; 0 faces decreasing rows and 90 faces increasing columns.
    pub yaw_degrees: f32,
}

impl PlayerPose {
    /// Creates a pose standing on the provided cell with the starting heading.
    #[must_use]
    pub fn spawn_at(cell: CellCoord) -> Self {
        Self {
            position: cell.world_position(),
            yaw_degrees: START_YAW_DEGREES,
        }
    }

    /// Unit vector `(x, z)` pointing in the direction the player faces.
    #[must_use]
    pub fn heading(&self) -> (f32, f32) {
        let radians = self.yaw_degrees.to_radians();
        (radians.sin(), -radians.cos())
    }
}

/// Room counts describing the size of a maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MazeDimensions {
    width: NonZeroU32,
    height: NonZeroU32,
}

impl MazeDimensions {
    /// Creates a new maze size from non-zero room counts.
    #[must_use]
    pub const fn new(width: NonZeroU32, height: NonZeroU32) -> Self {
        Self { width, height }
    }

    /// Creates a new maze size, returning `None` when either count is zero.
    #[must_use]
    pub fn try_new(width: u32, height: u32) -> Option<Self> {
        Some(Self::new(NonZeroU32::new(width)?, NonZeroU32::new(height)?))
    }

    /// Number of rooms along each row.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width.get()
    }

    /// Number of rooms along each column.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height.get()
    }

    /// Total number of rooms in the maze.
    #[must_use]
    pub const fn room_count(&self) -> u32 {
        self.width() * self.height()
    }

    /// Number of grid columns, including walls and connectors.
    #[must_use]
    pub const fn grid_columns(&self) -> u32 {
        self.width() * 2 + 1
    }

    /// Number of grid rows, including walls and connectors.
    #[must_use]
    pub const fn grid_rows(&self) -> u32 {
        self.height() * 2 + 1
    }

    /// Room where every run starts.
    #[must_use]
    pub const fn start_cell(&self) -> CellCoord {
        CellCoord::new(1, 1)
    }

    /// Bottom-right room the player must reach.
    #[must_use]
    pub const fn finish_cell(&self) -> CellCoord {
        CellCoord::new(self.width() * 2 - 1, self.height() * 2 - 1)
    }
}

/// Kinds of cells composing a maze grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Solid, impassable cell.
    Wall,
    /// Carved, walkable cell.
    Open,
    /// Walkable cell where the run begins.
    Start,
    /// Walkable cell the player must reach.
    Finish,
}

impl CellKind {
    /// Reports whether the player may stand on the cell.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        !matches!(self, Self::Wall)
    }

    /// Character used by the grid's text form.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Wall => '#',
            Self::Open => '.',
            Self::Start => 'S',
            Self::Finish => 'F',
        }
    }

    fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '#' => Some(Self::Wall),
            '.' => Some(Self::Open),
            'S' => Some(Self::Start),
            'F' => Some(Self::Finish),
            _ => None,
        }
    }
}

/// Dense, row-major grid of maze cells.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    columns: u32,
    rows: u32,
    cells: Vec<CellKind>,
}

impl Grid {
    /// Creates a grid of the provided size with every cell set to `kind`.
    #[must_use]
    pub fn filled(columns: u32, rows: u32, kind: CellKind) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![kind; capacity],
        }
    }

    /// Creates a wall-filled grid sized for the provided maze dimensions.
    #[must_use]
    pub fn walls_for(dimensions: MazeDimensions) -> Self {
        Self::filled(
            dimensions.grid_columns(),
            dimensions.grid_rows(),
            CellKind::Wall,
        )
    }

    /// Parses the text form produced by the grid's `Display` implementation.
    ///
    /// Blank lines and surrounding whitespace are ignored so that grids can be
    /// written inline in tests.
    pub fn from_ascii(text: &str) -> Result<Self, GridParseError> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let Some(first) = lines.first() else {
            return Err(GridParseError::Empty);
        };

        let columns = first.chars().count() as u32;
        let mut cells = Vec::with_capacity(columns as usize * lines.len());
        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count() as u32;
            if found != columns {
                return Err(GridParseError::RaggedRow {
                    row: row as u32,
                    expected: columns,
                    found,
                });
            }
            for (column, glyph) in line.chars().enumerate() {
                let kind = CellKind::from_glyph(glyph).ok_or(GridParseError::UnknownGlyph {
                    glyph,
                    column: column as u32,
                    row: row as u32,
                })?;
                cells.push(kind);
            }
        }

        Ok(Self {
            columns,
            rows: lines.len() as u32,
            cells,
        })
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Returns the kind of the provided cell, or `None` when it lies outside the grid.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<CellKind> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Overwrites the provided cell. Cells outside the grid are ignored.
    pub fn set(&mut self, cell: CellCoord, kind: CellKind) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = kind;
            }
        }
    }

    /// Reports whether the cell blocks movement. Cells outside the grid always do.
    #[must_use]
    pub fn is_wall(&self, cell: CellCoord) -> bool {
        self.get(cell).map_or(true, |kind| !kind.is_walkable())
    }

    /// Converts a world point into the cell that contains it.
    #[must_use]
    pub fn cell_at(&self, point: WorldPoint) -> Option<CellCoord> {
        let column = (point.x / CELL_SIZE).round();
        let row = (point.z / CELL_SIZE).round();
        if column < 0.0 || row < 0.0 {
            return None;
        }

        let cell = CellCoord::new(column as u32, row as u32);
        self.index(cell).map(|_| cell)
    }

    /// Reports whether the world point lies inside a wall or outside the grid.
    #[must_use]
    pub fn is_wall_at(&self, point: WorldPoint) -> bool {
        self.cell_at(point).map_or(true, |cell| self.is_wall(cell))
    }

    /// Iterates over every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, CellKind)> + '_ {
        let columns = self.columns.max(1);
        self.cells.iter().enumerate().map(move |(index, kind)| {
            let index = index as u32;
            (CellCoord::new(index % columns, index / columns), *kind)
        })
    }

    /// First cell of the requested kind in row-major order.
    #[must_use]
    pub fn find(&self, kind: CellKind) -> Option<CellCoord> {
        self.iter()
            .find(|(_, candidate)| *candidate == kind)
            .map(|(cell, _)| cell)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for column in 0..self.columns {
                let kind = self
                    .get(CellCoord::new(column, row))
                    .unwrap_or(CellKind::Wall);
                write!(f, "{}", kind.glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Reasons the grid text form may fail to parse.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridParseError {
    /// The text did not contain a single non-blank line.
    #[error("grid text contains no rows")]
    Empty,
    /// A row's length differs from the first row's.
    #[error("row {row} has {found} cells but the first row has {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: u32,
        /// Length of the first row.
        expected: u32,
        /// Length of the offending row.
        found: u32,
    },
    /// A character does not name a cell kind.
    #[error("unknown cell glyph {glyph:?} at column {column}, row {row}")]
    UnknownGlyph {
        /// The unrecognised character.
        glyph: char,
        /// Zero-based column of the character.
        column: u32,
        /// Zero-based row of the character.
        row: u32,
    },
}

/// Interactive objects scattered through the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    /// Hazard that blinds and teleports the player.
    Eye,
    /// Floor patch that slows the player down.
    Trap,
    /// Pickup that grants a speed boost.
    Powerup,
    /// Pickup that launches the player into the air.
    Pyramid,
}

impl EntityKind {
    /// Every entity kind in a stable order.
    pub const ALL: [EntityKind; 4] = [Self::Eye, Self::Trap, Self::Powerup, Self::Pyramid];

    /// Reports whether touching the entity removes it from the maze.
    #[must_use]
    pub const fn is_consumed_on_contact(self) -> bool {
        matches!(self, Self::Powerup | Self::Pyramid)
    }
}

/// Single entity anchored to a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    /// Kind of the entity.
    pub kind: EntityKind,
    /// Cell hosting the entity.
    pub cell: CellCoord,
}

impl Entity {
    /// World-space position of the entity.
    #[must_use]
    pub fn position(&self) -> WorldPoint {
        self.cell.world_position()
    }
}

/// Per-kind ordered sequences of entity cells.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityLayout {
    eyes: Vec<CellCoord>,
    traps: Vec<CellCoord>,
    powerups: Vec<CellCoord>,
    pyramids: Vec<CellCoord>,
}

impl EntityLayout {
    /// Creates a layout from explicit per-kind cell lists.
    #[must_use]
    pub fn new(
        eyes: Vec<CellCoord>,
        traps: Vec<CellCoord>,
        powerups: Vec<CellCoord>,
        pyramids: Vec<CellCoord>,
    ) -> Self {
        Self {
            eyes,
            traps,
            powerups,
            pyramids,
        }
    }

    /// Cells hosting entities of the requested kind, in placement order.
    #[must_use]
    pub fn cells(&self, kind: EntityKind) -> &[CellCoord] {
        match kind {
            EntityKind::Eye => &self.eyes,
            EntityKind::Trap => &self.traps,
            EntityKind::Powerup => &self.powerups,
            EntityKind::Pyramid => &self.pyramids,
        }
    }

    /// Reports whether an entity of the requested kind sits on the cell.
    #[must_use]
    pub fn contains(&self, kind: EntityKind, cell: CellCoord) -> bool {
        self.cells(kind).contains(&cell)
    }

    /// Removes the entity of the requested kind from the cell, reporting success.
    pub fn remove(&mut self, kind: EntityKind, cell: CellCoord) -> bool {
        let cells = match kind {
            EntityKind::Eye => &mut self.eyes,
            EntityKind::Trap => &mut self.traps,
            EntityKind::Powerup => &mut self.powerups,
            EntityKind::Pyramid => &mut self.pyramids,
        };
        match cells.iter().position(|candidate| *candidate == cell) {
            Some(index) => {
                let _ = cells.remove(index);
                true
            }
            None => false,
        }
    }

    /// Iterates over every entity, grouped by kind in [`EntityKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        EntityKind::ALL.into_iter().flat_map(move |kind| {
            self.cells(kind)
                .iter()
                .map(move |cell| Entity { kind, cell: *cell })
        })
    }

    /// Total number of entities across all kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.eyes.len() + self.traps.len() + self.powerups.len() + self.pyramids.len()
    }

    /// Reports whether the layout holds no entities at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Continuous movement requested by the input collaborator for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MovementIntent {
    /// Rotate counter-clockwise.
    pub turn_left: bool,
    /// Rotate clockwise.
    pub turn_right: bool,
    /// Walk along the heading.
    pub move_forward: bool,
    /// Walk against the heading.
    pub move_backward: bool,
}

/// Everything the input collaborator reports for a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Held movement keys.
    pub intent: MovementIntent,
    /// Restart the run on the current maze.
    pub reset: bool,
    /// Build a brand new maze.
    pub regenerate: bool,
    /// Show or hide the minimap.
    pub toggle_minimap: bool,
    /// Show or hide entity markers.
    pub toggle_icons: bool,
    /// Show or hide the legend.
    pub toggle_legend: bool,
    /// Enable or disable slow walking.
    pub toggle_slow_walk: bool,
    /// Stop the update loop.
    pub quit: bool,
}
