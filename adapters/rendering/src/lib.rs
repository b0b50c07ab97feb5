#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Maze Runner adapters.
//!
//! Renderers never read the session directly. Each frame they receive a
//! [`Scene`] built from a [`SessionSnapshot`] and draw it however they like.

use std::time::Duration;

use anyhow::Result as AnyResult;
use glam::Vec3;
use maze_runner_core::{
    CellKind, EntityKind, EntityLayout, FrameInput, GameState, Grid, HudElement, PlayerPose,
    CELL_SIZE,
};
use maze_runner_world::query::SessionSnapshot;

/// Height of the camera above the floor while standing.
pub const EYE_HEIGHT: f32 = 1.0;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with a replaced alpha channel.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }
}

/// Colors shared by every backend.
pub mod palette {
    use super::Color;
    use maze_runner_core::EntityKind;

    /// Clear color behind the maze.
    pub const SKY: Color = Color::from_rgb_u8(18, 20, 34);
    /// Wall cubes.
    pub const WALL: Color = Color::from_rgb_u8(120, 104, 88);
    /// Start tile.
    pub const START: Color = Color::from_rgb_u8(60, 170, 90);
    /// Finish tile.
    pub const FINISH: Color = Color::from_rgb_u8(220, 180, 40);
    /// Blindness overlay before its alpha is applied.
    pub const BLINDNESS: Color = Color::new(0.0, 0.0, 0.0, 1.0);

    /// Marker color for an entity kind.
    #[must_use]
    pub const fn entity(kind: EntityKind) -> Color {
        match kind {
            EntityKind::Eye => Color::from_rgb_u8(200, 40, 60),
            EntityKind::Trap => Color::from_rgb_u8(90, 60, 140),
            EntityKind::Powerup => Color::from_rgb_u8(40, 200, 230),
            EntityKind::Pyramid => Color::from_rgb_u8(230, 140, 40),
        }
    }
}

/// First-person camera derived from the player pose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// Eye position in world space; `y` is up.
    pub position: Vec3,
    /// Unit vector the camera looks along.
    pub forward: Vec3,
    /// Heading in degrees.
    pub yaw_degrees: f32,
}

impl Camera {
    /// Places the camera at the player's eye, raised by the launch height.
    #[must_use]
    pub fn from_pose(pose: PlayerPose, launch_height: f32) -> Self {
        let (x, z) = pose.heading();
        Self {
            position: Vec3::new(
                pose.position.x,
                EYE_HEIGHT + launch_height,
                pose.position.z,
            ),
            forward: Vec3::new(x, 0.0, z),
            yaw_degrees: pose.yaw_degrees,
        }
    }
}

/// Solid cube occupying one wall cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallCube {
    /// Centre of the cube in world space.
    pub center: Vec3,
    /// Edge length.
    pub size: f32,
    /// Fill color.
    pub color: Color,
}

/// Colored floor tile marking the start or the finish.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloorTile {
    /// Centre of the tile on the floor plane.
    pub center: Vec3,
    /// Cell kind being marked.
    pub kind: CellKind,
    /// Fill color.
    pub color: Color,
}

/// Billboard marking an entity in the maze.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityMarker {
    /// Kind of entity shown.
    pub kind: EntityKind,
    /// Centre of the marker in world space.
    pub position: Vec3,
    /// Fill color.
    pub color: Color,
}

/// Text drawn over the 3D view.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hud {
    /// Status lines, top to bottom.
    pub lines: Vec<String>,
    /// Legend entries, shown when the legend is toggled on.
    pub legend: Vec<String>,
    /// Text minimap rows, shown when the minimap is toggled on.
    pub minimap: Option<Vec<String>>,
}

/// Everything a backend draws for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// First-person camera.
    pub camera: Camera,
    /// Wall cubes in row-major order.
    pub walls: Vec<WallCube>,
    /// Start and finish floor tiles.
    pub floor_tiles: Vec<FloorTile>,
    /// Entity markers in kind order.
    pub entities: Vec<EntityMarker>,
    /// Whether entity markers should be drawn.
    pub show_entities: bool,
    /// Full-screen fade drawn last, if any.
    pub overlay: Option<Color>,
    /// Heads-up display.
    pub hud: Hud,
}

impl Scene {
    /// Builds the scene for the provided session snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &SessionSnapshot<'_>) -> Self {
        let effects = snapshot.effects;
        let overlay = (effects.blindness_alpha > 0.0)
            .then(|| palette::BLINDNESS.with_alpha(effects.blindness_alpha));

        Self {
            camera: Camera::from_pose(snapshot.pose, effects.launch_height),
            walls: wall_cubes(snapshot.grid),
            floor_tiles: floor_tiles(snapshot.grid),
            entities: entity_markers(snapshot.entities),
            show_entities: snapshot.hud.is_visible(HudElement::Icons),
            overlay,
            hud: hud(snapshot),
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Maze Runner scenes.
pub trait RenderingBackend {
    /// Runs the backend until `update_scene` asks it to stop or its input runs out.
    ///
    /// The closure receives the frame delta and the input captured for the
    /// frame, refreshes the scene and returns `false` once the session quit.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<Scene>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> bool;
}

/// Formats a duration as `MM:SS.hh`.
#[must_use]
pub fn format_time(time: Duration) -> String {
    let hundredths = time.as_millis() / 10;
    let minutes = hundredths / 6_000;
    let seconds = (hundredths / 100) % 60;
    format!("{minutes:02}:{seconds:02}.{:02}", hundredths % 100)
}

/// Renders the grid as text, marking entities (when `show_entities`) and the player.
///
/// Entity glyphs: `E` eye, `T` trap, `P` powerup, `A` pyramid; the player is `@`.
#[must_use]
pub fn minimap(
    grid: &Grid,
    entities: &EntityLayout,
    pose: PlayerPose,
    show_entities: bool,
) -> Vec<String> {
    let mut rows: Vec<Vec<char>> = (0..grid.rows())
        .map(|_| Vec::with_capacity(grid.columns() as usize))
        .collect();
    for (cell, kind) in grid.iter() {
        if let Some(row) = rows.get_mut(cell.row() as usize) {
            row.push(kind.glyph());
        }
    }

    if show_entities {
        for entity in entities.iter() {
            set_glyph(&mut rows, entity.cell.column(), entity.cell.row(), entity_glyph(entity.kind));
        }
    }
    if let Some(cell) = grid.cell_at(pose.position) {
        set_glyph(&mut rows, cell.column(), cell.row(), '@');
    }

    rows.into_iter()
        .map(|row| row.into_iter().collect())
        .collect()
}

/// Legend line for each entity kind.
#[must_use]
pub fn legend() -> Vec<String> {
    EntityKind::ALL
        .iter()
        .map(|kind| {
            let meaning = match kind {
                EntityKind::Eye => "eye, blinds and teleports",
                EntityKind::Trap => "trap, slows you down",
                EntityKind::Powerup => "powerup, doubles speed",
                EntityKind::Pyramid => "pyramid, launches you",
            };
            format!("{} {meaning}", entity_glyph(*kind))
        })
        .collect()
}

const fn entity_glyph(kind: EntityKind) -> char {
    match kind {
        EntityKind::Eye => 'E',
        EntityKind::Trap => 'T',
        EntityKind::Powerup => 'P',
        EntityKind::Pyramid => 'A',
    }
}

fn set_glyph(rows: &mut [Vec<char>], column: u32, row: u32, glyph: char) {
    if let Some(slot) = rows
        .get_mut(row as usize)
        .and_then(|cells| cells.get_mut(column as usize))
    {
        *slot = glyph;
    }
}

fn world_center(column: u32, row: u32, height: f32) -> Vec3 {
    Vec3::new(column as f32 * CELL_SIZE, height, row as f32 * CELL_SIZE)
}

fn wall_cubes(grid: &Grid) -> Vec<WallCube> {
    grid.iter()
        .filter(|(_, kind)| *kind == CellKind::Wall)
        .map(|(cell, _)| WallCube {
            center: world_center(cell.column(), cell.row(), CELL_SIZE / 2.0),
            size: CELL_SIZE,
            color: palette::WALL,
        })
        .collect()
}

fn floor_tiles(grid: &Grid) -> Vec<FloorTile> {
    [(CellKind::Start, palette::START), (CellKind::Finish, palette::FINISH)]
        .into_iter()
        .filter_map(|(kind, color)| {
            grid.find(kind).map(|cell| FloorTile {
                center: world_center(cell.column(), cell.row(), 0.0),
                kind,
                color,
            })
        })
        .collect()
}

fn entity_markers(entities: &EntityLayout) -> Vec<EntityMarker> {
    entities
        .iter()
        .map(|entity| EntityMarker {
            kind: entity.kind,
            position: world_center(entity.cell.column(), entity.cell.row(), EYE_HEIGHT / 2.0),
            color: palette::entity(entity.kind),
        })
        .collect()
}

fn hud(snapshot: &SessionSnapshot<'_>) -> Hud {
    let effects = snapshot.effects;
    let mut lines = Vec::new();

    match (snapshot.game_state, snapshot.final_time) {
        (GameState::GameOver, Some(final_time)) => {
            lines.push(format!("Escaped in {}", format_time(final_time)));
            lines.push("Press reset to run again or regenerate for a new maze".to_owned());
        }
        _ => lines.push(format!("Time {}", format_time(snapshot.elapsed))),
    }

    if let Some(remaining) = effects.boost_remaining {
        lines.push(format!("Speed boost {:.1}s", remaining.as_secs_f32()));
    }
    if effects.on_trap && effects.boost_remaining.is_none() {
        lines.push("Trapped".to_owned());
    }
    if effects.slow_walk {
        lines.push("Slow walk".to_owned());
    }
    if effects.launching {
        lines.push("Airborne".to_owned());
    }

    let legend = if snapshot.hud.is_visible(HudElement::Legend) {
        legend()
    } else {
        Vec::new()
    };
    let minimap = snapshot.hud.is_visible(HudElement::Minimap).then(|| {
        minimap(
            snapshot.grid,
            snapshot.entities,
            snapshot.pose,
            snapshot.hud.is_visible(HudElement::Icons),
        )
    });

    Hud {
        lines,
        legend,
        minimap,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_runner_core::{CellCoord, Command};
    use maze_runner_world::{self as world, query, World};

    fn test_world() -> World {
        let grid = Grid::from_ascii(
            "
            #######
            #S....#
            #####.#
            #F....#
            #######
            ",
        )
        .expect("valid grid");
        let entities = EntityLayout::new(
            vec![CellCoord::new(3, 1)],
            vec![CellCoord::new(5, 2)],
            Vec::new(),
            vec![CellCoord::new(3, 3)],
        );
        World::new(grid, entities)
    }

    #[test]
    fn format_time_pads_minutes_seconds_and_hundredths() {
        assert_eq!(format_time(Duration::ZERO), "00:00.00");
        assert_eq!(format_time(Duration::from_millis(12_345)), "00:12.34");
        assert_eq!(format_time(Duration::from_millis(754_999)), "12:34.99");
    }

    #[test]
    fn minimap_marks_player_and_entities() {
        let world = test_world();
        let rows = minimap(
            query::grid(&world),
            query::entities(&world),
            query::player_pose(&world),
            true,
        );

        assert_eq!(
            rows,
            vec!["#######", "#@.E..#", "#####T#", "#F.A..#", "#######"]
        );
    }

    #[test]
    fn minimap_hides_entities_when_icons_are_off() {
        let world = test_world();
        let rows = minimap(
            query::grid(&world),
            query::entities(&world),
            query::player_pose(&world),
            false,
        );

        assert_eq!(rows[1], "#@....#");
        assert_eq!(rows[2], "#####.#");
    }

    #[test]
    fn scene_reflects_the_snapshot() {
        let world = test_world();
        let scene = Scene::from_snapshot(&query::snapshot(&world));

        assert_eq!(scene.camera.position, Vec3::new(2.0, EYE_HEIGHT, 2.0));
        assert!((scene.camera.forward.x - 1.0).abs() < 1e-6);
        assert_eq!(
            scene.walls.len(),
            query::grid(&world)
                .iter()
                .filter(|(_, kind)| *kind == CellKind::Wall)
                .count()
        );
        assert_eq!(scene.floor_tiles.len(), 2);
        assert_eq!(scene.entities.len(), 3);
        assert!(scene.show_entities);
        assert!(scene.overlay.is_none());
        assert_eq!(scene.hud.lines, vec!["Time 00:00.00".to_owned()]);
        assert!(scene.hud.legend.is_empty());
        assert!(scene.hud.minimap.is_some());
    }

    #[test]
    fn blindness_and_launch_change_the_view() {
        let mut world = test_world();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::BeginTeleport { destination: None },
            &mut events,
        );
        world::apply(
            &mut world,
            Command::CollectPickup {
                kind: EntityKind::Pyramid,
                cell: CellCoord::new(3, 3),
            },
            &mut events,
        );
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(250),
            },
            &mut events,
        );

        let scene = Scene::from_snapshot(&query::snapshot(&world));
        let overlay = scene.overlay.expect("blindness overlay");
        assert!((overlay.alpha - 0.5).abs() < 1e-4);
        assert!((scene.camera.position.y - (EYE_HEIGHT + 3.0)).abs() < 1e-4);
        assert!(scene.hud.lines.contains(&"Airborne".to_owned()));
    }

    #[test]
    fn victory_replaces_the_clock_line() {
        let mut world = test_world();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(65_430),
            },
            &mut events,
        );
        world::apply(&mut world, Command::DeclareVictory, &mut events);
        world::apply(
            &mut world,
            Command::ToggleHud {
                element: HudElement::Legend,
            },
            &mut events,
        );

        let scene = Scene::from_snapshot(&query::snapshot(&world));
        assert_eq!(scene.hud.lines[0], "Escaped in 01:05.43");
        assert!(scene.hud.legend.is_empty(), "toggles are ignored after victory");
    }

    #[test]
    fn legend_lists_every_entity_kind() {
        let legend = legend();
        assert_eq!(legend.len(), EntityKind::ALL.len());
        assert!(legend[0].starts_with('E'));
        assert!(legend[3].starts_with('A'));
    }
}
