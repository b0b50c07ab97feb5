#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Maze Runner.

use std::time::Duration;

use maze_runner_core::{
    CellCoord, CellKind, Command, EffectKind, EntityKind, EntityLayout, Event, GameState, Grid,
    HudToggles, PlayerPose, WELCOME_BANNER,
};
use maze_runner_system_effects::EffectStateMachine;

/// Represents the authoritative Maze Runner session state.
#[derive(Clone, Debug)]
pub struct World {
    banner: &'static str,
    grid: Grid,
    placed_entities: EntityLayout,
    entities: EntityLayout,
    pose: PlayerPose,
    effects: EffectStateMachine,
    pending_teleport: Option<CellCoord>,
    elapsed: Duration,
    final_time: Option<Duration>,
    game_state: GameState,
    hud: HudToggles,
}

impl World {
    /// Creates a new session on the provided maze with the player on its start cell.
    #[must_use]
    pub fn new(grid: Grid, entities: EntityLayout) -> Self {
        let pose = PlayerPose::spawn_at(spawn_cell(&grid));
        Self {
            banner: WELCOME_BANNER,
            placed_entities: entities.clone(),
            entities,
            grid,
            pose,
            effects: EffectStateMachine::new(),
            pending_teleport: None,
            elapsed: Duration::ZERO,
            final_time: None,
            game_state: GameState::Playing,
            hud: HudToggles::default(),
        }
    }

    fn install(&mut self, grid: Grid, entities: EntityLayout) {
        self.grid = grid;
        self.placed_entities = entities;
        self.restart();
    }

    fn restart(&mut self) {
        self.entities = self.placed_entities.clone();
        self.pose = PlayerPose::spawn_at(spawn_cell(&self.grid));
        self.effects.clear();
        self.pending_teleport = None;
        self.elapsed = Duration::ZERO;
        self.final_time = None;
        self.game_state = GameState::Playing;
    }

    fn advance_clock(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.elapsed = self.elapsed.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        if let Some(destination) = self.pending_teleport {
            if self.effects.blindness_peaked(self.elapsed) {
                self.pending_teleport = None;
                self.pose.position = destination.world_position();
                out_events.push(Event::PlayerTeleported { destination });
            }
        }

        for effect in self.effects.expire(self.elapsed) {
            out_events.push(Event::EffectExpired { effect });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once the run is over only [`Command::InstallMaze`] and [`Command::ResetRun`]
/// are honoured; everything else is dropped without emitting events.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.game_state == GameState::GameOver
        && !matches!(command, Command::InstallMaze { .. } | Command::ResetRun)
    {
        tracing::debug!(?command, "ignoring command after game over");
        return;
    }

    match command {
        Command::InstallMaze { grid, entities } => {
            let columns = grid.columns();
            let rows = grid.rows();
            world.install(grid, entities);
            out_events.push(Event::MazeInstalled { columns, rows });
        }
        Command::ResetRun => {
            world.restart();
            out_events.push(Event::RunReset);
        }
        Command::Tick { dt } => world.advance_clock(dt, out_events),
        Command::SetPlayerPose { pose } => {
            if pose != world.pose {
                let from = world.pose;
                world.pose = pose;
                out_events.push(Event::PlayerMoved { from, to: pose });
            }
        }
        Command::CollectPickup { kind, cell } => {
            let effect = match kind {
                EntityKind::Powerup => EffectKind::SpeedBoost,
                EntityKind::Pyramid => EffectKind::Launch,
                EntityKind::Eye | EntityKind::Trap => return,
            };
            if !world.entities.remove(kind, cell) {
                return;
            }
            out_events.push(Event::PickupCollected { kind, cell });
            if world.effects.activate(effect, world.elapsed) {
                out_events.push(Event::EffectActivated { effect });
            }
        }
        Command::BeginTeleport { destination } => {
            if world.pending_teleport.is_some()
                || !world.effects.activate(EffectKind::Blindness, world.elapsed)
            {
                return;
            }
            world.pending_teleport = destination;
            out_events.push(Event::EffectActivated {
                effect: EffectKind::Blindness,
            });
        }
        Command::ToggleSlowWalk => {
            let enabled = world.effects.toggle_slow_walk();
            out_events.push(Event::SlowWalkToggled { enabled });
        }
        Command::ToggleHud { element } => {
            let visible = world.hud.toggle(element);
            out_events.push(Event::HudToggled { element, visible });
        }
        Command::DeclareVictory => {
            world.final_time = Some(world.elapsed);
            world.game_state = GameState::GameOver;
            out_events.push(Event::GameWon {
                final_time: world.elapsed,
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use maze_runner_core::{
        CellCoord, CellKind, EffectKind, EntityKind, EntityLayout, GameState, Grid, HudToggles,
        PlayerPose,
    };
    use maze_runner_system_effects::EffectStateMachine;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the maze grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Entities still present in the maze.
    #[must_use]
    pub fn entities(world: &World) -> &EntityLayout {
        &world.entities
    }

    /// Current pose of the player.
    #[must_use]
    pub fn player_pose(world: &World) -> PlayerPose {
        world.pose
    }

    /// Cell the player currently stands on.
    #[must_use]
    pub fn player_cell(world: &World) -> Option<CellCoord> {
        world.grid.cell_at(world.pose.position)
    }

    /// Cell the player must reach to win.
    #[must_use]
    pub fn finish_cell(world: &World) -> Option<CellCoord> {
        world.grid.find(CellKind::Finish)
    }

    /// Provides read-only access to the effect timers.
    #[must_use]
    pub fn effects(world: &World) -> &EffectStateMachine {
        &world.effects
    }

    /// Teleport destination waiting for the blindness fade-in to complete.
    #[must_use]
    pub fn pending_teleport(world: &World) -> Option<CellCoord> {
        world.pending_teleport
    }

    /// Time accumulated since the run started.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }

    /// Time frozen at the moment of victory, if the run is over.
    #[must_use]
    pub fn final_time(world: &World) -> Option<Duration> {
        world.final_time
    }

    /// Whether the run is still in progress.
    #[must_use]
    pub fn game_state(world: &World) -> GameState {
        world.game_state
    }

    /// Visibility of the heads-up display elements.
    #[must_use]
    pub fn hud(world: &World) -> HudToggles {
        world.hud
    }

    /// Reports whether the player is airborne.
    #[must_use]
    pub fn is_launching(world: &World) -> bool {
        world.effects.is_active(EffectKind::Launch, world.elapsed)
    }

    /// Reports whether the player stands on a trap cell.
    #[must_use]
    pub fn standing_on_trap(world: &World) -> bool {
        player_cell(world).is_some_and(|cell| world.entities.contains(EntityKind::Trap, cell))
    }

    /// Speed multiplier the player controller should use this frame.
    #[must_use]
    pub fn speed_multiplier(world: &World) -> f32 {
        world
            .effects
            .speed_multiplier(world.elapsed, standing_on_trap(world))
    }

    /// Captures everything a renderer needs for one frame.
    #[must_use]
    pub fn snapshot(world: &World) -> SessionSnapshot<'_> {
        let now = world.elapsed;
        let effects = &world.effects;
        SessionSnapshot {
            grid: &world.grid,
            entities: &world.entities,
            pose: world.pose,
            effects: EffectSnapshot {
                blind: effects.is_active(EffectKind::Blindness, now),
                blindness_alpha: effects.blindness_alpha(now),
                launching: effects.is_active(EffectKind::Launch, now),
                launch_height: effects.launch_height(now),
                boost_remaining: effects
                    .record(EffectKind::SpeedBoost)
                    .map(|effect| effect.remaining(now))
                    .filter(|remaining| !remaining.is_zero()),
                slow_walk: effects.slow_walk(),
                on_trap: standing_on_trap(world),
                speed_multiplier: speed_multiplier(world),
            },
            elapsed: world.elapsed,
            final_time: world.final_time,
            game_state: world.game_state,
            hud: world.hud,
        }
    }

    /// Read-only view of the session handed to renderers once per frame.
    #[derive(Clone, Copy, Debug)]
    pub struct SessionSnapshot<'a> {
        /// Maze grid.
        pub grid: &'a Grid,
        /// Entities still present in the maze.
        pub entities: &'a EntityLayout,
        /// Player position and heading.
        pub pose: PlayerPose,
        /// Derived effect flags and timers.
        pub effects: EffectSnapshot,
        /// Time accumulated since the run started.
        pub elapsed: Duration,
        /// Time frozen at victory.
        pub final_time: Option<Duration>,
        /// Whether the run is still in progress.
        pub game_state: GameState,
        /// Visibility of the heads-up display elements.
        pub hud: HudToggles,
    }

    /// Effect flags and timer-derived values captured for one frame.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct EffectSnapshot {
        /// Whether blindness is active.
        pub blind: bool,
        /// Opacity of the blindness overlay.
        pub blindness_alpha: f32,
        /// Whether the player is airborne.
        pub launching: bool,
        /// Height of the player above the floor.
        pub launch_height: f32,
        /// Time left on the speed boost, if one is running.
        pub boost_remaining: Option<Duration>,
        /// Whether slow walk is enabled.
        pub slow_walk: bool,
        /// Whether the player stands on a trap.
        pub on_trap: bool,
        /// Speed multiplier resolved for the frame.
        pub speed_multiplier: f32,
    }
}

fn spawn_cell(grid: &Grid) -> CellCoord {
    grid.find(CellKind::Start)
        .or_else(|| grid.find(CellKind::Finish))
        .unwrap_or(CellCoord::new(1, 1))
}
