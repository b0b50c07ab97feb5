#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session orchestration: maze construction, the per-frame update and victory detection.

use std::time::Duration;

use maze_runner_core::{
    CellCoord, Command, EffectKind, EntityKind, EntityLayout, Event, FrameInput, GameState, Grid,
    HudElement, MazeDimensions, PlayerPose,
};
use maze_runner_system_entity_placement::{populate, random_spawn, ExclusionZone, SpawnRates};
use maze_runner_system_maze_generation::generate;
use maze_runner_system_player_control::PlayerController;
use maze_runner_world::{self as world, query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// Rooms along each axis when no size is requested.
pub const DEFAULT_MAZE_SIZE: u32 = 10;
/// Distance at which the player touches an entity, in world units.
pub const CONTACT_RADIUS: f32 = 0.5;
/// Distance to the finish at which the run is won, in world units.
pub const VICTORY_RADIUS: f32 = 0.5;

/// Reasons a session configuration is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The maze must be at least one room wide.
    #[error("maze width must be at least one room")]
    ZeroWidth,
    /// The maze must be at least one room tall.
    #[error("maze height must be at least one room")]
    ZeroHeight,
    /// A single room cannot hold distinct start and finish cells.
    #[error("a 1x1 maze has no room for both a start and a finish")]
    SingleRoom,
}

/// Parameters required to construct a session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionConfig {
    width: u32,
    height: u32,
    seed: u64,
    rates: SpawnRates,
}

impl SessionConfig {
    /// Creates a configuration for a `width` by `height` room maze seeded with `seed`.
    #[must_use]
    pub fn new(width: u32, height: u32, seed: u64) -> Self {
        Self {
            width,
            height,
            seed,
            rates: SpawnRates::default(),
        }
    }

    /// Replaces the entity spawn probabilities.
    #[must_use]
    pub fn with_spawn_rates(mut self, rates: SpawnRates) -> Self {
        self.rates = rates;
        self
    }

    /// Maze width in rooms.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Maze height in rooms.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Seed feeding the session random source.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Entity spawn probabilities.
    #[must_use]
    pub const fn spawn_rates(&self) -> SpawnRates {
        self.rates
    }

    /// Checks the configuration and returns the validated maze dimensions.
    pub fn validate(&self) -> Result<MazeDimensions, ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        if self.height == 0 {
            return Err(ConfigError::ZeroHeight);
        }
        if self.width == 1 && self.height == 1 {
            return Err(ConfigError::SingleRoom);
        }
        MazeDimensions::try_new(self.width, self.height).ok_or(ConfigError::ZeroWidth)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAZE_SIZE, DEFAULT_MAZE_SIZE, 0)
    }
}

/// Owns the session state and drives it one frame at a time.
#[derive(Debug)]
pub struct SessionController<R = ChaCha8Rng> {
    dimensions: MazeDimensions,
    rates: SpawnRates,
    zone: ExclusionZone,
    controller: PlayerController,
    rng: R,
    world: World,
    events: Vec<Event>,
    quit: bool,
}

impl SessionController<ChaCha8Rng> {
    /// Builds a session whose random source is seeded from the configuration.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(config.seed()))
    }
}

impl<R: Rng> SessionController<R> {
    /// Builds a session drawing randomness from the provided source.
    pub fn with_rng(config: SessionConfig, mut rng: R) -> Result<Self, ConfigError> {
        let dimensions = config.validate()?;
        let zone = ExclusionZone::default();
        let (grid, entities) = build_maze(dimensions, config.spawn_rates(), zone, &mut rng);
        tracing::info!(
            width = dimensions.width(),
            height = dimensions.height(),
            seed = config.seed(),
            entities = entities.len(),
            "maze generated"
        );

        Ok(Self {
            dimensions,
            rates: config.spawn_rates(),
            zone,
            controller: PlayerController::default(),
            rng,
            world: World::new(grid, entities),
            events: Vec::new(),
            quit: false,
        })
    }

    /// Replaces the current maze with a prebuilt one and restarts the run.
    pub fn load_maze(&mut self, grid: Grid, entities: EntityLayout) -> &[Event] {
        self.events.clear();
        world::apply(
            &mut self.world,
            Command::InstallMaze { grid, entities },
            &mut self.events,
        );
        &self.events
    }

    /// Advances the session by one frame and returns the events it produced.
    pub fn update(&mut self, input: &FrameInput, dt: Duration) -> &[Event] {
        self.events.clear();

        if input.quit {
            tracing::info!("quit requested");
            self.quit = true;
            return &self.events;
        }

        if input.regenerate {
            self.regenerate();
        } else if input.reset {
            tracing::info!("run reset");
            self.apply(Command::ResetRun);
        }

        if query::game_state(&self.world) == GameState::GameOver {
            return &self.events;
        }

        self.apply_toggles(input);
        self.apply(Command::Tick { dt });

        let launching = query::is_launching(&self.world);
        if !launching {
            let pose = self.controller.update(
                query::player_pose(&self.world),
                &input.intent,
                query::grid(&self.world),
                query::speed_multiplier(&self.world),
            );
            self.apply(Command::SetPlayerPose { pose });
            self.resolve_contacts();
        }

        self.check_victory();
        &self.events
    }

    /// Provides read-only access to the authoritative state.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Captures the state renderers draw from.
    #[must_use]
    pub fn snapshot(&self) -> query::SessionSnapshot<'_> {
        query::snapshot(&self.world)
    }

    /// Reports whether a quit request stopped the session.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    fn apply(&mut self, command: Command) {
        world::apply(&mut self.world, command, &mut self.events);
    }

    fn regenerate(&mut self) {
        let (grid, entities) = build_maze(self.dimensions, self.rates, self.zone, &mut self.rng);
        tracing::info!(entities = entities.len(), "maze regenerated");
        self.apply(Command::InstallMaze { grid, entities });
    }

    fn apply_toggles(&mut self, input: &FrameInput) {
        let toggles = [
            (input.toggle_minimap, HudElement::Minimap),
            (input.toggle_icons, HudElement::Icons),
            (input.toggle_legend, HudElement::Legend),
        ];
        for (requested, element) in toggles {
            if requested {
                self.apply(Command::ToggleHud { element });
            }
        }
        if input.toggle_slow_walk {
            self.apply(Command::ToggleSlowWalk);
        }
    }

    fn resolve_contacts(&mut self) {
        let pose = query::player_pose(&self.world);

        let blind =
            query::effects(&self.world).is_active(EffectKind::Blindness, query::elapsed(&self.world));
        if !blind
            && query::pending_teleport(&self.world).is_none()
            && !touching(query::entities(&self.world), EntityKind::Eye, pose).is_empty()
        {
            let destination = random_spawn(query::grid(&self.world), self.zone, &mut self.rng);
            tracing::debug!(?destination, "eye contact");
            self.apply(Command::BeginTeleport { destination });
        }

        for kind in [EntityKind::Powerup, EntityKind::Pyramid] {
            for cell in touching(query::entities(&self.world), kind, pose) {
                tracing::debug!(?kind, ?cell, "pickup contact");
                self.apply(Command::CollectPickup { kind, cell });
            }
        }
    }

    fn check_victory(&mut self) {
        let Some(finish) = query::finish_cell(&self.world) else {
            return;
        };
        let position = query::player_pose(&self.world).position;
        if position.distance(finish.world_position()) < VICTORY_RADIUS {
            self.apply(Command::DeclareVictory);
            if let Some(final_time) = query::final_time(&self.world) {
                tracing::info!(?final_time, "maze completed");
            }
        }
    }
}

fn build_maze<R: Rng + ?Sized>(
    dimensions: MazeDimensions,
    rates: SpawnRates,
    zone: ExclusionZone,
    rng: &mut R,
) -> (Grid, EntityLayout) {
    let grid = generate(dimensions, rng);
    let entities = populate(&grid, rates, zone, rng);
    (grid, entities)
}

fn touching(entities: &EntityLayout, kind: EntityKind, pose: PlayerPose) -> Vec<CellCoord> {
    entities
        .cells(kind)
        .iter()
        .copied()
        .filter(|cell| pose.position.distance(cell.world_position()) < CONTACT_RADIUS)
        .collect()
}
