#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! First-person movement with grid-based collision.

use maze_runner_core::{Grid, MovementIntent, PlayerPose, WorldPoint};

/// Distance covered by a single unmodified movement update, in world units.
pub const BASE_MOVE_SPEED: f32 = 0.1;
/// Heading change applied by a single turning update, in degrees.
pub const TURN_SPEED_DEGREES: f32 = 2.0;
/// Extra distance probed along the direction of travel when testing for walls.
pub const COLLISION_BUFFER: f32 = 0.25;

/// Pure system that turns movement intent into a new player pose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerController {
    move_speed: f32,
    turn_speed_degrees: f32,
    collision_buffer: f32,
}

impl PlayerController {
    /// Creates a controller with explicit tuning.
    #[must_use]
    pub const fn new(move_speed: f32, turn_speed_degrees: f32, collision_buffer: f32) -> Self {
        Self {
            move_speed,
            turn_speed_degrees,
            collision_buffer,
        }
    }

    /// Applies one frame of intent to the pose.
    ///
    /// Turning always applies. Translation happens only when exactly one of
    /// forward/backward is held, and is dropped entirely when the buffered
    /// destination falls inside a wall; there is no sliding along walls.
    #[must_use]
    pub fn update(
        &self,
        pose: PlayerPose,
        intent: &MovementIntent,
        grid: &Grid,
        speed_multiplier: f32,
    ) -> PlayerPose {
        let mut next = pose;
        if intent.turn_left {
            next.yaw_degrees -= self.turn_speed_degrees;
        }
        if intent.turn_right {
            next.yaw_degrees += self.turn_speed_degrees;
        }

        let sign = match (intent.move_forward, intent.move_backward) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => return next,
        };

        let (heading_x, heading_z) = next.heading();
        let travel = (heading_x * sign, heading_z * sign);
        let step = self.move_speed * speed_multiplier;
        let candidate = WorldPoint::new(
            next.position.x + travel.0 * step,
            next.position.z + travel.1 * step,
        );

        if !self.is_blocked(grid, candidate, travel) {
            next.position = candidate;
        }
        next
    }

    /// Reports whether a candidate position, pushed further along `travel` by
    /// the collision buffer, lands in a wall.
    #[must_use]
    pub fn is_blocked(&self, grid: &Grid, candidate: WorldPoint, travel: (f32, f32)) -> bool {
        let probe = WorldPoint::new(
            candidate.x + travel.0 * self.collision_buffer,
            candidate.z + travel.1 * self.collision_buffer,
        );
        grid.is_wall_at(probe)
    }
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new(BASE_MOVE_SPEED, TURN_SPEED_DEGREES, COLLISION_BUFFER)
    }
}
