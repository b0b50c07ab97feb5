#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Timed and toggled player effects.
//!
//! Every timed effect is an `{kind, activated_at, duration}` record compared
//! against the session clock, so expiry is a pure function of elapsed time.
//! Speed modifiers resolve by priority: a speed boost overrides trap slowdown,
//! and slow walk compounds with whichever of the two applies.

use std::time::Duration;

use maze_runner_core::EffectKind;

/// Time for the blindness overlay to fade to full black.
pub const BLINDNESS_FADE_IN: Duration = Duration::from_millis(500);
/// Time for the blindness overlay to fade back out.
pub const BLINDNESS_FADE_OUT: Duration = Duration::from_millis(2_500);
/// Time for a launch to reach its peak height.
pub const LAUNCH_RISE: Duration = Duration::from_millis(500);
/// Time a launch hovers at its peak height.
pub const LAUNCH_HOLD: Duration = Duration::from_millis(3_000);
/// Time for a launch to return to the ground.
pub const LAUNCH_FALL: Duration = Duration::from_millis(500);
/// Height reached at the top of a launch, in world units.
pub const LAUNCH_PEAK_HEIGHT: f32 = 6.0;

/// Multiplier applied while a speed boost is active.
pub const SPEED_BOOST_MULTIPLIER: f32 = 2.0;
/// Multiplier applied while standing on a trap without a boost.
pub const TRAP_MULTIPLIER: f32 = 0.3;
/// Multiplier stacked on top of everything while slow walk is enabled.
pub const SLOW_WALK_MULTIPLIER: f32 = 0.5;

/// A timed effect that was activated at a point on the session clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActiveEffect {
    /// Effect the record tracks.
    pub kind: EffectKind,
    /// Session time at which the effect started.
    pub activated_at: Duration,
    /// Lifetime of the effect.
    pub duration: Duration,
}

impl ActiveEffect {
    /// Time since activation.
    #[must_use]
    pub fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.activated_at)
    }

    /// Time left before the effect expires.
    #[must_use]
    pub fn remaining(&self, now: Duration) -> Duration {
        self.duration.saturating_sub(self.elapsed(now))
    }

    /// Reports whether the effect has run its full course.
    #[must_use]
    pub fn is_expired(&self, now: Duration) -> bool {
        self.elapsed(now) >= self.duration
    }
}

/// Independent timed effects plus the slow-walk toggle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EffectStateMachine {
    active: Vec<ActiveEffect>,
    slow_walk: bool,
}

impl EffectStateMachine {
    /// Creates a machine with no active effects and slow walk disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts an effect at `now`, reporting whether it was activated.
    ///
    /// A speed boost always (re)starts its window. Blindness and launch are
    /// only accepted once any previous activation has fully run out.
    pub fn activate(&mut self, kind: EffectKind, now: Duration) -> bool {
        if kind != EffectKind::SpeedBoost && self.is_active(kind, now) {
            return false;
        }

        self.active.retain(|effect| effect.kind != kind);
        self.active.push(ActiveEffect {
            kind,
            activated_at: now,
            duration: kind.duration(),
        });
        true
    }

    /// Reports whether the effect is running at `now`.
    #[must_use]
    pub fn is_active(&self, kind: EffectKind, now: Duration) -> bool {
        self.record(kind)
            .is_some_and(|effect| !effect.is_expired(now))
    }

    /// Record tracking the effect, if it has not been expired yet.
    #[must_use]
    pub fn record(&self, kind: EffectKind) -> Option<&ActiveEffect> {
        self.active.iter().find(|effect| effect.kind == kind)
    }

    /// Iterates over tracked records in activation order.
    pub fn iter(&self) -> impl Iterator<Item = &ActiveEffect> {
        self.active.iter()
    }

    /// Drops every record that ran out by `now`, returning the expired kinds.
    pub fn expire(&mut self, now: Duration) -> Vec<EffectKind> {
        let expired: Vec<EffectKind> = self
            .active
            .iter()
            .filter(|effect| effect.is_expired(now))
            .map(|effect| effect.kind)
            .collect();
        self.active.retain(|effect| !effect.is_expired(now));
        expired
    }

    /// Drops every effect and disables slow walk.
    pub fn clear(&mut self) {
        self.active.clear();
        self.slow_walk = false;
    }

    /// Whether slow walk is enabled.
    #[must_use]
    pub const fn slow_walk(&self) -> bool {
        self.slow_walk
    }

    /// Flips slow walk and returns the new value.
    pub fn toggle_slow_walk(&mut self) -> bool {
        self.slow_walk = !self.slow_walk;
        self.slow_walk
    }

    /// Speed multiplier for the current frame.
    #[must_use]
    pub fn speed_multiplier(&self, now: Duration, on_trap: bool) -> f32 {
        resolve_speed_multiplier(
            self.is_active(EffectKind::SpeedBoost, now),
            on_trap,
            self.slow_walk,
        )
    }

    /// Opacity of the blindness overlay at `now`.
    #[must_use]
    pub fn blindness_alpha(&self, now: Duration) -> f32 {
        self.record(EffectKind::Blindness)
            .map_or(0.0, |effect| blindness_alpha(effect.elapsed(now)))
    }

    /// Reports whether the blindness overlay has reached full opacity at least once.
    #[must_use]
    pub fn blindness_peaked(&self, now: Duration) -> bool {
        self.record(EffectKind::Blindness)
            .is_some_and(|effect| effect.elapsed(now) >= BLINDNESS_FADE_IN)
    }

    /// Height of the player above the floor at `now`.
    #[must_use]
    pub fn launch_height(&self, now: Duration) -> f32 {
        self.record(EffectKind::Launch)
            .map_or(0.0, |effect| launch_height(effect.elapsed(now)))
    }
}

/// Resolves the speed multiplier from the active modifiers.
///
/// Priority: boost, then trap, then base speed; slow walk always applies last.
#[must_use]
pub fn resolve_speed_multiplier(boosted: bool, on_trap: bool, slow_walk: bool) -> f32 {
    let base = if boosted {
        SPEED_BOOST_MULTIPLIER
    } else if on_trap {
        TRAP_MULTIPLIER
    } else {
        1.0
    };

    if slow_walk {
        base * SLOW_WALK_MULTIPLIER
    } else {
        base
    }
}

/// Blindness overlay opacity after `elapsed` time: a short fade in, then a long fade out.
#[must_use]
pub fn blindness_alpha(elapsed: Duration) -> f32 {
    if elapsed < BLINDNESS_FADE_IN {
        elapsed.as_secs_f32() / BLINDNESS_FADE_IN.as_secs_f32()
    } else if elapsed < BLINDNESS_FADE_IN + BLINDNESS_FADE_OUT {
        let fading = elapsed - BLINDNESS_FADE_IN;
        1.0 - fading.as_secs_f32() / BLINDNESS_FADE_OUT.as_secs_f32()
    } else {
        0.0
    }
}

/// Launch height after `elapsed` time: linear rise, hold at the peak, linear fall.
#[must_use]
pub fn launch_height(elapsed: Duration) -> f32 {
    let descent_start = LAUNCH_RISE + LAUNCH_HOLD;
    if elapsed < LAUNCH_RISE {
        LAUNCH_PEAK_HEIGHT * elapsed.as_secs_f32() / LAUNCH_RISE.as_secs_f32()
    } else if elapsed < descent_start {
        LAUNCH_PEAK_HEIGHT
    } else if elapsed < descent_start + LAUNCH_FALL {
        let falling = elapsed - descent_start;
        LAUNCH_PEAK_HEIGHT * (1.0 - falling.as_secs_f32() / LAUNCH_FALL.as_secs_f32())
    } else {
        0.0
    }
}
