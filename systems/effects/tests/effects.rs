use std::time::Duration;

use maze_runner_core::EffectKind;
use maze_runner_system_effects::{
    blindness_alpha, launch_height, resolve_speed_multiplier, EffectStateMachine,
    LAUNCH_PEAK_HEIGHT,
};

const EPSILON: f32 = 1e-5;

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn blindness_fades_in_quickly_and_out_slowly() {
    assert_close(blindness_alpha(ms(0)), 0.0);
    assert_close(blindness_alpha(ms(250)), 0.5);
    assert_close(blindness_alpha(ms(500)), 1.0);
    assert_close(blindness_alpha(ms(1_750)), 0.5);
    assert_close(blindness_alpha(ms(3_000)), 0.0);
    assert_close(blindness_alpha(ms(9_000)), 0.0);
}

#[test]
fn launch_rises_holds_and_falls() {
    assert_close(launch_height(ms(0)), 0.0);
    assert_close(launch_height(ms(250)), LAUNCH_PEAK_HEIGHT / 2.0);
    assert_close(launch_height(ms(500)), LAUNCH_PEAK_HEIGHT);
    assert_close(launch_height(ms(3_499)), LAUNCH_PEAK_HEIGHT);
    assert_close(launch_height(ms(3_750)), LAUNCH_PEAK_HEIGHT / 2.0);
    assert_close(launch_height(ms(4_000)), 0.0);
}

#[test]
fn blindness_cannot_retrigger_until_it_ends() {
    let mut effects = EffectStateMachine::new();
    assert!(effects.activate(EffectKind::Blindness, ms(1_000)));
    assert!(!effects.activate(EffectKind::Blindness, ms(2_000)));
    assert!(!effects.activate(EffectKind::Blindness, ms(3_999)));

    assert!(!effects.is_active(EffectKind::Blindness, ms(4_000)));
    assert!(effects.activate(EffectKind::Blindness, ms(4_000)));
    assert_eq!(
        effects.record(EffectKind::Blindness).map(|effect| effect.activated_at),
        Some(ms(4_000))
    );
}

#[test]
fn blindness_peaks_after_the_fade_in() {
    let mut effects = EffectStateMachine::new();
    assert!(!effects.blindness_peaked(ms(0)));
    assert!(effects.activate(EffectKind::Blindness, ms(100)));
    assert!(!effects.blindness_peaked(ms(599)));
    assert!(effects.blindness_peaked(ms(600)));
    assert_close(effects.blindness_alpha(ms(600)), 1.0);
}

#[test]
fn speed_boost_restarts_its_window() {
    let mut effects = EffectStateMachine::new();
    assert!(effects.activate(EffectKind::SpeedBoost, ms(0)));
    assert!(effects.activate(EffectKind::SpeedBoost, ms(1_500)));

    assert!(effects.is_active(EffectKind::SpeedBoost, ms(3_000)));
    assert!(!effects.is_active(EffectKind::SpeedBoost, ms(3_500)));
    assert_eq!(effects.iter().count(), 1);
}

#[test]
fn effects_expire_independently() {
    let mut effects = EffectStateMachine::new();
    assert!(effects.activate(EffectKind::SpeedBoost, ms(0)));
    assert!(effects.activate(EffectKind::Launch, ms(0)));
    assert!(effects.activate(EffectKind::Blindness, ms(500)));

    assert_eq!(effects.expire(ms(2_000)), vec![EffectKind::SpeedBoost]);
    assert!(effects.is_active(EffectKind::Launch, ms(2_000)));
    assert_eq!(effects.expire(ms(3_499)), Vec::<EffectKind>::new());
    assert_eq!(effects.expire(ms(3_500)), vec![EffectKind::Blindness]);
    assert_eq!(effects.expire(ms(4_000)), vec![EffectKind::Launch]);
    assert_close(effects.launch_height(ms(4_000)), 0.0);
}

#[test]
fn boost_takes_priority_over_traps() {
    assert_close(resolve_speed_multiplier(false, false, false), 1.0);
    assert_close(resolve_speed_multiplier(false, true, false), 0.3);
    assert_close(resolve_speed_multiplier(true, true, false), 2.0);
    assert_close(resolve_speed_multiplier(true, true, true), 1.0);
}

#[test]
fn slow_walk_compounds_with_every_modifier() {
    assert_close(resolve_speed_multiplier(false, false, true), 0.5);
    assert_close(resolve_speed_multiplier(false, true, true), 0.15);
    assert_close(resolve_speed_multiplier(true, false, true), 1.0);
}

#[test]
fn machine_resolves_multiplier_from_its_state() {
    let mut effects = EffectStateMachine::new();
    assert_close(effects.speed_multiplier(ms(0), true), 0.3);

    assert!(effects.activate(EffectKind::SpeedBoost, ms(0)));
    assert_close(effects.speed_multiplier(ms(1_000), true), 2.0);

    assert!(effects.toggle_slow_walk());
    assert_close(effects.speed_multiplier(ms(1_000), true), 1.0);
    assert_close(effects.speed_multiplier(ms(2_500), true), 0.15);
}

#[test]
fn clear_drops_effects_and_slow_walk() {
    let mut effects = EffectStateMachine::new();
    assert!(effects.activate(EffectKind::Launch, ms(0)));
    assert!(effects.toggle_slow_walk());

    effects.clear();

    assert_eq!(effects, EffectStateMachine::new());
    assert!(!effects.slow_walk());
}
