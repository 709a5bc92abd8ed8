//! Integration tests for knockback, stun and input lockout
//!
//! Time advances 0.1s per update; the first update after spawning is the
//! zero-length startup frame.

mod common;

use abilitysys::character::components::*;
use abilitysys::character::events::*;
use abilitysys::character::log::{CharacterLog, CharacterLogEventType};
use abilitysys::character::settings::{CharacterSettings, StunChain};
use abilitysys::character::CharacterBundle;
use bevy::prelude::*;

use common::*;

fn spawn_player(app: &mut App) -> Entity {
    let hero = app
        .world_mut()
        .spawn((CharacterBundle::new("Hero"), PlayerController::default()))
        .id();
    app.update();
    hero
}

fn push(app: &mut App, target: Entity, stun_duration: f32) {
    app.world_mut().send_event(PushCharacter {
        target,
        direction: Vec3::X,
        strength: 10.0,
        stun_duration,
    });
    app.update();
}

fn input_enabled(app: &App, entity: Entity) -> bool {
    let world = app.world();
    if let Some(player) = world.get::<PlayerController>(entity) {
        return player.is_input_enabled();
    }
    world.get::<AiController>(entity).unwrap().is_input_enabled()
}

fn movement(app: &App, entity: Entity) -> &Movement {
    app.world().get::<Movement>(entity).unwrap()
}

#[test]
fn test_push_locks_input_for_one_stun_duration() {
    let mut app = default_app();
    let hero = spawn_player(&mut app);

    push(&mut app, hero, 0.5);

    assert!(!input_enabled(&app, hero));
    assert_eq!(movement(&app, hero).ground_friction, 0.0);
    assert!(movement(&app, hero).velocity.x > 0.0);

    advance(&mut app, 0.2);
    assert!(!input_enabled(&app, hero), "still stunned mid-duration");
    assert_eq!(movement(&app, hero).ground_friction, 0.0, "friction stays off");

    advance(&mut app, 0.5);
    assert!(input_enabled(&app, hero));
    assert_eq!(movement(&app, hero).ground_friction, 8.0);

    let reasons: Vec<InputLockReason> = recorded::<InputLockChanged>(&app)
        .iter()
        .map(|e| e.reason)
        .collect();
    assert_eq!(
        reasons,
        vec![InputLockReason::Stun, InputLockReason::StunRecovered]
    );
}

#[test]
fn test_stun_lasts_exactly_its_duration() {
    let mut app = default_app();
    let hero = spawn_player(&mut app);

    push(&mut app, hero, 0.5);

    // Locked for the full 0.5s after the push frame
    for step in 1..5 {
        app.update();
        assert!(!input_enabled(&app, hero), "unlocked early at step {}", step);
        assert_eq!(movement(&app, hero).ground_friction, 0.0);
    }

    app.update();
    assert!(input_enabled(&app, hero));
    assert_eq!(movement(&app, hero).ground_friction, 8.0);
}

#[test]
fn test_death_during_stun_keeps_lockout() {
    let mut app = default_app();
    let hero = spawn_player(&mut app);

    push(&mut app, hero, 0.5);
    damage(&mut app, hero, 100.0);
    advance(&mut app, 1.0);

    assert!(!input_enabled(&app, hero));
    assert!(app.world().get::<Character>(hero).unwrap().has_died());
    // Friction recovery is physical and still happens
    assert_eq!(movement(&app, hero).ground_friction, 8.0);
}

#[test]
fn test_push_on_dead_character_does_not_relock() {
    let mut app = default_app();
    let hero = spawn_player(&mut app);
    damage(&mut app, hero, 100.0);

    push(&mut app, hero, 0.3);
    advance(&mut app, 1.0);

    assert!(!input_enabled(&app, hero));
    let locks = recorded::<InputLockChanged>(&app);
    assert_eq!(locks.len(), 1);
    assert_eq!(locks[0].reason, InputLockReason::Death);
}

#[test]
fn test_ai_brain_stops_and_restarts() {
    let mut app = default_app();
    let grunt = app
        .world_mut()
        .spawn((CharacterBundle::new("Grunt"), AiController::default()))
        .id();
    app.update();

    push(&mut app, grunt, 0.3);
    assert_eq!(
        app.world().get::<AiController>(grunt).unwrap().stop_reason(),
        Some("Stunned")
    );

    advance(&mut app, 0.5);
    assert!(input_enabled(&app, grunt));
}

#[test]
fn test_second_push_replaces_pending_recovery() {
    let mut app = default_app();
    let hero = spawn_player(&mut app);

    push(&mut app, hero, 0.5);
    advance(&mut app, 0.3);
    // Re-stun with the recovery nearly due
    push(&mut app, hero, 0.5);
    advance(&mut app, 0.2);

    assert!(!input_enabled(&app, hero), "first recovery was replaced");
    assert_eq!(movement(&app, hero).ground_friction, 0.0);

    advance(&mut app, 0.5);
    assert!(input_enabled(&app, hero));
    assert_eq!(
        movement(&app, hero).ground_friction,
        8.0,
        "original friction survives a double suspension"
    );
}

#[test]
fn test_deferred_chain_locks_after_first_duration() {
    let settings = CharacterSettings {
        stun_chain: StunChain::Deferred,
        ..default()
    };
    let mut app = test_app(settings);
    let hero = spawn_player(&mut app);

    push(&mut app, hero, 0.5);
    assert!(input_enabled(&app, hero), "stun hasn't started yet");
    assert_eq!(movement(&app, hero).ground_friction, 0.0);

    advance(&mut app, 0.2);
    assert!(input_enabled(&app, hero));

    advance(&mut app, 0.3);
    assert!(!input_enabled(&app, hero), "stun starts when friction returns");
    assert_eq!(movement(&app, hero).ground_friction, 8.0);

    advance(&mut app, 0.2);
    assert!(!input_enabled(&app, hero));

    advance(&mut app, 0.5);
    assert!(input_enabled(&app, hero));
}

#[test]
fn test_death_before_deferred_stun_starts() {
    let settings = CharacterSettings {
        stun_chain: StunChain::Deferred,
        ..default()
    };
    let mut app = test_app(settings);
    let hero = spawn_player(&mut app);

    push(&mut app, hero, 0.5);
    damage(&mut app, hero, 100.0);
    advance(&mut app, 1.0);

    assert!(!input_enabled(&app, hero));
    assert!(!app
        .world()
        .get::<CharacterTimers>(hero)
        .unwrap()
        .stun_recovery
        .is_pending());

    let locks = recorded::<InputLockChanged>(&app);
    assert_eq!(locks.len(), 1);
    assert_eq!(locks[0].reason, InputLockReason::Death);
    assert!(!locks[0].enabled);
}

#[test]
fn test_push_without_movement_is_ignored() {
    let mut app = default_app();
    let ghost = app
        .world_mut()
        .spawn((
            Character::new("Ghost"),
            CharacterTimers::default(),
            PlayerController::default(),
        ))
        .id();
    app.update();

    push(&mut app, ghost, 0.5);

    assert!(input_enabled(&app, ghost));
    assert!(!app
        .world()
        .get::<CharacterTimers>(ghost)
        .unwrap()
        .stun_recovery
        .is_pending());
}

#[test]
fn test_uncontrolled_character_is_pushed_without_lockout() {
    let mut app = default_app();
    let crate_entity = app.world_mut().spawn(CharacterBundle::new("Crate")).id();
    app.update();

    push(&mut app, crate_entity, 0.3);
    advance(&mut app, 0.5);

    assert!(recorded::<InputLockChanged>(&app).is_empty());
    assert_eq!(movement(&app, crate_entity).ground_friction, 8.0);

    let log = app.world().resource::<CharacterLog>();
    assert!(log.filter_by_type(CharacterLogEventType::InputLock).is_empty());
    assert_eq!(log.filter_by_type(CharacterLogEventType::Push).len(), 1);
}

#[test]
fn test_knockback_moves_character_and_friction_stops_it() {
    let mut app = default_app();
    let hero = spawn_player(&mut app);

    push(&mut app, hero, 0.3);
    advance(&mut app, 0.2);
    let mid = app.world().get::<Transform>(hero).unwrap().translation.x;
    assert!(mid > 0.0);

    advance(&mut app, 2.0);
    let end = app.world().get::<Transform>(hero).unwrap().translation.x;
    assert!(end > mid);
    assert_eq!(movement(&app, hero).velocity, Vec3::ZERO);
}
