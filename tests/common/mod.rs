//! Shared harness for driving character systems in a headless `App`

#![allow(dead_code)]

use std::time::Duration;

use abilitysys::character::ability_config::{parse_ability_definitions, AbilityDefinitions};
use abilitysys::character::events::*;
use abilitysys::character::settings::CharacterSettings;
use abilitysys::character::CharacterPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

/// Simulated time per `app.update()`
pub const STEP: Duration = Duration::from_millis(100);

pub const TEST_ABILITIES: &str = r#"(
    abilities: {
        "Fireball": (name: "Fireball", ui: Some((name: "Fireball", cooldown: 2.0, cost: 20.0))),
        "Dash": (name: "Dash", ui: Some((name: "Dash", cost_type: Strength))),
        "Melee": (name: "Melee Attack"),
    },
)"#;

/// Every event of type `E` seen so far, in delivery order
#[derive(Resource)]
pub struct Recorded<E: Event>(pub Vec<E>);

impl<E: Event> Default for Recorded<E> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

fn record<E: Event + Clone>(mut events: EventReader<E>, mut recorded: ResMut<Recorded<E>>) {
    recorded.0.extend(events.read().cloned());
}

fn record_events<E: Event + Clone>(app: &mut App) {
    app.init_resource::<Recorded<E>>()
        .add_systems(PostUpdate, record::<E>);
}

pub fn test_definitions() -> AbilityDefinitions {
    parse_ability_definitions(TEST_ABILITIES).expect("test abilities should parse")
}

/// App with the character plugin, fixed time steps and hook recorders
pub fn test_app(settings: CharacterSettings) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(STEP))
        .insert_resource(settings)
        .insert_resource(test_definitions())
        .add_plugins(CharacterPlugin);

    record_events::<AttributeDisplay>(&mut app);
    record_events::<StartDyingSequence>(&mut app);
    record_events::<InputLockChanged>(&mut app);
    record_events::<AbilityGranted>(&mut app);

    app
}

pub fn default_app() -> App {
    test_app(CharacterSettings::default())
}

/// Run one update per `STEP` in `seconds`
pub fn advance(app: &mut App, seconds: f32) {
    let steps = (seconds / STEP.as_secs_f32()).round() as usize;
    for _ in 0..steps {
        app.update();
    }
}

pub fn recorded<E: Event + Clone>(app: &App) -> Vec<E> {
    app.world().resource::<Recorded<E>>().0.clone()
}

pub fn damage(app: &mut App, target: Entity, amount: f32) {
    app.world_mut().send_event(ApplyAttributeEffect {
        target,
        effect: AttributeEffect {
            attribute: abilitysys::character::attributes::AttributeKind::Health,
            magnitude: -amount,
        },
    });
    app.update();
}
