//! Character system
//!
//! Wires characters into the ability and attribute model:
//! - Ability acquisition and UI registration
//! - Attribute change reactions (death once, display hooks)
//! - Team affiliation and hostility
//! - Knockback, stun and input lockout
//!
//! ## System Phases
//!
//! Character systems run in ordered phases each frame:
//!
//! 1. **Spawn** - team assignment and initial tags for new characters
//! 2. **Requests** - ability grants, tag requests, attribute effects
//! 3. **Reactions** - death handling and display hooks
//! 4. **Stun** - recovery timers, then knockback and stun start
//! 5. **Movement** - velocity integration

use bevy::prelude::*;
use std::path::Path;

pub mod abilities;
pub mod ability_config;
pub mod attributes;
pub mod components;
pub mod events;
pub mod log;
pub mod settings;
pub mod systems;

use abilities::{AbilitySystem, Authority};
use ability_config::AbilityDefinitions;
use attributes::Attributes;
use components::{CharacterTimers, Character, Movement};
use events::*;
use log::CharacterLog;
use settings::{CharacterSettings, CHARACTER_SETTINGS_PATH};
use systems::*;

/// System set labels for character system ordering.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CharacterSet {
    Spawn,
    Requests,
    Reactions,
    Stun,
    Movement,
}

/// Plugin for the character systems.
///
/// Inserts [`CharacterSettings`] from `assets/config/character.ron` unless the
/// app already has them, and an empty [`AbilityDefinitions`] unless one was
/// loaded (see [`ability_config::AbilityConfigPlugin`]).
pub struct CharacterPlugin;

impl Plugin for CharacterPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<CharacterSettings>() {
            app.insert_resource(CharacterSettings::load(Path::new(CHARACTER_SETTINGS_PATH)));
        }

        app.init_resource::<AbilityDefinitions>()
            .init_resource::<CharacterLog>()
            // Requests
            .add_event::<AcquireAbilities>()
            .add_event::<PushCharacter>()
            .add_event::<AddGameplayTag>()
            .add_event::<RemoveGameplayTag>()
            .add_event::<ApplyAttributeEffect>()
            .add_event::<ApplyEffectToTargets>()
            // Notifications and hooks
            .add_event::<AttributeChanged>()
            .add_event::<AttributeDisplay>()
            .add_event::<StartDyingSequence>()
            .add_event::<InputLockChanged>()
            .add_event::<AbilityGranted>();

        configure_character_system_ordering(app);
        add_core_character_systems(app, || true);
    }
}

/// Configures the ordering between character system phases.
pub fn configure_character_system_ordering(app: &mut App) {
    app.configure_sets(
        Update,
        (
            CharacterSet::Spawn,
            CharacterSet::Requests,
            CharacterSet::Reactions,
            CharacterSet::Stun,
            CharacterSet::Movement,
        )
            .chain(),
    );
}

/// Adds the character systems to the app under `run_condition`.
pub fn add_core_character_systems<M>(app: &mut App, run_condition: impl Condition<M> + Clone)
where
    M: 'static,
{
    app.add_systems(
        Update,
        (log::advance_log_time, setup_spawned_characters)
            .chain()
            .in_set(CharacterSet::Spawn)
            .run_if(run_condition.clone()),
    );

    app.add_systems(
        Update,
        (
            acquire_abilities,
            apply_tag_requests,
            fan_out_effects,
            apply_attribute_effects,
        )
            .chain()
            .in_set(CharacterSet::Requests)
            .run_if(run_condition.clone()),
    );

    app.add_systems(
        Update,
        (react_to_attribute_changes, maintain_full_health_tag)
            .chain()
            .in_set(CharacterSet::Reactions)
            .run_if(run_condition.clone()),
    );

    app.add_systems(
        Update,
        // Timers scheduled by a push start counting on the next frame
        (tick_character_timers, push_characters)
            .chain()
            .in_set(CharacterSet::Stun)
            .run_if(run_condition.clone()),
    );

    app.add_systems(
        Update,
        integrate_movement
            .in_set(CharacterSet::Movement)
            .run_if(run_condition),
    );
}

/// Components every character spawns with. Controllers, [`components::AbilityBar`]
/// and [`components::TeamOverride`] are added separately.
#[derive(Bundle)]
pub struct CharacterBundle {
    pub character: Character,
    pub attributes: Attributes,
    pub ability_system: AbilitySystem,
    pub movement: Movement,
    pub timers: CharacterTimers,
    pub authority: Authority,
    pub transform: Transform,
}

impl CharacterBundle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            character: Character::new(name),
            attributes: Attributes::default(),
            ability_system: AbilitySystem::default(),
            movement: Movement::default(),
            timers: CharacterTimers::default(),
            authority: Authority,
            transform: Transform::default(),
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn at(mut self, translation: Vec3) -> Self {
        self.transform = Transform::from_translation(translation);
        self
    }
}
