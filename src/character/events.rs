//! Character events
//!
//! Requests flowing into the character systems and the hooks they emit.
//! Events sent within one frame are delivered to readers in send order.

use bevy::prelude::*;

use super::abilities::{AbilityId, GameplayTag};
use super::attributes::AttributeKind;

// ============================================================================
// Requests
// ============================================================================

/// Grant a batch of abilities to a character
#[derive(Event, Clone, Debug)]
pub struct AcquireAbilities {
    pub character: Entity,
    pub abilities: Vec<AbilityId>,
}

/// Knock a character back and stun it
#[derive(Event, Clone, Debug)]
pub struct PushCharacter {
    pub target: Entity,
    /// Direction of the impulse (scaled by `strength`, not normalized)
    pub direction: Vec3,
    pub strength: f32,
    /// Seconds of stun and of suspended friction
    pub stun_duration: f32,
}

/// Add a gameplay tag to a character (count pinned to one)
#[derive(Event, Clone, Debug)]
pub struct AddGameplayTag {
    pub character: Entity,
    pub tag: GameplayTag,
}

/// Remove one count of a gameplay tag from a character
#[derive(Event, Clone, Debug)]
pub struct RemoveGameplayTag {
    pub character: Entity,
    pub tag: GameplayTag,
}

/// An instant change to one attribute
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttributeEffect {
    pub attribute: AttributeKind,
    pub magnitude: f32,
}

/// Apply an instant effect to a single character
#[derive(Event, Clone, Copy, Debug)]
pub struct ApplyAttributeEffect {
    pub target: Entity,
    pub effect: AttributeEffect,
}

/// Apply the same effect to every targeted character
#[derive(Event, Clone, Debug)]
pub struct ApplyEffectToTargets {
    pub effect: AttributeEffect,
    pub targets: Vec<Entity>,
}

// ============================================================================
// Notifications and hooks
// ============================================================================

/// An attribute's current value changed
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub struct AttributeChanged {
    pub entity: Entity,
    pub attribute: AttributeKind,
    pub value: f32,
    pub max: f32,
}

/// Display hook: forwarded for every attribute change, dead or alive
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub struct AttributeDisplay {
    pub entity: Entity,
    pub attribute: AttributeKind,
    pub value: f32,
    pub max: f32,
}

/// Death-sequence hook: fires once per character
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct StartDyingSequence {
    pub entity: Entity,
}

/// Why input was locked or unlocked
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputLockReason {
    Death,
    Stun,
    StunRecovered,
}

/// Input was enabled or disabled on a character's controller
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputLockChanged {
    pub entity: Entity,
    pub enabled: bool,
    pub reason: InputLockReason,
}

/// An ability was granted to a character
#[derive(Event, Clone, Debug, PartialEq, Eq)]
pub struct AbilityGranted {
    pub entity: Entity,
    pub ability: AbilityId,
}
