//! Character components
//!
//! Plain data aggregates that replace the engine's character class:
//! team affiliation, death state, controllers, movement and timers.
//! Controllers are probed by presence (`Option<&mut PlayerController>`)
//! instead of by downcasting.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::abilities::AbilityInfo;

// ============================================================================
// Teams
// ============================================================================

/// Team affiliation used for hostility checks.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub u8);

impl TeamId {
    /// Team assigned to human-controlled characters at spawn
    pub const PLAYER: TeamId = TeamId(0);
    /// Unassigned sentinel
    pub const NEUTRAL: TeamId = TeamId(255);
}

impl Default for TeamId {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Anything that belongs to a team.
pub trait Hostile {
    fn team(&self) -> TeamId;

    /// Hostile iff the team ids differ.
    fn is_hostile_to(&self, other: &impl Hostile) -> bool {
        self.team() != other.team()
    }
}

impl Hostile for TeamId {
    fn team(&self) -> TeamId {
        *self
    }
}

// ============================================================================
// Character
// ============================================================================

/// Core character state owned by this crate.
#[derive(Component, Clone, Debug)]
pub struct Character {
    pub name: String,
    pub team: TeamId,
    has_died: bool,
}

impl Character {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            team: TeamId::NEUTRAL,
            has_died: false,
        }
    }

    pub fn has_died(&self) -> bool {
        self.has_died
    }

    /// Record death. Returns true only for the first call.
    pub fn mark_dead(&mut self) -> bool {
        if self.has_died {
            return false;
        }
        self.has_died = true;
        true
    }

    pub fn set_team(&mut self, team: TeamId) {
        self.team = team;
    }
}

impl Hostile for Character {
    fn team(&self) -> TeamId {
        self.team
    }
}

/// Team assigned explicitly at spawn to a character that isn't player-controlled.
/// Player-controlled characters always join [`TeamId::PLAYER`].
#[derive(Component, Clone, Copy, Debug)]
pub struct TeamOverride(pub TeamId);

// ============================================================================
// Controllers
// ============================================================================

/// Controllers that can have their input locked out.
pub trait InputControllable {
    fn disable_input(&mut self, reason: &str);
    fn enable_input(&mut self);
    fn is_input_enabled(&self) -> bool;
}

/// Human player controller
#[derive(Component, Clone, Debug)]
pub struct PlayerController {
    input_enabled: bool,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self {
            input_enabled: true,
        }
    }
}

impl InputControllable for PlayerController {
    fn disable_input(&mut self, _reason: &str) {
        self.input_enabled = false;
    }

    fn enable_input(&mut self) {
        self.input_enabled = true;
    }

    fn is_input_enabled(&self) -> bool {
        self.input_enabled
    }
}

/// Run state of an AI controller's decision logic
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum BrainState {
    #[default]
    Running,
    Stopped { reason: String },
}

/// AI controller
#[derive(Component, Clone, Debug, Default)]
pub struct AiController {
    pub brain: BrainState,
}

impl AiController {
    pub fn stop_logic(&mut self, reason: &str) {
        self.brain = BrainState::Stopped {
            reason: reason.to_string(),
        };
    }

    pub fn restart_logic(&mut self) {
        self.brain = BrainState::Running;
    }

    pub fn stop_reason(&self) -> Option<&str> {
        match &self.brain {
            BrainState::Running => None,
            BrainState::Stopped { reason } => Some(reason),
        }
    }
}

impl InputControllable for AiController {
    fn disable_input(&mut self, reason: &str) {
        self.stop_logic(reason);
    }

    fn enable_input(&mut self) {
        self.restart_logic();
    }

    fn is_input_enabled(&self) -> bool {
        self.brain == BrainState::Running
    }
}

/// Ability buttons shown to the player. Only player-controlled characters
/// carrying this component accept UI entries.
#[derive(Component, Clone, Debug, Default)]
pub struct AbilityBar {
    pub slots: Vec<AbilityInfo>,
}

impl AbilityBar {
    pub fn add_ability(&mut self, info: AbilityInfo) {
        self.slots.push(info);
    }
}

// ============================================================================
// Movement
// ============================================================================

/// Simple kinematic movement state
#[derive(Component, Clone, Debug)]
pub struct Movement {
    pub velocity: Vec3,
    pub ground_friction: f32,
    suspended_friction: Option<f32>,
}

impl Default for Movement {
    fn default() -> Self {
        Self::new(8.0)
    }
}

impl Movement {
    pub fn new(ground_friction: f32) -> Self {
        Self {
            velocity: Vec3::ZERO,
            ground_friction,
            suspended_friction: None,
        }
    }

    /// Apply an impulse as an immediate velocity change (mass ignored)
    pub fn add_impulse(&mut self, impulse: Vec3) {
        self.velocity += impulse;
    }

    /// Zero ground friction, remembering the value to restore.
    /// A second suspension keeps the originally remembered value.
    pub fn suspend_friction(&mut self) {
        if self.suspended_friction.is_none() {
            self.suspended_friction = Some(self.ground_friction);
        }
        self.ground_friction = 0.0;
    }

    pub fn restore_friction(&mut self) {
        if let Some(friction) = self.suspended_friction.take() {
            self.ground_friction = friction;
        }
    }

    pub fn is_friction_suspended(&self) -> bool {
        self.suspended_friction.is_some()
    }
}

// ============================================================================
// Timers
// ============================================================================

/// One-shot timer slot. Scheduling on a pending slot replaces the old timer.
#[derive(Clone, Debug, Default)]
pub struct TimerSlot {
    timer: Option<Timer>,
}

impl TimerSlot {
    pub fn schedule(&mut self, seconds: f32) {
        self.timer = Some(Timer::from_seconds(seconds.max(0.0), TimerMode::Once));
    }

    pub fn cancel(&mut self) {
        self.timer = None;
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_some()
    }

    pub fn remaining_secs(&self) -> Option<f32> {
        self.timer.as_ref().map(|timer| timer.remaining_secs())
    }

    /// Advance the timer. Returns true exactly once, on the tick it fires.
    pub fn tick(&mut self, delta: Duration) -> bool {
        let Some(timer) = self.timer.as_mut() else {
            return false;
        };
        timer.tick(delta);
        if timer.finished() {
            self.timer = None;
            true
        } else {
            false
        }
    }
}

/// Pending one-shot callbacks owned by a character
#[derive(Component, Clone, Debug, Default)]
pub struct CharacterTimers {
    /// Re-enables input when it fires
    pub stun_recovery: TimerSlot,
    /// Restores ground friction when it fires
    pub friction_reenable: TimerSlot,
    /// Stun length carried from the push to the deferred stun start
    pub pending_stun: Option<f32>,
}
