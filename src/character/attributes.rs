//! Character attributes (health, mana, strength)
//!
//! Attributes are modified by instant effects and broadcast an
//! [`AttributeChanged`](super::events::AttributeChanged) notification carrying
//! the new value and its maximum.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Attributes tracked for every character
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum AttributeKind {
    Health,
    Mana,
    Strength,
}

impl AttributeKind {
    pub const ALL: [AttributeKind; 3] = [
        AttributeKind::Health,
        AttributeKind::Mana,
        AttributeKind::Strength,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AttributeKind::Health => "Health",
            AttributeKind::Mana => "Mana",
            AttributeKind::Strength => "Strength",
        }
    }
}

/// Current value and upper bound of a single attribute
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttributeValue {
    pub current: f32,
    pub maximum: f32,
}

impl AttributeValue {
    pub fn full(maximum: f32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.maximum
    }

    /// Fraction of maximum, clamped for display
    pub fn fraction(&self) -> f32 {
        if self.maximum <= 0.0 {
            0.0
        } else {
            (self.current / self.maximum).clamp(0.0, 1.0)
        }
    }
}

/// Attribute set owned by a character
#[derive(Component, Clone, Debug, PartialEq)]
pub struct Attributes {
    pub health: AttributeValue,
    pub mana: AttributeValue,
    pub strength: AttributeValue,
}

impl Default for Attributes {
    fn default() -> Self {
        Self::new(100.0, 100.0, 100.0)
    }
}

impl Attributes {
    pub fn new(max_health: f32, max_mana: f32, max_strength: f32) -> Self {
        Self {
            health: AttributeValue::full(max_health),
            mana: AttributeValue::full(max_mana),
            strength: AttributeValue::full(max_strength),
        }
    }

    pub fn get(&self, kind: AttributeKind) -> AttributeValue {
        match kind {
            AttributeKind::Health => self.health,
            AttributeKind::Mana => self.mana,
            AttributeKind::Strength => self.strength,
        }
    }

    fn get_mut(&mut self, kind: AttributeKind) -> &mut AttributeValue {
        match kind {
            AttributeKind::Health => &mut self.health,
            AttributeKind::Mana => &mut self.mana,
            AttributeKind::Strength => &mut self.strength,
        }
    }

    /// Add `magnitude` to the current value and return the result.
    ///
    /// Values are not clamped: health may go below zero and notifications
    /// report it as-is.
    pub fn apply(&mut self, kind: AttributeKind, magnitude: f32) -> AttributeValue {
        let value = self.get_mut(kind);
        value.current += magnitude;
        *value
    }

    /// Overwrite the current value and return the result.
    pub fn set(&mut self, kind: AttributeKind, current: f32) -> AttributeValue {
        let value = self.get_mut(kind);
        value.current = current;
        *value
    }
}
