//! Ability System - Types and Tag Containers
//!
//! This module contains the ability identifiers, display metadata and the
//! per-character `AbilitySystem` component that owns granted abilities and
//! loose gameplay tags. Ability definitions themselves are loaded from
//! `assets/config/abilities.ron` via the `ability_config` module.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;

/// String-based ability identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbilityId(pub String);

impl AbilityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AbilityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Which resource an ability spends
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum CostType {
    #[default]
    Mana,
    Strength,
}

/// Display metadata shown in the player's ability bar.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AbilityInfo {
    /// Name shown on the ability button
    pub name: String,
    /// Cooldown in seconds
    #[serde(default)]
    pub cooldown: f32,
    /// Resource cost
    #[serde(default)]
    pub cost: f32,
    /// Which resource the cost is paid with
    #[serde(default)]
    pub cost_type: CostType,
    /// Icon asset path
    #[serde(default)]
    pub icon: String,
}

/// A granted ability with the level and input binding it was granted at.
#[derive(Clone, Debug, PartialEq)]
pub struct AbilitySpec {
    pub ability: AbilityId,
    pub level: u32,
    pub input_id: i32,
}

impl AbilitySpec {
    pub fn new(ability: AbilityId, level: u32, input_id: i32) -> Self {
        Self {
            ability,
            level,
            input_id,
        }
    }
}

/// Hierarchical gameplay label, e.g. `Character.State.FullHealth`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameplayTag(pub String);

impl GameplayTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when this tag equals `query` or is nested beneath it.
    ///
    /// `Character.State.Stunned` matches `Character.State` but not `Character.St`.
    pub fn matches(&self, query: &GameplayTag) -> bool {
        match self.0.strip_prefix(query.as_str()) {
            Some("") => true,
            Some(rest) => rest.starts_with('.'),
            None => false,
        }
    }
}

impl fmt::Display for GameplayTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameplayTag {
    fn from(tag: &str) -> Self {
        Self(tag.to_string())
    }
}

/// Reference-counted loose tags.
#[derive(Clone, Debug, Default)]
pub struct GameplayTagCounts {
    counts: HashMap<GameplayTag, u32>,
}

impl GameplayTagCounts {
    pub fn add(&mut self, tag: GameplayTag) {
        *self.counts.entry(tag).or_insert(0) += 1;
    }

    /// Force the count of a tag. A count of zero removes it.
    pub fn set_count(&mut self, tag: GameplayTag, count: u32) {
        if count == 0 {
            self.counts.remove(&tag);
        } else {
            self.counts.insert(tag, count);
        }
    }

    pub fn remove(&mut self, tag: &GameplayTag) {
        if let Some(count) = self.counts.get_mut(tag) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.counts.remove(tag);
            }
        }
    }

    pub fn count(&self, tag: &GameplayTag) -> u32 {
        self.counts.get(tag).copied().unwrap_or(0)
    }

    /// Hierarchical lookup: any held tag equal to or nested under `query`.
    pub fn has_tag(&self, query: &GameplayTag) -> bool {
        self.counts.keys().any(|tag| tag.matches(query))
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GameplayTag, u32)> {
        self.counts.iter().map(|(tag, count)| (tag, *count))
    }
}

/// Owner/avatar pair the ability system acts on behalf of.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActorInfo {
    pub owner: Entity,
    pub avatar: Entity,
}

/// Marker for entities whose ability grants are authoritative.
///
/// Non-authoritative copies still initialise actor info but never mutate
/// their granted abilities.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Authority;

/// Per-character ability state: granted abilities and loose tags.
#[derive(Component, Debug, Default)]
pub struct AbilitySystem {
    granted: SmallVec<[AbilitySpec; 8]>,
    pub tags: GameplayTagCounts,
    actor_info: Option<ActorInfo>,
}

impl AbilitySystem {
    /// Grant an ability. Duplicates are not filtered.
    pub fn grant(&mut self, spec: AbilitySpec) {
        self.granted.push(spec);
    }

    pub fn init_actor_info(&mut self, owner: Entity, avatar: Entity) {
        self.actor_info = Some(ActorInfo { owner, avatar });
    }

    pub fn actor_info(&self) -> Option<ActorInfo> {
        self.actor_info
    }

    pub fn granted(&self) -> &[AbilitySpec] {
        &self.granted
    }

    pub fn has_ability(&self, ability: &AbilityId) -> bool {
        self.granted.iter().any(|spec| &spec.ability == ability)
    }

    pub fn add_loose_tag(&mut self, tag: GameplayTag) {
        self.tags.add(tag);
    }

    pub fn set_tag_count(&mut self, tag: GameplayTag, count: u32) {
        self.tags.set_count(tag, count);
    }

    pub fn remove_loose_tag(&mut self, tag: &GameplayTag) {
        self.tags.remove(tag);
    }

    /// Add a tag and pin its count to one, so repeated adds never stack.
    pub fn add_gameplay_tag(&mut self, tag: &GameplayTag) {
        self.add_loose_tag(tag.clone());
        self.set_tag_count(tag.clone(), 1);
    }

    pub fn remove_gameplay_tag(&mut self, tag: &GameplayTag) {
        self.remove_loose_tag(tag);
    }

    pub fn has_tag(&self, query: &GameplayTag) -> bool {
        self.tags.has_tag(query)
    }
}
