//! JSON configuration parsing for headless mode
//!
//! A scenario lists the characters to spawn and the timed actions to play
//! against them.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::character::attributes::AttributeKind;

/// Which controller a scenario character is possessed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControllerKind {
    Player,
    Ai,
    #[default]
    None,
}

/// A character to spawn at scenario start
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioCharacter {
    /// Unique name, used by actions to address the character
    pub name: String,
    #[serde(default)]
    pub controller: ControllerKind,
    #[serde(default = "default_attribute_max")]
    pub max_health: f32,
    #[serde(default = "default_attribute_max")]
    pub max_mana: f32,
    #[serde(default = "default_attribute_max")]
    pub max_strength: f32,
    /// Abilities acquired at spawn
    #[serde(default)]
    pub abilities: Vec<String>,
    #[serde(default)]
    pub position: [f32; 3],
    /// Explicit team for non-player characters; players always join team 0
    #[serde(default)]
    pub team: Option<u8>,
    /// Whether this character's ability grants are authoritative
    #[serde(default = "default_true")]
    pub authority: bool,
    /// Give a player-controlled character an ability bar
    #[serde(default = "default_true")]
    pub ability_bar: bool,
    #[serde(default = "default_ground_friction")]
    pub ground_friction: f32,
}

/// What a timed action does
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ActionKind {
    /// Add `amount` to an attribute (negative for damage)
    Attribute {
        attribute: AttributeKind,
        amount: f32,
    },
    /// Apply the same attribute change to several characters
    AreaEffect {
        attribute: AttributeKind,
        amount: f32,
        others: Vec<String>,
    },
    Push {
        direction: [f32; 3],
        strength: f32,
        stun_duration: f32,
    },
    Acquire {
        abilities: Vec<String>,
    },
    AddTag {
        tag: String,
    },
    RemoveTag {
        tag: String,
    },
}

/// An action fired once scenario time reaches `at`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioAction {
    /// Seconds since scenario start
    pub at: f32,
    /// Name of the character the action targets
    pub target: String,
    pub kind: ActionKind,
}

/// Headless scenario configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub characters: Vec<ScenarioCharacter>,
    #[serde(default)]
    pub actions: Vec<ScenarioAction>,
    /// Custom output path for the character log (optional)
    #[serde(default)]
    pub output_path: Option<String>,
    /// Scenario duration in seconds (default: 10)
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: f32,
}

fn default_attribute_max() -> f32 {
    100.0
}

fn default_ground_friction() -> f32 {
    8.0
}

fn default_true() -> bool {
    true
}

fn default_max_duration() -> f32 {
    10.0
}

impl ScenarioConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_json(&contents)
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(contents: &str) -> Result<Self, String> {
        let config: ScenarioConfig =
            serde_json::from_str(contents).map_err(|e| format!("Failed to parse JSON: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.characters.is_empty() {
            return Err("scenario must have at least one character".to_string());
        }

        let mut names = HashSet::new();
        for character in &self.characters {
            if character.name.is_empty() {
                return Err("character names must not be empty".to_string());
            }
            if !names.insert(character.name.as_str()) {
                return Err(format!("duplicate character name '{}'", character.name));
            }
            if character.max_health <= 0.0 {
                return Err(format!("{}: max_health must be positive", character.name));
            }
            if character.ground_friction < 0.0 {
                return Err(format!(
                    "{}: ground_friction must not be negative",
                    character.name
                ));
            }
        }

        for action in &self.actions {
            if !names.contains(action.target.as_str()) {
                return Err(format!(
                    "action at {:.2}s targets unknown character '{}'",
                    action.at, action.target
                ));
            }
            if action.at < 0.0 {
                return Err(format!("action for '{}' has negative time", action.target));
            }
            match &action.kind {
                ActionKind::Push { stun_duration, .. } if *stun_duration < 0.0 => {
                    return Err(format!(
                        "push on '{}' has negative stun_duration",
                        action.target
                    ));
                }
                ActionKind::AreaEffect { others, .. } => {
                    if let Some(unknown) = others.iter().find(|n| !names.contains(n.as_str())) {
                        return Err(format!("area effect targets unknown character '{}'", unknown));
                    }
                }
                _ => {}
            }
        }

        if self.max_duration_secs <= 0.0 {
            return Err("max_duration_secs must be positive".to_string());
        }

        Ok(())
    }
}
