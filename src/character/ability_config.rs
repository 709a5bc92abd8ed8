//! Data-Driven Ability Configuration
//!
//! Abilities are defined in `assets/config/abilities.ron` rather than in Rust.
//! A definition that carries a `ui` block is exposed in the player's ability
//! bar when granted; plain definitions are granted silently.
//!
//! ## Usage
//! ```ignore
//! fn my_system(abilities: Res<AbilityDefinitions>) {
//!     if abilities.is_ui_ability(&AbilityId::new("Fireball")) {
//!         // ...
//!     }
//! }
//! ```

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::abilities::{AbilityId, AbilityInfo};

/// Default location of the ability definitions file
pub const ABILITIES_CONFIG_PATH: &str = "assets/config/abilities.ron";

/// Ability configuration loaded from RON.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AbilityConfig {
    /// Internal name of the ability
    pub name: String,
    /// Display metadata; present only for abilities shown in the ability bar
    #[serde(default)]
    pub ui: Option<AbilityInfo>,
}

/// Root structure for the abilities.ron file
#[derive(Debug, Serialize, Deserialize)]
pub struct AbilitiesConfig {
    pub abilities: HashMap<AbilityId, AbilityConfig>,
}

/// Resource containing all ability definitions.
///
/// Access via `Res<AbilityDefinitions>` in systems.
#[derive(Resource, Debug, Default)]
pub struct AbilityDefinitions {
    definitions: HashMap<AbilityId, AbilityConfig>,
}

impl AbilityDefinitions {
    /// Create from a loaded config
    pub fn new(config: AbilitiesConfig) -> Self {
        Self {
            definitions: config.abilities,
        }
    }

    pub fn get(&self, ability: &AbilityId) -> Option<&AbilityConfig> {
        self.definitions.get(ability)
    }

    pub fn contains(&self, ability: &AbilityId) -> bool {
        self.definitions.contains_key(ability)
    }

    /// Display metadata for abilities that appear in the ability bar
    pub fn ui_info(&self, ability: &AbilityId) -> Option<&AbilityInfo> {
        self.get(ability).and_then(|config| config.ui.as_ref())
    }

    pub fn is_ui_ability(&self, ability: &AbilityId) -> bool {
        self.ui_info(ability).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &AbilityId> {
        self.definitions.keys()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Check every definition has a name and sane display values
    pub fn validate(&self) -> Result<(), String> {
        for (id, config) in &self.definitions {
            if config.name.is_empty() {
                return Err(format!("Ability {} has an empty name", id));
            }
            if let Some(ui) = &config.ui {
                if ui.cooldown < 0.0 || ui.cost < 0.0 {
                    return Err(format!(
                        "Ability {} has negative cooldown or cost ({}, {})",
                        id, ui.cooldown, ui.cost
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Parse ability definitions from a RON string
pub fn parse_ability_definitions(contents: &str) -> Result<AbilityDefinitions, String> {
    let config: AbilitiesConfig =
        ron::from_str(contents).map_err(|e| format!("Failed to parse abilities: {}", e))?;

    let definitions = AbilityDefinitions::new(config);
    definitions.validate()?;
    Ok(definitions)
}

/// Load ability definitions from a RON file
pub fn load_ability_definitions(path: &Path) -> Result<AbilityDefinitions, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    let definitions = parse_ability_definitions(&contents)
        .map_err(|e| format!("{} ({})", e, path.display()))?;

    info!(
        "Loaded {} ability definitions from {}",
        definitions.len(),
        path.display()
    );

    Ok(definitions)
}

/// Bevy plugin for ability configuration loading
pub struct AbilityConfigPlugin;

impl Plugin for AbilityConfigPlugin {
    fn build(&self, app: &mut App) {
        match load_ability_definitions(Path::new(ABILITIES_CONFIG_PATH)) {
            Ok(definitions) => {
                app.insert_resource(definitions);
            }
            Err(e) => {
                // Config must be valid at startup
                panic!("Failed to load ability definitions: {}", e);
            }
        }
    }
}
