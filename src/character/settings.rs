//! Character policy settings
//!
//! Loaded from `assets/config/character.ron`, falling back to defaults when
//! the file is missing or malformed.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::abilities::GameplayTag;

/// Default location of the character settings file
pub const CHARACTER_SETTINGS_PATH: &str = "assets/config/character.ron";

/// How a push turns into an input lockout
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StunChain {
    /// Input is disabled at the push and re-enabled one stun duration later
    #[default]
    Immediate,
    /// The stun starts when friction is restored and lasts another
    /// stun duration, so input is locked for the second half of the
    /// two-duration window
    Deferred,
}

/// Tunable character policy
#[derive(Resource, Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterSettings {
    pub stun_chain: StunChain,
    /// Level abilities are granted at
    pub default_ability_level: u32,
    /// Input binding abilities are granted with
    pub default_input_id: i32,
    /// Tag held while health is at maximum
    pub full_health_tag: GameplayTag,
    /// Reason given to AI controllers stopped by death
    pub death_stop_reason: String,
    /// Reason given to AI controllers stopped by a stun
    pub stun_stop_reason: String,
}

impl Default for CharacterSettings {
    fn default() -> Self {
        Self {
            stun_chain: StunChain::Immediate,
            default_ability_level: 1,
            default_input_id: 0,
            full_health_tag: GameplayTag::new("Character.State.FullHealth"),
            death_stop_reason: "Dead".to_string(),
            stun_stop_reason: "Stunned".to_string(),
        }
    }
}

impl CharacterSettings {
    /// Load settings from file, or return default if it can't be used
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            info!("No character settings at {:?}, using defaults", path);
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(settings) => {
                    info!("Loaded character settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("{}", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read character settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn parse(contents: &str) -> Result<Self, String> {
        ron::from_str(contents).map_err(|e| format!("Failed to parse character settings: {}", e))
    }

    /// Save settings to file
    pub fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let contents = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        fs::write(path, contents)?;
        info!("Saved character settings to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings = CharacterSettings::parse("(stun_chain: Deferred)").unwrap();

        assert_eq!(settings.stun_chain, StunChain::Deferred);
        assert_eq!(settings.default_ability_level, 1);
        assert_eq!(settings.death_stop_reason, "Dead");
    }

    #[test]
    fn test_saved_settings_load_back() {
        let path = std::env::temp_dir().join("abilitysys_character_settings_test.ron");
        let settings = CharacterSettings {
            stun_chain: StunChain::Deferred,
            stun_stop_reason: "Knocked".to_string(),
            ..default()
        };
        settings.save(&path).unwrap();

        let loaded = CharacterSettings::load(&path);
        assert_eq!(loaded.stun_chain, StunChain::Deferred);
        assert_eq!(loaded.stun_stop_reason, "Knocked");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings = CharacterSettings::load(Path::new("does/not/exist.ron"));
        assert_eq!(settings.stun_chain, StunChain::Immediate);
    }
}
