//! AbilitySys - Ability and Attribute Character Integration
//!
//! Player and AI characters that acquire abilities, react to attribute
//! changes, belong to teams, can be knocked back and stunned, and die once.
//!
//! This library exposes the core modules for testing and reuse.

pub mod camera;
pub mod character;
pub mod cli;
pub mod headless;
pub mod ui;

// Re-export commonly used types
pub use character::components::{Character, Hostile, TeamId};
pub use character::log::{CharacterLog, CharacterLogEventType};
pub use character::{CharacterBundle, CharacterPlugin};
pub use headless::ScenarioConfig;
