//! Headless mode for automated runs
//!
//! Runs character scenarios without any graphical output, suitable for
//! automated testing.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- --headless assets/scenarios/demo.json
//! ```
//!
//! ## JSON Configuration
//!
//! ```json
//! {
//!   "characters": [
//!     { "name": "Hero", "controller": "Player", "abilities": ["Fireball"] },
//!     { "name": "Grunt", "controller": "Ai" }
//!   ],
//!   "actions": [
//!     { "at": 1.0, "target": "Grunt",
//!       "kind": { "Attribute": { "attribute": "Health", "amount": -100.0 } } }
//!   ],
//!   "max_duration_secs": 5
//! }
//! ```

pub mod config;
pub mod runner;

pub use config::ScenarioConfig;
pub use runner::{
    build_scenario_app, run_headless_scenario, CharacterResult, ScenarioPlugin, ScenarioResult,
    ScenarioState,
};
