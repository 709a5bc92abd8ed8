//! Integration tests for headless scenario execution
//!
//! These tests verify that:
//! - Scenario configs are parsed and validated
//! - Scenarios run to completion with inspectable results
//! - Timed actions reach the character systems mid-run
//! - The character log is written in the expected line format

use std::path::Path;

use abilitysys::headless::{build_scenario_app, run_headless_scenario, ScenarioConfig, ScenarioState};
use abilitysys::{Character, CharacterLog, CharacterLogEventType};
use abilitysys::character::components::AiController;
use bevy::prelude::*;
use regex::Regex;

const DEMO_SCENARIO: &str = "assets/scenarios/demo.json";

fn demo_config() -> ScenarioConfig {
    ScenarioConfig::load_from_file(Path::new(DEMO_SCENARIO)).expect("demo scenario should load")
}

/// Drive a scenario app until its clock passes `seconds`
fn run_until(app: &mut App, seconds: f32) {
    while app.world().resource::<ScenarioState>().elapsed_time < seconds {
        app.update();
    }
}

// =============================================================================
// Config parsing
// =============================================================================

#[test]
fn test_minimal_config_uses_defaults() {
    let config = ScenarioConfig::from_json(r#"{ "characters": [ { "name": "Solo" } ] }"#)
        .expect("minimal config should parse");

    assert_eq!(config.max_duration_secs, 10.0);
    assert!(config.actions.is_empty());
    assert!(config.output_path.is_none());

    let solo = &config.characters[0];
    assert_eq!(solo.max_health, 100.0);
    assert_eq!(solo.ground_friction, 8.0);
    assert!(solo.authority);
    assert!(solo.ability_bar);
    assert!(solo.team.is_none());
}

#[test]
fn test_config_validation_errors() {
    let cases = [
        (r#"{ "characters": [] }"#, "at least one character"),
        (
            r#"{ "characters": [ { "name": "A" }, { "name": "A" } ] }"#,
            "duplicate character name",
        ),
        (
            r#"{ "characters": [ { "name": "A", "max_health": 0 } ] }"#,
            "max_health must be positive",
        ),
        (
            r#"{ "characters": [ { "name": "A", "ground_friction": -1 } ] }"#,
            "ground_friction",
        ),
        (
            r#"{ "characters": [ { "name": "A" } ],
                 "actions": [ { "at": 1, "target": "B",
                   "kind": { "Attribute": { "attribute": "Health", "amount": -5 } } } ] }"#,
            "unknown character 'B'",
        ),
        (
            r#"{ "characters": [ { "name": "A" } ],
                 "actions": [ { "at": -1, "target": "A",
                   "kind": { "AddTag": { "tag": "X" } } } ] }"#,
            "negative time",
        ),
        (
            r#"{ "characters": [ { "name": "A" } ],
                 "actions": [ { "at": 1, "target": "A",
                   "kind": { "Push": { "direction": [1, 0, 0], "strength": 5, "stun_duration": -1 } } } ] }"#,
            "negative stun_duration",
        ),
        (
            r#"{ "characters": [ { "name": "A" } ],
                 "actions": [ { "at": 1, "target": "A",
                   "kind": { "AreaEffect": { "attribute": "Mana", "amount": -5, "others": ["Z"] } } } ] }"#,
            "unknown character 'Z'",
        ),
        (
            r#"{ "characters": [ { "name": "A" } ], "max_duration_secs": 0 }"#,
            "max_duration_secs",
        ),
    ];

    for (json, expected) in cases {
        let err = ScenarioConfig::from_json(json).expect_err(json);
        assert!(
            err.contains(expected),
            "error '{}' should mention '{}'",
            err,
            expected
        );
    }
}

#[test]
fn test_malformed_json_is_reported() {
    let err = ScenarioConfig::from_json("{ not json").unwrap_err();
    assert!(err.starts_with("Failed to parse JSON"));
}

#[test]
fn test_missing_file_is_reported() {
    let err = ScenarioConfig::load_from_file(Path::new("does/not/exist.json")).unwrap_err();
    assert!(err.starts_with("Failed to read config file"));
}

// =============================================================================
// Scenario execution
// =============================================================================

#[test]
fn test_demo_scenario_runs_to_completion() {
    let result = run_headless_scenario(demo_config()).expect("demo scenario should complete");

    assert!(result.duration >= 8.0);
    assert_eq!(result.characters.len(), 3);

    let hero = result.character("Hero").unwrap();
    assert_eq!(hero.team, 0);
    assert!(!hero.died);
    assert_eq!(hero.input_enabled, Some(true));
    assert_eq!(hero.health, 70.0);
    assert_eq!(hero.mana, 60.0);
    assert_eq!(hero.abilities, vec!["Fireball", "Dash", "Melee", "HealingWave"]);
    assert_eq!(hero.ability_bar, vec!["Fireball", "Dash", "Healing Wave"]);
    assert!(hero.tags.is_empty(), "hero is below full health");

    let grunt = result.character("Grunt").unwrap();
    assert_eq!(grunt.team, 255);
    assert!(grunt.died);
    assert_eq!(grunt.health, -15.0);
    assert_eq!(grunt.input_enabled, Some(false));
    assert_eq!(grunt.abilities, vec!["Melee", "ShieldBash"]);
    assert!(grunt.ability_bar.is_empty(), "AI characters have no ability bar");
    assert!(grunt.position.x > 4.0, "grunt was knocked back along +x");

    let brute = result.character("Brute").unwrap();
    assert_eq!(brute.team, 1);
    assert!(!brute.died);
    assert_eq!(brute.health, 85.0);
    assert_eq!(brute.input_enabled, Some(true), "stun wore off before the end");
}

#[test]
fn test_actions_apply_mid_scenario() {
    let mut app = build_scenario_app(demo_config()).expect("scenario app should build");
    let grunt = app
        .world()
        .resource::<ScenarioState>()
        .entity("Grunt")
        .unwrap();

    run_until(&mut app, 1.6);
    let ai = app.world().get::<AiController>(grunt).unwrap();
    assert_eq!(ai.stop_reason(), Some("Stunned"));

    run_until(&mut app, 3.2);
    let ai = app.world().get::<AiController>(grunt).unwrap();
    assert_eq!(ai.stop_reason(), None, "stun recovered");

    run_until(&mut app, 4.1);
    let ai = app.world().get::<AiController>(grunt).unwrap();
    assert_eq!(ai.stop_reason(), Some("Dead"));
    assert!(app.world().get::<Character>(grunt).unwrap().has_died());

    let log = app.world().resource::<CharacterLog>();
    let deaths = log.filter_by_type(CharacterLogEventType::Death);
    assert_eq!(deaths.len(), 1);
    assert_eq!(deaths[0].message, "Grunt has died");
}

#[test]
fn test_non_authoritative_character_only_gets_ui() {
    let config = ScenarioConfig::from_json(
        r#"{
            "characters": [
                { "name": "Proxy", "controller": "Player", "authority": false,
                  "abilities": ["Fireball", "Melee"] }
            ],
            "max_duration_secs": 0.5
        }"#,
    )
    .unwrap();

    let result = run_headless_scenario(config).unwrap();
    let proxy = result.character("Proxy").unwrap();

    assert!(proxy.abilities.is_empty());
    assert_eq!(proxy.ability_bar, vec!["Fireball"]);
    assert_eq!(proxy.tags, vec!["Character.State.FullHealth"]);
}

#[test]
fn test_log_is_written_to_output_path() {
    let path = std::env::temp_dir().join("abilitysys_headless_log_test.txt");
    let _ = std::fs::remove_file(&path);

    let mut config = demo_config();
    config.output_path = Some(path.to_string_lossy().into_owned());
    run_headless_scenario(config).expect("demo scenario should complete");

    let contents = std::fs::read_to_string(&path).expect("log file should exist");
    let line = Regex::new(r"^\[\s*\d+\.\d{2}\] [A-Za-z]+: .+$").unwrap();
    for entry in contents.lines() {
        assert!(line.is_match(entry), "unexpected log line: {}", entry);
    }

    assert!(contents.contains("ScenarioEvent: Scenario started (headless mode)"));
    assert!(contents.contains("Death: Grunt has died"));
    assert!(contents.contains("ScenarioEvent: Scenario finished"));

    let _ = std::fs::remove_file(&path);
}
