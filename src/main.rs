//! AbilitySys - Ability and Attribute Character Integration
//!
//! Plays a character scenario, either in a window with a HUD or headless.

use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use std::process::ExitCode;

use abilitysys::camera::CameraPlugin;
use abilitysys::character::ability_config::AbilityConfigPlugin;
use abilitysys::character::CharacterPlugin;
use abilitysys::cli;
use abilitysys::headless::{run_headless_scenario, ScenarioConfig, ScenarioPlugin};
use abilitysys::ui::HudPlugin;

fn main() -> ExitCode {
    let args = cli::parse_args();

    let scenario_path = args.headless.as_ref().unwrap_or(&args.scenario);
    let mut config = match ScenarioConfig::load_from_file(scenario_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", scenario_path.display(), e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(max_duration) = args.max_duration {
        config.max_duration_secs = max_duration;
    }
    if let Some(output) = &args.output {
        config.output_path = Some(output.display().to_string());
    }

    if args.headless.is_some() {
        return match run_headless_scenario(config) {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Headless scenario failed: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    App::new()
        // Bevy default plugins with custom window settings
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "AbilitySys".to_string(),
                resolution: (1280.0, 720.0).into(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins((
            EguiPlugin,
            AbilityConfigPlugin,
            CharacterPlugin,
            ScenarioPlugin { config },
            CameraPlugin,
            HudPlugin,
        ))
        .run();

    ExitCode::SUCCESS
}
