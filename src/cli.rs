//! Command-line interface for AbilitySys
//!
//! Supports both graphical (default) and headless modes.

use clap::Parser;
use std::path::PathBuf;

/// Default scenario played when none is given
pub const DEFAULT_SCENARIO: &str = "assets/scenarios/demo.json";

/// Character ability sandbox
#[derive(Parser, Debug)]
#[command(name = "abilitysys")]
#[command(about = "Character ability and attribute sandbox")]
#[command(version)]
pub struct Args {
    /// Run in headless mode with the specified JSON scenario file
    #[arg(long, value_name = "SCENARIO_FILE")]
    pub headless: Option<PathBuf>,

    /// Scenario to play in graphical mode
    #[arg(long, value_name = "SCENARIO_FILE", default_value = DEFAULT_SCENARIO)]
    pub scenario: PathBuf,

    /// Output path for the character log (headless mode only)
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Override the scenario duration in seconds
    #[arg(long)]
    pub max_duration: Option<f32>,
}

pub fn parse_args() -> Args {
    Args::parse()
}
