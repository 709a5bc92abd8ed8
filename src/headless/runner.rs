//! Headless scenario execution
//!
//! Runs scenarios without any graphical output, suitable for automated testing.
//! Time advances by a fixed step per frame so runs are reproducible.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;

use crate::character::abilities::{AbilityId, AbilitySystem, Authority, GameplayTag};
use crate::character::ability_config::{load_ability_definitions, ABILITIES_CONFIG_PATH};
use crate::character::attributes::Attributes;
use crate::character::components::*;
use crate::character::events::*;
use crate::character::log::{CharacterLog, CharacterLogEventType};
use crate::character::{CharacterBundle, CharacterPlugin, CharacterSet};

use super::config::{ActionKind, ControllerKind, ScenarioAction, ScenarioConfig};

/// Simulation step used by headless runs
pub const HEADLESS_TIMESTEP: Duration = Duration::from_micros(16_667);

/// Result of a completed headless scenario
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Simulated seconds
    pub duration: f32,
    /// Final state of every character, in config order
    pub characters: Vec<CharacterResult>,
}

impl ScenarioResult {
    pub fn character(&self, name: &str) -> Option<&CharacterResult> {
        self.characters.iter().find(|c| c.name == name)
    }
}

/// Final state of a single character
#[derive(Debug, Clone)]
pub struct CharacterResult {
    pub name: String,
    pub team: u8,
    pub died: bool,
    /// None when the character has no controller
    pub input_enabled: Option<bool>,
    pub health: f32,
    pub max_health: f32,
    pub mana: f32,
    pub strength: f32,
    /// Granted abilities in grant order
    pub abilities: Vec<String>,
    /// Ability bar entries in insertion order
    pub ability_bar: Vec<String>,
    pub tags: Vec<String>,
    pub position: Vec3,
}

/// Resource to track headless scenario state
#[derive(Resource)]
pub struct ScenarioState {
    /// Scenario length
    pub max_duration: f32,
    pub elapsed_time: f32,
    /// Custom output path for the character log
    pub output_path: Option<String>,
    pub complete: bool,
    /// Populated when the scenario completes
    pub result: Option<ScenarioResult>,
    /// Actions not yet fired, earliest first
    pending: VecDeque<ScenarioAction>,
    /// Spawned characters by name, in config order
    roster: Vec<(String, Entity)>,
}

impl ScenarioState {
    fn new(config: &ScenarioConfig) -> Self {
        let mut actions = config.actions.clone();
        actions.sort_by(|a, b| a.at.total_cmp(&b.at));

        Self {
            max_duration: config.max_duration_secs,
            elapsed_time: 0.0,
            output_path: config.output_path.clone(),
            complete: false,
            result: None,
            pending: actions.into(),
            roster: Vec::new(),
        }
    }

    pub fn entity(&self, name: &str) -> Option<Entity> {
        self.roster
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, entity)| *entity)
    }
}

/// Scenario configuration held for the setup system
#[derive(Resource)]
struct ScenarioSetup(ScenarioConfig);

/// Plugin for headless scenario execution
pub struct ScenarioPlugin {
    pub config: ScenarioConfig,
}

impl Plugin for ScenarioPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ScenarioState::new(&self.config))
            .insert_resource(ScenarioSetup(self.config.clone()))
            .add_systems(Startup, scenario_setup)
            .add_systems(
                Update,
                (scenario_track_time, scenario_fire_actions)
                    .chain()
                    .before(CharacterSet::Spawn),
            )
            .add_systems(Update, scenario_check_end.after(CharacterSet::Movement));
    }
}

/// Spawn the scenario's characters and request their starting abilities
fn scenario_setup(
    mut commands: Commands,
    setup: Res<ScenarioSetup>,
    mut state: ResMut<ScenarioState>,
    mut log: ResMut<CharacterLog>,
    mut acquire: EventWriter<AcquireAbilities>,
) {
    log.clear();
    log.log(
        CharacterLogEventType::ScenarioEvent,
        "Scenario started (headless mode)".to_string(),
    );

    for spec in &setup.0.characters {
        let mut bundle = CharacterBundle::new(spec.name.clone())
            .with_attributes(Attributes::new(
                spec.max_health,
                spec.max_mana,
                spec.max_strength,
            ))
            .at(Vec3::from_array(spec.position));
        bundle.movement = Movement::new(spec.ground_friction);

        let mut entity = commands.spawn(bundle);
        if !spec.authority {
            entity.remove::<Authority>();
        }
        match spec.controller {
            ControllerKind::Player => {
                entity.insert(PlayerController::default());
                if spec.ability_bar {
                    entity.insert(AbilityBar::default());
                }
            }
            ControllerKind::Ai => {
                entity.insert(AiController::default());
            }
            ControllerKind::None => {}
        }
        if let Some(team) = spec.team {
            entity.insert(TeamOverride(TeamId(team)));
        }

        let id = entity.id();
        state.roster.push((spec.name.clone(), id));

        if !spec.abilities.is_empty() {
            acquire.send(AcquireAbilities {
                character: id,
                abilities: spec.abilities.iter().map(|a| AbilityId::new(a.as_str())).collect(),
            });
        }
    }

    info!(
        "Headless scenario setup complete: {} characters, {} actions",
        state.roster.len(),
        state.pending.len()
    );
}

/// Advance scenario time
fn scenario_track_time(time: Res<Time>, mut state: ResMut<ScenarioState>) {
    if !state.complete {
        state.elapsed_time += time.delta_secs();
    }
}

/// Fire every action whose time has come
#[allow(clippy::too_many_arguments)]
fn scenario_fire_actions(
    mut state: ResMut<ScenarioState>,
    mut log: ResMut<CharacterLog>,
    mut effects: EventWriter<ApplyAttributeEffect>,
    mut area_effects: EventWriter<ApplyEffectToTargets>,
    mut pushes: EventWriter<PushCharacter>,
    mut acquire: EventWriter<AcquireAbilities>,
    mut tag_adds: EventWriter<AddGameplayTag>,
    mut tag_removes: EventWriter<RemoveGameplayTag>,
) {
    while state
        .pending
        .front()
        .is_some_and(|action| action.at <= state.elapsed_time)
    {
        let Some(action) = state.pending.pop_front() else {
            break;
        };
        let Some(target) = state.entity(&action.target) else {
            warn!("Scenario action targets unknown character '{}'", action.target);
            continue;
        };

        debug!("Firing {:?} on {} at {:.2}s", action.kind, action.target, action.at);
        log.log(
            CharacterLogEventType::ScenarioEvent,
            format!("Action on {}: {:?}", action.target, action.kind),
        );

        match action.kind {
            ActionKind::Attribute { attribute, amount } => {
                effects.send(ApplyAttributeEffect {
                    target,
                    effect: AttributeEffect {
                        attribute,
                        magnitude: amount,
                    },
                });
            }
            ActionKind::AreaEffect {
                attribute,
                amount,
                others,
            } => {
                let mut targets = vec![target];
                targets.extend(others.iter().filter_map(|name| state.entity(name)));
                area_effects.send(ApplyEffectToTargets {
                    effect: AttributeEffect {
                        attribute,
                        magnitude: amount,
                    },
                    targets,
                });
            }
            ActionKind::Push {
                direction,
                strength,
                stun_duration,
            } => {
                pushes.send(PushCharacter {
                    target,
                    direction: Vec3::from_array(direction),
                    strength,
                    stun_duration,
                });
            }
            ActionKind::Acquire { abilities } => {
                acquire.send(AcquireAbilities {
                    character: target,
                    abilities: abilities.into_iter().map(AbilityId).collect(),
                });
            }
            ActionKind::AddTag { tag } => {
                tag_adds.send(AddGameplayTag {
                    character: target,
                    tag: GameplayTag(tag),
                });
            }
            ActionKind::RemoveTag { tag } => {
                tag_removes.send(RemoveGameplayTag {
                    character: target,
                    tag: GameplayTag(tag),
                });
            }
        }
    }
}

/// Finish the scenario once its duration has elapsed
fn scenario_check_end(
    mut state: ResMut<ScenarioState>,
    mut log: ResMut<CharacterLog>,
    characters: Query<(
        &Character,
        &Attributes,
        &AbilitySystem,
        &Transform,
        Option<&PlayerController>,
        Option<&AiController>,
        Option<&AbilityBar>,
    )>,
) {
    if state.complete || state.elapsed_time < state.max_duration {
        return;
    }

    let mut results = Vec::with_capacity(state.roster.len());
    for (name, entity) in &state.roster {
        let Ok((character, attributes, ability_system, transform, player, ai, bar)) =
            characters.get(*entity)
        else {
            warn!("Scenario character '{}' no longer exists", name);
            continue;
        };

        let input_enabled = match (player, ai) {
            (Some(player), _) => Some(player.is_input_enabled()),
            (None, Some(ai)) => Some(ai.is_input_enabled()),
            (None, None) => None,
        };

        let mut tags: Vec<String> = ability_system
            .tags
            .iter()
            .map(|(tag, _)| tag.to_string())
            .collect();
        tags.sort();

        results.push(CharacterResult {
            name: character.name.clone(),
            team: character.team.0,
            died: character.has_died(),
            input_enabled,
            health: attributes.health.current,
            max_health: attributes.health.maximum,
            mana: attributes.mana.current,
            strength: attributes.strength.current,
            abilities: ability_system
                .granted()
                .iter()
                .map(|spec| spec.ability.to_string())
                .collect(),
            ability_bar: bar
                .map(|bar| bar.slots.iter().map(|info| info.name.clone()).collect())
                .unwrap_or_default(),
            tags,
            position: transform.translation,
        });
    }

    info!("Scenario finished after {:.2}s", state.elapsed_time);
    log.log(
        CharacterLogEventType::ScenarioEvent,
        "Scenario finished".to_string(),
    );

    let duration = state.elapsed_time;
    state.result = Some(ScenarioResult {
        duration,
        characters: results,
    });
    state.complete = true;
}

/// Build a scenario app that advances by [`HEADLESS_TIMESTEP`] per update.
///
/// The app has no runner; drive it with `app.update()`.
pub fn build_scenario_app(config: ScenarioConfig) -> Result<App, String> {
    config.validate()?;
    let definitions = load_ability_definitions(Path::new(ABILITIES_CONFIG_PATH))?;

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(TransformPlugin)
        .add_plugins(HierarchyPlugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(HEADLESS_TIMESTEP))
        .insert_resource(definitions)
        .add_plugins(CharacterPlugin)
        .add_plugins(ScenarioPlugin { config });
    app.finish();
    app.cleanup();

    Ok(app)
}

/// Run a headless scenario to completion
pub fn run_headless_scenario(config: ScenarioConfig) -> Result<ScenarioResult, String> {
    println!("Starting headless scenario...");
    println!("  Characters: {}", config.characters.len());
    println!("  Actions: {}", config.actions.len());
    println!("  Duration: {:.1}s", config.max_duration_secs);

    // One extra second of frames covers the zero-length first update
    let max_frames =
        ((config.max_duration_secs + 1.0) / HEADLESS_TIMESTEP.as_secs_f32()).ceil() as usize;

    let mut app = build_scenario_app(config)?;
    for _ in 0..max_frames {
        app.update();
        if app.world().resource::<ScenarioState>().complete {
            break;
        }
    }

    let world = app.world();
    let state = world.resource::<ScenarioState>();
    let result = state
        .result
        .clone()
        .ok_or_else(|| "Scenario did not complete".to_string())?;

    if let Some(path) = &state.output_path {
        world.resource::<CharacterLog>().save_to_file(Path::new(path))?;
        println!("Log saved to: {}", path);
    }

    for character in &result.characters {
        println!(
            "  {:<12} team {:>3}  health {:>6.1}/{:<6.1} {}",
            character.name,
            character.team,
            character.health,
            character.max_health,
            if character.died { "DEAD" } else { "alive" }
        );
    }

    Ok(result)
}
