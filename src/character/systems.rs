//! Character systems
//!
//! ECS systems implementing the character policy: spawn-time setup, ability
//! acquisition, attribute reactions, knockback/stun and input lockout.

use bevy::prelude::*;

use super::abilities::{AbilitySpec, AbilitySystem, Authority};
use super::ability_config::AbilityDefinitions;
use super::attributes::{AttributeKind, Attributes};
use super::components::*;
use super::events::*;
use super::log::{CharacterLog, CharacterLogEventType};
use super::settings::{CharacterSettings, StunChain};

// ============================================================================
// Input lockout
// ============================================================================

/// Lock or unlock whichever controllers the character has.
///
/// Returns false when it has neither, in which case nothing happens.
pub fn set_input_enabled(
    player: Option<&mut PlayerController>,
    ai: Option<&mut AiController>,
    enabled: bool,
    reason: &str,
) -> bool {
    let controllers = [
        player.map(|p| p as &mut dyn InputControllable),
        ai.map(|a| a as &mut dyn InputControllable),
    ];

    let mut handled = false;
    for controller in controllers.into_iter().flatten() {
        if enabled {
            controller.enable_input();
        } else {
            controller.disable_input(reason);
        }
        handled = true;
    }
    handled
}

/// Disable input for a stun and schedule its recovery.
#[allow(clippy::too_many_arguments)]
fn start_stun(
    entity: Entity,
    character: &Character,
    timers: &mut CharacterTimers,
    player: Option<&mut PlayerController>,
    ai: Option<&mut AiController>,
    duration: f32,
    settings: &CharacterSettings,
    lock_events: &mut EventWriter<InputLockChanged>,
    log: &mut CharacterLog,
) {
    // Death lockout is terminal, a stun can't shorten or extend it
    if character.has_died() {
        return;
    }

    if set_input_enabled(player, ai, false, &settings.stun_stop_reason) {
        lock_events.send(InputLockChanged {
            entity,
            enabled: false,
            reason: InputLockReason::Stun,
        });
        log.log(
            CharacterLogEventType::InputLock,
            format!("{} is stunned for {:.2}s", character.name, duration),
        );
    }
    timers.stun_recovery.schedule(duration);
}

// ============================================================================
// Spawn
// ============================================================================

/// Assign teams and initial tags to newly spawned characters.
///
/// Human-controlled characters always join [`TeamId::PLAYER`]; everyone else
/// keeps the team they spawned with unless a [`TeamOverride`] is present.
pub fn setup_spawned_characters(
    settings: Res<CharacterSettings>,
    mut log: ResMut<CharacterLog>,
    mut spawned: Query<
        (
            Entity,
            &mut Character,
            Has<PlayerController>,
            Option<&TeamOverride>,
            Option<&mut AbilitySystem>,
        ),
        Added<Character>,
    >,
) {
    for (entity, mut character, is_player, team_override, ability_system) in spawned.iter_mut() {
        if is_player {
            character.set_team(TeamId::PLAYER);
        } else if let Some(TeamOverride(team)) = team_override {
            character.set_team(*team);
        }

        if let Some(mut ability_system) = ability_system {
            ability_system.add_gameplay_tag(&settings.full_health_tag);
            ability_system.init_actor_info(entity, entity);
        }

        info!("{} spawned on team {}", character.name, character.team);
        log.log(
            CharacterLogEventType::Spawn,
            format!("{} joins team {}", character.name, character.team),
        );
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Grant requested abilities and register UI-facing ones with the ability bar.
///
/// Granting needs an [`AbilitySystem`] and [`Authority`]; the ability bar is
/// updated for any player-controlled character that has one.
pub fn acquire_abilities(
    mut requests: EventReader<AcquireAbilities>,
    definitions: Res<AbilityDefinitions>,
    settings: Res<CharacterSettings>,
    mut log: ResMut<CharacterLog>,
    mut granted_events: EventWriter<AbilityGranted>,
    mut characters: Query<(
        &Character,
        Option<&mut AbilitySystem>,
        Has<Authority>,
        Has<PlayerController>,
        Option<&mut AbilityBar>,
    )>,
) {
    for request in requests.read() {
        let Ok((character, mut ability_system, has_authority, is_player, mut ability_bar)) =
            characters.get_mut(request.character)
        else {
            debug!("Ignoring ability request for {:?}: not a character", request.character);
            continue;
        };

        for ability in &request.abilities {
            if !definitions.contains(ability) {
                warn!("{}: unknown ability '{}' skipped", character.name, ability);
                continue;
            }

            if let Some(ability_system) = ability_system.as_mut() {
                if has_authority {
                    ability_system.grant(AbilitySpec::new(
                        ability.clone(),
                        settings.default_ability_level,
                        settings.default_input_id,
                    ));
                    granted_events.send(AbilityGranted {
                        entity: request.character,
                        ability: ability.clone(),
                    });
                    log.log(
                        CharacterLogEventType::AbilityGranted,
                        format!("{} acquires {}", character.name, ability),
                    );
                }
                ability_system.init_actor_info(request.character, request.character);
            }

            if let Some(info) = definitions.ui_info(ability) {
                if let (true, Some(bar)) = (is_player, ability_bar.as_mut()) {
                    bar.add_ability(info.clone());
                }
            }
        }
    }
}

/// Apply tag add/remove requests
pub fn apply_tag_requests(
    mut adds: EventReader<AddGameplayTag>,
    mut removes: EventReader<RemoveGameplayTag>,
    mut log: ResMut<CharacterLog>,
    mut ability_systems: Query<(&Character, &mut AbilitySystem)>,
) {
    for request in adds.read() {
        if let Ok((character, mut ability_system)) = ability_systems.get_mut(request.character) {
            ability_system.add_gameplay_tag(&request.tag);
            log.log(
                CharacterLogEventType::Tag,
                format!("{} gains {}", character.name, request.tag),
            );
        }
    }

    for request in removes.read() {
        if let Ok((character, mut ability_system)) = ability_systems.get_mut(request.character) {
            ability_system.remove_gameplay_tag(&request.tag);
            log.log(
                CharacterLogEventType::Tag,
                format!("{} loses {}", character.name, request.tag),
            );
        }
    }
}

/// Split multi-target effects into one effect per target
pub fn fan_out_effects(
    mut requests: EventReader<ApplyEffectToTargets>,
    mut effects: EventWriter<ApplyAttributeEffect>,
) {
    for request in requests.read() {
        for &target in &request.targets {
            effects.send(ApplyAttributeEffect {
                target,
                effect: request.effect,
            });
        }
    }
}

/// Apply instant effects and broadcast the resulting values
pub fn apply_attribute_effects(
    mut effects: EventReader<ApplyAttributeEffect>,
    mut changes: EventWriter<AttributeChanged>,
    mut attributes: Query<&mut Attributes>,
) {
    for event in effects.read() {
        let Ok(mut attributes) = attributes.get_mut(event.target) else {
            continue;
        };
        let value = attributes.apply(event.effect.attribute, event.effect.magnitude);
        changes.send(AttributeChanged {
            entity: event.target,
            attribute: event.effect.attribute,
            value: value.current,
            max: value.maximum,
        });
    }
}

// ============================================================================
// Reactions
// ============================================================================

/// React to attribute notifications.
///
/// Health at or below zero records death once, locks input for good and
/// fires the dying-sequence hook. Every notification is forwarded to the
/// display hook regardless of death state.
pub fn react_to_attribute_changes(
    mut changes: EventReader<AttributeChanged>,
    settings: Res<CharacterSettings>,
    mut log: ResMut<CharacterLog>,
    mut displays: EventWriter<AttributeDisplay>,
    mut deaths: EventWriter<StartDyingSequence>,
    mut lock_events: EventWriter<InputLockChanged>,
    mut characters: Query<(
        &mut Character,
        Option<&mut PlayerController>,
        Option<&mut AiController>,
    )>,
) {
    for change in changes.read() {
        if change.attribute == AttributeKind::Health && change.value <= 0.0 {
            if let Ok((mut character, mut player, mut ai)) = characters.get_mut(change.entity) {
                if character.mark_dead() {
                    info!("{} died (health {:.0})", character.name, change.value);
                    log.log(
                        CharacterLogEventType::Death,
                        format!("{} has died", character.name),
                    );

                    if set_input_enabled(
                        player.as_deref_mut(),
                        ai.as_deref_mut(),
                        false,
                        &settings.death_stop_reason,
                    ) {
                        lock_events.send(InputLockChanged {
                            entity: change.entity,
                            enabled: false,
                            reason: InputLockReason::Death,
                        });
                    }
                    deaths.send(StartDyingSequence {
                        entity: change.entity,
                    });
                }
            }
        }

        displays.send(AttributeDisplay {
            entity: change.entity,
            attribute: change.attribute,
            value: change.value,
            max: change.max,
        });
    }
}

/// Keep the full-health tag in sync with health
pub fn maintain_full_health_tag(
    mut changes: EventReader<AttributeChanged>,
    settings: Res<CharacterSettings>,
    mut ability_systems: Query<&mut AbilitySystem>,
) {
    for change in changes.read() {
        if change.attribute != AttributeKind::Health {
            continue;
        }
        let Ok(mut ability_system) = ability_systems.get_mut(change.entity) else {
            continue;
        };

        let tag = &settings.full_health_tag;
        if change.value >= change.max {
            ability_system.add_gameplay_tag(tag);
        } else if ability_system.has_tag(tag) {
            ability_system.remove_gameplay_tag(tag);
        }
    }
}

// ============================================================================
// Knockback and stun
// ============================================================================

/// Apply knockback impulses and begin stuns.
///
/// Friction is zeroed until the friction-reenable timer fires one stun
/// duration later. When the stun begins depends on [`StunChain`].
pub fn push_characters(
    mut pushes: EventReader<PushCharacter>,
    settings: Res<CharacterSettings>,
    mut log: ResMut<CharacterLog>,
    mut lock_events: EventWriter<InputLockChanged>,
    mut characters: Query<(
        &Character,
        &mut Movement,
        &mut CharacterTimers,
        Option<&mut PlayerController>,
        Option<&mut AiController>,
    )>,
) {
    for push in pushes.read() {
        let Ok((character, mut movement, mut timers, mut player, mut ai)) =
            characters.get_mut(push.target)
        else {
            continue;
        };

        movement.suspend_friction();
        movement.add_impulse(push.direction * push.strength);
        timers.friction_reenable.schedule(push.stun_duration);

        log.log(
            CharacterLogEventType::Push,
            format!(
                "{} is knocked back ({:.1}) for {:.2}s",
                character.name, push.strength, push.stun_duration
            ),
        );

        match settings.stun_chain {
            StunChain::Immediate => start_stun(
                push.target,
                character,
                &mut timers,
                player.as_deref_mut(),
                ai.as_deref_mut(),
                push.stun_duration,
                &settings,
                &mut lock_events,
                &mut log,
            ),
            StunChain::Deferred => timers.pending_stun = Some(push.stun_duration),
        }
    }
}

/// Advance stun and friction timers and run their callbacks
pub fn tick_character_timers(
    time: Res<Time>,
    settings: Res<CharacterSettings>,
    mut log: ResMut<CharacterLog>,
    mut lock_events: EventWriter<InputLockChanged>,
    mut characters: Query<(
        Entity,
        &Character,
        &mut CharacterTimers,
        Option<&mut Movement>,
        Option<&mut PlayerController>,
        Option<&mut AiController>,
    )>,
) {
    let delta = time.delta();

    for (entity, character, mut timers, movement, mut player, mut ai) in characters.iter_mut() {
        // Recovery ticks first so a stun started below isn't advanced this frame
        if timers.stun_recovery.tick(delta)
            && !character.has_died()
            && set_input_enabled(player.as_deref_mut(), ai.as_deref_mut(), true, "")
        {
            lock_events.send(InputLockChanged {
                entity,
                enabled: true,
                reason: InputLockReason::StunRecovered,
            });
            log.log(
                CharacterLogEventType::InputLock,
                format!("{} recovers from stun", character.name),
            );
        }

        if timers.friction_reenable.tick(delta) {
            if let Some(mut movement) = movement {
                movement.restore_friction();
            }
            if let Some(duration) = timers.pending_stun.take() {
                start_stun(
                    entity,
                    character,
                    &mut timers,
                    player.as_deref_mut(),
                    ai.as_deref_mut(),
                    duration,
                    &settings,
                    &mut lock_events,
                    &mut log,
                );
            }
        }
    }
}

// ============================================================================
// Movement
// ============================================================================

/// Move characters by their velocity and bleed it off with ground friction
pub fn integrate_movement(time: Res<Time>, mut movers: Query<(&mut Transform, &mut Movement)>) {
    let dt = time.delta_secs();

    for (mut transform, mut movement) in movers.iter_mut() {
        if movement.velocity == Vec3::ZERO {
            continue;
        }
        transform.translation += movement.velocity * dt;

        let decay = (1.0 - movement.ground_friction * dt).max(0.0);
        movement.velocity *= decay;
        if movement.velocity.length_squared() < 1e-6 {
            movement.velocity = Vec3::ZERO;
        }
    }
}
