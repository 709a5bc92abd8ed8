//! UI System
//!
//! In-game HUD fed by the character display hooks:
//! - Health, mana and strength bars
//! - Team and input lockout state
//! - The player's ability bar

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::character::attributes::{AttributeKind, AttributeValue, Attributes};
use crate::character::components::{
    AbilityBar, AiController, Character, InputControllable, PlayerController, TeamId,
};
use crate::character::events::AttributeDisplay;
use crate::character::CharacterSet;

/// Plugin for the HUD
pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                record_attribute_display.after(CharacterSet::Reactions),
                render_character_hud.after(CharacterSet::Movement),
            ),
        );
    }
}

/// Last values delivered to the display hook for one character
#[derive(Component, Clone, Debug, PartialEq)]
pub struct CharacterHud {
    pub health: AttributeValue,
    pub mana: AttributeValue,
    pub strength: AttributeValue,
}

impl CharacterHud {
    fn from_attributes(attributes: &Attributes) -> Self {
        Self {
            health: attributes.health,
            mana: attributes.mana,
            strength: attributes.strength,
        }
    }

    pub fn set(&mut self, attribute: AttributeKind, value: f32, max: f32) {
        let slot = match attribute {
            AttributeKind::Health => &mut self.health,
            AttributeKind::Mana => &mut self.mana,
            AttributeKind::Strength => &mut self.strength,
        };
        slot.current = value;
        slot.maximum = max;
    }

    pub fn get(&self, attribute: AttributeKind) -> AttributeValue {
        match attribute {
            AttributeKind::Health => self.health,
            AttributeKind::Mana => self.mana,
            AttributeKind::Strength => self.strength,
        }
    }
}

/// Store display hook values on the character, creating the HUD on first use
pub fn record_attribute_display(
    mut commands: Commands,
    mut displays: EventReader<AttributeDisplay>,
    mut huds: Query<&mut CharacterHud>,
    attributes: Query<&Attributes>,
) {
    // HUDs inserted this frame aren't queryable until commands apply
    let mut created: Vec<(Entity, CharacterHud)> = Vec::new();

    for display in displays.read() {
        if let Ok(mut hud) = huds.get_mut(display.entity) {
            hud.set(display.attribute, display.value, display.max);
            continue;
        }

        if let Some((_, hud)) = created.iter_mut().find(|(e, _)| *e == display.entity) {
            hud.set(display.attribute, display.value, display.max);
            continue;
        }

        let Ok(current) = attributes.get(display.entity) else {
            continue;
        };
        let mut hud = CharacterHud::from_attributes(current);
        hud.set(display.attribute, display.value, display.max);
        created.push((display.entity, hud));
    }

    for (entity, hud) in created {
        commands.entity(entity).insert(hud);
    }
}

/// Draw one HUD window per character
fn render_character_hud(
    mut contexts: EguiContexts,
    characters: Query<(
        Entity,
        &Character,
        &Attributes,
        Option<&CharacterHud>,
        Option<&AbilityBar>,
        Option<&PlayerController>,
        Option<&AiController>,
    )>,
) {
    // Use try_ctx_mut to gracefully handle window close
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };

    let mut sorted: Vec<_> = characters.iter().collect();
    sorted.sort_by(|a, b| a.1.name.cmp(&b.1.name));

    for (index, (entity, character, attributes, hud, bar, player, ai)) in
        sorted.into_iter().enumerate()
    {
        let hud = hud
            .cloned()
            .unwrap_or_else(|| CharacterHud::from_attributes(attributes));

        egui::Window::new(character.name.as_str())
            .id(egui::Id::new(("character_hud", entity)))
            .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0 + index as f32 * 150.0])
            .resizable(false)
            .collapsible(false)
            .frame(
                egui::Frame::window(&ctx.style())
                    .fill(egui::Color32::from_black_alpha(200))
                    .stroke(egui::Stroke::NONE),
            )
            .show(ctx, |ui| {
                ui.set_width(220.0);

                let input = match (player, ai) {
                    (Some(p), _) => Some(p.is_input_enabled()),
                    (None, Some(a)) => Some(a.is_input_enabled()),
                    (None, None) => None,
                };
                let status = if character.has_died() {
                    "DEAD"
                } else {
                    match input {
                        Some(true) => "Ready",
                        Some(false) => "Stunned",
                        None => "Uncontrolled",
                    }
                };

                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(format!("Team {}", character.team))
                            .size(fonts::SMALL)
                            .color(colors::team(character.team)),
                    );
                    ui.label(egui::RichText::new(status).size(fonts::SMALL));
                });

                for attribute in AttributeKind::ALL {
                    let value = hud.get(attribute);
                    ui.add(
                        egui::ProgressBar::new(value.fraction())
                            .fill(colors::attribute(attribute, value.fraction()))
                            .text(format!(
                                "{} {:.0}/{:.0}",
                                attribute.name(),
                                value.current,
                                value.maximum
                            )),
                    );
                }

                if let Some(bar) = bar.filter(|bar| !bar.slots.is_empty()) {
                    ui.horizontal_wrapped(|ui| {
                        for slot in &bar.slots {
                            ui.label(
                                egui::RichText::new(format!("[{}]", slot.name))
                                    .size(fonts::SMALL),
                            )
                            .on_hover_text(format!(
                                "Cost {:.0} {:?}, cooldown {:.1}s",
                                slot.cost, slot.cost_type, slot.cooldown
                            ));
                        }
                    });
                }
            });
    }
}

/// Common colors used throughout the UI
pub mod colors {
    use super::{egui, AttributeKind, TeamId};

    /// Player team (blue-ish)
    pub const PLAYER_TEAM: egui::Color32 = egui::Color32::from_rgb(80, 120, 220);
    /// Unassigned team (grey)
    pub const NEUTRAL_TEAM: egui::Color32 = egui::Color32::from_rgb(160, 160, 160);
    /// Any other team (red-ish)
    pub const OTHER_TEAM: egui::Color32 = egui::Color32::from_rgb(220, 80, 80);
    /// Health bar color
    pub const HEALTH: egui::Color32 = egui::Color32::from_rgb(50, 200, 50);
    /// Health bar low color
    pub const HEALTH_LOW: egui::Color32 = egui::Color32::from_rgb(200, 50, 50);
    /// Mana color
    pub const MANA: egui::Color32 = egui::Color32::from_rgb(50, 100, 230);
    /// Strength color
    pub const STRENGTH: egui::Color32 = egui::Color32::from_rgb(230, 160, 40);

    /// Health fraction below which the bar turns red
    const LOW_HEALTH: f32 = 0.35;

    pub fn team(team: TeamId) -> egui::Color32 {
        match team {
            TeamId::PLAYER => PLAYER_TEAM,
            TeamId::NEUTRAL => NEUTRAL_TEAM,
            _ => OTHER_TEAM,
        }
    }

    pub fn attribute(attribute: AttributeKind, fraction: f32) -> egui::Color32 {
        match attribute {
            AttributeKind::Health if fraction < LOW_HEALTH => HEALTH_LOW,
            AttributeKind::Health => HEALTH,
            AttributeKind::Mana => MANA,
            AttributeKind::Strength => STRENGTH,
        }
    }
}

/// Font sizes used throughout the UI
pub mod fonts {
    /// Small labels and annotations
    pub const SMALL: f32 = 14.0;
}
