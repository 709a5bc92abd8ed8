//! Camera and scene presentation
//!
//! Sets up the 3D view used in graphical mode:
//! - Camera, light and ground plane
//! - A capsule per character, colored by team and greyed out on death
//! - Keyboard zoom and pan

use bevy::prelude::*;

use crate::character::components::{Character, TeamId};
use crate::character::CharacterSet;

/// Plugin for camera management
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraSettings>()
            .add_systems(Startup, setup_scene)
            .add_systems(
                Update,
                (
                    attach_character_meshes.after(CharacterSet::Spawn),
                    update_character_colors.after(CharacterSet::Reactions),
                    camera_controls,
                ),
            );
    }
}

/// Global camera settings
#[derive(Resource)]
pub struct CameraSettings {
    /// Pan speed in units per second
    pub move_speed: f32,
    /// Zoom speed in units per second
    pub zoom_speed: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            move_speed: 15.0,
            zoom_speed: 10.0,
        }
    }
}

/// Marker component for the main 3D camera
#[derive(Component)]
pub struct MainCamera;

/// Base color for a team
pub fn team_color(team: TeamId) -> Color {
    match team {
        TeamId::PLAYER => Color::srgb(0.2, 0.4, 0.8),
        TeamId::NEUTRAL => Color::srgb(0.6, 0.6, 0.6),
        _ => Color::srgb(0.8, 0.2, 0.2),
    }
}

const DEAD_COLOR: Color = Color::srgb(0.15, 0.15, 0.15);

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 18.0, 24.0).looking_at(Vec3::ZERO, Vec3::Y),
        MainCamera,
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 12.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(60.0, 60.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.35, 0.3))),
    ));
}

/// Give newly spawned characters a visible body
fn attach_character_meshes(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    new_characters: Query<(Entity, &Character), Without<Mesh3d>>,
) {
    for (entity, character) in new_characters.iter() {
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Capsule3d::new(0.5, 1.0))),
            MeshMaterial3d(materials.add(team_color(character.team))),
        ));
    }
}

/// Recolor characters whose team or death state changed
fn update_character_colors(
    mut materials: ResMut<Assets<StandardMaterial>>,
    characters: Query<(&Character, &MeshMaterial3d<StandardMaterial>), Changed<Character>>,
) {
    for (character, material) in characters.iter() {
        if let Some(material) = materials.get_mut(&material.0) {
            material.base_color = if character.has_died() {
                DEAD_COLOR
            } else {
                team_color(character.team)
            };
        }
    }
}

/// Keyboard camera controls
fn camera_controls(
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
    settings: Res<CameraSettings>,
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.get_single_mut() else {
        return;
    };

    let zoom = settings.zoom_speed * time.delta_secs();
    if keyboard.pressed(KeyCode::Equal) || keyboard.pressed(KeyCode::NumpadAdd) {
        let direction = camera_transform.forward();
        camera_transform.translation += direction * zoom;
    }
    if keyboard.pressed(KeyCode::Minus) || keyboard.pressed(KeyCode::NumpadSubtract) {
        let direction = camera_transform.forward();
        camera_transform.translation -= direction * zoom;
    }

    let step = settings.move_speed * time.delta_secs();
    if keyboard.pressed(KeyCode::KeyW) {
        camera_transform.translation.z -= step;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        camera_transform.translation.z += step;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        camera_transform.translation.x -= step;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        camera_transform.translation.x += step;
    }
}
