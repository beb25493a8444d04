//! Spot light above the book plus a soft ambient fill

use bevy::light::{GlobalAmbientLight, PointLightShadowMap};
use bevy::prelude::*;
use flipbook_config::{FlipbookConfig, LightSettings};

/// Marker component for the book spot light
#[derive(Component)]
pub struct BookLight;

/// Ambient brightness so pages in the light's shadow stay readable
const AMBIENT_BRIGHTNESS: f32 = 400.0;

/// Plugin for the book lighting
pub struct LightingPlugin;

impl Plugin for LightingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_lighting);
    }
}

/// Spot light pointing from its position at the spine
pub fn spot_light(settings: &LightSettings) -> (SpotLight, Transform) {
    let position = Vec3::new(settings.x, settings.y, settings.z);
    let light = SpotLight {
        intensity: settings.intensity,
        range: settings.far_clip,
        shadows_enabled: true,
        shadow_map_near_z: settings.near_clip,
        outer_angle: std::f32::consts::FRAC_PI_4,
        inner_angle: std::f32::consts::FRAC_PI_8,
        ..default()
    };
    let transform = Transform::from_translation(position).looking_at(Vec3::ZERO, Vec3::Y);
    (light, transform)
}

/// Spawn the spot light and set the ambient light
fn setup_lighting(mut commands: Commands, config: Res<FlipbookConfig>) {
    let settings = &config.light;

    let (light, transform) = spot_light(settings);
    commands.spawn((light, transform, BookLight));

    // Spot lights share the point light shadow map resolution
    commands.insert_resource(PointLightShadowMap {
        size: settings.map_size,
    });

    // Set global ambient light (it's a resource, not an entity)
    commands.insert_resource(GlobalAmbientLight {
        color: Color::WHITE,
        brightness: AMBIENT_BRIGHTNESS,
        ..default()
    });

    info!("Book lighting initialized");
}
