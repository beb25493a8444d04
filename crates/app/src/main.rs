//! Flipbook - interactive 3D page turning on Bevy

use bevy::prelude::*;
use bevy::window::WindowResolution;
use flipbook_config::FlipbookConfig;
use flipbook_scene::ScenePlugin;

fn main() {
    // Configuration from FLIPBOOK_CONFIG and friends, defaults on any error.
    // The log subscriber is not up yet, so errors are reported once it is.
    let (config, config_error) = match FlipbookConfig::from_env() {
        Ok(config) => (config, None),
        Err(err) => (FlipbookConfig::default(), Some(err.to_string())),
    };

    let display = &config.display;
    let window_config = Window {
        title: "Flipbook".into(),
        resolution: WindowResolution::new(display.width, display.height)
            .with_scale_factor_override(display.scale),
        present_mode: bevy::window::PresentMode::AutoVsync,
        ..default()
    };

    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(window_config),
                ..default()
            })
            .set(bevy::log::LogPlugin {
                level: bevy::log::Level::INFO,
                ..default()
            }),
    );

    if let Some(err) = config_error {
        warn!("Falling back to default configuration: {}", err);
    }
    info!(
        "Starting flipbook with {} inner pages, {:?} layout",
        config.book.inner_pages, config.book.layout
    );

    app.insert_resource(config)
        .add_plugins(ScenePlugin)
        .run();
}
