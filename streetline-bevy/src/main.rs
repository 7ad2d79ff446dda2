//! Streetline - side-scrolling brawler
//!
//! Bevy front end for the Streetline core: keyboard in, sprites and text out.
//!
//! Usage: `streetline [config.json]`

mod game;
mod ui;

use bevy::prelude::*;
use bevy::window::WindowMode;

use streetline::GameConfig;

use game::GamePlugin;
use ui::UiPlugin;

fn main() {
    let config = load_config();

    App::new()
        // Bevy defaults with custom window
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Streetline".into(),
                resolution: (config.viewport.width, config.viewport.height).into(),
                mode: WindowMode::Windowed,
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(Color::BLACK))
        // Our plugins
        .add_plugins((
            GamePlugin { config },
            UiPlugin,
        ))
        // Startup
        .add_systems(Startup, setup_2d_camera)
        .run();
}

/// Config from the first CLI argument, or defaults.
///
/// Runs before the log plugin exists, so failures go to stderr.
fn load_config() -> GameConfig {
    let Some(path) = std::env::args().nth(1) else {
        return GameConfig::default();
    };
    match GameConfig::load(&path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("streetline: {path}: {err}; using default config");
            GameConfig::default()
        }
    }
}

/// One world unit per window pixel, origin at the window centre.
fn setup_2d_camera(mut commands: Commands) {
    commands.spawn(Camera2d);

    info!("Streetline {} initialized!", streetline::VERSION);
}
