//! Game module - drives the Streetline core from Bevy
//!
//! Each frame: keyboard → `InputFrame`, `Game::frame` with the frame's
//! delta time, then the recorded draw list is copied onto a pool of
//! sprite entities. The core works in screen pixels with the origin at
//! the top-left and y pointing down; Bevy's 2D camera has the origin at
//! the window centre and y pointing up.

use bevy::prelude::*;

use streetline::config::GameConfig;
use streetline::game::events::GameEventData;
use streetline::game::input::InputFrame;
use streetline::game::render::{DrawList, DrawRect};
use streetline::game::tick::{Game, SceneTextures};
use streetline::game::TextureId;

/// Texture slot the core uses for the player sprite.
pub const PLAYER_TEXTURE: TextureId = TextureId(0);

/// Optional sprite image for the player, relative to `assets/`.
const PLAYER_IMAGE: &str = "player.png";

// ============================================================================
// GAME PLUGIN
// ============================================================================

pub struct GamePlugin {
    pub config: GameConfig,
}

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        let mut game = Game::new(self.config);
        game.set_textures(SceneTextures {
            player: Some(PLAYER_TEXTURE),
        });

        app
            // Resources
            .insert_resource(Session {
                game,
                draw_list: DrawList::new(),
            })
            .insert_resource(Viewport {
                width: self.config.viewport.width,
                height: self.config.viewport.height,
            })
            .init_resource::<SpritePool>()
            .init_resource::<PlayerImage>()

            .add_systems(Startup, load_player_image)

            // Variable timestep: the core integrates with the real frame time
            .add_systems(Update, (
                step_game,
                sync_sprites,
            ).chain());
    }
}

// ============================================================================
// RESOURCES
// ============================================================================

/// The running game and the draw requests from its last frame.
#[derive(Resource)]
pub struct Session {
    pub game: Game,
    pub draw_list: DrawList,
}

/// Size of the core's screen space in pixels.
#[derive(Resource, Clone, Copy, Debug)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

/// Number of pooled sprite entities spawned so far.
#[derive(Resource, Default)]
pub struct SpritePool {
    pub len: usize,
}

/// Image for [`PLAYER_TEXTURE`], if one shipped with the game.
#[derive(Resource, Default)]
pub struct PlayerImage(pub Option<Handle<Image>>);

// ============================================================================
// COMPONENTS
// ============================================================================

/// A reusable sprite; the index is its position in the draw list.
#[derive(Component)]
pub struct PooledSprite(pub usize);

// ============================================================================
// SYSTEMS
// ============================================================================

fn load_player_image(asset_server: Res<AssetServer>, mut image: ResMut<PlayerImage>) {
    let on_disk = std::path::Path::new("assets").join(PLAYER_IMAGE);
    if on_disk.exists() {
        image.0 = Some(asset_server.load(PLAYER_IMAGE));
        info!("Loaded player sprite from {}", on_disk.display());
    } else {
        info!("No player sprite found, drawing a placeholder");
    }
}

/// Map held keys to the core's input snapshot.
pub fn input_from_keys(keyboard: &ButtonInput<KeyCode>) -> InputFrame {
    let mut input = InputFrame::new();
    input.set(InputFrame::LEFT, keyboard.any_pressed([KeyCode::ArrowLeft, KeyCode::KeyA]));
    input.set(InputFrame::RIGHT, keyboard.any_pressed([KeyCode::ArrowRight, KeyCode::KeyD]));
    input.set(InputFrame::UP, keyboard.any_pressed([KeyCode::ArrowUp, KeyCode::KeyW]));
    input.set(InputFrame::DOWN, keyboard.any_pressed([KeyCode::ArrowDown, KeyCode::KeyS]));
    input.set(InputFrame::JUMP, keyboard.pressed(KeyCode::Space));
    input.set(InputFrame::PAUSE, keyboard.pressed(KeyCode::KeyP));
    input.set(InputFrame::CONFIRM, keyboard.any_pressed([KeyCode::Enter, KeyCode::NumpadEnter]));
    input.set(InputFrame::EXIT, keyboard.pressed(KeyCode::Escape));
    input
}

/// Run one core frame and record its draw requests.
///
/// Anything reading `Session::draw_list` should run after this.
pub fn step_game(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut session: ResMut<Session>,
    mut exit: EventWriter<AppExit>,
) {
    let input = input_from_keys(&keyboard);
    let Session { game, draw_list } = &mut *session;

    let result = game.frame(time.delta_secs(), input);

    for event in &result.events {
        match &event.data {
            GameEventData::StateChanged { from, to } => info!("State: {} -> {}", from, to),
            GameEventData::LevelCompleted { .. } => info!("Mission complete!"),
            GameEventData::GameReset => info!("Game reset"),
            _ => {}
        }
    }

    if result.exit_requested {
        info!("Exit requested, closing");
        exit.send(AppExit::Success);
    }

    draw_list.clear();
    game.draw(draw_list);
}

/// Centre of a top-left/y-down screen rect in Bevy's centred/y-up space.
pub fn screen_to_world(rect: &streetline::Rect, viewport: &Viewport) -> Vec2 {
    let center = rect.center();
    Vec2::new(center.x - viewport.width / 2.0, viewport.height / 2.0 - center.y)
}

fn to_bevy_color(color: streetline::Color) -> Color {
    Color::srgba(color.r, color.g, color.b, color.a)
}

/// Copy the draw list onto pooled sprites, spawning more when it outgrows the pool.
fn sync_sprites(
    mut commands: Commands,
    session: Res<Session>,
    viewport: Res<Viewport>,
    player_image: Res<PlayerImage>,
    mut pool: ResMut<SpritePool>,
    mut sprites: Query<(&PooledSprite, &mut Sprite, &mut Transform, &mut Visibility)>,
) {
    let rects = session.draw_list.screen_rects();

    for (slot, mut sprite, mut transform, mut visibility) in &mut sprites {
        match rects.get(slot.0) {
            Some(draw) => {
                apply_draw(draw, slot.0, &viewport, &player_image, &mut sprite, &mut transform);
                *visibility = Visibility::Visible;
            }
            None => *visibility = Visibility::Hidden,
        }
    }

    for index in pool.len..rects.len() {
        let mut sprite = Sprite::default();
        let mut transform = Transform::default();
        apply_draw(&rects[index], index, &viewport, &player_image, &mut sprite, &mut transform);
        commands.spawn((sprite, transform, Visibility::Visible, PooledSprite(index)));
    }
    pool.len = pool.len.max(rects.len());
}

fn apply_draw(
    draw: &DrawRect,
    index: usize,
    viewport: &Viewport,
    player_image: &PlayerImage,
    sprite: &mut Sprite,
    transform: &mut Transform,
) {
    let image = match draw.texture {
        Some(PLAYER_TEXTURE) => player_image.0.clone(),
        _ => None,
    };

    sprite.image = image.unwrap_or_default();
    sprite.color = to_bevy_color(draw.color);
    sprite.custom_size = Some(Vec2::new(draw.rect.w, draw.rect.h));
    sprite.flip_x = draw.flip_x;

    // Later draws sit in front.
    let z = index as f32 * 0.01;
    *transform = Transform::from_translation(screen_to_world(&draw.rect, viewport).extend(z));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_mapping() {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::KeyD);
        keyboard.press(KeyCode::Space);
        keyboard.press(KeyCode::Enter);

        let input = input_from_keys(&keyboard);
        assert!(input.right());
        assert!(input.jump());
        assert!(input.is_down(InputFrame::CONFIRM));
        assert!(!input.left());
        assert!(!input.exit());
    }

    #[test]
    fn test_arrows_and_escape() {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::ArrowLeft);
        keyboard.press(KeyCode::ArrowUp);
        keyboard.press(KeyCode::Escape);

        let input = input_from_keys(&keyboard);
        assert!(input.left());
        assert!(input.up());
        assert!(input.exit());
        assert!(!input.is_down(InputFrame::PAUSE));
    }

    #[test]
    fn test_screen_to_world() {
        let viewport = Viewport { width: 1280.0, height: 720.0 };

        let full = streetline::Rect::new(0.0, 0.0, 1280.0, 720.0);
        assert_eq!(screen_to_world(&full, &viewport), Vec2::ZERO);

        let top_left = streetline::Rect::new(0.0, 0.0, 32.0, 64.0);
        assert_eq!(screen_to_world(&top_left, &viewport), Vec2::new(-624.0, 328.0));
    }
}
