//! Frame Loop Orchestrator
//!
//! [`Game`] owns the state machine, the player, the camera and the level,
//! and advances them once per display frame:
//!
//! 1. derive input edges from the previous and current snapshots
//! 2. apply at most one state transition
//! 3. if playing: `Player::update` → `Camera::follow` → `Level::check_completion`
//!    → mission-complete latch
//!
//! `dt` is the frame's wall-clock time, used as-is (variable step).

use tracing::{debug, info};

use crate::config::GameConfig;
use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::rect::{Color, Rect};
use crate::core::transform::ViewTransform;
use crate::core::vec2::Vec2;
use crate::game::camera::Camera;
use crate::game::events::GameEvent;
use crate::game::input::{InputEdges, InputFrame, InputRecording};
use crate::game::level::Level;
use crate::game::player::{PhysicsMode, Player};
use crate::game::render::{draw_textured, DrawRect, Label, LabelDraw, RenderSink, TextureId};
use crate::game::state::{GameState, Trigger};

/// Result of a frame.
#[derive(Debug, Default)]
pub struct FrameResult {
    /// State after this frame
    pub state: GameState,
    /// Events generated this frame
    pub events: Vec<GameEvent>,
    /// Exit key has been held at some point; the front end should stop
    pub exit_requested: bool,
}

impl FrameResult {
    /// The state transition that happened this frame, if any.
    pub fn transition(&self) -> Option<(GameState, GameState)> {
        self.events.iter().find_map(GameEvent::transition)
    }
}

/// Textures the front end has made available. Unset entries are not drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SceneTextures {
    /// Player sprite
    pub player: Option<TextureId>,
}

/// The orchestrator.
pub struct Game {
    config: GameConfig,
    state: GameState,
    player: Player,
    camera: Camera,
    level: Level,
    /// Last frame's raw input, for edge detection
    previous_input: InputFrame,
    /// Latched copy of `level.is_complete()` for the HUD message
    mission_complete: bool,
    should_exit: bool,
    frame: u64,
    textures: SceneTextures,
    events: Vec<GameEvent>,
}

impl Game {
    /// New game on the menu screen.
    pub fn new(config: GameConfig) -> Self {
        let level = Level::from_config(&config.level);
        let mut player = Player::new(config.player, level.player_start_position());
        // Unvalidated configs may put the end zone past the clamp; keep it reachable.
        let max_x = (level.end_x() - config.player.width).max(level.completion_x());
        player.set_horizontal_bounds(level.start_x(), max_x);
        let camera = Camera::for_level(config.viewport, config.camera, &level);

        info!(
            mode = ?config.player.mode,
            start_x = level.start_x(),
            end_x = level.end_x(),
            "game created"
        );

        Self {
            config,
            state: GameState::Menu,
            player,
            camera,
            level,
            previous_input: InputFrame::new(),
            mission_complete: false,
            should_exit: false,
            frame: 0,
            textures: SceneTextures::default(),
            events: Vec::new(),
        }
    }

    /// Run one frame.
    ///
    /// `dt` is seconds since the previous frame; negative or non-finite
    /// values count as zero.
    pub fn frame(&mut self, dt: f32, input: InputFrame) -> FrameResult {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.frame += 1;

        let edges = InputEdges::between(self.previous_input, input);
        self.previous_input = input;

        if input.exit() && !self.should_exit {
            self.should_exit = true;
            info!(frame = self.frame, "exit requested");
            self.push_event(GameEvent::exit_requested(self.frame));
        }

        if let Some(trigger) = self.trigger_for(edges) {
            self.apply_trigger(trigger);
        }

        if self.state.is_simulating() {
            self.simulate(dt, &input);
        }

        FrameResult {
            state: self.state,
            events: self.take_events(),
            exit_requested: self.should_exit,
        }
    }

    /// Which trigger (if any) this frame's edges raise in the current state.
    fn trigger_for(&self, edges: InputEdges) -> Option<Trigger> {
        match self.state {
            GameState::Menu | GameState::GameOver => edges.confirm().then_some(Trigger::Confirm),
            GameState::Playing | GameState::Paused => edges.pause().then_some(Trigger::Pause),
        }
    }

    /// Move the state machine; returns whether the state changed.
    fn apply_trigger(&mut self, trigger: Trigger) -> bool {
        let from = self.state;
        let to = from.on(trigger);
        if to == from {
            return false;
        }

        self.state = to;
        info!(%from, %to, frame = self.frame, "state changed");
        self.push_event(GameEvent::state_changed(self.frame, from, to));

        if from == GameState::GameOver && to == GameState::Menu {
            self.reset();
        }
        true
    }

    /// Player → camera → level → latch.
    fn simulate(&mut self, dt: f32, input: &InputFrame) {
        let motion = self.player.update(dt, input);
        let position = self.player.position();

        if motion.jumped {
            self.push_event(GameEvent::player_jumped(self.frame, position));
        }
        if motion.landed {
            self.push_event(GameEvent::player_landed(self.frame, position));
        }

        self.camera.follow(position);
        self.level.check_completion(position);

        if self.level.is_complete() && !self.mission_complete {
            self.mission_complete = true;
            self.push_event(GameEvent::level_completed(self.frame, position));
        }
    }

    /// Entry point for loss conditions. Nothing in gameplay calls this yet.
    pub fn trigger_game_over(&mut self) -> bool {
        self.apply_trigger(Trigger::Defeat)
    }

    /// Put player, camera, level and the mission-complete latch back to the start.
    pub fn reset(&mut self) {
        self.player.reset(self.level.player_start_position());
        self.camera.reset();
        self.level.reset();
        self.mission_complete = false;
        info!(frame = self.frame, "game reset");
        self.push_event(GameEvent::game_reset(self.frame));
    }

    /// Clear only the level's completion latch.
    ///
    /// The mission-complete message stays up until a full `reset`.
    pub fn reset_level(&mut self) {
        self.level.reset();
        debug!(frame = self.frame, "level latch cleared");
    }

    /// Tell the core which textures exist.
    pub fn set_textures(&mut self, textures: SceneTextures) {
        self.textures = textures;
    }

    // =========================================================================
    // DRAW
    // =========================================================================

    /// Emit this frame's draw requests.
    pub fn draw<S: RenderSink + ?Sized>(&self, sink: &mut S) {
        let viewport = self.config.viewport;
        let screen = Rect::new(0.0, 0.0, viewport.width, viewport.height);
        let center = Vec2::new(viewport.width / 2.0, viewport.height / 2.0);

        match self.state {
            GameState::Menu => {
                sink.set_transform(ViewTransform::IDENTITY);
                sink.fill_rect(DrawRect::screen(screen, Color::BLACK));
                self.draw_label(sink, Label::Title, Vec2::new(center.x, viewport.height / 3.0));
                self.draw_label(sink, Label::PressStart, center);
            }
            GameState::Playing | GameState::Paused => {
                self.draw_world(sink);
                if self.mission_complete {
                    self.draw_label(sink, Label::MissionComplete, Vec2::new(center.x, 80.0));
                }
                if self.state == GameState::Paused {
                    sink.fill_rect(DrawRect::screen(screen, Color::OVERLAY));
                    self.draw_label(sink, Label::Paused, center);
                }
            }
            GameState::GameOver => {
                sink.set_transform(ViewTransform::IDENTITY);
                sink.fill_rect(DrawRect::screen(screen, Color::BLACK));
                self.draw_label(sink, Label::GameOver, center);
                self.draw_label(sink, Label::ReturnToMenu, Vec2::new(center.x, center.y + 60.0));
            }
        }
    }

    fn draw_world<S: RenderSink + ?Sized>(&self, sink: &mut S) {
        sink.set_transform(self.camera.transform());

        let visible = self.camera.visible_area();
        let geometry = self.level.geometry(self.config.viewport.height);
        for (rect, color) in [
            (geometry.sky, Color::SKY),
            (geometry.ground, Color::GROUND),
            (geometry.end_zone, Color::END_ZONE),
        ] {
            if rect.intersects(&visible) {
                sink.fill_rect(DrawRect::world(rect, color));
            }
        }

        let body = self.player.bounding_box();
        if self.player.mode() == PhysicsMode::Brawler {
            let shadow = Rect::new(body.x, body.bottom() - 4.0, body.w, 8.0);
            sink.fill_rect(DrawRect::world(shadow, Color::SHADOW));
        }

        draw_textured(
            sink,
            self.player.draw_rect(),
            self.textures.player,
            Color::PLAYER,
            !self.player.is_facing_right(),
        );
    }

    fn draw_label<S: RenderSink + ?Sized>(&self, sink: &mut S, label: Label, position: Vec2) {
        sink.label(LabelDraw {
            label,
            position,
            color: Color::WHITE,
        });
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Current state.
    #[inline]
    pub fn state(&self) -> GameState {
        self.state
    }

    /// The player.
    #[inline]
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// The camera.
    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The level.
    #[inline]
    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Has the mission-complete message been triggered?
    #[inline]
    pub fn mission_complete(&self) -> bool {
        self.mission_complete
    }

    /// Has the exit key been pressed?
    #[inline]
    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    /// Frames run so far.
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Active configuration.
    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Hash of everything that affects future frames.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.frame, |h| {
            h.update_u8(self.state as u8);
            h.update_u8(self.previous_input.flags);
            h.update_bool(self.mission_complete);
            h.update_bool(self.should_exit);

            h.update_vec2(self.player.position());
            h.update_vec2(self.player.velocity());
            h.update_bool(self.player.is_on_ground());
            h.update_bool(self.player.is_facing_right());
            h.update_f32(self.player.jump_height());
            h.update_f32(self.player.jump_velocity());

            h.update_vec2(self.camera.position());
            h.update_bool(self.level.is_complete());
        })
    }

    fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

/// Replay a recorded session from a fresh game.
///
/// Returns the final game and every event produced.
pub fn replay(config: GameConfig, recording: &InputRecording) -> (Game, Vec<GameEvent>) {
    let mut game = Game::new(config);
    let mut all_events = Vec::new();

    for (dt, input) in recording.replay_iter() {
        let result = game.frame(dt, input);
        all_events.extend(result.events);
    }

    (game, all_events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::events::GameEventData;
    use crate::game::render::{DrawList, Space};
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn held(flags: u8) -> InputFrame {
        InputFrame::from_flags(flags)
    }

    /// Press confirm for one frame, release it on the next.
    fn tap(game: &mut Game, flag: u8) -> FrameResult {
        let result = game.frame(DT, held(flag));
        game.frame(DT, InputFrame::new());
        result
    }

    fn playing_game() -> Game {
        let mut game = Game::default();
        tap(&mut game, InputFrame::CONFIRM);
        assert_eq!(game.state(), GameState::Playing);
        game
    }

    #[test]
    fn test_starts_on_menu_and_confirm_starts_play() {
        let mut game = Game::default();
        assert_eq!(game.state(), GameState::Menu);

        let result = game.frame(DT, held(InputFrame::CONFIRM));
        assert_eq!(result.state, GameState::Playing);
        assert_eq!(result.transition(), Some((GameState::Menu, GameState::Playing)));
    }

    #[test]
    fn test_menu_ignores_other_keys() {
        let mut game = Game::default();
        for flag in [InputFrame::PAUSE, InputFrame::JUMP, InputFrame::RIGHT] {
            tap(&mut game, flag);
            assert_eq!(game.state(), GameState::Menu);
        }
        assert_eq!(game.player().position(), Vec2::new(100.0, 400.0));
    }

    #[test]
    fn test_held_confirm_does_not_retrigger() {
        let mut game = Game::default();
        game.frame(DT, held(InputFrame::CONFIRM));
        assert_eq!(game.state(), GameState::Playing);

        // Held confirm must not matter in Playing anyway; check it is not an edge.
        for _ in 0..10 {
            let result = game.frame(DT, held(InputFrame::CONFIRM));
            assert!(result.transition().is_none());
        }
    }

    #[test]
    fn test_held_pause_toggles_once() {
        let mut game = playing_game();

        let mut transitions = 0;
        for _ in 0..30 {
            if game.frame(DT, held(InputFrame::PAUSE)).transition().is_some() {
                transitions += 1;
            }
        }
        assert_eq!(transitions, 1);
        assert_eq!(game.state(), GameState::Paused);

        game.frame(DT, InputFrame::new());
        game.frame(DT, held(InputFrame::PAUSE));
        assert_eq!(game.state(), GameState::Playing);
    }

    #[test]
    fn test_paused_freezes_simulation() {
        let mut game = playing_game();
        tap(&mut game, InputFrame::PAUSE);
        assert_eq!(game.state(), GameState::Paused);

        let before = game.player().position();
        let camera_before = game.camera().position();
        for _ in 0..60 {
            game.frame(DT, held(InputFrame::RIGHT));
        }
        assert_eq!(game.player().position(), before);
        assert_eq!(game.camera().position(), camera_before);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut game = playing_game();
        assert_eq!(game.level().start_x(), 0.0);
        assert_eq!(game.level().end_x(), 3000.0);
        assert_eq!(game.player().position(), Vec2::new(100.0, 400.0));

        game.frame(1.0, held(InputFrame::RIGHT));
        assert_eq!(game.player().position().x, 300.0);
        assert!(!game.level().is_complete());

        // Walk until x = 2960: 2660 px at 200 px/s.
        game.frame(13.3, held(InputFrame::RIGHT));
        assert!((game.player().position().x - 2960.0).abs() < 1e-2);
        assert!(game.level().is_complete());
        assert!(game.mission_complete());
    }

    #[test]
    fn test_level_completed_event_once() {
        let mut game = playing_game();
        let first = game.frame(20.0, held(InputFrame::RIGHT));
        let completed: Vec<_> = first
            .events
            .iter()
            .filter(|e| matches!(e.data, GameEventData::LevelCompleted { .. }))
            .collect();
        assert_eq!(completed.len(), 1);

        let second = game.frame(DT, held(InputFrame::RIGHT));
        assert!(second
            .events
            .iter()
            .all(|e| !matches!(e.data, GameEventData::LevelCompleted { .. })));
    }

    #[test]
    fn test_mission_complete_survives_level_reset() {
        let mut game = playing_game();
        game.frame(20.0, held(InputFrame::RIGHT));
        assert!(game.mission_complete());

        game.reset_level();
        assert!(!game.level().is_complete());
        game.frame(DT, held(InputFrame::LEFT));
        assert!(game.mission_complete(), "HUD latch only clears on full reset");
    }

    #[test]
    fn test_camera_follows_player() {
        let mut game = playing_game();
        for _ in 0..600 {
            game.frame(DT, held(InputFrame::RIGHT));
        }
        // Player at ~2100, ideal camera ~1460.
        let x = game.camera().position().x;
        assert!(x > 1000.0 && x <= 1720.0, "camera x {}", x);
        assert_eq!(game.camera().position().y, 0.0);
    }

    #[test]
    fn test_game_over_hook_and_reset() {
        let mut game = playing_game();
        game.frame(5.0, held(InputFrame::RIGHT | InputFrame::DOWN));
        game.frame(DT, held(InputFrame::JUMP));
        assert_ne!(game.camera().position(), Vec2::ZERO);

        assert!(game.trigger_game_over());
        assert_eq!(game.state(), GameState::GameOver);
        assert!(!game.trigger_game_over(), "Already over");

        let result = game.frame(DT, held(InputFrame::CONFIRM));
        assert_eq!(result.state, GameState::Menu);
        assert!(result.events.iter().any(|e| e.data == GameEventData::GameReset));

        let start = game.level().player_start_position();
        assert_eq!(game.player().position(), start);
        assert_eq!(game.player().velocity(), Vec2::ZERO);
        assert_eq!(game.player().jump_height(), 0.0);
        assert_eq!(game.camera().position(), Vec2::ZERO);
        assert!(!game.level().is_complete());
        assert!(!game.mission_complete());
    }

    #[test]
    fn test_narrow_end_zone_still_completes() {
        let mut config = GameConfig::default();
        config.level.completion_margin = 10.0;
        let mut game = Game::new(config);
        tap(&mut game, InputFrame::CONFIRM);

        game.frame(100.0, held(InputFrame::RIGHT));
        assert!(game.player().position().x >= game.level().completion_x());
        assert!(game.level().is_complete());
        assert!(game.mission_complete());
    }

    #[test]
    fn test_game_over_not_reachable_from_input() {
        let mut game = Game::default();
        for flags in 0..=u8::MAX {
            game.frame(DT, held(flags & !InputFrame::EXIT));
            assert_ne!(game.state(), GameState::GameOver);
        }
    }

    #[test]
    fn test_game_over_hook_ignored_outside_play() {
        let mut game = Game::default();
        assert!(!game.trigger_game_over());
        assert_eq!(game.state(), GameState::Menu);
    }

    #[test]
    fn test_exit_request_latches() {
        let mut game = Game::default();
        let result = game.frame(DT, held(InputFrame::EXIT));
        assert!(result.exit_requested);
        assert_eq!(result.events, vec![GameEvent::exit_requested(1)]);

        let result = game.frame(DT, InputFrame::new());
        assert!(result.exit_requested);
        assert!(result.events.is_empty());
        assert!(game.should_exit());
    }

    #[test]
    fn test_jump_events() {
        let mut game = playing_game();
        let result = game.frame(DT, held(InputFrame::JUMP));
        assert!(result
            .events
            .iter()
            .any(|e| matches!(e.data, GameEventData::PlayerJumped { .. })));

        let mut landed = false;
        for _ in 0..120 {
            let result = game.frame(DT, InputFrame::new());
            if result
                .events
                .iter()
                .any(|e| matches!(e.data, GameEventData::PlayerLanded { .. }))
            {
                landed = true;
                break;
            }
        }
        assert!(landed);
    }

    #[test]
    fn test_bad_dt_is_ignored() {
        let mut game = playing_game();
        let before = game.player().position();
        game.frame(-5.0, held(InputFrame::RIGHT));
        game.frame(f32::INFINITY, held(InputFrame::RIGHT));
        assert_eq!(game.player().position(), before);
    }

    #[test]
    fn test_draw_menu() {
        let game = Game::default();
        let mut list = DrawList::new();
        game.draw(&mut list);

        assert!(list.has_label(Label::Title));
        assert!(list.has_label(Label::PressStart));
        assert!(!list.has_label(Label::Paused));
    }

    #[test]
    fn test_draw_world_without_player_texture() {
        let game = playing_game();
        let mut list = DrawList::new();
        game.draw(&mut list);

        let rects = list.screen_rects();
        assert!(rects.iter().any(|r| r.color == Color::SKY));
        assert!(rects.iter().any(|r| r.color == Color::GROUND));
        assert!(rects.iter().all(|r| r.texture.is_none()), "Missing texture draws nothing");
        assert!(!rects.iter().any(|r| r.color == Color::END_ZONE), "End zone is off screen");
    }

    #[test]
    fn test_draw_player_sprite_flips() {
        let mut game = playing_game();
        game.set_textures(SceneTextures {
            player: Some(TextureId(1)),
        });
        game.frame(DT, held(InputFrame::LEFT));

        let mut list = DrawList::new();
        game.draw(&mut list);
        let sprite = list
            .screen_rects()
            .into_iter()
            .find(|r| r.texture == Some(TextureId(1)))
            .expect("player sprite drawn");

        assert!(sprite.flip_x);
        assert_eq!(sprite.rect.w, 32.0);
        assert_eq!(sprite.rect.h, 64.0);
        assert_eq!(sprite.space, Space::Screen);
    }

    #[test]
    fn test_draw_paused_and_mission_complete() {
        let mut game = playing_game();
        game.frame(20.0, held(InputFrame::RIGHT));
        tap(&mut game, InputFrame::PAUSE);

        let mut list = DrawList::new();
        game.draw(&mut list);
        assert!(list.has_label(Label::Paused));
        assert!(list.has_label(Label::MissionComplete));
        assert!(list.screen_rects().iter().any(|r| r.color == Color::OVERLAY));
    }

    #[test]
    fn test_draw_game_over() {
        let mut game = playing_game();
        game.trigger_game_over();
        let mut list = DrawList::new();
        game.draw(&mut list);
        assert!(list.has_label(Label::GameOver));
        assert!(list.has_label(Label::ReturnToMenu));
    }

    #[test]
    fn test_replay_matches_live_run() {
        let mut game = Game::default();
        let mut recording = InputRecording::new();

        let script: Vec<(f32, u8)> = (0..600)
            .map(|i| {
                let flags = match i {
                    0 => InputFrame::CONFIRM,
                    1..=200 => InputFrame::RIGHT,
                    201..=220 => InputFrame::RIGHT | InputFrame::JUMP,
                    300 => InputFrame::PAUSE,
                    320 => InputFrame::PAUSE,
                    400..=599 => InputFrame::RIGHT | InputFrame::UP,
                    _ => 0,
                };
                (DT + (i % 3) as f32 * 0.001, flags)
            })
            .collect();

        for (dt, flags) in &script {
            recording.record(*dt, held(*flags));
            game.frame(*dt, held(*flags));
        }

        let (replayed, _) = replay(GameConfig::default(), &recording);
        assert_eq!(replayed.compute_hash(), game.compute_hash());
        assert_eq!(replayed.frame_count(), 600);
    }

    #[test]
    fn test_hash_changes_with_state() {
        let mut game = Game::default();
        let h0 = game.compute_hash();
        game.frame(DT, InputFrame::new());
        assert_ne!(game.compute_hash(), h0);
    }

    #[test]
    fn test_platformer_mode_game() {
        let mut config = GameConfig::default();
        config.player.mode = PhysicsMode::Platformer;
        let mut game = Game::new(config);
        tap(&mut game, InputFrame::CONFIRM);

        for _ in 0..120 {
            game.frame(DT, InputFrame::new());
        }
        assert!(game.player().is_on_ground());
        assert_eq!(game.player().position().y, 500.0);
    }

    proptest! {
        #[test]
        fn prop_held_pause_toggles_exactly_once(hold in 1usize..120) {
            let mut game = playing_game();
            let mut toggles = 0;
            for _ in 0..hold {
                if game.frame(DT, held(InputFrame::PAUSE)).transition().is_some() {
                    toggles += 1;
                }
            }
            prop_assert_eq!(toggles, 1);
            prop_assert_eq!(game.state(), GameState::Paused);
        }

        #[test]
        fn prop_camera_within_level_range(
            inputs in proptest::collection::vec((0.0f32..0.5, any::<u8>()), 1..300),
        ) {
            let mut game = Game::default();
            for (dt, flags) in inputs {
                game.frame(dt, held(flags));
                let x = game.camera().position().x;
                prop_assert!((0.0..=1720.0).contains(&x));
                let px = game.player().position().x;
                prop_assert!((0.0..=2968.0).contains(&px));
            }
        }
    }
}
