//! Render Sink Contract
//!
//! The core never touches pixels. Each frame it hands a [`RenderSink`] a
//! world→screen transform, filled rectangles (optionally textured and
//! mirrored) and text labels. What a [`TextureId`] or [`Label`] looks
//! like is entirely up to the front end.
//!
//! A textured draw whose texture is not set is skipped, not an error.

use serde::{Serialize, Deserialize};

use crate::core::rect::{Color, Rect};
use crate::core::transform::ViewTransform;
use crate::core::vec2::Vec2;

/// Coordinate space of a draw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Space {
    /// World coordinates: the current transform applies
    #[default]
    World,
    /// Screen pixels: drawn as-is (HUD, overlays)
    Screen,
}

/// Opaque handle for a front-end texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureId(pub u32);

/// One filled rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawRect {
    /// Rectangle in `space`
    pub rect: Rect,
    /// Fill colour (tint when textured)
    pub color: Color,
    /// Mirror horizontally
    pub flip_x: bool,
    /// Which coordinate space `rect` is in
    pub space: Space,
    /// Texture to stretch over `rect`, if any
    pub texture: Option<TextureId>,
}

impl DrawRect {
    /// Untextured world-space fill.
    pub fn world(rect: Rect, color: Color) -> Self {
        Self {
            rect,
            color,
            flip_x: false,
            space: Space::World,
            texture: None,
        }
    }

    /// Untextured screen-space fill.
    pub fn screen(rect: Rect, color: Color) -> Self {
        Self {
            space: Space::Screen,
            ..Self::world(rect, color)
        }
    }
}

/// Text the front end knows how to render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// Game title on the menu
    Title,
    /// "Press Enter to start"
    PressStart,
    /// Pause banner
    Paused,
    /// Shown once the level end is reached
    MissionComplete,
    /// Game over banner
    GameOver,
    /// "Press Enter to return to menu"
    ReturnToMenu,
}

impl Label {
    /// Default English text.
    pub fn text(self) -> &'static str {
        match self {
            Label::Title => "STREETLINE",
            Label::PressStart => "Press ENTER to start",
            Label::Paused => "PAUSED",
            Label::MissionComplete => "MISSION COMPLETE",
            Label::GameOver => "GAME OVER",
            Label::ReturnToMenu => "Press ENTER to return to menu",
        }
    }
}

/// A label anchored at a screen position (centre of the text).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelDraw {
    /// Which text
    pub label: Label,
    /// Screen-space anchor
    pub position: Vec2,
    /// Text colour
    pub color: Color,
}

/// Consumer of draw requests.
pub trait RenderSink {
    /// Transform applied to subsequent [`Space::World`] draws.
    fn set_transform(&mut self, transform: ViewTransform);

    /// Fill a rectangle.
    fn fill_rect(&mut self, draw: DrawRect);

    /// Draw a text label.
    fn label(&mut self, draw: LabelDraw);
}

/// Draw a textured quad; no-op when `texture` is `None`.
pub fn draw_textured<S: RenderSink + ?Sized>(
    sink: &mut S,
    rect: Rect,
    texture: Option<TextureId>,
    tint: Color,
    flip_x: bool,
) {
    let Some(texture) = texture else {
        return;
    };
    sink.fill_rect(DrawRect {
        rect,
        color: tint,
        flip_x,
        space: Space::World,
        texture: Some(texture),
    });
}

/// Recorded draw request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCommand {
    /// `set_transform`
    Transform(ViewTransform),
    /// `fill_rect`
    Rect(DrawRect),
    /// `label`
    Label(LabelDraw),
}

/// Sink that records every request, for tests and for front ends that
/// render after the simulation step.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    /// Empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all recorded commands, keeping the allocation.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Recorded commands in order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// All rectangles resolved to screen space, in draw order.
    pub fn screen_rects(&self) -> Vec<DrawRect> {
        let mut transform = ViewTransform::IDENTITY;
        let mut out = Vec::with_capacity(self.commands.len());
        for command in &self.commands {
            match command {
                DrawCommand::Transform(t) => transform = *t,
                DrawCommand::Rect(draw) => {
                    let rect = match draw.space {
                        Space::World => transform.apply_rect(&draw.rect),
                        Space::Screen => draw.rect,
                    };
                    out.push(DrawRect {
                        rect,
                        space: Space::Screen,
                        ..*draw
                    });
                }
                DrawCommand::Label(_) => {}
            }
        }
        out
    }

    /// All labels in draw order.
    pub fn labels(&self) -> Vec<LabelDraw> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Label(l) => Some(*l),
                _ => None,
            })
            .collect()
    }

    /// Was `label` drawn?
    pub fn has_label(&self, label: Label) -> bool {
        self.labels().iter().any(|l| l.label == label)
    }
}

impl RenderSink for DrawList {
    fn set_transform(&mut self, transform: ViewTransform) {
        self.commands.push(DrawCommand::Transform(transform));
    }

    fn fill_rect(&mut self, draw: DrawRect) {
        self.commands.push(DrawCommand::Rect(draw));
    }

    fn label(&mut self, draw: LabelDraw) {
        self.commands.push(DrawCommand::Label(draw));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_texture_is_noop() {
        let mut list = DrawList::new();
        draw_textured(&mut list, Rect::new(0.0, 0.0, 32.0, 64.0), None, Color::WHITE, false);
        assert!(list.commands().is_empty());

        draw_textured(
            &mut list,
            Rect::new(0.0, 0.0, 32.0, 64.0),
            Some(TextureId(7)),
            Color::WHITE,
            true,
        );
        assert_eq!(list.commands().len(), 1);
        let rects = list.screen_rects();
        assert_eq!(rects[0].texture, Some(TextureId(7)));
        assert!(rects[0].flip_x);
    }

    #[test]
    fn test_screen_rects_apply_latest_transform() {
        let mut list = DrawList::new();
        list.set_transform(ViewTransform::translation(Vec2::new(-100.0, 0.0)));
        list.fill_rect(DrawRect::world(Rect::new(150.0, 10.0, 5.0, 5.0), Color::BLACK));
        list.fill_rect(DrawRect::screen(Rect::new(150.0, 10.0, 5.0, 5.0), Color::BLACK));
        list.set_transform(ViewTransform::IDENTITY);
        list.fill_rect(DrawRect::world(Rect::new(150.0, 10.0, 5.0, 5.0), Color::BLACK));

        let rects = list.screen_rects();
        assert_eq!(rects[0].rect.x, 50.0);
        assert_eq!(rects[1].rect.x, 150.0, "Screen-space draws ignore the transform");
        assert_eq!(rects[2].rect.x, 150.0);
        assert!(rects.iter().all(|r| r.space == Space::Screen));
    }

    #[test]
    fn test_labels() {
        let mut list = DrawList::new();
        list.label(LabelDraw {
            label: Label::Paused,
            position: Vec2::new(640.0, 360.0),
            color: Color::WHITE,
        });
        assert!(list.has_label(Label::Paused));
        assert!(!list.has_label(Label::GameOver));

        list.clear();
        assert!(list.labels().is_empty());
    }

    #[test]
    fn test_label_text() {
        assert_eq!(Label::MissionComplete.text(), "MISSION COMPLETE");
        assert_eq!(Label::Paused.text(), "PAUSED");
    }
}
