//! UI module - labels from the core and a small status line

use bevy::prelude::*;

use streetline::game::render::Label;

use crate::game::{step_game, Session, Viewport};

/// Most labels the core draws in one frame is two; keep a spare.
const LABEL_SLOTS: usize = 3;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app
            .add_systems(Startup, (setup_labels, setup_hud))
            .add_systems(Update, (update_labels, update_hud).after(step_game));
    }
}

/// Text node reused for the n-th label of the frame
#[derive(Component)]
struct LabelSlot(usize);

/// Marker for the status line
#[derive(Component)]
struct HudText;

fn setup_labels(mut commands: Commands) {
    for index in 0..LABEL_SLOTS {
        commands.spawn((
            Text::new(""),
            TextFont {
                font_size: 32.0,
                ..default()
            },
            TextColor(Color::WHITE),
            TextLayout::new_with_justify(JustifyText::Center),
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                ..default()
            },
            Visibility::Hidden,
            LabelSlot(index),
        ));
    }
}

fn setup_hud(mut commands: Commands) {
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::srgb(0.8, 0.8, 0.8)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            top: Val::Px(10.0),
            ..default()
        },
        HudText,
    ));
}

fn font_size(label: Label) -> f32 {
    match label {
        Label::Title => 72.0,
        Label::Paused | Label::GameOver | Label::MissionComplete => 48.0,
        Label::PressStart | Label::ReturnToMenu => 24.0,
    }
}

/// Show this frame's labels, hide the unused slots.
fn update_labels(
    session: Res<Session>,
    viewport: Res<Viewport>,
    mut slots: Query<(&LabelSlot, &mut Text, &mut TextFont, &mut TextColor, &mut Node, &mut Visibility)>,
) {
    let labels = session.draw_list.labels();

    for (slot, mut text, mut font, mut color, mut node, mut visibility) in &mut slots {
        let Some(draw) = labels.get(slot.0) else {
            *visibility = Visibility::Hidden;
            continue;
        };

        let size = font_size(draw.label);
        if text.as_str() != draw.label.text() {
            **text = draw.label.text().to_string();
        }
        font.font_size = size;
        color.0 = Color::srgba(draw.color.r, draw.color.g, draw.color.b, draw.color.a);
        // Full-width row centred on the anchor's x.
        node.left = Val::Px(draw.position.x - viewport.width / 2.0);
        node.top = Val::Px(draw.position.y - size / 2.0);
        *visibility = Visibility::Visible;
    }
}

fn update_hud(session: Res<Session>, mut hud: Query<&mut Text, With<HudText>>) {
    let Ok(mut text) = hud.get_single_mut() else {
        return;
    };
    let game = &session.game;

    if game.state().shows_world() {
        let position = game.player().position();
        **text = format!(
            "{}  x {:.0}  y {:.0}  jump {:.0}",
            game.state(),
            position.x,
            position.y,
            game.player().jump_height()
        );
    } else {
        text.clear();
    }
}
