use std::collections::HashSet;

use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::input::ButtonState;
use bevy::prelude::*;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FrameInput>().add_systems(
            PreUpdate,
            read_frame_input.run_if(resource_exists::<ButtonInput<KeyCode>>),
        );
    }
}

/// One key-down event. `text` carries the printable characters the key
/// produced, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub code: KeyCode,
    pub text: Option<String>,
}

impl KeyPress {
    pub fn key(code: KeyCode) -> Self {
        Self { code, text: None }
    }

    pub fn character(code: KeyCode, text: &str) -> Self {
        Self {
            code,
            text: Some(text.to_string()),
        }
    }
}

/// Input for the current frame: the ordered key-down events plus a snapshot
/// of held keys. Discrete events drive one-shot actions; held keys drive
/// movement and menu navigation.
#[derive(Resource, Debug, Clone, Default)]
pub struct FrameInput {
    pub presses: Vec<KeyPress>,
    pub held: HashSet<KeyCode>,
}

impl FrameInput {
    pub fn just_pressed(&self, code: KeyCode) -> bool {
        self.presses.iter().any(|press| press.code == code)
    }

    pub fn held(&self, code: KeyCode) -> bool {
        self.held.contains(&code)
    }

    /// Arrow-key direction in map space (y grows downward). Not normalized.
    pub fn arrow_axis(&self) -> Vec2 {
        let mut axis = Vec2::ZERO;
        if self.held(KeyCode::ArrowUp) {
            axis.y -= 1.0;
        }
        if self.held(KeyCode::ArrowDown) {
            axis.y += 1.0;
        }
        if self.held(KeyCode::ArrowLeft) {
            axis.x -= 1.0;
        }
        if self.held(KeyCode::ArrowRight) {
            axis.x += 1.0;
        }
        axis
    }

    pub fn clear(&mut self) {
        self.presses.clear();
        self.held.clear();
    }
}

/// The single point where hardware input becomes frame input.
fn read_frame_input(
    keys: Res<ButtonInput<KeyCode>>,
    mut events: EventReader<KeyboardInput>,
    mut input: ResMut<FrameInput>,
) {
    input.clear();
    input.held.extend(keys.get_pressed().copied());

    for event in events.read() {
        if event.state != ButtonState::Pressed || event.repeat {
            continue;
        }
        let text = match &event.logical_key {
            Key::Character(chars) => Some(chars.to_string()),
            Key::Space => Some(" ".to_string()),
            _ => None,
        };
        input.presses.push(KeyPress {
            code: event.key_code,
            text,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_axis_points_down_the_map() {
        let mut input = FrameInput::default();
        input.held.insert(KeyCode::ArrowDown);
        input.held.insert(KeyCode::ArrowLeft);
        assert_eq!(input.arrow_axis(), Vec2::new(-1.0, 1.0));

        input.held.insert(KeyCode::ArrowUp);
        assert_eq!(input.arrow_axis(), Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn just_pressed_reads_discrete_events() {
        let input = FrameInput {
            presses: vec![KeyPress::character(KeyCode::KeyC, "c")],
            held: HashSet::new(),
        };
        assert!(input.just_pressed(KeyCode::KeyC));
        assert!(!input.held(KeyCode::KeyC));
    }
}
