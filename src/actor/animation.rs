use std::collections::HashMap;

use bevy::prelude::*;

use super::Actor;
use crate::data::{GameConfig, SetupError};
use crate::shared::*;

/// Frame images for each of the eight statuses. Every status is guaranteed
/// a non-empty sequence.
#[derive(Component, Debug, Clone)]
pub struct AnimationSet {
    frames: HashMap<ActorStatus, Vec<String>>,
    /// Status and frame currently on the sprite.
    shown: Option<(ActorStatus, usize)>,
}

impl AnimationSet {
    pub fn new(frames: HashMap<ActorStatus, Vec<String>>) -> Result<Self, SetupError> {
        for status in ActorStatus::ALL {
            if frames.get(&status).map_or(true, Vec::is_empty) {
                return Err(SetupError::EmptyAnimation(status.label().to_string()));
            }
        }
        Ok(Self {
            frames,
            shown: None,
        })
    }

    /// `graphics/<folder>/<status>/<i>.png` for `frame_count` frames.
    pub fn from_folder(folder: &str, frame_count: usize) -> Result<Self, SetupError> {
        let frames = ActorStatus::ALL
            .iter()
            .map(|status| {
                let paths = (0..frame_count)
                    .map(|i| format!("graphics/{folder}/{}/{i}.png", status.label()))
                    .collect();
                (*status, paths)
            })
            .collect();
        Self::new(frames)
    }

    pub fn frames(&self, status: ActorStatus) -> &[String] {
        self.frames.get(&status).map_or(&[], Vec::as_slice)
    }

    pub fn len(&self, status: ActorStatus) -> usize {
        self.frames(status).len()
    }
}

/// Accumulate `rate × dt` frames, wrapping to 0 at the sequence length.
pub fn advance_frame(frame: f32, rate: f32, dt: f32, len: usize) -> f32 {
    let next = frame + rate * dt;
    if next >= len as f32 {
        0.0
    } else {
        next
    }
}

pub fn animate_actors(
    time: Res<Time>,
    config: Res<GameConfig>,
    assets: Option<Res<AssetServer>>,
    mut actors: Query<(&mut Actor, &mut AnimationSet, &mut Sprite)>,
) {
    let dt = time.delta_secs();
    let rate = config.actors.animation_fps;
    for (mut actor, mut animation, mut sprite) in &mut actors {
        let len = animation.len(actor.status);
        actor.frame = advance_frame(actor.frame, rate, dt, len);

        let shown = (actor.status, actor.frame as usize);
        if animation.shown == Some(shown) {
            continue;
        }
        let path = animation.frames(shown.0).get(shown.1);
        if let (Some(assets), Some(path)) = (assets.as_deref(), path) {
            sprite.image = assets.load(path.clone());
        }
        animation.shown = Some(shown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_status_needs_frames() {
        let mut frames: HashMap<ActorStatus, Vec<String>> = ActorStatus::ALL
            .iter()
            .map(|s| (*s, vec!["a.png".to_string()]))
            .collect();
        assert!(AnimationSet::new(frames.clone()).is_ok());

        frames.insert(ActorStatus::idle(Facing::Left), Vec::new());
        match AnimationSet::new(frames) {
            Err(SetupError::EmptyAnimation(label)) => assert_eq!(label, "left_idle"),
            other => panic!("expected empty animation error, got {other:?}"),
        }
    }

    #[test]
    fn frame_wraps_at_sequence_length() {
        let mut frame = 0.0;
        frame = advance_frame(frame, 4.0, 0.5, 4);
        assert_eq!(frame, 2.0);
        frame = advance_frame(frame, 4.0, 0.25, 4);
        assert_eq!(frame, 3.0);
        frame = advance_frame(frame, 4.0, 0.25, 4);
        assert_eq!(frame, 0.0);
    }

    #[test]
    fn folder_layout_uses_status_labels() {
        let set = AnimationSet::from_folder("character", 2).unwrap();
        assert_eq!(
            set.frames(ActorStatus::moving(Facing::Up)),
            ["graphics/character/up/0.png", "graphics/character/up/1.png"]
        );
        assert!(AnimationSet::from_folder("character", 0).is_err());
    }
}
