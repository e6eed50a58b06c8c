use bevy::prelude::*;
use crate::shared::*;
use crate::sky::ActiveAmbient;

// ═══════════════════════════════════════════════════════════════════════
// MUSIC STATE: tracks the currently playing ambient loop
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Default)]
pub struct MusicState {
    pub current_track: Option<Entity>,
    pub current_track_id: Option<AmbientTrack>,
}

/// Maps ambient tracks to audio file paths.
fn music_path(track: AmbientTrack) -> &'static str {
    match track {
        AmbientTrack::Day => "audio/ambient/day.ogg",
        AmbientTrack::Rain => "audio/ambient/rain.ogg",
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// Swap the looping track whenever the selected ambient changes.
pub fn play_ambient(
    mut commands: Commands,
    active: Res<ActiveAmbient>,
    asset_server: Res<AssetServer>,
    mut music_state: ResMut<MusicState>,
) {
    if music_state.current_track_id == Some(active.0) {
        return;
    }
    if let Some(entity) = music_state.current_track.take() {
        commands.entity(entity).despawn_recursive();
    }
    let entity = commands
        .spawn((
            AudioPlayer::new(asset_server.load(music_path(active.0))),
            PlaybackSettings::LOOP,
        ))
        .id();
    music_state.current_track = Some(entity);
    music_state.current_track_id = Some(active.0);
}

/// Silence when the level closes.
pub fn stop_ambient(mut commands: Commands, mut music_state: ResMut<MusicState>) {
    if let Some(entity) = music_state.current_track.take() {
        commands.entity(entity).despawn_recursive();
    }
    music_state.current_track_id = None;
}
