use bevy::{prelude::*, window::PrimaryWindow};
use eddy_io::{DyeFrame, FrameDecoder, RecordingMetadata};

use crate::{
    stats::GridStats,
    surface::{dye_image, fit_to_window, spawn_dye_sprite, ImageSurface},
};

/// Plays a recording back, one frame per fixed timestep. Space toggles between playing and
/// paused; playback pauses and rewinds at the end.
pub struct PlaybackPlugin;

impl Plugin for PlaybackPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_state::<PlaybackState>()
            .add_systems(Startup, setup)
            .add_systems(FixedUpdate, progress_playback.run_if(in_state(PlaybackState::Playing)))
            .add_systems(Update, (
                fit_to_window,
                change_state_playing.run_if(in_state(PlaybackState::Paused)),
                change_state_paused.run_if(in_state(PlaybackState::Playing)),
            ));
    }
}

#[derive(Resource)]
pub struct Recording {
    pub decoder: FrameDecoder,
    pub metadata: RecordingMetadata,
}

#[derive(Resource)]
struct PlaybackTexture(Handle<Image>);

#[derive(States, Clone, PartialEq, Eq, Hash, Debug, Default)]
enum PlaybackState {
    Playing,
    #[default]
    Paused
}

fn setup(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    mut recording: ResMut<Recording>,
    mut stats: ResMut<GridStats>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let mut image = dye_image();

    // Show the first frame while paused.
    match recording.decoder.decode_frame() {
        Ok(Some(frame)) => draw(&mut image, &frame),
        Ok(None) => warn!("recording holds no frames"),
        Err(e) => error!("failed to read the first frame: {e}"),
    }
    recording.decoder.reset();

    let image = images.add(image);
    spawn_dye_sprite(&mut commands, image.clone(), windows.get_single().ok());
    commands.insert_resource(PlaybackTexture(image));

    stats.size = Some(UVec2::new(recording.metadata.width(), recording.metadata.height()));

    info!(
        "loaded {} frames of {}x{} at {} fps",
        recording.metadata.num_frames,
        recording.metadata.width(),
        recording.metadata.height(),
        recording.metadata.fps,
    );
}

fn draw(image: &mut Image, frame: &DyeFrame) {
    ImageSurface::new(image).write(frame.width, frame.height, |i, j| frame.texel(i, j));
}

fn progress_playback(
    mut recording: ResMut<Recording>,
    mut images: ResMut<Assets<Image>>,
    mut stats: ResMut<GridStats>,
    mut next_state: ResMut<NextState<PlaybackState>>,
    texture: Res<PlaybackTexture>,
) {
    match recording.decoder.decode_frame() {
        Ok(Some(frame)) => {
            if let Some(image) = images.get_mut(&texture.0) {
                draw(image, &frame);
            }
            stats.frame += 1;
        }
        Ok(None) => {
            next_state.set(PlaybackState::Paused);
            recording.decoder.reset();
            stats.frame = 0;
        }
        Err(e) => {
            error!("playback stopped: {e}");
            next_state.set(PlaybackState::Paused);
            recording.decoder.reset();
            stats.frame = 0;
        }
    }
}

fn change_state_playing(
    keys: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<PlaybackState>>,
) {
    if keys.just_pressed(KeyCode::Space) {
        next_state.set(PlaybackState::Playing);
    }
}

fn change_state_paused(
    keys: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<PlaybackState>>,
) {
    if keys.just_pressed(KeyCode::Space) {
        next_state.set(PlaybackState::Paused);
    }
}
