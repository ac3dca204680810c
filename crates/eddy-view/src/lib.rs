#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]

use std::path::PathBuf;

use bevy::prelude::*;
use eddy_fluids::StableFluidParams;
use eddy_io::{DecodingError, FrameDecoder};
use live::FluidPlugin;
use playback::{PlaybackPlugin, Recording};
use stats::StatsOverlayPlugin;

mod live;
mod playback;
mod stats;
mod surface;

fn window_plugin(title: &str) -> WindowPlugin {
    WindowPlugin {
        primary_window: Some(Window {
            title: title.to_string(),
            ..default()
        }),
        ..default()
    }
}

/// Opens a window running the simulation until it is closed.
pub fn live(params: StableFluidParams) {
    App::new()
        .add_plugins((
            DefaultPlugins.set(window_plugin("eddy")),
            StatsOverlayPlugin,
        ))
        .add_plugins(FluidPlugin { params })
        .run();
}

/// Opens a window playing back the recording in `path`.
pub fn view(path: PathBuf) -> Result<(), DecodingError> {
    let title = format!("eddy: {}", path.display());
    let mut decoder = FrameDecoder::new(path);
    let metadata = decoder.decode_metadata()?;
    let fps = metadata.fps.max(1) as f64;

    App::new()
        .add_plugins((
            DefaultPlugins.set(window_plugin(&title)),
            StatsOverlayPlugin,
        ))
        .add_plugins(PlaybackPlugin)
        .insert_resource(Time::<Fixed>::from_hz(fps))
        .insert_resource(Recording { decoder, metadata })
        .run();

    Ok(())
}
