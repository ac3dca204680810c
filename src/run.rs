use std::{f32::consts::TAU, path::PathBuf};

use eddy_fluids::{FluidError, FrameDriver, StableFluidParams};
use eddy_io::{DecodingError, EncodingError, FrameEncoder};
use glam::Vec2;
use indicatif::{ProgressBar, ProgressIterator, ProgressStyle};
use log::info;
use thiserror::Error;

pub struct RecordOptions {
    pub out: PathBuf,
    pub frames: u64,
    pub fps: u32,
    /// Size of the virtual surface, in pixels.
    pub width: u32,
    pub height: u32,
}

/// Position of the scripted pointer at `frame`, in surface pixels. It circles the surface centre
/// once every two seconds.
fn orbit(frame: u64, fps: u32, surface: Vec2) -> Vec2 {
    let theta = TAU * frame as f32 / (2.0 * fps.max(1) as f32);
    let radius = 0.25 * surface.min_element();

    surface / 2.0 + radius * Vec2::new(theta.cos(), theta.sin())
}

pub fn record(params: StableFluidParams, options: RecordOptions) -> Result<(), RunError> {
    let RecordOptions { out, frames, fps, width, height } = options;
    let surface = Vec2::new(width as f32, height as f32);

    let mut driver = FrameDriver::new(params);
    let domain = driver.resize(surface.x, surface.y)?;
    let mut encoder = FrameEncoder::new(out, frames, fps)?;

    let bar_template = "Running Simulation {spinner:.green} [{elapsed}] [{bar:50.white/white}] {pos}/{len} ({eta})";
    let style = ProgressStyle::with_template(bar_template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    let progress = ProgressBar::new(frames).with_style(style);

    for frame in (0..frames).progress_with(progress) {
        let pointer = orbit(frame, fps, surface);
        driver.pointer_moved(pointer.x, pointer.y);
        driver.tick(&mut encoder)?;
    }

    info!(
        "recorded {} frames of a {}x{} domain",
        encoder.frames_written(),
        domain.width,
        domain.height,
    );

    Ok(())
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Fluid(#[from] FluidError),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error(transparent)]
    Decoding(#[from] DecodingError),
}

#[cfg(test)]
mod tests {
    use eddy_io::FrameDecoder;

    use super::*;

    #[test]
    fn orbit_circles_the_centre() {
        let surface = Vec2::new(200.0, 100.0);

        assert!((orbit(0, 60, surface) - Vec2::new(125.0, 50.0)).length() < 1e-4);
        assert!((orbit(60, 60, surface) - Vec2::new(75.0, 50.0)).length() < 1e-3);
        assert!((orbit(120, 60, surface) - orbit(0, 60, surface)).length() < 1e-3);
    }

    #[test]
    fn recording_writes_every_frame() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("run");

        let params = StableFluidParams {
            splat_radius: 0.1,
            ..Default::default()
        };
        record(params, RecordOptions { out: out.clone(), frames: 12, fps: 60, width: 64, height: 32 }).unwrap();

        let mut decoder = FrameDecoder::new(out);
        let meta = decoder.decode_metadata().unwrap();
        assert_eq!(meta.num_frames, 12);
        assert_eq!((meta.width(), meta.height()), (32, 16));

        let mut frames = 0;
        let mut last = None;
        while let Some(frame) = decoder.decode_frame().unwrap() {
            frames += 1;
            last = Some(frame);
        }
        assert_eq!(frames, 12);
        assert!(last.unwrap().samples().iter().any(|&v| v > 0.0));
    }

    #[test]
    fn degenerate_surface_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = record(StableFluidParams::default(), RecordOptions {
            out: dir.path().join("never"),
            frames: 1,
            fps: 60,
            width: 1,
            height: 1,
        })
        .unwrap_err();

        assert!(matches!(err, RunError::Fluid(FluidError::DegenerateDomain { .. })));
        assert!(!dir.path().join("never").exists());
    }
}
