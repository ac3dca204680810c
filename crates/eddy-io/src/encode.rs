use std::{fs::File, io::{BufWriter, Write}, path::PathBuf};

use eddy_fluids::{Field, Surface};
use log::info;
use thiserror::Error;

use crate::{as_bytes::AsBytes, frame_path, METADATA_FILE};

/// Writes presented dye fields into a recording directory.
pub struct FrameEncoder {
    /// The directory into which the frames will be placed.
    path: PathBuf,
    num_frames: u64,
    fps: u32,
    /// Width, height and channels of every frame, once the metadata is written.
    shape: Option<[u32; 3]>,
    current_frame: u64,
}

impl FrameEncoder {
    /// Creates the recording directory. Fails if it already exists.
    pub fn new(path: PathBuf, num_frames: u64, fps: u32) -> Result<FrameEncoder, EncodingError> {
        std::fs::create_dir(&path)?;
        info!("recording {num_frames} frames at {fps} fps into {}", path.display());

        Ok(Self {
            path,
            num_frames,
            fps,
            shape: None,
            current_frame: 0,
        })
    }

    /// Writes `_meta` for frames shaped like `dye`. Every later frame must have this shape.
    pub fn encode_metadata(&mut self, dye: &Field) -> Result<(), EncodingError> {
        let shape = [dye.width(), dye.height(), dye.layout().channels() as u32];
        let mut writer = BufWriter::new(File::create(self.path.join(METADATA_FILE))?);

        writer.write_all(&self.num_frames.to_bytes())?;
        writer.write_all(&self.fps.to_bytes())?;
        writer.write_all(&(shape.len() as u8).to_bytes())?;

        for extent in shape {
            writer.write_all(&extent.to_bytes())?;
        }

        writer.flush()?;
        self.shape = Some(shape);

        Ok(())
    }

    /// Writes the next frame, writing the metadata first if that has not happened yet.
    pub fn encode_frame(&mut self, dye: &Field) -> Result<(), EncodingError> {
        if self.current_frame >= self.num_frames {
            return Err(EncodingError::TooManyFrames { limit: self.num_frames });
        }

        let shape = [dye.width(), dye.height(), dye.layout().channels() as u32];
        match self.shape {
            None => self.encode_metadata(dye)?,
            Some(expected) if expected != shape => {
                return Err(EncodingError::ShapeMismatch { expected, found: shape });
            }
            Some(_) => {}
        }

        let path = frame_path(&self.path, self.current_frame, self.num_frames);
        let mut writer = BufWriter::new(File::create(path)?);

        let samples = dye.view();
        writer.write_all(&(samples.len() as u64).to_bytes())?;

        // Rows bottom to top, channels interleaved.
        let mut bytes = Vec::with_capacity(samples.len() * 4);
        for row in samples.axis_iter(ndarray::Axis(1)) {
            bytes.extend(row.iter().flat_map(|v| v.to_bytes()));
        }
        writer.write_all(&bytes)?;
        writer.flush()?;

        self.current_frame += 1;

        Ok(())
    }

    /// Number of frames written so far.
    pub fn frames_written(&self) -> u64 {
        self.current_frame
    }
}

impl Surface for FrameEncoder {
    type Error = EncodingError;

    fn present(&mut self, dye: &Field) -> Result<(), Self::Error> {
        self.encode_frame(dye)
    }
}

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("recording is limited to {limit} frames")]
    TooManyFrames { limit: u64 },
    #[error("frame shape {found:?} does not match the recorded shape {expected:?}")]
    ShapeMismatch { expected: [u32; 3], found: [u32; 3] },
}
