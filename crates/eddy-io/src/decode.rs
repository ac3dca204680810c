use std::{fs::File, io::{BufReader, Read}, path::PathBuf};

use glam::Vec3;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{as_bytes::AsBytes, frame_path, METADATA_FILE};

/// Reads back a recording written by [`FrameEncoder`](crate::FrameEncoder).
pub struct FrameDecoder {
    /// The directory in which the recording resides.
    path: PathBuf,
    shape: SmallVec<[u32; 3]>,
    num_frames: u64,
    current_frame: u64,
}

impl FrameDecoder {
    pub fn new(path: PathBuf) -> FrameDecoder {
        Self {
            path,
            shape: SmallVec::new(),
            num_frames: 0,
            current_frame: 0,
        }
    }

    fn read_value<const N: usize, T: AsBytes<N>, R: Read>(reader: &mut R) -> Result<T, DecodingError> {
        let mut bytes = [0; N];
        reader.read_exact(&mut bytes)?;

        Ok(T::from_bytes(bytes))
    }

    fn read_values<R: Read>(reader: &mut R, count: usize) -> Result<Vec<f32>, DecodingError> {
        let len = count
            .checked_mul(4)
            .ok_or_else(|| DecodingError::Format(format!("{count} samples overflow usize")))?;
        let mut bytes = vec![0; len];
        reader.read_exact(&mut bytes)?;

        Ok(bytes
            .chunks_exact(4)
            .map(|b| f32::from_bytes([b[0], b[1], b[2], b[3]]))
            .collect())
    }

    pub fn decode_metadata(&mut self) -> Result<RecordingMetadata, DecodingError> {
        let mut reader = BufReader::new(File::open(self.path.join(METADATA_FILE))?);

        let num_frames = Self::read_value::<8, u64, _>(&mut reader)?;
        let fps = Self::read_value::<4, u32, _>(&mut reader)?;
        let dim = Self::read_value::<1, u8, _>(&mut reader)?;

        if dim != 3 {
            return Err(DecodingError::Format(format!("expected 3 dimensions, found {dim}")));
        }

        let mut shape: SmallVec<[u32; 3]> = SmallVec::new();
        for _ in 0..dim {
            shape.push(Self::read_value::<4, u32, _>(&mut reader)?);
        }

        if shape[0] == 0 || shape[1] == 0 || !(1..=3).contains(&shape[2]) {
            return Err(DecodingError::Format(format!("invalid frame shape {shape:?}")));
        }

        if frame_bytes(&shape).is_none() {
            return Err(DecodingError::Format(format!("frame shape {shape:?} is too large")));
        }

        self.shape = shape.clone();
        self.num_frames = num_frames;
        self.current_frame = 0;

        Ok(RecordingMetadata {
            num_frames,
            fps,
            shape,
        })
    }

    /// Reads the next frame, or `None` once every frame has been read.
    pub fn decode_frame(&mut self) -> Result<Option<DyeFrame>, DecodingError> {
        if self.current_frame >= self.num_frames {
            return Ok(None);
        }

        let path = frame_path(&self.path, self.current_frame, self.num_frames);
        let file = File::open(path)?;
        let file_len = file.metadata()?.len();
        let mut reader = BufReader::new(file);

        let [width, height, channels] = [self.shape[0], self.shape[1], self.shape[2]];
        let (expected, payload) = frame_bytes(&self.shape)
            .ok_or_else(|| DecodingError::Format(format!("frame shape {:?} is too large", self.shape)))?;

        let len = Self::read_value::<8, u64, _>(&mut reader)?;
        if len != expected as u64 || file_len != payload {
            return Err(DecodingError::Format(format!(
                "frame {} holds {len} samples in {file_len} bytes, expected {expected} in {payload}",
                self.current_frame,
            )));
        }

        let samples = Self::read_values(&mut reader, expected)?;

        self.current_frame += 1;

        Ok(Some(DyeFrame {
            width,
            height,
            channels,
            samples,
        }))
    }

    /// Rewinds to the first frame.
    pub fn reset(&mut self) {
        self.current_frame = 0;
    }
}

/// Sample count of a frame with `shape`, and the size of its file in bytes.
fn frame_bytes(shape: &[u32]) -> Option<(usize, u64)> {
    let samples = shape
        .iter()
        .try_fold(1usize, |n, &extent| n.checked_mul(usize::try_from(extent).ok()?))?;
    let bytes = u64::try_from(samples).ok()?.checked_mul(4)?.checked_add(8)?;

    Some((samples, bytes))
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordingMetadata {
    pub num_frames: u64,
    pub fps: u32,
    /// Width, height and channels of every frame.
    pub shape: SmallVec<[u32; 3]>,
}

impl RecordingMetadata {
    pub fn width(&self) -> u32 {
        self.shape[0]
    }

    pub fn height(&self) -> u32 {
        self.shape[1]
    }

    pub fn channels(&self) -> u32 {
        self.shape[2]
    }
}

/// One decoded dye field.
#[derive(Debug, Clone, PartialEq)]
pub struct DyeFrame {
    pub width: u32,
    pub height: u32,
    pub channels: u32,
    samples: Vec<f32>,
}

impl DyeFrame {
    /// Colour of texel `(i, j)`, `j` growing upwards. Channels the recording lacks read as zero.
    pub fn texel(&self, i: usize, j: usize) -> Vec3 {
        let channels = self.channels as usize;
        let start = (j * self.width as usize + i) * channels;

        let mut value = Vec3::ZERO;
        for (c, &v) in self.samples[start..start + channels].iter().enumerate() {
            value[c] = v;
        }
        value
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }
}

#[derive(Debug, Error)]
pub enum DecodingError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("malformed recording: {0}")]
    Format(String),
}
