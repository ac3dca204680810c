//! Recording of presented dye fields.
//!
//! A recording is a directory holding a `_meta` file and one `.dat` file per frame:
//!
//! - `_meta`: frame count (`u64`), frames per second (`u32`), number of dimensions (`u8`), then
//!   one `u32` per dimension: width, height and channels.
//! - `NNNN.dat`, zero-padded to the width of the last frame index: sample count (`u64`), then the
//!   samples as `f32`, channels interleaved, rows from bottom to top.
//!
//! Every value is native-endian.

use std::path::{Path, PathBuf};

pub use decode::{DecodingError, DyeFrame, FrameDecoder, RecordingMetadata};
pub use encode::{EncodingError, FrameEncoder};

pub mod as_bytes;
pub mod decode;
pub mod encode;

pub(crate) const METADATA_FILE: &str = "_meta";

/// Path of the file holding `frame` in a recording of `num_frames` frames.
pub(crate) fn frame_path(dir: &Path, frame: u64, num_frames: u64) -> PathBuf {
    let digits = num_frames.saturating_sub(1).checked_ilog10().unwrap_or(0) as usize + 1;
    dir.join(format!("{frame:0digits$}.dat"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_names_are_padded_to_the_last_index() {
        let dir = Path::new("out");

        assert_eq!(frame_path(dir, 7, 10), dir.join("7.dat"));
        assert_eq!(frame_path(dir, 7, 11), dir.join("07.dat"));
        assert_eq!(frame_path(dir, 42, 1000), dir.join("042.dat"));
        assert_eq!(frame_path(dir, 0, 0), dir.join("0.dat"));
    }
}
