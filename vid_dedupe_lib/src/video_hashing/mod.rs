pub mod frame_fingerprint;
pub mod matches;
pub mod signature_builder;
pub mod signature_pool;
pub mod video_signature;

use std::path::PathBuf;

use thiserror::Error;

/// An error that prevented a video signature from being created.
#[derive(Error, Debug)]
pub enum Error {
    /// The configured hash size cannot be used. Sizes must be positive
    /// powers of two so fingerprints pack into whole bit grids.
    #[error("invalid hash size {0}: must be a positive power of two")]
    InvalidHashSize(u32),

    /// No capture timestamps were configured, so no signature could ever
    /// be built.
    #[error("no capture seconds were supplied")]
    NoTimestamps,

    /// The video file itself could not be read.
    #[error("could not read metadata of {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A still could not be captured from the video.
    #[error(transparent)]
    Still(#[from] ffmpeg_still_utils::FfmpegError),

    /// A captured still was malformed.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// Every configured capture second failed for this video, leaving
    /// nothing to fingerprint. The video is unusable for matching.
    #[error("no usable frames could be captured from {0}")]
    NoUsableFrames(PathBuf),
}
