use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use crate::definitions::{DEFAULT_CAPTURE_SECONDS, DEFAULT_HASH_SIZE};
use crate::video_hashing::frame_fingerprint::FrameFingerprint;
use crate::video_hashing::video_signature::{FrameSlot, VideoFile, VideoSignature};
use crate::Error;
use crate::SignatureResult;

/// Tuning knobs for signature creation: the fingerprint resolution and the
/// timestamps to sample.
///
/// Every signature that takes part in one search must be built from the same
/// options, otherwise pairs become incomparable and are skipped.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct SignatureOptions {
    hash_size: u32,
    capture_seconds: Vec<u32>,
}

impl SignatureOptions {
    /// Creates a set of options, checking them for validity.
    ///
    /// `hash_size` is the side length of the difference grid and must be a
    /// power of two. `capture_seconds` are the timestamps to sample and must
    /// not be empty.
    pub fn new(hash_size: u32, capture_seconds: Vec<u32>) -> SignatureResult<Self> {
        if !hash_size.is_power_of_two() {
            return Err(Error::InvalidHashSize(hash_size));
        }
        if capture_seconds.is_empty() {
            return Err(Error::NoTimestamps);
        }

        Ok(Self {
            hash_size,
            capture_seconds,
        })
    }

    /// The side length of the difference grid.
    #[must_use]
    pub const fn hash_size(&self) -> u32 {
        self.hash_size
    }

    /// The number of bits in each fingerprint built from these options.
    #[must_use]
    pub const fn num_bits(&self) -> u32 {
        self.hash_size * self.hash_size
    }

    /// The timestamps to sample, in seconds from the start of the video.
    #[must_use]
    pub fn capture_seconds(&self) -> &[u32] {
        &self.capture_seconds
    }
}

impl Default for SignatureOptions {
    fn default() -> Self {
        Self {
            hash_size: DEFAULT_HASH_SIZE,
            capture_seconds: DEFAULT_CAPTURE_SECONDS.to_vec(),
        }
    }
}

/// Builds a [`VideoSignature`] from each video file it is given.
///
/// To create a signature with the default options, use
/// `SignatureBuilder::default().build(path)`. Otherwise create the builder
/// with [`SignatureBuilder::from_options`].
#[derive(Clone, Default, Debug)]
pub struct SignatureBuilder {
    options: SignatureOptions,
}

impl SignatureBuilder {
    /// Creates a builder that will apply the given options to every video
    /// it hashes.
    #[must_use]
    pub fn from_options(options: SignatureOptions) -> Self {
        Self { options }
    }

    /// The options this builder applies.
    #[must_use]
    pub fn options(&self) -> &SignatureOptions {
        &self.options
    }

    /// Creates a signature from the video file at `src_path`.
    ///
    /// A capture that fails at one timestamp leaves an empty slot and is
    /// logged, but does not fail the video. The video as a whole only fails
    /// when it cannot be statted, or when every single capture failed.
    pub fn build(&self, src_path: PathBuf) -> SignatureResult<VideoSignature> {
        let size_bytes = match fs::metadata(&src_path) {
            Ok(metadata) => metadata.len(),
            Err(source) => {
                return Err(Error::Metadata {
                    path: src_path,
                    source,
                })
            }
        };

        let mut slots = Vec::with_capacity(self.options.capture_seconds.len());
        let mut num_captured = 0usize;
        for &second in self.options.capture_seconds() {
            match self.capture_fingerprint(&src_path, second) {
                Ok(fingerprint) => {
                    num_captured += 1;
                    slots.push(FrameSlot::new(second, Some(fingerprint)));
                }
                Err(e) => {
                    warn!(
                        "dropping capture at {second}s of {}: {e}",
                        src_path.display()
                    );
                    slots.push(FrameSlot::new(second, None));
                }
            }
        }

        if num_captured == 0 {
            return Err(Error::NoUsableFrames(src_path));
        }

        Ok(VideoSignature::new(
            VideoFile::new(src_path, size_bytes),
            self.options.num_bits(),
            slots,
        ))
    }

    fn capture_fingerprint(&self, src_path: &Path, second: u32) -> SignatureResult<FrameFingerprint> {
        let still = ffmpeg_still_utils::capture_still(src_path, second)?;
        FrameFingerprint::from_frame(&still, self.options.hash_size())
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use super::{SignatureBuilder, SignatureOptions};
    use crate::Error;

    #[test]
    fn hash_size_must_be_a_power_of_two() {
        assert!(matches!(
            SignatureOptions::new(7, vec![5]),
            Err(Error::InvalidHashSize(7))
        ));
        assert!(matches!(
            SignatureOptions::new(0, vec![5]),
            Err(Error::InvalidHashSize(0))
        ));
    }

    #[test]
    fn at_least_one_capture_second_is_required() {
        assert!(matches!(
            SignatureOptions::new(8, vec![]),
            Err(Error::NoTimestamps)
        ));
    }

    #[test]
    fn valid_options_report_their_bit_count() {
        let options = SignatureOptions::new(16, vec![1, 2]).unwrap();
        assert_eq!(options.num_bits(), 256);
        assert_eq!(options.capture_seconds(), &[1, 2]);
    }

    #[test]
    fn unreadable_video_fails_before_any_capture() {
        let builder = SignatureBuilder::default();
        let result = builder.build(PathBuf::from("/nonexistent/nothing.mp4"));
        assert!(matches!(result, Err(Error::Metadata { .. })));
    }
}
