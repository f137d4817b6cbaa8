use std::path::{Path, PathBuf};

use crate::video_hashing::frame_fingerprint::FrameFingerprint;

/// A video file as it was seen at hash time: its path and its size on disk.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct VideoFile {
    src_path: PathBuf,
    size_bytes: u64,
}

impl VideoFile {
    pub(crate) fn new(src_path: PathBuf, size_bytes: u64) -> Self {
        Self {
            src_path,
            size_bytes,
        }
    }

    /// The path to the video file.
    #[must_use]
    pub fn src_path(&self) -> &Path {
        &self.src_path
    }

    /// The size of the file in bytes when it was hashed.
    #[must_use]
    pub const fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}

/// One slot of a signature: a requested capture second, and the fingerprint
/// of the frame at that second if the capture succeeded.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct FrameSlot {
    second: u32,
    fingerprint: Option<FrameFingerprint>,
}

impl FrameSlot {
    pub(crate) fn new(second: u32, fingerprint: Option<FrameFingerprint>) -> Self {
        Self {
            second,
            fingerprint,
        }
    }

    /// The capture timestamp of this slot, in seconds from the start.
    #[must_use]
    pub const fn second(&self) -> u32 {
        self.second
    }

    /// The fingerprint captured at this second, if there is one.
    #[must_use]
    pub fn fingerprint(&self) -> Option<&FrameFingerprint> {
        self.fingerprint.as_ref()
    }
}

/// The perceptual signature of one video: one [`FrameSlot`] per configured
/// capture second, in the order the seconds were configured.
///
/// Slots whose capture failed are empty but keep their place, so that the
/// n-th slot of every signature built in one scan refers to the same
/// requested timestamp. A signature always holds at least one fingerprint;
/// videos where every capture failed are rejected by the builder and never
/// reach a search.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct VideoSignature {
    file: VideoFile,
    num_bits: u32,
    slots: Vec<FrameSlot>,
}

/// The similarity score of a pair of signatures.
#[derive(Clone, Copy, PartialEq, PartialOrd, Debug)]
pub struct PairScore {
    avg_distance: f64,
    match_percent: f64,
}

impl PairScore {
    /// The hamming distance between the two signatures, averaged over the
    /// capture seconds both of them hold a fingerprint for.
    #[must_use]
    pub const fn avg_distance(&self) -> f64 {
        self.avg_distance
    }

    /// The average distance expressed as a percentage of the fingerprint
    /// width: 100.0 means identical fingerprints, 0.0 means every bit
    /// differs.
    #[must_use]
    pub const fn match_percent(&self) -> f64 {
        self.match_percent
    }
}

impl VideoSignature {
    pub(crate) fn new(file: VideoFile, num_bits: u32, slots: Vec<FrameSlot>) -> Self {
        Self {
            file,
            num_bits,
            slots,
        }
    }

    /// The path to the video file from which this signature was created.
    #[must_use]
    pub fn src_path(&self) -> &Path {
        self.file.src_path()
    }

    /// The size of the video file in bytes when it was hashed.
    #[must_use]
    pub const fn size_bytes(&self) -> u64 {
        self.file.size_bytes()
    }

    /// The width in bits of every fingerprint in this signature.
    #[must_use]
    pub const fn num_bits(&self) -> u32 {
        self.num_bits
    }

    /// The per-second slots, in configuration order.
    #[must_use]
    pub fn slots(&self) -> &[FrameSlot] {
        &self.slots
    }

    /// The number of slots that hold a fingerprint.
    #[must_use]
    pub fn num_captured(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.fingerprint().is_some())
            .count()
    }

    /// Scores this signature against another.
    ///
    /// The score averages the hamming distance over the slot indices where
    /// both signatures hold a fingerprint. Returns `None` when there is no
    /// such index, or when the two signatures were built with different
    /// hash sizes: such a pair cannot be compared at all, which is not the
    /// same thing as a distance of zero.
    #[must_use]
    pub fn score_against(&self, other: &Self) -> Option<PairScore> {
        if self.num_bits != other.num_bits {
            return None;
        }

        let mut total_distance = 0u32;
        let mut shared_slots = 0u32;
        for (ours, theirs) in self.slots.iter().zip(other.slots.iter()) {
            if let (Some(a), Some(b)) = (ours.fingerprint(), theirs.fingerprint()) {
                total_distance += a.hamming_distance(b);
                shared_slots += 1;
            }
        }

        if shared_slots == 0 {
            return None;
        }

        let avg_distance = f64::from(total_distance) / f64::from(shared_slots);
        let match_percent = (1.0 - avg_distance / f64::from(self.num_bits)) * 100.0;
        Some(PairScore {
            avg_distance,
            match_percent,
        })
    }
}

//Utilities for testing
#[doc(hidden)]
pub mod test_util {
    use std::path::Path;

    use super::{FrameSlot, VideoFile, VideoSignature};
    use crate::video_hashing::frame_fingerprint::FrameFingerprint;

    #[doc(hidden)]
    impl VideoSignature {
        /// Builds a signature directly from per-second optional
        /// fingerprints, without touching the filesystem or ffmpeg.
        pub fn from_fingerprints(
            src_path: impl AsRef<Path>,
            size_bytes: u64,
            num_bits: u32,
            fingerprints: impl IntoIterator<Item = (u32, Option<FrameFingerprint>)>,
        ) -> Self {
            let slots = fingerprints
                .into_iter()
                .map(|(second, fingerprint)| FrameSlot::new(second, fingerprint))
                .collect();
            Self::new(
                VideoFile::new(src_path.as_ref().to_path_buf(), size_bytes),
                num_bits,
                slots,
            )
        }
    }
}
