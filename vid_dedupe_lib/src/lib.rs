#![allow(clippy::let_and_return)]
#![allow(clippy::len_without_is_empty)]
#![warn(clippy::cast_lossless)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::todo)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::unimplemented)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::panic)]
#![allow(clippy::doc_markdown)]

//! # Overview
//! `vid_dedupe_lib` is a library for finding near-duplicate video files.
//! A near-duplicate video is a file that closely resembles another but may
//! have differences such as format, resolution, quality, or framerate.
//!
//! # High Level API
//! First provide the paths of a set of video files and turn them into
//! signatures, then search the signatures for groups of duplicates.
//! ```rust,no_run
//! use std::path::PathBuf;
//! use vid_dedupe_lib::{find_duplicate_groups, MatchGroup, SignatureBuilder};
//!
//! let videos = [PathBuf::from("vids/a.mp4"), PathBuf::from("vids/b.mkv")];
//!
//! let builder = SignatureBuilder::default();
//! let signatures: Vec<_> = videos
//!     .iter()
//!     .filter_map(|vid| builder.build(vid.clone()).ok())
//!     .collect();
//!
//! // The threshold is the highest average hamming distance at which two
//! // signatures still count as duplicates. Raise it if near-duplicates are
//! // being missed, lower it if unrelated videos are being paired up.
//! let threshold = vid_dedupe_lib::DEFAULT_MATCH_THRESHOLD;
//!
//! let dup_groups: Vec<MatchGroup> = find_duplicate_groups(&signatures, threshold);
//! for group in &dup_groups {
//!     for member in group.members() {
//!         println!("{} ({} bytes)", member.path().display(), member.size_bytes());
//!     }
//! }
//! ```
//!
//! # Prerequisites
//! This crate calls Ffmpeg from the command line. You must make Ffmpeg
//! available on the command line, for example:
//!
//! * Debian-based systems: ```# apt-get install ffmpeg```
//! * Yum-based systems: ```# yum install ffmpeg```
//! * Windows:
//!     1) Download the correct installer from <https://ffmpeg.org/download.html>
//!     2) Run the installer and install ffmpeg to any directory
//!     3) Add the directory into the PATH environment variable
//!
//! # How it works
//! For each video this library captures one still frame at each of a small
//! list of configured timestamps (by default just one, at 5 seconds in).
//! Each still is reduced to a tiny grayscale thumbnail and turned into a
//! difference hash: a grid of bits recording, per pixel, whether its right
//! neighbour is brighter. The per-timestamp hashes together form the video's
//! signature.
//!
//! Two signatures are compared by averaging the hamming distance of their
//! hashes over the timestamps both videos produced a frame for. Pairs at or
//! below the threshold are duplicates, and groups of duplicates are formed
//! transitively: if A matches B and B matches C then A, B and C land in one
//! group, even when A and C themselves score above the threshold.
//!
//! Because only a handful of frames per video is decoded, scanning is fast,
//! but the same property means videos that merely share those exact moments
//! (e.g. episodes with identical opening credits, when only credit
//! timestamps are sampled) can be reported as false positives. Sampling
//! more timestamps with `--sec` style options makes signatures more
//! reliable at the cost of extra decoding.
//!
//! # Beyond searching
//! The duplicate groups can be persisted to a JSON record
//! ([`save_record`]/[`load_record`]) and fed into a deletion pass
//! ([`plan_deletions`]/[`execute_deletions`]) that keeps one member of each
//! group and removes the rest.

mod definitions;
mod deletion;
mod record_store;
mod video_hashing;

pub use deletion::{
    execute_deletions, plan_deletions, DeletionCluster, DeletionPlan, DeletionReport, DoomedFile,
};
pub use record_store::{load_record, save_record, RecordError};
pub use video_hashing::{
    frame_fingerprint::FrameFingerprint,
    matches::match_group::{GroupMember, MatchGroup, PairMatch},
    matches::pairwise_search::find_duplicate_groups,
    signature_builder::{SignatureBuilder, SignatureOptions},
    signature_pool::{BuildEvent, BuildOutcome, SignaturePool, SkippedVideo},
    video_signature::{FrameSlot, PairScore, VideoFile, VideoSignature},
    Error,
};

pub use definitions::{
    DEFAULT_CAPTURE_SECONDS, DEFAULT_HASH_SIZE, DEFAULT_MATCH_THRESHOLD,
    DEFAULT_MIN_MATCH_PERCENT, DEFAULT_WORKER_COUNT,
};

type SignatureResult<T> = Result<T, crate::Error>;
