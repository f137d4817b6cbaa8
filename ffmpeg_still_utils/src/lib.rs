#![warn(clippy::cast_lossless)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::todo)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::unimplemented)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::panic)]

//! Capture single still frames from video files by calling Ffmpeg on the
//! command line.
//!
//! The only operations are [`capture_still`], which seeks to a chosen
//! timestamp of a video and returns that frame as a grayscale image, and
//! [`ffmpeg_is_callable`], which checks up front that the `ffmpeg` binary can
//! be invoked at all.
//!
//! # Prerequisites
//! Ffmpeg must be available on the command line, for example:
//!
//! * Debian-based systems: ```# apt-get install ffmpeg```
//! * Yum-based systems: ```# yum install ffmpeg```
//! * Windows:
//!     1) Download the correct installer from <https://ffmpeg.org/download.html>
//!     2) Run the installer and install ffmpeg to any directory
//!     3) Add the directory into the PATH environment variable

mod error_kind;
mod still_ops;

pub use error_kind::FfmpegError;
pub use still_ops::{capture_still, ffmpeg_is_callable};
