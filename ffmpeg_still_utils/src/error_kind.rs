use thiserror::Error;

/// Various causes of failure when capturing still frames with ffmpeg.
#[derive(Error, Debug, Clone)]
pub enum FfmpegError {
    /// Ffmpeg command was not found. Make sure Ffmpeg is installed and can be found on the command line.
    #[error("ffmpeg not found. Make sure ffmpeg is installed and visible on the command line")]
    FfmpegNotFound,

    /// Io error occurred while executing the Ffmpeg command
    #[error("Ffmpeg IO error: {0}")]
    Io(String),

    /// Ffmpeg returned a nonzero exit code. Because ffmpeg sometimes prints long error strings
    /// to stderr, the resulting string contains the first few hundred characters of the error message.
    #[error("Internal Ffmpeg failure: {0}")]
    FfmpegInternal(String),

    /// Ffmpeg did not finish within the allowed time and was killed.
    #[error("Ffmpeg did not finish within {0} seconds")]
    Timeout(u64),

    /// Ffmpeg exited successfully but encoded no frame. This is what happens
    /// when the requested timestamp lies past the end of the video.
    #[error("Ffmpeg produced no frame at the requested timestamp")]
    NoFrame,

    /// The still written by ffmpeg could not be decoded back into an image.
    #[error("could not decode the captured still: {0}")]
    StillDecode(String),
}
