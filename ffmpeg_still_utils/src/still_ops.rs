use std::{
    ffi::OsStr,
    io::prelude::*,
    path::Path,
    process::{Child, Command, Stdio},
    time::Duration,
};

#[cfg(target_family = "windows")]
use std::os::windows::process::CommandExt;

use image::GrayImage;
use wait_timeout::ChildExt;

use crate::FfmpegError::{self, *};

const CAPTURE_TIMEOUT_SECS: u64 = 60;

/// Returns true if the ffmpeg binary can be invoked from the command line.
///
/// Call this once at startup: every capture spawns ffmpeg, so if this check
/// fails nothing else in this crate will work.
#[must_use]
pub fn ffmpeg_is_callable() -> bool {
    run_ffmpeg(&[OsStr::new("-version")]).is_ok()
}

/// Captures the frame at `at_secs` seconds into the video at `src_path`,
/// returned as a grayscale image.
///
/// Ffmpeg writes the frame into a uniquely named temporary file which is
/// removed again before this function returns, whether the capture succeeded
/// or not. Concurrent captures never collide because every call gets its own
/// temp file.
pub fn capture_still(src_path: &Path, at_secs: u32) -> Result<GrayImage, FfmpegError> {
    let still_file = tempfile::Builder::new()
        .prefix("vid_dedupe_still_")
        .suffix(".jpg")
        .tempfile()
        .map_err(|e| Io(format!("{:?}", e.kind())))?;

    let at_secs_string = at_secs.to_string();

    #[rustfmt::skip]
    let args = [
        OsStr::new("-hide_banner"),
        OsStr::new("-loglevel"), OsStr::new("error"),
        OsStr::new("-nostats"),
        OsStr::new("-ss"),       OsStr::new(&at_secs_string),
        OsStr::new("-i"),        src_path.as_os_str(),
        OsStr::new("-vframes"),  OsStr::new("1"),
        OsStr::new("-q:v"),      OsStr::new("2"),
        still_file.path().as_os_str(),
        OsStr::new("-y"),
    ];

    run_ffmpeg(&args)?;

    // When the seek point lies past the end of the video ffmpeg exits zero
    // without encoding anything. The missing/empty temp file is the only
    // evidence.
    let wrote_frame = still_file
        .path()
        .metadata()
        .map(|meta| meta.len() > 0)
        .unwrap_or(false);
    if !wrote_frame {
        return Err(NoFrame);
    }

    let still = image::open(still_file.path())
        .map_err(|e| StillDecode(e.to_string()))?
        .to_luma8();

    Ok(still)
}

fn spawn_ffmpeg(args: &[&OsStr]) -> Result<Child, FfmpegError> {
    let mut command = Command::new("ffmpeg");
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    //do not spawn a command window on windows when in a gui application
    #[cfg(target_family = "windows")]
    command.creation_flags(winapi::um::winbase::CREATE_NO_WINDOW);

    command.spawn().map_err(|e| match e.kind() {
        //shell failed to execute the command. Separate out FileNotFound from all other errors
        //as by far the most likely cause is ffmpeg is not installed.
        std::io::ErrorKind::NotFound => FfmpegNotFound,
        _ => Io(format!("{:?}", e.kind())),
    })
}

fn run_ffmpeg(args: &[&OsStr]) -> Result<(), FfmpegError> {
    fn truncate_ffmpeg_err_msg(stderr: &[u8]) -> FfmpegError {
        //sometimes ffmpeg creates very long error messages. Limit them to the first 500 characters
        let error_text = String::from_utf8_lossy(stderr);
        FfmpegInternal(error_text.chars().take(500).collect())
    }

    let mut child = spawn_ffmpeg(args)?;

    //Drain stderr on a separate thread. A chatty child could otherwise fill
    //the pipe and stall without ever reaching its exit code.
    let stderr = child.stderr.take();
    let stderr_thread = std::thread::spawn(move || {
        let mut acc = Vec::new();
        if let Some(mut stderr) = stderr {
            let _read_error = stderr.read_to_end(&mut acc);
        }
        acc
    });

    let maybe_status = child
        .wait_timeout(Duration::from_secs(CAPTURE_TIMEOUT_SECS))
        .map_err(|e| Io(format!("{:?}", e.kind())))?;

    let Some(status) = maybe_status else {
        //to prevent accumulation of zombie processes, reap the return code
        //of the timed-out child before bailing out
        let _kill_error = child.kill();
        let _wait_error = child.wait();
        let _stderr = stderr_thread.join();
        return Err(Timeout(CAPTURE_TIMEOUT_SECS));
    };

    let stderr_acc = stderr_thread.join().unwrap_or_default();

    if status.success() {
        Ok(())
    } else {
        Err(truncate_ffmpeg_err_msg(&stderr_acc))
    }
}
