use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

use crate::app::VIDEO_EXTENSIONS;

/// Finds the video files under `directory`, identified by file extension.
/// Unreadable entries are logged and skipped. Results are sorted by path.
pub fn find_video_files(directory: &Path, recursive: bool) -> Vec<PathBuf> {
    let mut walk = WalkDir::new(directory);
    if !recursive {
        walk = walk.max_depth(1);
    }

    let mut video_paths = vec![];
    for entry in walk {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable entry: {e}");
                continue;
            }
        };

        if entry.file_type().is_file() && has_video_extension(entry.path()) {
            video_paths.push(entry.into_path());
        }
    }

    video_paths.sort();
    video_paths
}

fn has_video_extension(path: &Path) -> bool {
    let Some(extension) = path.extension().and_then(OsStr::to_str) else {
        return false;
    };

    VIDEO_EXTENSIONS
        .iter()
        .any(|known_ext| extension.eq_ignore_ascii_case(known_ext))
}
