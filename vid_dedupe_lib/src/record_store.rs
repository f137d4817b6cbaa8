use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::MatchGroup;

/// The ways that reading or writing a duplicate record can fail.
#[derive(Error, Debug)]
pub enum RecordError {
    /// The record file or its temporary sibling could not be written.
    #[error("Error writing duplicate record {path}: {src}")]
    Write { src: std::io::Error, path: PathBuf },

    /// The groups could not be encoded as JSON.
    #[error("Failed to serialize duplicate record {path}: {src}")]
    Encode {
        src: serde_json::Error,
        path: PathBuf,
    },

    /// The freshly written record could not be moved over the old one.
    #[error("Failed to replace duplicate record {path} with {tmp_path}: {src}")]
    Replace {
        src: std::io::Error,
        path: PathBuf,
        tmp_path: PathBuf,
    },

    /// The record file could not be opened or read.
    #[error("Error reading duplicate record {path}: {src}")]
    Read { src: std::io::Error, path: PathBuf },

    /// The record file does not contain a valid list of groups.
    #[error("Failed to deserialize duplicate record {path}: {src}")]
    Format {
        src: serde_json::Error,
        path: PathBuf,
    },
}

/// Saves the given groups as a pretty-printed JSON record at `path`,
/// replacing any record already there.
///
/// If the application dies or gets killed while saving, we risk losing an
/// existing record. So the new record is first written to a temporary file
/// and then renamed into place.
pub fn save_record(path: &Path, groups: &[MatchGroup]) -> Result<(), RecordError> {
    let tmp_path = path.with_extension("tmp");

    let tmp_file = match File::create(&tmp_path) {
        Ok(f) => f,
        Err(src) => {
            return Err(RecordError::Write {
                src,
                path: path.to_path_buf(),
            })
        }
    };

    let mut writer = BufWriter::new(tmp_file);
    if let Err(src) = serde_json::to_writer_pretty(&mut writer, groups) {
        return Err(RecordError::Encode {
            src,
            path: path.to_path_buf(),
        });
    }

    let tmp_file = match writer.into_inner() {
        Ok(f) => f,
        Err(src) => {
            return Err(RecordError::Write {
                src: src.into_error(),
                path: path.to_path_buf(),
            })
        }
    };
    if let Err(src) = tmp_file.sync_all() {
        return Err(RecordError::Write {
            src,
            path: path.to_path_buf(),
        });
    }

    //now move the fresh record over the old one
    if let Err(src) = fs::rename(&tmp_path, path) {
        return Err(RecordError::Replace {
            src,
            path: path.to_path_buf(),
            tmp_path,
        });
    }

    Ok(())
}

/// Loads a previously saved duplicate record from `path`.
pub fn load_record(path: &Path) -> Result<Vec<MatchGroup>, RecordError> {
    let record_file = match File::open(path) {
        Ok(f) => f,
        Err(src) => {
            return Err(RecordError::Read {
                src,
                path: path.to_path_buf(),
            })
        }
    };

    let reader = BufReader::new(record_file);
    match serde_json::from_reader(reader) {
        Ok(groups) => Ok(groups),
        Err(src) => Err(RecordError::Format {
            src,
            path: path.to_path_buf(),
        }),
    }
}
