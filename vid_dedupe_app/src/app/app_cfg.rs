use std::path::PathBuf;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReportVerbosity {
    Quiet,
    Default,
    Verbose,
}

/// Name of the duplicate record written into the working directory after
/// every scan, and read back by --delete-from-json.
pub const RECORD_FILE_NAME: &str = "duplicate_videos.json";

/// File extensions that mark a file as a video during the search phase.
pub const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "mkv", "avi", "mov", "flv"];

#[derive(Debug, Clone)]
pub struct ScanCfg {
    pub directory: Option<PathBuf>,
    pub recursive: bool,
    pub threads: usize,
}

#[derive(Debug, Clone)]
pub struct HashCfg {
    pub hash_size: u32,
    pub capture_seconds: Vec<u32>,
    pub tolerance: f64,
}

#[derive(Debug, Clone)]
pub struct DeleteCfg {
    pub delete_after_scan: bool,
    pub delete_from_record: bool,
    pub min_match_percent: f64,
}

/// Everything the app needs to know to perform one run, derived from
/// the command line arguments.
#[derive(Debug, Clone)]
pub struct AppCfg {
    pub scan: ScanCfg,
    pub hash: HashCfg,
    pub delete: DeleteCfg,
    pub verbosity: ReportVerbosity,
}
