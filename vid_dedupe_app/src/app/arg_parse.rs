use std::path::{Path, PathBuf};

use clap::{value_parser, ArgAction::*};

use crate::app::*;

// file specification
const SCAN_DIR: &str = "Directory to scan";
const RECURSIVE: &str = "Search subdirectories";

//hashing configuration
const HASH_SIZE: &str = "Hash size";
const CAPTURE_SECONDS: &str = "Capture seconds";
const THREADS: &str = "Hashing threads";

//search configuration
const TOLERANCE: &str = "Comparison threshold";

//deletion
const DELETE_AFTER_SCAN: &str = "Delete duplicates after scanning";
const DELETE_FROM_RECORD: &str = "Delete duplicates from a saved record";
const MIN_MATCH: &str = "Minimum match percentage";

//Verbosity
const VERBOSITY_QUIET: &str = "Quiet";
const VERBOSITY_VERBOSE: &str = "Verbose";

const DISPLAY_ORDERING: [&str; 11] = [
    //
    // file specification
    SCAN_DIR,
    RECURSIVE,
    //
    //search modifiers
    TOLERANCE,
    //
    //hashing
    HASH_SIZE,
    CAPTURE_SECONDS,
    THREADS,
    //
    //deletion
    DELETE_AFTER_SCAN,
    DELETE_FROM_RECORD,
    MIN_MATCH,
    //
    //verbosity
    VERBOSITY_QUIET,
    VERBOSITY_VERBOSE,
];

fn build_app() -> clap::Command {
    let get_ordering = |arg_name: &str| -> usize {
        match DISPLAY_ORDERING.iter().position(|x| *x == arg_name) {
            Some(idx) => idx,
            None => {
                panic!("argument not assigned a display order: {arg_name:?}");
            }
        }
    };

    //clap wants default values as &str, so the defaults from vid_dedupe_lib are restated
    //here as string literals. They must stay in sync with the definitions module.
    let default_hash_size_string = "8";
    let default_threshold_string = "5";
    let default_seconds_string = "5";
    let default_threads_string = "4";
    let default_min_match_string = "90.0";

    //args are not added through method chaining because rustfmt struggles with very long expressions.
    let mut clap_app = clap::Command::new("Video dedupe")
        .version(clap::crate_version!())
        .about("Find near-duplicate video files, and optionally delete the copies");

    clap_app = clap_app.arg(
        clap::Arg::new(SCAN_DIR)
            .short('d')
            .long("directory")
            .required_unless_present(DELETE_FROM_RECORD)
            .num_args(1)
            .value_parser(value_parser!(PathBuf))
            .help("Directory containing the video files that will be checked for duplicates of each other")
            .display_order(get_ordering(SCAN_DIR)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(RECURSIVE)
            .long("sub")
            .help("Also search subdirectories of the scanned directory")
            .num_args(0)
            .action(SetTrue)
            .display_order(get_ordering(RECURSIVE)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(TOLERANCE)
            .short('t')
            .long("threshold")
            .help("Largest average hamming distance at which two videos still count as duplicates. Low values mean videos must be very similar before they will match, high values will permit more differences")
            .default_value(default_threshold_string)
            .num_args(1)
            .value_parser(value_parser!(f64))
            .display_order(get_ordering(TOLERANCE)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(HASH_SIZE)
            .short('s')
            .long("hash-size")
            .help("Width in bits of each fingerprint row. Must be a power of two. Larger values make fingerprints more detailed and matching stricter")
            .default_value(default_hash_size_string)
            .num_args(1)
            .value_parser(value_parser!(u32))
            .display_order(get_ordering(HASH_SIZE)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(CAPTURE_SECONDS)
            .long("sec")
            .help("Timestamps (in seconds) at which a frame is captured from each video. Timestamps must be comma separated with no spaces, e.g '--sec 5,30,60'")
            .value_delimiter(',')
            .num_args(1..)
            .value_parser(value_parser!(u32))
            .action(Append)
            .default_value(default_seconds_string)
            .display_order(get_ordering(CAPTURE_SECONDS)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(THREADS)
            .long("threads")
            .help("Number of videos to fingerprint in parallel")
            .default_value(default_threads_string)
            .num_args(1)
            .value_parser(value_parser!(usize))
            .display_order(get_ordering(THREADS)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(DELETE_AFTER_SCAN)
            .long("delete")
            .help("After the scan, interactively delete every duplicate except the largest file of each group")
            .conflicts_with(DELETE_FROM_RECORD)
            .num_args(0)
            .action(SetTrue)
            .display_order(get_ordering(DELETE_AFTER_SCAN)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(DELETE_FROM_RECORD)
            .long("delete-from-json")
            .help("Do not scan. Load the duplicate groups written by a previous run and go straight to deletion")
            .num_args(0)
            .action(SetTrue)
            .display_order(get_ordering(DELETE_FROM_RECORD)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(MIN_MATCH)
            .long("min-match")
            .help("Only delete files whose match percentage is at least this value. Groups whose best pair falls below it are kept on disk")
            .default_value(default_min_match_string)
            .num_args(1)
            .value_parser(value_parser!(f64))
            .display_order(get_ordering(MIN_MATCH)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(VERBOSITY_QUIET)
            .long("quiet")
            .help("Reduced verbosity")
            .conflicts_with(VERBOSITY_VERBOSE)
            .action(SetTrue)
            .display_order(get_ordering(VERBOSITY_QUIET)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(VERBOSITY_VERBOSE)
            .long("verbose")
            .help("Increased verbosity")
            .conflicts_with(VERBOSITY_QUIET)
            .action(SetTrue)
            .display_order(get_ordering(VERBOSITY_VERBOSE)),
    );

    clap_app
}

pub fn parse_args() -> AppCfg {
    //capture the cwd once, to minimize the risk of working with two values if it is changed by the OS at runtime.
    let cwd = std::env::current_dir().expect("failed to extract cwd");

    let args = build_app().get_matches();

    let directory = args
        .get_one::<PathBuf>(SCAN_DIR)
        .map(|p| absolutify_path(&cwd, p));

    let capture_seconds = args
        .get_many::<u32>(CAPTURE_SECONDS)
        .expect("This argument has a default value")
        .copied()
        .collect();

    let scan = ScanCfg {
        directory,
        recursive: args.get_flag(RECURSIVE),
        threads: *args
            .get_one::<usize>(THREADS)
            .expect("This argument has a default value"),
    };

    let hash = HashCfg {
        hash_size: *args
            .get_one::<u32>(HASH_SIZE)
            .expect("This argument has a default value"),
        capture_seconds,
        tolerance: *args
            .get_one::<f64>(TOLERANCE)
            .expect("This argument has a default value"),
    };

    let delete = DeleteCfg {
        delete_after_scan: args.get_flag(DELETE_AFTER_SCAN),
        delete_from_record: args.get_flag(DELETE_FROM_RECORD),
        min_match_percent: *args
            .get_one::<f64>(MIN_MATCH)
            .expect("This argument has a default value"),
    };

    let verbosity = if args.get_flag(VERBOSITY_QUIET) {
        ReportVerbosity::Quiet
    } else if args.get_flag(VERBOSITY_VERBOSE) {
        ReportVerbosity::Verbose
    } else {
        ReportVerbosity::Default
    };

    let ret = AppCfg {
        scan,
        hash,
        delete,
        verbosity,
    };

    ret
}

fn absolutify_path(cwd: &Path, path: &Path) -> PathBuf {
    //get the absolute path if it is not absolute, by prepending the cwd.
    let path = if path.is_relative() {
        cwd.join(path)
    } else {
        path.to_path_buf()
    };

    //canonicalization requires the path to exist. If it fails the joined path is still usable.
    let p = path.canonicalize().unwrap_or(path);

    p
}
