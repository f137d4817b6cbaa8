use std::{error::Error, io::Write, path::Path, sync::atomic::AtomicBool, thread};

use bytesize::ByteSize;
use itertools::Itertools;

use vid_dedupe_lib::*;

use crate::app::*;

pub fn run_app() -> i32 {
    let cfg = arg_parse::parse_args();
    configure_logs(cfg.verbosity);

    let ret = match run_app_inner(&cfg) {
        Ok(()) => 0,
        Err(fatal_error) => {
            print_fatal_err(fatal_error, cfg.verbosity);
            1
        }
    };

    ret
}

fn run_app_inner(cfg: &AppCfg) -> eyre::Result<()> {
    if !ffmpeg_still_utils::ffmpeg_is_callable() {
        let err_string = "the ffmpeg binary was not found on the path. This program uses ffmpeg to read frames from video files. Please install it (e.g from your package manager, or https://ffmpeg.org/download.html), make sure it is on the path, and try again";
        return Err(eyre::Report::msg(err_string));
    }

    if cfg.delete.delete_from_record {
        run_delete_from_record(cfg)
    } else {
        run_scan(cfg)
    }
}

fn run_scan(cfg: &AppCfg) -> eyre::Result<()> {
    let Some(directory) = cfg.scan.directory.as_deref() else {
        return Err(eyre::Report::msg("no directory was given to scan"));
    };

    if !directory.is_dir() {
        return Err(eyre::Report::msg(format!(
            "the scan directory does not exist or is not a directory: {}",
            directory.to_string_lossy()
        )));
    }

    if cfg.scan.threads == 0 {
        return Err(eyre::Report::msg("--threads must be at least 1"));
    }

    let options = SignatureOptions::new(cfg.hash.hash_size, cfg.hash.capture_seconds.clone())?;

    let src_paths = file_search::find_video_files(directory, cfg.scan.recursive);
    if src_paths.is_empty() {
        warn!(
            "No video files were found in {}. No results will be returned.",
            directory.to_string_lossy()
        );
        save_record(Path::new(RECORD_FILE_NAME), &[])?;
        return Ok(());
    }

    info!(
        "fingerprinting {} videos on {} threads (hash size {}, capture at {}s, threshold {})",
        src_paths.len(),
        cfg.scan.threads,
        options.hash_size(),
        options.capture_seconds().iter().join(","),
        cfg.hash.tolerance
    );

    let pool = SignaturePool::new(options, cfg.scan.threads);
    let cancel = AtomicBool::new(false);

    let (event_tx, event_rx) = crossbeam_channel::unbounded();
    let progress_thread = thread::spawn(move || {
        for event in event_rx {
            match event {
                BuildEvent::Built {
                    src_path,
                    completed,
                    total,
                } => {
                    info!("hashed [{completed}/{total}] {}", src_path.display());
                }
                BuildEvent::Skipped {
                    src_path,
                    reason,
                    completed,
                    total,
                } => {
                    warn!(
                        "skipped [{completed}/{total}] {}: {reason}",
                        src_path.display()
                    );
                }
            }
        }
    });

    let outcome = pool.build_all(&src_paths, Some(&event_tx), &cancel);

    //the pool has hung up its event sender clones, so dropping ours ends the progress thread.
    drop(event_tx);
    progress_thread.join().expect("progress thread panicked");

    let num_skipped = outcome.skipped().len();
    let signatures = outcome.into_signatures();

    let groups = find_duplicate_groups(&signatures, cfg.hash.tolerance);

    print_group_report(&groups);

    let record_path = Path::new(RECORD_FILE_NAME);
    save_record(record_path, &groups)?;
    info!(
        "hashed {} of {} videos ({num_skipped} skipped), found {} duplicate groups. Record written to {}",
        signatures.len(),
        src_paths.len(),
        groups.len(),
        record_path.display()
    );

    if cfg.delete.delete_after_scan {
        run_deletion(&groups, cfg.delete.min_match_percent)?;
    }

    Ok(())
}

fn run_delete_from_record(cfg: &AppCfg) -> eyre::Result<()> {
    let record_path = Path::new(RECORD_FILE_NAME);
    let groups = load_record(record_path)?;
    info!(
        "loaded {} duplicate groups from {}",
        groups.len(),
        record_path.display()
    );

    run_deletion(&groups, cfg.delete.min_match_percent)
}

fn run_deletion(groups: &[MatchGroup], min_match_percent: f64) -> eyre::Result<()> {
    let plan = plan_deletions(groups, min_match_percent);

    for group in plan.below_min_match() {
        let best_pair = group
            .pairs()
            .iter()
            .map(PairMatch::match_percentage)
            .fold(f64::NEG_INFINITY, f64::max);

        if let Some(first_path) = group.paths().next() {
            info!(
                "keeping the group of {} files around {}: its best pair matches {best_pair:.1}%, below the {min_match_percent}% needed for deletion",
                group.len(),
                first_path.display()
            );
        }
    }

    for (path, e) in plan.unreadable() {
        warn!(
            "could not read the size of {}: {e}. It will be neither kept nor deleted",
            path.display()
        );
    }

    if plan.is_empty() {
        info!("nothing to delete");
        return Ok(());
    }

    print_deletion_listing(&plan);

    if !confirm_deletion()? {
        info!("deletion abandoned. No files were touched");
        return Ok(());
    }

    let report = execute_deletions(&plan);
    for (path, e) in report.failures() {
        warn!("failed to delete {}: {e}", path.display());
    }
    info!(
        "deleted {} files, freeing {} ({} failures)",
        report.deleted().len(),
        ByteSize(report.freed_bytes()),
        report.failures().len()
    );

    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_group_report(groups: &[MatchGroup]) {
    if groups.is_empty() {
        let () = println!("No duplicate videos were found.");
        return;
    }

    for (group_no, group) in groups.iter().enumerate() {
        println!(
            "Group {} ({:.1}% match, {} in {} files):",
            group_no + 1,
            group.match_percentage(),
            ByteSize(group.total_size_bytes()),
            group.len()
        );
        for member in group.members() {
            println!(
                "    {} ({})",
                member.path().display(),
                ByteSize(member.size_bytes())
            );
        }
        println!();
    }
}

#[allow(clippy::print_stdout)]
fn print_deletion_listing(plan: &DeletionPlan) {
    let () = println!("The following files will be deleted:");
    println!();
    for cluster in plan.clusters() {
        println!(
            "    KEEP   {} ({})",
            cluster.survivor().display(),
            ByteSize(cluster.survivor_size_bytes())
        );
        for doomed in cluster.doomed() {
            println!(
                "    DELETE {} ({}, {:.1}% match)",
                doomed.path().display(),
                ByteSize(doomed.size_bytes()),
                doomed.match_percentage()
            );
        }
        println!();
    }
    println!(
        "{} files will be deleted, freeing {}.",
        plan.num_doomed(),
        ByteSize(plan.reclaimable_bytes())
    );
}

#[allow(clippy::print_stdout)]
fn confirm_deletion() -> eyre::Result<bool> {
    print!("Are you sure you want to delete these files? (yes/no): ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;

    Ok(confirmation_is_yes(&line))
}

//the lazier spellings of yes are accepted too
fn confirmation_is_yes(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "ye" | "yes")
}

fn print_fatal_err(fatal_err: eyre::Report, verbosity: ReportVerbosity) {
    error!(target: "app-errorlog", "{}", fatal_err);

    if verbosity == ReportVerbosity::Verbose {
        let mut source: Option<&(dyn Error + 'static)> = fatal_err.source();
        while let Some(e) = source {
            error!(target: "app-errorlog", "    caused by: {}", e);
            source = e.source();
        }
    }
}

fn configure_logs(verbosity: ReportVerbosity) {
    use simplelog::*;

    let min_loglevel = match verbosity {
        ReportVerbosity::Quiet => LevelFilter::Warn,
        ReportVerbosity::Default => LevelFilter::Info,
        ReportVerbosity::Verbose => LevelFilter::Trace,
    };

    TermLogger::init(
        min_loglevel,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .expect("TermLogger failed to initialize");
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sloppy_spellings_of_yes_are_accepted() {
        assert!(confirmation_is_yes("yes\n"));
        assert!(confirmation_is_yes("  YES  \n"));
        assert!(confirmation_is_yes("y\n"));
        assert!(confirmation_is_yes("Ye\n"));
    }

    #[test]
    fn anything_else_is_a_no() {
        assert!(!confirmation_is_yes("no\n"));
        assert!(!confirmation_is_yes("\n"));
        assert!(!confirmation_is_yes(""));
        assert!(!confirmation_is_yes("yess\n"));
        assert!(!confirmation_is_yes("deletion"));
    }
}
