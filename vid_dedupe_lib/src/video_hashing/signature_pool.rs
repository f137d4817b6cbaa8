use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

use crossbeam_channel::Sender;

use crate::video_hashing::signature_builder::{SignatureBuilder, SignatureOptions};
use crate::video_hashing::video_signature::VideoSignature;
use crate::Error;

/// A progress message published while a pool is running.
///
/// `completed` counts every video whose outcome has been recorded so far,
/// whether it was built or skipped, and `total` is the number of videos the
/// pool was started with.
#[derive(Clone, Debug)]
pub enum BuildEvent {
    /// A signature was built.
    Built {
        src_path: PathBuf,
        completed: usize,
        total: usize,
    },

    /// A video could not be hashed and was dropped from the run.
    Skipped {
        src_path: PathBuf,
        reason: String,
        completed: usize,
        total: usize,
    },
}

/// A video that the pool could not build a signature for, and why.
#[derive(Debug)]
pub struct SkippedVideo {
    pub src_path: PathBuf,
    pub reason: Error,
}

/// Everything a pool run produced: the signatures that were built, and the
/// videos that had to be skipped.
#[derive(Default, Debug)]
pub struct BuildOutcome {
    signatures: HashMap<PathBuf, VideoSignature>,
    skipped: Vec<SkippedVideo>,
}

impl BuildOutcome {
    /// The signatures that were built, keyed by video path.
    #[must_use]
    pub fn signatures(&self) -> &HashMap<PathBuf, VideoSignature> {
        &self.signatures
    }

    /// The videos that could not be hashed.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedVideo] {
        &self.skipped
    }

    /// Consumes the outcome, returning the signatures ordered by video
    /// path.
    #[must_use]
    pub fn into_signatures(self) -> Vec<VideoSignature> {
        let mut signatures: Vec<VideoSignature> = self.signatures.into_values().collect();
        signatures.sort_by(|a, b| a.src_path().cmp(b.src_path()));
        signatures
    }
}

/// Hashes a batch of videos on a fixed number of worker threads.
///
/// Workers claim videos from a shared cursor, so a slow video holds up one
/// worker rather than the whole batch. Outcomes are recorded in completion
/// order by a single collector, which also publishes a [`BuildEvent`] per
/// video when an observer channel is supplied.
pub struct SignaturePool {
    builder: SignatureBuilder,
    workers: usize,
}

impl SignaturePool {
    /// Creates a pool that hashes with the given options on `workers`
    /// threads. A worker count of zero is treated as one.
    #[must_use]
    pub fn new(options: SignatureOptions, workers: usize) -> Self {
        Self {
            builder: SignatureBuilder::from_options(options),
            workers: workers.max(1),
        }
    }

    /// Hashes every video in `src_paths`, returning when all of them have
    /// been built or skipped.
    ///
    /// Setting `cancel` makes workers stop claiming videos and discard any
    /// capture still in flight, so a cancelled run never publishes a
    /// partial outcome for a video. An observer that has hung up is
    /// ignored.
    pub fn build_all(
        &self,
        src_paths: &[PathBuf],
        events: Option<&Sender<BuildEvent>>,
        cancel: &AtomicBool,
    ) -> BuildOutcome {
        let total = src_paths.len();
        let next_index = AtomicUsize::new(0);
        let (result_tx, result_rx) = crossbeam_channel::unbounded();

        let mut outcome = BuildOutcome::default();

        thread::scope(|scope| {
            for _ in 0..self.workers {
                let result_tx = result_tx.clone();
                let next_index = &next_index;
                let builder = &self.builder;
                scope.spawn(move || loop {
                    if cancel.load(Ordering::SeqCst) {
                        break;
                    }
                    let index = next_index.fetch_add(1, Ordering::SeqCst);
                    let Some(src_path) = src_paths.get(index) else {
                        break;
                    };

                    let result = builder.build(src_path.clone());

                    //a cancellation while hashing discards the result
                    if cancel.load(Ordering::SeqCst) {
                        break;
                    }
                    if result_tx.send((src_path.clone(), result)).is_err() {
                        break;
                    }
                });
            }
            drop(result_tx);

            let mut completed = 0usize;
            for (src_path, result) in result_rx {
                completed += 1;
                match result {
                    Ok(signature) => {
                        Self::notify(
                            events,
                            BuildEvent::Built {
                                src_path: src_path.clone(),
                                completed,
                                total,
                            },
                        );
                        outcome.signatures.insert(src_path, signature);
                    }
                    Err(reason) => {
                        Self::notify(
                            events,
                            BuildEvent::Skipped {
                                src_path: src_path.clone(),
                                reason: reason.to_string(),
                                completed,
                                total,
                            },
                        );
                        outcome.skipped.push(SkippedVideo { src_path, reason });
                    }
                }
            }
        });

        outcome
    }

    fn notify(events: Option<&Sender<BuildEvent>>, event: BuildEvent) {
        if let Some(events) = events {
            let _hung_up = events.send(event);
        }
    }
}
