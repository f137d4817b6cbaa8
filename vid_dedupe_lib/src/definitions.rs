/// The default edge size of the square difference hash computed from each
/// captured still. A hash of size N carries N*N bits. Must be a positive
/// power of two.
///
/// Higher values make fingerprints more discriminating but also more
/// sensitive to small differences in encoding; the default of 8 (64 bits
/// per still) is the classic dhash size and works well for videos.
pub const DEFAULT_HASH_SIZE: u32 = 8;

/// The default threshold when searching: the highest average hamming
/// distance at which a pair of signatures still counts as duplicates.
/// A value of 0.0 pairs videos only when their fingerprints are identical.
///
/// Reccomend to start with the default and lower it if there are too many
/// false positives in the results.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 5.0;

/// The default minimum match percentage a pair must reach before the
/// deletion planner will consider it. This gate is independent of the
/// search threshold: it only decides which already-found duplicates are
/// safe enough to delete.
///
/// Range 0-100, where 100 accepts only identical fingerprints.
pub const DEFAULT_MIN_MATCH_PERCENT: f64 = 90.0;

/// The default number of worker threads building signatures concurrently.
/// Each worker runs one ffmpeg child at a time.
pub const DEFAULT_WORKER_COUNT: usize = 4;

/// The default timestamps (in seconds from the start of the video) at which
/// stills are captured. More timestamps make signatures more reliable at
/// the cost of one ffmpeg invocation per extra timestamp per video.
///
/// A single early timestamp is enough to catch straight re-encodes and
/// renamed copies.
pub const DEFAULT_CAPTURE_SECONDS: &[u32] = &[5];
