use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::video_hashing::matches::disjoint_set::DisjointSet;
use crate::video_hashing::matches::match_group::{MatchGroup, PairMatch};

/// A video that a [`DeletionPlan`] has marked for removal.
#[derive(Debug, Clone)]
pub struct DoomedFile {
    path: PathBuf,
    size_bytes: u64,
    match_percentage: f64,
}

impl DoomedFile {
    /// The path of the file to be removed.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The on-disk size of the file when the plan was made.
    #[must_use]
    pub const fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// The strongest qualifying match between this file and any other
    /// member of its cluster.
    #[must_use]
    pub const fn match_percentage(&self) -> f64 {
        self.match_percentage
    }
}

/// One cluster of a [`DeletionPlan`]: the file that will be kept, and its
/// near-duplicates that will be removed.
#[derive(Debug, Clone)]
pub struct DeletionCluster {
    survivor: PathBuf,
    survivor_size_bytes: u64,
    doomed: Vec<DoomedFile>,
}

impl DeletionCluster {
    /// The path of the file that will be kept.
    #[must_use]
    pub fn survivor(&self) -> &Path {
        &self.survivor
    }

    /// The on-disk size of the survivor when the plan was made.
    #[must_use]
    pub const fn survivor_size_bytes(&self) -> u64 {
        self.survivor_size_bytes
    }

    /// The files that will be removed.
    #[must_use]
    pub fn doomed(&self) -> &[DoomedFile] {
        &self.doomed
    }
}

/// Everything [`plan_deletions`] decided: which files to remove, which
/// groups fell below the deletion gate, and which files could not be
/// inspected.
#[derive(Debug, Default)]
pub struct DeletionPlan {
    clusters: Vec<DeletionCluster>,
    below_min_match: Vec<MatchGroup>,
    unreadable: Vec<(PathBuf, io::Error)>,
}

impl DeletionPlan {
    /// The per-cluster survivor and doomed listing.
    #[must_use]
    pub fn clusters(&self) -> &[DeletionCluster] {
        &self.clusters
    }

    /// Groups in which no pair reached the deletion gate. Nothing in them
    /// will be removed.
    #[must_use]
    pub fn below_min_match(&self) -> &[MatchGroup] {
        &self.below_min_match
    }

    /// Files that could not be statted while planning. An unreadable file
    /// is neither kept nor removed, and a cluster left with fewer than two
    /// readable members is dropped from the plan.
    #[must_use]
    pub fn unreadable(&self) -> &[(PathBuf, io::Error)] {
        &self.unreadable
    }

    /// The number of files this plan would remove.
    #[must_use]
    pub fn num_doomed(&self) -> usize {
        self.clusters.iter().map(|cluster| cluster.doomed.len()).sum()
    }

    /// The number of bytes that executing this plan would free.
    #[must_use]
    pub fn reclaimable_bytes(&self) -> u64 {
        self.clusters
            .iter()
            .flat_map(|cluster| cluster.doomed.iter())
            .map(DoomedFile::size_bytes)
            .sum()
    }

    /// True when the plan would remove nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}

/// The outcome of [`execute_deletions`].
#[derive(Debug, Default)]
pub struct DeletionReport {
    deleted: Vec<(PathBuf, u64)>,
    failures: Vec<(PathBuf, io::Error)>,
}

impl DeletionReport {
    /// Every file that was removed, with the size it had in the plan.
    #[must_use]
    pub fn deleted(&self) -> &[(PathBuf, u64)] {
        &self.deleted
    }

    /// Files the plan doomed but that could not be removed.
    #[must_use]
    pub fn failures(&self) -> &[(PathBuf, io::Error)] {
        &self.failures
    }

    /// The number of bytes freed by the removals that succeeded.
    #[must_use]
    pub fn freed_bytes(&self) -> u64 {
        self.deleted.iter().map(|(_, size_bytes)| size_bytes).sum()
    }
}

/// Decides which files to remove from the given duplicate groups, without
/// touching any of them.
///
/// Only pairs matching at `min_match_percent` or better count towards
/// deletion. That gate may be stricter than the tolerance the groups were
/// found with, so each group is re-clustered over its qualifying pairs and
/// can split apart. Within each cluster the largest file survives, with
/// ties broken towards the lexicographically first path, and every other
/// member is doomed.
///
/// File sizes are taken fresh from disk so the plan reflects the files as
/// they are now, not as they were when the groups were recorded.
#[must_use]
pub fn plan_deletions(groups: &[MatchGroup], min_match_percent: f64) -> DeletionPlan {
    let mut plan = DeletionPlan::default();

    for group in groups {
        let qualifying: Vec<&PairMatch> = group
            .pairs()
            .iter()
            .filter(|pair| pair.match_percentage() >= min_match_percent)
            .collect();

        if qualifying.is_empty() {
            plan.below_min_match.push(group.clone());
            continue;
        }

        let mut clusters = DisjointSet::<&Path>::default();
        for pair in &qualifying {
            clusters.insert(pair.left(), pair.right());
        }

        for cluster in clusters.all_sets() {
            let mut readable: Vec<(&Path, u64)> = Vec::new();
            for &path in cluster {
                match fs::metadata(path) {
                    Ok(metadata) => readable.push((path, metadata.len())),
                    Err(e) => plan.unreadable.push((path.to_path_buf(), e)),
                }
            }

            //with fewer than two readable members there is nothing worth
            //keeping a deletion for
            if readable.len() < 2 {
                continue;
            }

            //keep the largest file, break ties towards the first path
            readable.sort_by(|(path_a, size_a), (path_b, size_b)| {
                size_b.cmp(size_a).then_with(|| path_a.cmp(path_b))
            });

            let Some(((survivor, survivor_size), doomed)) = readable.split_first() else {
                continue;
            };

            let doomed = doomed
                .iter()
                .map(|&(path, size_bytes)| DoomedFile {
                    path: path.to_path_buf(),
                    size_bytes,
                    match_percentage: strongest_match(&qualifying, path),
                })
                .collect();

            plan.clusters.push(DeletionCluster {
                survivor: survivor.to_path_buf(),
                survivor_size_bytes: *survivor_size,
                doomed,
            });
        }
    }

    plan
}

/// Removes every doomed file in the plan. Survivors are never touched.
///
/// Removal carries on past individual failures, so one stubborn file does
/// not leave the rest of the plan undone.
#[must_use]
pub fn execute_deletions(plan: &DeletionPlan) -> DeletionReport {
    let mut report = DeletionReport::default();

    for cluster in plan.clusters() {
        for doomed in cluster.doomed() {
            match fs::remove_file(doomed.path()) {
                Ok(()) => report
                    .deleted
                    .push((doomed.path().to_path_buf(), doomed.size_bytes())),
                Err(e) => report.failures.push((doomed.path().to_path_buf(), e)),
            }
        }
    }

    report
}

fn strongest_match(qualifying: &[&PairMatch], path: &Path) -> f64 {
    qualifying
        .iter()
        .filter(|pair| pair.touches(path))
        .map(|pair| pair.match_percentage())
        .fold(f64::NEG_INFINITY, f64::max)
}

#[cfg(test)]
mod test {
    use std::fs;
    use std::path::Path;

    use super::{execute_deletions, plan_deletions};
    use crate::{find_duplicate_groups, FrameFingerprint, MatchGroup, VideoSignature};

    fn write_and_sign(
        tmp_dir: &Path,
        videos: &[(&str, usize, FrameFingerprint)],
    ) -> Vec<VideoSignature> {
        let mut signatures = Vec::new();
        for (name, size, fingerprint) in videos {
            let path = tmp_dir.join(name);
            fs::write(&path, vec![0u8; *size]).unwrap();
            signatures.push(VideoSignature::from_fingerprints(
                &path,
                *size as u64,
                64,
                [(5, Some(fingerprint.clone()))],
            ));
        }
        signatures
    }

    //one group of three: a-b and b-c match at 96.875%, a-c at 93.75%
    fn three_way_group(tmp_dir: &Path) -> Vec<MatchGroup> {
        let base = FrameFingerprint::empty_fingerprint(64);
        let signatures = write_and_sign(
            tmp_dir,
            &[
                ("a.mp4", 3_000, base.clone()),
                ("b.mp4", 2_000, base.with_flipped_bits(&[0, 1])),
                ("c.mp4", 1_000, base.with_flipped_bits(&[0, 1, 2, 3])),
            ],
        );

        let groups = find_duplicate_groups(&signatures, 5.0);
        assert_eq!(groups.len(), 1);
        groups
    }

    #[test]
    fn the_largest_file_survives() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let groups = three_way_group(tmp_dir.path());

        let plan = plan_deletions(&groups, 90.0);

        assert_eq!(plan.clusters().len(), 1);
        let cluster = &plan.clusters()[0];
        assert_eq!(cluster.survivor(), tmp_dir.path().join("a.mp4"));
        assert_eq!(cluster.survivor_size_bytes(), 3_000);

        let doomed: Vec<&Path> = cluster.doomed().iter().map(|d| d.path()).collect();
        assert_eq!(
            doomed,
            [tmp_dir.path().join("b.mp4"), tmp_dir.path().join("c.mp4")]
        );
        assert_eq!(plan.num_doomed(), 2);
        assert_eq!(plan.reclaimable_bytes(), 3_000);
    }

    #[test]
    fn size_ties_break_towards_the_first_path() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let base = FrameFingerprint::empty_fingerprint(64);
        let signatures = write_and_sign(
            tmp_dir.path(),
            &[("b.mp4", 1_000, base.clone()), ("a.mp4", 1_000, base)],
        );
        let groups = find_duplicate_groups(&signatures, 5.0);

        let plan = plan_deletions(&groups, 90.0);

        assert_eq!(plan.clusters().len(), 1);
        assert_eq!(plan.clusters()[0].survivor(), tmp_dir.path().join("a.mp4"));
    }

    #[test]
    fn groups_below_the_gate_are_kept_but_reported() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let groups = three_way_group(tmp_dir.path());

        let plan = plan_deletions(&groups, 97.0);

        assert!(plan.is_empty());
        assert_eq!(plan.num_doomed(), 0);
        assert_eq!(plan.below_min_match().len(), 1);
        assert!(tmp_dir.path().join("a.mp4").exists());
        assert!(tmp_dir.path().join("b.mp4").exists());
        assert!(tmp_dir.path().join("c.mp4").exists());
    }

    #[test]
    fn a_stricter_gate_splits_a_group_into_clusters() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let base = FrameFingerprint::empty_fingerprint(64);
        //a-b and c-d match at 96.875%, but the b-c bridge only at 93.75%
        let signatures = write_and_sign(
            tmp_dir.path(),
            &[
                ("a.mp4", 4_000, base.clone()),
                ("b.mp4", 3_000, base.with_flipped_bits(&[0, 1])),
                ("c.mp4", 2_000, base.with_flipped_bits(&[0, 1, 2, 3, 4, 5])),
                ("d.mp4", 1_000, base.with_flipped_bits(&[0, 1, 2, 3, 4, 5, 6, 7])),
            ],
        );
        let groups = find_duplicate_groups(&signatures, 5.0);
        assert_eq!(groups.len(), 1);

        let plan = plan_deletions(&groups, 95.0);

        assert_eq!(plan.clusters().len(), 2);
        assert_eq!(plan.clusters()[0].survivor(), tmp_dir.path().join("a.mp4"));
        assert_eq!(plan.clusters()[1].survivor(), tmp_dir.path().join("c.mp4"));
        assert_eq!(plan.num_doomed(), 2);
    }

    #[test]
    fn doomed_files_report_their_strongest_match() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let groups = three_way_group(tmp_dir.path());

        let plan = plan_deletions(&groups, 90.0);

        //c matched a at 93.75% but b at 96.875%, and the stronger one is
        //what the listing shows
        for doomed in plan.clusters()[0].doomed() {
            assert_eq!(doomed.match_percentage(), 96.875);
        }
    }

    #[test]
    fn a_missing_file_disqualifies_its_pair_from_deletion() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let base = FrameFingerprint::empty_fingerprint(64);
        let signatures = write_and_sign(
            tmp_dir.path(),
            &[("a.mp4", 2_000, base.clone()), ("b.mp4", 1_000, base)],
        );
        let groups = find_duplicate_groups(&signatures, 5.0);
        fs::remove_file(tmp_dir.path().join("b.mp4")).unwrap();

        let plan = plan_deletions(&groups, 90.0);

        assert!(plan.is_empty());
        assert_eq!(plan.unreadable().len(), 1);
        assert!(tmp_dir.path().join("a.mp4").exists());
    }

    #[test]
    fn a_missing_file_does_not_block_the_rest_of_its_cluster() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let groups = three_way_group(tmp_dir.path());
        fs::remove_file(tmp_dir.path().join("a.mp4")).unwrap();

        let plan = plan_deletions(&groups, 90.0);

        assert_eq!(plan.unreadable().len(), 1);
        assert_eq!(plan.clusters().len(), 1);
        assert_eq!(plan.clusters()[0].survivor(), tmp_dir.path().join("b.mp4"));
        assert_eq!(plan.num_doomed(), 1);
    }

    #[test]
    fn execution_removes_the_doomed_and_spares_the_survivor() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let groups = three_way_group(tmp_dir.path());
        let plan = plan_deletions(&groups, 90.0);

        let report = execute_deletions(&plan);

        assert!(tmp_dir.path().join("a.mp4").exists());
        assert!(!tmp_dir.path().join("b.mp4").exists());
        assert!(!tmp_dir.path().join("c.mp4").exists());
        assert_eq!(report.deleted().len(), 2);
        assert_eq!(report.freed_bytes(), 3_000);
        assert!(report.failures().is_empty());
    }

    #[test]
    fn a_failed_removal_does_not_stop_the_rest() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let groups = three_way_group(tmp_dir.path());
        let plan = plan_deletions(&groups, 90.0);

        //one doomed file disappears between planning and execution
        fs::remove_file(tmp_dir.path().join("b.mp4")).unwrap();
        let report = execute_deletions(&plan);

        assert_eq!(report.deleted().len(), 1);
        assert_eq!(report.freed_bytes(), 1_000);
        assert_eq!(report.failures().len(), 1);
        assert!(!tmp_dir.path().join("c.mp4").exists());
    }
}
