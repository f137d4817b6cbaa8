use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One video belonging to a [`MatchGroup`].
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct GroupMember {
    path: PathBuf,
    size_bytes: u64,
}

impl GroupMember {
    pub(crate) fn new(path: PathBuf, size_bytes: u64) -> Self {
        Self { path, size_bytes }
    }

    /// The path to this video.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The size of this video in bytes when it was hashed.
    #[must_use]
    pub const fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}

/// One scored edge of a [`MatchGroup`]: a pair of videos whose signatures
/// matched. `left` always orders before `right`.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct PairMatch {
    left: PathBuf,
    right: PathBuf,
    match_percentage: f64,
}

impl PairMatch {
    pub(crate) fn new(left: PathBuf, right: PathBuf, match_percentage: f64) -> Self {
        Self {
            left,
            right,
            match_percentage,
        }
    }

    /// The lexicographically smaller of the two paths.
    #[must_use]
    pub fn left(&self) -> &Path {
        &self.left
    }

    /// The lexicographically larger of the two paths.
    #[must_use]
    pub fn right(&self) -> &Path {
        &self.right
    }

    /// How closely the two videos matched, as a percentage.
    #[must_use]
    pub const fn match_percentage(&self) -> f64 {
        self.match_percentage
    }

    /// Whether `path` is one of the two videos of this pair.
    #[must_use]
    pub fn touches(&self, path: &Path) -> bool {
        self.left.as_path() == path || self.right.as_path() == path
    }
}

/// A group of mutual near-duplicates found by
/// [`crate::find_duplicate_groups`].
///
/// Membership is transitive: every member matched at least one other member,
/// but not necessarily all of them. The individual scored pairs are kept
/// alongside the members so that a later deletion pass can re-filter the
/// group with a stricter gate than the search ran with.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct MatchGroup {
    match_percentage: f64,
    members: Vec<GroupMember>,
    pairs: Vec<PairMatch>,
}

impl MatchGroup {
    pub(crate) fn new(members: Vec<GroupMember>, pairs: Vec<PairMatch>) -> Self {
        let match_percentage = pairs
            .iter()
            .map(PairMatch::match_percentage)
            .fold(f64::INFINITY, f64::min);

        Self {
            match_percentage,
            members,
            pairs,
        }
    }

    /// The number of videos in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// The videos in this group, ordered by path.
    #[must_use]
    pub fn members(&self) -> &[GroupMember] {
        &self.members
    }

    /// The scored pairs whose matches formed this group.
    #[must_use]
    pub fn pairs(&self) -> &[PairMatch] {
        &self.pairs
    }

    /// The weakest pair match in this group, as a percentage.
    #[must_use]
    pub const fn match_percentage(&self) -> f64 {
        self.match_percentage
    }

    /// An iterator over the paths of the videos in this group.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.members.iter().map(GroupMember::path)
    }

    /// The summed on-disk size of every video in this group.
    #[must_use]
    pub fn total_size_bytes(&self) -> u64 {
        self.members.iter().map(GroupMember::size_bytes).sum()
    }

    /// Whether the video at `path` is a member of this group.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.members.iter().any(|member| member.path() == path)
    }
}
