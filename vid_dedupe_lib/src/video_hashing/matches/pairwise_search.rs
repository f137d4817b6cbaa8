use itertools::Itertools;

use crate::video_hashing::matches::disjoint_set::DisjointSet;
use crate::video_hashing::matches::match_group::{GroupMember, MatchGroup, PairMatch};
use crate::video_hashing::video_signature::VideoSignature;

/// Search for duplicates within the given signatures, within the given
/// tolerance. Returns one group for each set of videos that match.
///
/// Every pair of signatures is scored, and two videos match when their
/// average hamming distance is no more than `max_avg_distance`. Matching is
/// transitive: if a matches b and b matches c then all three end up in one
/// group, even when a and c themselves do not match. Pairs that cannot be
/// scored at all (no capture second in common, or differing hash sizes)
/// never match.
///
/// The result is fully determined by the set of signatures: members within
/// a group are ordered by path, and groups are ordered by their first
/// member, no matter what order the signatures are supplied in.
#[must_use]
pub fn find_duplicate_groups(
    signatures: &[VideoSignature],
    max_avg_distance: f64,
) -> Vec<MatchGroup> {
    let mut ordered: Vec<&VideoSignature> = signatures.iter().collect();
    ordered.sort_by(|a, b| a.src_path().cmp(b.src_path()));

    let mut components = DisjointSet::<usize>::default();
    let mut edges: Vec<(usize, usize, f64)> = Vec::new();
    for (idx_1, idx_2) in (0..ordered.len()).tuple_combinations::<(_, _)>() {
        let Some(score) = ordered[idx_1].score_against(ordered[idx_2]) else {
            continue;
        };
        if score.avg_distance() <= max_avg_distance {
            components.insert(idx_1, idx_2);
            edges.push((idx_1, idx_2, score.match_percent()));
        }
    }

    let mut groups: Vec<MatchGroup> = components
        .all_sets()
        .map(|component| {
            let members = component
                .iter()
                .map(|&idx| {
                    let signature = ordered[idx];
                    GroupMember::new(signature.src_path().to_path_buf(), signature.size_bytes())
                })
                .collect();

            let pairs = edges
                .iter()
                .filter(|(idx_1, _, _)| component.contains(idx_1))
                .map(|&(idx_1, idx_2, match_percentage)| {
                    PairMatch::new(
                        ordered[idx_1].src_path().to_path_buf(),
                        ordered[idx_2].src_path().to_path_buf(),
                        match_percentage,
                    )
                })
                .collect();

            MatchGroup::new(members, pairs)
        })
        .collect();

    groups.sort_by(|a, b| {
        let a_first = a.members().first().map(GroupMember::path);
        let b_first = b.members().first().map(GroupMember::path);
        a_first.cmp(&b_first)
    });

    groups
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use rand::prelude::*;

    use super::find_duplicate_groups;
    use crate::{FrameFingerprint, MatchGroup, VideoSignature};

    //a one-slot signature whose fingerprint has the given bits set
    fn sig(name: &str, flipped: &[usize]) -> VideoSignature {
        let fingerprint = FrameFingerprint::empty_fingerprint(64).with_flipped_bits(flipped);
        VideoSignature::from_fingerprints(name, 1_000, 64, [(5, Some(fingerprint))])
    }

    fn group_paths(group: &MatchGroup) -> Vec<&str> {
        group.paths().filter_map(Path::to_str).collect()
    }

    #[test]
    fn matching_is_transitive() {
        //a-b and b-c are 2 bits apart, a-c is 4 bits apart
        let signatures = vec![
            sig("a.mp4", &[]),
            sig("b.mp4", &[0, 1]),
            sig("c.mp4", &[0, 1, 2, 3]),
        ];

        let groups = find_duplicate_groups(&signatures, 3.0);

        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group_paths(group), ["a.mp4", "b.mp4", "c.mp4"]);
        assert_eq!(group.match_percentage(), 96.875);

        //a-c is over the tolerance so only two pairs matched
        let pair_ends: Vec<(&str, &str)> = group
            .pairs()
            .iter()
            .filter_map(|pair| Some((pair.left().to_str()?, pair.right().to_str()?)))
            .collect();
        assert_eq!(pair_ends, [("a.mp4", "b.mp4"), ("b.mp4", "c.mp4")]);
    }

    #[test]
    fn group_percentage_is_the_weakest_pair() {
        let signatures = vec![
            sig("a.mp4", &[]),
            sig("b.mp4", &[0, 1]),
            sig("c.mp4", &[0, 1, 2, 3]),
        ];

        let groups = find_duplicate_groups(&signatures, 5.0);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].pairs().len(), 3);
        assert_eq!(groups[0].match_percentage(), 93.75);
    }

    #[test]
    fn tolerance_is_inclusive() {
        let signatures = vec![sig("a.mp4", &[]), sig("b.mp4", &[0, 1])];

        assert_eq!(find_duplicate_groups(&signatures, 2.0).len(), 1);
        assert!(find_duplicate_groups(&signatures, 1.9).is_empty());
    }

    #[test]
    fn unrelated_duplicates_form_separate_groups() {
        let signatures = vec![
            sig("d.mp4", &(0..33).collect::<Vec<_>>()),
            sig("b.mp4", &[0]),
            sig("c.mp4", &(0..32).collect::<Vec<_>>()),
            sig("a.mp4", &[]),
        ];

        let groups = find_duplicate_groups(&signatures, 2.0);

        assert_eq!(groups.len(), 2);
        assert_eq!(group_paths(&groups[0]), ["a.mp4", "b.mp4"]);
        assert_eq!(group_paths(&groups[1]), ["c.mp4", "d.mp4"]);
    }

    #[test]
    fn pairs_with_no_shared_captures_never_match() {
        let base = FrameFingerprint::empty_fingerprint(64);
        let sig_1 = VideoSignature::from_fingerprints(
            "a.mp4",
            1_000,
            64,
            [(5, Some(base.clone())), (10, None)],
        );
        let sig_2 =
            VideoSignature::from_fingerprints("b.mp4", 1_000, 64, [(5, None), (10, Some(base))]);

        assert!(find_duplicate_groups(&[sig_1, sig_2], 5.0).is_empty());
    }

    #[test]
    fn signatures_of_differing_hash_size_never_match() {
        let sig_64 = VideoSignature::from_fingerprints(
            "a.mp4",
            1_000,
            64,
            [(5, Some(FrameFingerprint::empty_fingerprint(64)))],
        );
        let sig_16 = VideoSignature::from_fingerprints(
            "b.mp4",
            1_000,
            16,
            [(5, Some(FrameFingerprint::empty_fingerprint(16)))],
        );

        assert!(find_duplicate_groups(&[sig_64, sig_16], 5.0).is_empty());
    }

    #[test]
    fn results_do_not_depend_on_input_order() {
        let mut signatures = vec![
            sig("a.mp4", &[]),
            sig("b.mp4", &[0, 1]),
            sig("c.mp4", &[0, 1, 2, 3]),
            sig("d.mp4", &(0..40).collect::<Vec<_>>()),
            sig("e.mp4", &(0..41).collect::<Vec<_>>()),
        ];

        let expected = find_duplicate_groups(&signatures, 3.0);
        assert_eq!(expected.len(), 2);

        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            signatures.shuffle(&mut rng);
            assert_eq!(find_duplicate_groups(&signatures, 3.0), expected);
        }
    }

    #[test]
    fn no_groups_from_empty_or_lone_input() {
        assert!(find_duplicate_groups(&[], 5.0).is_empty());
        assert!(find_duplicate_groups(&[sig("a.mp4", &[])], 5.0).is_empty());
    }
}
