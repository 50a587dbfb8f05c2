use super::{ComparisonGroup, ComparisonMatrix};
use crate::algorithms::AlgorithmId;
use itertools::Itertools;
use std::collections::BTreeSet;

const BUILDS: [&str; 2] = ["release32", "release64"];

fn names(groups: &[ComparisonGroup]) -> Vec<&str> {
    groups.iter().map(|group| group.name.as_str()).collect()
}

#[test]
pub fn revision_pairs_per_build() {
    let matrix = ComparisonMatrix::new("issue213", ["base", "v1", "v3"], BUILDS, ["blind"]);
    let groups = matrix.revision_pairs().collect_vec();

    assert_eq!(
        names(&groups),
        [
            "issue213-base-vs-v1-release32",
            "issue213-base-vs-v3-release32",
            "issue213-v1-vs-v3-release32",
            "issue213-base-vs-v1-release64",
            "issue213-base-vs-v3-release64",
            "issue213-v1-vs-v3-release64",
        ]
    );

    for group in &groups[..3] {
        assert_eq!(group.pairs.len(), 1);
        assert_eq!(group.pairs[0].label, "Diff (blind-release32)");
    }
    for group in &groups[3..] {
        assert_eq!(group.pairs.len(), 1);
        assert_eq!(group.pairs[0].label, "Diff (blind-release64)");
    }

    let pair = &groups[2].pairs[0];
    assert_eq!(pair.first.to_string(), "v1-blind-release32");
    assert_eq!(pair.second.to_string(), "v3-blind-release32");
}

#[test]
pub fn revision_pairs_have_one_entry_per_nickname() {
    let nicknames = ["bjolp", "blind", "cegar", "lmcut"];
    let matrix = ComparisonMatrix::new("issue213", ["a", "b", "c"], ["x", "y"], nicknames);
    let groups = matrix.revision_pairs().collect_vec();

    assert_eq!(groups.len(), 6);
    assert_eq!(names(&groups).into_iter().unique().count(), 6);
    for group in &groups {
        assert_eq!(
            group
                .pairs
                .iter()
                .map(|pair| pair.first.nickname.as_str())
                .collect_vec(),
            nicknames
        );
    }
}

#[test]
pub fn build_pairs_per_revision() {
    let matrix = ComparisonMatrix::new(
        "issue213",
        ["issue213-base", "issue213-v1"],
        BUILDS,
        ["blind", "lmcut"],
    );
    let groups = matrix.build_pairs().collect_vec();

    assert_eq!(
        names(&groups),
        [
            "issue213-release32-vs-release64-issue213-base",
            "issue213-release32-vs-release64-issue213-v1",
        ]
    );

    let pair = &groups[1].pairs[1];
    assert_eq!(pair.first, AlgorithmId::new("issue213-v1", "lmcut", "release32"));
    assert_eq!(pair.second, AlgorithmId::new("issue213-v1", "lmcut", "release64"));
    assert_eq!(pair.label, "Diff (lmcut-issue213-v1)");
}

#[test]
pub fn build_pairs_need_two_builds() {
    let matrix = ComparisonMatrix::new("issue1", ["base", "v1"], ["release64"], ["blind"]);

    assert_eq!(matrix.build_pairs().count(), 0);
}

#[test]
pub fn diagonal_uses_first_and_last() {
    let matrix = ComparisonMatrix::new(
        "issue213",
        ["base", "v1", "v2", "v3"],
        ["release32", "debug64", "release64"],
        ["blind", "ipdb"],
    );
    let diagonal = matrix.diagonal().unwrap();

    assert_eq!(diagonal.name, "issue213-before-vs-after");
    assert_eq!(diagonal.pairs.len(), 2);
    assert_eq!(diagonal.pairs[0].first.to_string(), "base-blind-release32");
    assert_eq!(diagonal.pairs[0].second.to_string(), "v3-blind-release64");
    assert_eq!(diagonal.pairs[1].label, "Diff (ipdb)");
}

#[test]
pub fn diagonal_is_a_single_group() {
    let matrix = ComparisonMatrix::new("issue213", ["base", "v1", "v3"], BUILDS, ["blind"]);

    assert_eq!(
        matrix
            .groups()
            .iter()
            .filter(|group| group.name.ends_with("before-vs-after"))
            .count(),
        1
    );
}

#[test]
pub fn diagonal_without_builds() {
    let matrix = ComparisonMatrix::new("issue213", ["base"], Vec::<String>::new(), ["blind"]);

    assert_eq!(matrix.diagonal(), None);
}

#[test]
pub fn all_group_names_are_unique() {
    let matrix = ComparisonMatrix::new(
        "issue213",
        ["issue213-base", "issue213-v1", "issue213-v3"],
        BUILDS,
        ["bjolp", "blind", "lmcut"],
    );
    let groups = matrix.groups();

    // 3 revision pairs x 2 builds + 1 build pair x 3 revisions + diagonal
    assert_eq!(groups.len(), 6 + 3 + 1);
    assert_eq!(names(&groups).into_iter().unique().count(), groups.len());
}

#[test]
pub fn search_order_only_changes_entry_order() {
    let revisions = ["base", "v1", "v3"];
    let forward = ComparisonMatrix::new("issue213", revisions, BUILDS, ["blind", "lmcut", "mas"]);
    let backward = ComparisonMatrix::new("issue213", revisions, BUILDS, ["mas", "lmcut", "blind"]);

    let forward_groups = forward.groups();
    let backward_groups = backward.groups();

    assert_eq!(
        names(&forward_groups).into_iter().collect::<BTreeSet<_>>(),
        names(&backward_groups).into_iter().collect::<BTreeSet<_>>()
    );

    for (forward, backward) in forward_groups.iter().zip(backward_groups.iter()) {
        let mut reversed = backward.pairs.clone();
        reversed.reverse();

        assert_eq!(forward.pairs, reversed);
    }
}

#[test]
pub fn ids_round_trip_through_parsing() {
    let matrix = ComparisonMatrix::new(
        "issue213",
        ["issue213-base", "issue213-v3"],
        BUILDS,
        ["blind", "seq"],
    );

    for pair in matrix.groups().iter().flat_map(|group| group.pairs.iter()) {
        for id in [&pair.first, &pair.second] {
            assert_eq!(&id.to_string().parse::<AlgorithmId>().unwrap(), id);
        }
    }
}
