//! Property-based tests for blame grouping, content decoding and domain types.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use std::collections::HashSet;

use proptest::prelude::*;

use atomgit_code_api::core::types::{BranchName, RepoSlug};
use atomgit_code_api::forge::atomgit::api::{BlameCommitInfo, FileBlameSegment};
use atomgit_code_api::forge::blame::group_segments;
use atomgit_code_api::forge::content::{decode_base64, encode_base64};

/// Segments drawn from a small pool of commits so ids repeat.
fn segments() -> impl Strategy<Value = Vec<FileBlameSegment>> {
    prop::collection::vec((0usize..5, 1u32..500, 0usize..20), 0..40).prop_map(|raw| {
        raw.into_iter()
            .map(|(commit, start, lines)| FileBlameSegment {
                commit: BlameCommitInfo {
                    id: format!("c{}", commit),
                    author_name: format!("author{}", commit),
                    author_email: None,
                    created_at: None,
                    title: format!("commit {}", commit),
                    user: None,
                },
                start,
                contents: vec![String::from("line"); lines],
            })
            .collect()
    })
}

/// Strategy for path-like segment characters.
fn slug_part() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9][a-zA-Z0-9_-]{0,20}"
}

proptest! {
    #[test]
    fn one_group_per_distinct_commit(segs in segments()) {
        let distinct: HashSet<String> = segs.iter().map(|s| s.commit.id.clone()).collect();
        let groups = group_segments(segs);
        prop_assert_eq!(groups.len(), distinct.len());
    }

    #[test]
    fn groups_follow_first_seen_order(segs in segments()) {
        let mut first_seen = Vec::new();
        for seg in &segs {
            if !first_seen.contains(&seg.commit.id) {
                first_seen.push(seg.commit.id.clone());
            }
        }
        let groups = group_segments(segs);
        let order: Vec<String> = groups.iter().map(|g| g.commit.id.clone()).collect();
        prop_assert_eq!(order, first_seen);
    }

    #[test]
    fn grouping_keeps_every_range(segs in segments()) {
        let expected: Vec<(String, u32, u32)> = segs
            .iter()
            .map(|s| (s.commit.id.clone(), s.start, s.contents.len() as u32))
            .collect();
        let groups = group_segments(segs);

        let total: usize = groups.iter().map(|g| g.lines.len()).sum();
        prop_assert_eq!(total, expected.len());

        for group in &groups {
            let mine: Vec<(u32, u32)> = expected
                .iter()
                .filter(|(id, _, _)| *id == group.commit.id)
                .map(|(_, start, len)| (*start, *len))
                .collect();
            let got: Vec<(u32, u32)> = group
                .lines
                .iter()
                .map(|l| (l.current_number, l.effect_line))
                .collect();
            prop_assert_eq!(got, mine);
            prop_assert!(group.lines.iter().all(|l| l.previous_number == l.current_number));
        }
    }

    #[test]
    fn base64_round_trip(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let encoded = encode_base64(&bytes);
        prop_assert_eq!(decode_base64(&encoded).unwrap(), bytes);
    }

    #[test]
    fn base64_ignores_line_breaks(bytes in prop::collection::vec(any::<u8>(), 1..512), width in 4usize..80) {
        let encoded = encode_base64(&bytes);
        let wrapped: String = encoded
            .as_bytes()
            .chunks(width)
            .map(|c| String::from_utf8_lossy(c).into_owned())
            .collect::<Vec<_>>()
            .join("\n");
        prop_assert_eq!(decode_base64(&wrapped).unwrap(), bytes);
    }

    #[test]
    fn text_survives_base64(text in "\\PC{0,200}") {
        let decoded = decode_base64(&encode_base64(text.as_bytes())).unwrap();
        prop_assert_eq!(String::from_utf8(decoded).unwrap(), text);
    }

    #[test]
    fn repo_slug_parses_owner_and_name(owner in slug_part(), name in slug_part()) {
        let slug: RepoSlug = format!("{}/{}", owner, name).parse().unwrap();
        prop_assert_eq!(slug.owner(), owner.as_str());
        prop_assert_eq!(slug.name(), name.as_str());
        prop_assert_eq!(slug.to_string(), format!("{}/{}", owner, name));
    }

    #[test]
    fn branch_names_with_double_dots_rejected(prefix in slug_part(), suffix in slug_part()) {
        let name = format!("{}..{}", prefix, suffix);
        prop_assert!(BranchName::new(name).is_err());
    }

    #[test]
    fn simple_branch_names_accepted(parts in prop::collection::vec(slug_part(), 1..4)) {
        let name = parts.join("/");
        let branch = BranchName::new(name.clone()).unwrap();
        prop_assert_eq!(branch.as_str(), name.as_str());
    }
}
