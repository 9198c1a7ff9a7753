//! forge::blame
//!
//! Blame segment grouping.
//!
//! The provider returns one segment per contiguous line range. Hosts want one
//! record per commit with all of its ranges, so segments are grouped by
//! commit id. Groups keep the order in which each commit is first seen, and
//! ranges keep their order within a group.

use std::collections::HashMap;

use chrono::DateTime;

use super::atomgit::api::FileBlameSegment;
use super::traits::ForgeError;
use super::types::{BlameAuthor, BlameCommit, BlameLine, GitlensBlame};

/// Author email used when the provider has none.
pub const NO_EMAIL: &str = "no_email";

/// Group raw blame segments by commit.
pub fn group_segments(segments: Vec<FileBlameSegment>) -> Vec<GitlensBlame> {
    let mut groups: Vec<GitlensBlame> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for segment in segments {
        let line = BlameLine {
            current_number: segment.start,
            effect_line: segment.contents.len() as u32,
            previous_number: segment.start,
        };

        if let Some(&slot) = index.get(&segment.commit.id) {
            groups[slot].lines.push(line);
            continue;
        }

        index.insert(segment.commit.id.clone(), groups.len());
        groups.push(GitlensBlame {
            commit: blame_commit(segment),
            lines: vec![line],
        });
    }

    groups
}

/// Encode grouped blame as the JSON bytes hosts expect.
pub fn encode(groups: &[GitlensBlame]) -> Result<Vec<u8>, ForgeError> {
    serde_json::to_vec(groups)
        .map_err(|e| ForgeError::InvalidResponse(format!("cannot encode blame: {}", e)))
}

fn blame_commit(segment: FileBlameSegment) -> BlameCommit {
    let commit = segment.commit;
    let timestamp = commit.created_at.as_deref().and_then(epoch_millis);
    let author_email = commit
        .author_email
        .filter(|email| !email.is_empty())
        .unwrap_or_else(|| NO_EMAIL.to_string());
    let avatar_url = commit
        .user
        .and_then(|user| user.avatar_url)
        .unwrap_or_default();

    BlameCommit {
        id: commit.id,
        author_name: commit.author_name,
        author_email,
        authored_date: timestamp,
        committed_date: timestamp,
        message: commit.title,
        author: BlameAuthor { avatar_url },
    }
}

/// Parse an RFC 3339 timestamp into epoch milliseconds.
fn epoch_millis(value: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|time| time.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::atomgit::api::{BlameCommitInfo, BlameUser};

    fn segment(commit: &str, start: u32, lines: usize) -> FileBlameSegment {
        FileBlameSegment {
            commit: BlameCommitInfo {
                id: commit.to_string(),
                author_name: format!("author-{}", commit),
                author_email: Some(format!("{}@example.com", commit)),
                created_at: Some("2024-01-02T03:04:05Z".to_string()),
                title: format!("commit {}", commit),
                user: None,
            },
            start,
            contents: vec!["x".to_string(); lines],
        }
    }

    #[test]
    fn groups_by_commit_in_first_seen_order() {
        let groups = group_segments(vec![
            segment("b", 1, 2),
            segment("a", 3, 1),
            segment("b", 4, 3),
            segment("c", 7, 1),
            segment("a", 8, 2),
        ]);

        let ids: Vec<&str> = groups.iter().map(|g| g.commit.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);

        assert_eq!(
            groups[0].lines,
            vec![
                BlameLine {
                    current_number: 1,
                    effect_line: 2,
                    previous_number: 1
                },
                BlameLine {
                    current_number: 4,
                    effect_line: 3,
                    previous_number: 4
                },
            ]
        );
        assert_eq!(groups[1].lines.len(), 2);
        assert_eq!(groups[2].lines.len(), 1);
    }

    #[test]
    fn missing_email_uses_sentinel() {
        let mut seg = segment("a", 1, 1);
        seg.commit.author_email = None;
        let mut empty = segment("b", 2, 1);
        empty.commit.author_email = Some(String::new());

        let groups = group_segments(vec![seg, empty]);
        assert_eq!(groups[0].commit.author_email, NO_EMAIL);
        assert_eq!(groups[1].commit.author_email, NO_EMAIL);
    }

    #[test]
    fn timestamps_and_avatar() {
        let mut seg = segment("a", 1, 1);
        seg.commit.user = Some(BlameUser {
            avatar_url: Some("https://cdn/a.png".to_string()),
        });

        let groups = group_segments(vec![seg]);
        let commit = &groups[0].commit;
        assert_eq!(commit.authored_date, Some(1_704_164_645_000));
        assert_eq!(commit.committed_date, commit.authored_date);
        assert_eq!(commit.author.avatar_url, "https://cdn/a.png");
        assert_eq!(commit.message, "commit a");
    }

    #[test]
    fn unparseable_timestamp_is_null() {
        let mut seg = segment("a", 1, 1);
        seg.commit.created_at = Some("yesterday".to_string());
        let groups = group_segments(vec![seg]);
        assert!(groups[0].commit.authored_date.is_none());

        let json = String::from_utf8(encode(&groups).unwrap()).unwrap();
        assert!(json.contains("\"authored_date\":null"));
    }

    #[test]
    fn empty_input() {
        assert!(group_segments(Vec::new()).is_empty());
        assert_eq!(encode(&[]).unwrap(), b"[]");
    }
}
