//! Working-tree version string.
//!
//! When the repository sits exactly on its last tag with a clean tree, the
//! current version is that tag. Otherwise the string describes the distance
//! from the current final version line: `1.2.3-dev.4+branch.abc1234`, with
//! the branch segment omitted on the default branch.

use crate::domain::{TagSet, Version};
use crate::error::Result;
use crate::git::Repository;

/// Build the human-facing current-version string
pub fn format_current<R: Repository + ?Sized>(
    tags: &TagSet,
    repo: &R,
    prefix: &str,
) -> Result<String> {
    if let Some(last) = tags.last() {
        if !repo.is_dirty()? && repo.commits_since(Some(&last.tag))? == 0 {
            return Ok(last.version.format(prefix));
        }
    }

    let base = tags.final_max();
    let base_version = base
        .map(|t| t.version.stripped())
        .unwrap_or_else(Version::zero);
    let distance = repo.commits_since(base.map(|t| t.tag.as_str()))?;

    let branch = repo.current_branch()?;
    let hash = repo.current_commit_short_hash()?;
    let metadata = if branch == repo.default_branch_name()? {
        hash
    } else {
        format!("{}.{}", branch, hash)
    };

    Ok(format!(
        "{}{}-dev.{}+{}",
        prefix, base_version, distance, metadata
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;

    fn tagset(tags: &[&str]) -> TagSet {
        TagSet::from_tags(tags.iter().copied(), "v")
    }

    #[test]
    fn test_exactly_on_tag_prints_the_tag() {
        let tags = tagset(&["v1.2.0"]);
        let repo = MockRepository::new()
            .with_tag("v1.2.0")
            .with_commits_since("v1.2.0", 0);

        assert_eq!(format_current(&tags, &repo, "v").unwrap(), "v1.2.0");
    }

    #[test]
    fn test_exactly_on_prerelease_tag_prints_the_prerelease() {
        let tags = tagset(&["v1.2.0-rc.1"]);
        let repo = MockRepository::new()
            .with_tag("v1.2.0-rc.1")
            .with_commits_since("v1.2.0-rc.1", 0);

        assert_eq!(format_current(&tags, &repo, "v").unwrap(), "v1.2.0-rc.1");
    }

    #[test]
    fn test_ahead_of_tag_on_default_branch() {
        let tags = tagset(&["v1.2.0"]);
        let repo = MockRepository::new()
            .with_tag("v1.2.0")
            .with_commits_since("v1.2.0", 4)
            .with_short_hash("abc1234");

        assert_eq!(
            format_current(&tags, &repo, "v").unwrap(),
            "v1.2.0-dev.4+abc1234"
        );
    }

    #[test]
    fn test_ahead_of_tag_on_feature_branch_includes_branch() {
        let tags = tagset(&["v1.2.0"]);
        let repo = MockRepository::new()
            .with_tag("v1.2.0")
            .with_commits_since("v1.2.0", 2)
            .on_branch("feature-x")
            .with_short_hash("abc1234");

        assert_eq!(
            format_current(&tags, &repo, "v").unwrap(),
            "v1.2.0-dev.2+feature-x.abc1234"
        );
    }

    #[test]
    fn test_dirty_tree_counts_as_in_development() {
        let tags = tagset(&["v1.2.0"]);
        let repo = MockRepository::new()
            .with_tag("v1.2.0")
            .with_commits_since("v1.2.0", 0)
            .dirty()
            .with_short_hash("abc1234");

        assert_eq!(
            format_current(&tags, &repo, "v").unwrap(),
            "v1.2.0-dev.0+abc1234"
        );
    }

    #[test]
    fn test_distance_is_measured_from_final_max_not_last() {
        // last is the rc, but the dev string is anchored on the final line
        let tags = tagset(&["v1.0.0", "v1.1.0-rc.1"]);
        let repo = MockRepository::new()
            .with_tag("v1.0.0")
            .with_tag("v1.1.0-rc.1")
            .with_commits_since("v1.1.0-rc.1", 2)
            .with_commits_since("v1.0.0", 7)
            .with_short_hash("abc1234");

        assert_eq!(
            format_current(&tags, &repo, "v").unwrap(),
            "v1.0.0-dev.7+abc1234"
        );
    }

    #[test]
    fn test_no_tags_uses_zero_version_and_total_history() {
        let tags = tagset(&[]);
        let repo = MockRepository::new()
            .with_total_commits(12)
            .with_short_hash("abc1234");

        assert_eq!(
            format_current(&tags, &repo, "v").unwrap(),
            "v0.0.0-dev.12+abc1234"
        );
    }

    #[test]
    fn test_plain_mode_has_no_prefix() {
        let tags = tagset(&["v1.2.0"]);
        let repo = MockRepository::new()
            .with_tag("v1.2.0")
            .with_commits_since("v1.2.0", 0);

        assert_eq!(format_current(&tags, &repo, "").unwrap(), "1.2.0");
    }
}
