//! Next-version resolution.
//!
//! The resolver is a pure function of the tag snapshot, the request and the
//! repository state: it never creates tags itself. Channel transitions follow
//! the channel rank order `alpha < beta < rc < final`; switching to a
//! lower-ranked channel on a version line that already carries a
//! higher-ranked pre-release pushes the version line forward instead, so the
//! new tag never sorts below an existing one.

use crate::domain::{Channel, PreRelease, Scope, TagSet, Version};
use crate::error::{Result, SemvError};
use crate::git::Repository;

/// What a resolution request produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A new version to tag
    Release(Version),
    /// Nothing to do: no commits since the last tag, which stays current
    UpToDate(Version),
}

impl Resolution {
    /// The version this resolution refers to, new or unchanged
    pub fn version(&self) -> &Version {
        match self {
            Resolution::Release(v) => v,
            Resolution::UpToDate(v) => v,
        }
    }
}

/// A version resolution request
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    /// Requested release channel
    pub channel: Channel,
    /// Requested bump scope
    pub scope: Scope,
    /// Explicit target version, bypassing bump computation
    pub explicit: Option<Version>,
    /// Bypass the no-new-commit and dirty-tree guards
    pub force: bool,
}

impl ResolveRequest {
    pub fn new(channel: Channel, scope: Scope) -> Self {
        ResolveRequest {
            channel,
            scope,
            explicit: None,
            force: false,
        }
    }

    pub fn with_explicit(mut self, version: Version) -> Self {
        self.explicit = Some(version);
        self
    }

    pub fn forced(mut self) -> Self {
        self.force = true;
        self
    }
}

/// Compute the next version for the given channel and scope
///
/// Returns [Resolution::UpToDate] when there is nothing to tag (no commits
/// since the last tag and `force` not set). Fails with
/// [SemvError::VersionTooLow] when an explicit version does not exceed the
/// last tag, and with [SemvError::DirtyTree] when the working tree has
/// uncommitted changes.
pub fn resolve<R: Repository + ?Sized>(
    tags: &TagSet,
    request: &ResolveRequest,
    repo: &R,
    auto_minor_threshold_pct: f64,
) -> Result<Resolution> {
    let last = tags.last();

    let candidate = match &request.explicit {
        Some(explicit) => {
            if let Some(last) = last {
                if *explicit <= last.version {
                    return Err(SemvError::VersionTooLow {
                        candidate: explicit.to_string(),
                        last: last.version.to_string(),
                    });
                }
            }
            explicit.clone()
        }
        None => {
            let reference = tags
                .final_max()
                .map(|t| t.version.clone())
                .unwrap_or_else(Version::zero);

            let bump = match request.scope {
                Scope::Auto => {
                    let pct = repo.changed_line_percentage(last.map(|t| t.tag.as_str()))?;
                    request.scope.resolve(pct, auto_minor_threshold_pct)
                }
                _ => request.scope.resolve(0.0, auto_minor_threshold_pct),
            };
            let bumped = reference.bump(bump);

            // Line comparison, not the full total order: a pre-release on
            // the bump target's line already covers it, and re-issuing the
            // line from scratch would collide with the existing tag.
            match last {
                Some(last) if bumped.stripped() <= last.version.stripped() => {
                    match (last.version.prerelease, request.channel) {
                        (_, Channel::Final) => last.version.stripped(),
                        (None, channel) => bumped.with_prerelease(PreRelease::first(channel)?),
                        (Some(pr), channel) if channel == pr.channel => {
                            last.version.with_prerelease(pr.incremented())
                        }
                        (Some(pr), channel) if channel > pr.channel => {
                            last.version.with_prerelease(PreRelease::first(channel)?)
                        }
                        // A lower-ranked channel cannot join a line that
                        // already has a higher-ranked pre-release; move the
                        // line forward.
                        (Some(_), channel) => last
                            .version
                            .bump(bump)
                            .with_prerelease(PreRelease::first(channel)?),
                    }
                }
                _ => match request.channel {
                    Channel::Final => bumped,
                    channel => bumped.with_prerelease(PreRelease::first(channel)?),
                },
            }
        }
    };

    if !request.force {
        match last {
            Some(last) => {
                if repo.commits_since(Some(&last.tag))? == 0 {
                    return Ok(Resolution::UpToDate(last.version.clone()));
                }
            }
            None => {
                if repo.commits_since(None)? == 0 {
                    return Err(SemvError::tag("Repository has no commits to tag"));
                }
            }
        }

        if repo.is_dirty()? {
            return Err(SemvError::DirtyTree);
        }
    }

    Ok(Resolution::Release(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;

    const THRESHOLD: f64 = 20.0;

    fn v(s: &str) -> Version {
        Version::parse(s, "v").unwrap()
    }

    fn tagset(tags: &[&str]) -> TagSet {
        TagSet::from_tags(tags.iter().copied(), "v")
    }

    fn repo_ahead(tags: &[&str]) -> MockRepository {
        let mut repo = MockRepository::new().with_total_commits(5);
        for tag in tags {
            repo = repo.with_tag(*tag).with_commits_since(*tag, 3);
        }
        repo
    }

    fn release(res: Resolution) -> Version {
        match res {
            Resolution::Release(v) => v,
            Resolution::UpToDate(v) => panic!("expected a release, got up-to-date {}", v),
        }
    }

    #[test]
    fn test_no_tags_final_minor_gives_0_1_0() {
        let tags = tagset(&[]);
        let repo = repo_ahead(&[]);
        let req = ResolveRequest::new(Channel::Final, Scope::Minor);

        let res = resolve(&tags, &req, &repo, THRESHOLD).unwrap();
        assert_eq!(release(res), v("0.1.0"));
    }

    #[test]
    fn test_no_tags_major_gives_1_0_0() {
        let tags = tagset(&[]);
        let repo = repo_ahead(&[]);
        let req = ResolveRequest::new(Channel::Final, Scope::Major);

        assert_eq!(release(resolve(&tags, &req, &repo, THRESHOLD).unwrap()), v("1.0.0"));
    }

    #[test]
    fn test_no_tags_prerelease_channel_starts_counter_at_one() {
        let tags = tagset(&[]);
        let repo = repo_ahead(&[]);
        let req = ResolveRequest::new(Channel::Alpha, Scope::Minor);

        assert_eq!(
            release(resolve(&tags, &req, &repo, THRESHOLD).unwrap()),
            v("0.1.0-alpha.1")
        );
    }

    #[test]
    fn test_final_minor_bump() {
        let tags = tagset(&["v1.0.0"]);
        let repo = repo_ahead(&["v1.0.0"]);
        let req = ResolveRequest::new(Channel::Final, Scope::Minor);

        assert_eq!(release(resolve(&tags, &req, &repo, THRESHOLD).unwrap()), v("1.1.0"));
    }

    #[test]
    fn test_candidate_on_new_line() {
        // final_max = v1.0.0, no other tags: rc of the next minor line
        let tags = tagset(&["v1.0.0"]);
        let repo = repo_ahead(&["v1.0.0"]);
        let req = ResolveRequest::new(Channel::Rc, Scope::Minor);

        assert_eq!(
            release(resolve(&tags, &req, &repo, THRESHOLD).unwrap()),
            v("1.1.0-rc.1")
        );
    }

    #[test]
    fn test_candidate_counter_increments_when_bump_is_covered() {
        // reference bump v1.0.1 is below last v1.1.0-rc.1, so the rc counter
        // increments instead of opening a new line
        let tags = tagset(&["v1.0.0", "v1.1.0-rc.1"]);
        let repo = repo_ahead(&["v1.0.0", "v1.1.0-rc.1"]);
        let req = ResolveRequest::new(Channel::Rc, Scope::Patch);

        assert_eq!(
            release(resolve(&tags, &req, &repo, THRESHOLD).unwrap()),
            v("1.1.0-rc.2")
        );
    }

    #[test]
    fn test_candidate_counter_increments_on_the_same_line() {
        // the minor bump lands exactly on the rc's line; the counter moves,
        // the line does not
        let tags = tagset(&["v1.0.0", "v1.1.0-rc.1"]);
        let repo = repo_ahead(&["v1.0.0", "v1.1.0-rc.1"]);
        let req = ResolveRequest::new(Channel::Rc, Scope::Minor);

        assert_eq!(
            release(resolve(&tags, &req, &repo, THRESHOLD).unwrap()),
            v("1.1.0-rc.2")
        );
    }

    #[test]
    fn test_channel_switch_up_keeps_line_and_resets_counter() {
        // alpha -> beta on the same line
        let tags = tagset(&["v1.0.0", "v1.1.0-alpha.3"]);
        let repo = repo_ahead(&["v1.0.0", "v1.1.0-alpha.3"]);
        let req = ResolveRequest::new(Channel::Beta, Scope::Patch);

        assert_eq!(
            release(resolve(&tags, &req, &repo, THRESHOLD).unwrap()),
            v("1.1.0-beta.1")
        );
    }

    #[test]
    fn test_channel_switch_down_bumps_line_forward() {
        // rc -> beta cannot stay on the line, it would sort below rc.2
        let tags = tagset(&["v1.0.0", "v1.1.0-rc.2"]);
        let repo = repo_ahead(&["v1.0.0", "v1.1.0-rc.2"]);
        let req = ResolveRequest::new(Channel::Beta, Scope::Patch);

        assert_eq!(
            release(resolve(&tags, &req, &repo, THRESHOLD).unwrap()),
            v("1.1.1-beta.1")
        );
    }

    #[test]
    fn test_channel_switch_down_respects_scope() {
        let tags = tagset(&["v1.0.0", "v1.1.0-beta.1"]);
        let repo = repo_ahead(&["v1.0.0", "v1.1.0-beta.1"]);
        let req = ResolveRequest::new(Channel::Alpha, Scope::Minor);

        assert_eq!(
            release(resolve(&tags, &req, &repo, THRESHOLD).unwrap()),
            v("1.2.0-alpha.1")
        );
    }

    #[test]
    fn test_finalizing_a_prerelease_strips_the_suffix() {
        let tags = tagset(&["v1.0.0", "v1.1.0-rc.2"]);
        let repo = repo_ahead(&["v1.0.0", "v1.1.0-rc.2"]);
        let req = ResolveRequest::new(Channel::Final, Scope::Patch);

        assert_eq!(release(resolve(&tags, &req, &repo, THRESHOLD).unwrap()), v("1.1.0"));
    }

    #[test]
    fn test_bigger_scope_outruns_prerelease_line() {
        // major bump clears v1.1.0-rc.1, so a fresh line opens
        let tags = tagset(&["v1.0.0", "v1.1.0-rc.1"]);
        let repo = repo_ahead(&["v1.0.0", "v1.1.0-rc.1"]);
        let req = ResolveRequest::new(Channel::Rc, Scope::Major);

        assert_eq!(
            release(resolve(&tags, &req, &repo, THRESHOLD).unwrap()),
            v("2.0.0-rc.1")
        );
    }

    #[test]
    fn test_auto_scope_above_threshold_is_minor() {
        let tags = tagset(&["v1.0.0"]);
        let repo = repo_ahead(&["v1.0.0"]).with_changed_pct(42.0);
        let req = ResolveRequest::new(Channel::Final, Scope::Auto);

        assert_eq!(release(resolve(&tags, &req, &repo, THRESHOLD).unwrap()), v("1.1.0"));
    }

    #[test]
    fn test_auto_scope_below_threshold_is_patch() {
        let tags = tagset(&["v1.0.0"]);
        let repo = repo_ahead(&["v1.0.0"]).with_changed_pct(5.0);
        let req = ResolveRequest::new(Channel::Final, Scope::Auto);

        assert_eq!(release(resolve(&tags, &req, &repo, THRESHOLD).unwrap()), v("1.0.1"));
    }

    #[test]
    fn test_no_new_commits_is_up_to_date() {
        let tags = tagset(&["v1.2.0"]);
        let repo = MockRepository::new()
            .with_tag("v1.2.0")
            .with_commits_since("v1.2.0", 0);
        let req = ResolveRequest::new(Channel::Final, Scope::Minor);

        let res = resolve(&tags, &req, &repo, THRESHOLD).unwrap();
        assert_eq!(res, Resolution::UpToDate(v("1.2.0")));
    }

    #[test]
    fn test_force_bypasses_no_new_commit_guard() {
        let tags = tagset(&["v1.2.0"]);
        let repo = MockRepository::new()
            .with_tag("v1.2.0")
            .with_commits_since("v1.2.0", 0);
        let req = ResolveRequest::new(Channel::Final, Scope::Minor).forced();

        assert_eq!(release(resolve(&tags, &req, &repo, THRESHOLD).unwrap()), v("1.3.0"));
    }

    #[test]
    fn test_dirty_tree_is_fatal() {
        let tags = tagset(&["v1.0.0"]);
        let repo = repo_ahead(&["v1.0.0"]).dirty();
        let req = ResolveRequest::new(Channel::Final, Scope::Minor);

        let err = resolve(&tags, &req, &repo, THRESHOLD).unwrap_err();
        assert!(matches!(err, SemvError::DirtyTree));
    }

    #[test]
    fn test_force_bypasses_dirty_tree_guard() {
        let tags = tagset(&["v1.0.0"]);
        let repo = repo_ahead(&["v1.0.0"]).dirty();
        let req = ResolveRequest::new(Channel::Final, Scope::Minor).forced();

        assert!(resolve(&tags, &req, &repo, THRESHOLD).is_ok());
    }

    #[test]
    fn test_explicit_version_is_used_verbatim() {
        let tags = tagset(&["v1.0.0"]);
        let repo = repo_ahead(&["v1.0.0"]);
        let req = ResolveRequest::new(Channel::Final, Scope::Minor).with_explicit(v("3.0.0"));

        assert_eq!(release(resolve(&tags, &req, &repo, THRESHOLD).unwrap()), v("3.0.0"));
    }

    #[test]
    fn test_explicit_version_equal_to_last_is_too_low() {
        let tags = tagset(&["v1.2.0"]);
        let repo = repo_ahead(&["v1.2.0"]);
        let req = ResolveRequest::new(Channel::Final, Scope::Minor).with_explicit(v("1.2.0"));

        let err = resolve(&tags, &req, &repo, THRESHOLD).unwrap_err();
        assert!(matches!(err, SemvError::VersionTooLow { .. }));
    }

    #[test]
    fn test_explicit_version_below_last_is_too_low() {
        let tags = tagset(&["v1.2.0"]);
        let repo = repo_ahead(&["v1.2.0"]);
        let req = ResolveRequest::new(Channel::Final, Scope::Minor).with_explicit(v("1.1.9"));

        assert!(resolve(&tags, &req, &repo, THRESHOLD).is_err());
    }

    #[test]
    fn test_explicit_version_below_last_prerelease_is_too_low() {
        // the final outranks the rc on the same line, so v1.1.0 is
        // acceptable while v1.1.0-beta.1 is not
        let tags = tagset(&["v1.1.0-rc.1"]);
        let repo = repo_ahead(&["v1.1.0-rc.1"]);

        let ok = ResolveRequest::new(Channel::Final, Scope::Minor).with_explicit(v("1.1.0"));
        assert!(resolve(&tags, &ok, &repo, THRESHOLD).is_ok());

        let low =
            ResolveRequest::new(Channel::Final, Scope::Minor).with_explicit(v("1.1.0-beta.1"));
        assert!(resolve(&tags, &low, &repo, THRESHOLD).is_err());
    }

    #[test]
    fn test_unparseable_tags_do_not_disturb_resolution() {
        let tags = tagset(&["v1.0.0", "deploy-2024-01-01", "snapshot"]);
        let repo = repo_ahead(&["v1.0.0"]);
        let req = ResolveRequest::new(Channel::Final, Scope::Patch);

        assert_eq!(release(resolve(&tags, &req, &repo, THRESHOLD).unwrap()), v("1.0.1"));
    }

    #[test]
    fn test_empty_repository_is_an_error() {
        let tags = tagset(&[]);
        let repo = MockRepository::new().with_total_commits(0);
        let req = ResolveRequest::new(Channel::Final, Scope::Minor);

        assert!(resolve(&tags, &req, &repo, THRESHOLD).is_err());
    }

    #[test]
    fn test_guard_applies_to_explicit_versions_too() {
        let tags = tagset(&["v1.0.0"]);
        let repo = MockRepository::new()
            .with_tag("v1.0.0")
            .with_commits_since("v1.0.0", 0);
        let req = ResolveRequest::new(Channel::Final, Scope::Minor).with_explicit(v("5.0.0"));

        let res = resolve(&tags, &req, &repo, THRESHOLD).unwrap();
        assert_eq!(res, Resolution::UpToDate(v("1.0.0")));
    }
}
