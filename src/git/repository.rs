use crate::error::{Result, SemvError};
use git2::{BranchType, Oid, Repository as Git2Repo, StatusOptions};
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// Resolve a tag name to the commit it points at
    ///
    /// Handles both lightweight and annotated tags.
    fn tag_commit_oid(&self, tag_name: &str) -> Result<Oid> {
        let reference_name = format!("refs/tags/{}", tag_name);
        let reference = self.repo.find_reference(&reference_name).map_err(|e| {
            SemvError::tag(format!("Cannot find tag '{}': {}", tag_name, e))
        })?;

        let oid = reference
            .peel(git2::ObjectType::Commit)
            .map_err(|e| SemvError::tag(format!("Cannot peel tag '{}': {}", tag_name, e)))?
            .id();

        Ok(oid)
    }

    /// Walk HEAD history, stopping before the given tag's commit
    fn walk_since(&self, tag: Option<&str>) -> Result<Vec<Oid>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.push_head()?;

        if let Some(tag_name) = tag {
            revwalk.hide(self.tag_commit_oid(tag_name)?)?;
        }

        let mut oids = Vec::new();
        for oid in revwalk {
            oids.push(oid?);
        }
        Ok(oids)
    }

    /// Total line count of all text blobs in the tree the tag points at
    fn tag_tree_line_count(&self, tag: Option<&str>) -> Result<usize> {
        let tree = match tag {
            Some(tag_name) => {
                let commit = self.repo.find_commit(self.tag_commit_oid(tag_name)?)?;
                commit.tree()?
            }
            None => return Ok(0),
        };

        let mut lines = 0usize;
        tree.walk(git2::TreeWalkMode::PreOrder, |_, entry| {
            if entry.kind() == Some(git2::ObjectType::Blob) {
                if let Ok(object) = entry.to_object(&self.repo) {
                    if let Some(blob) = object.as_blob() {
                        if !blob.is_binary() {
                            lines += blob.content().iter().filter(|&&b| b == b'\n').count();
                        }
                    }
                }
            }
            git2::TreeWalkResult::Ok
        })?;

        Ok(lines)
    }
}

impl super::Repository for Git2Repository {
    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn commits_since(&self, tag: Option<&str>) -> Result<usize> {
        Ok(self.walk_since(tag)?.len())
    }

    fn commit_subjects_since(&self, tag: Option<&str>) -> Result<Vec<String>> {
        let mut subjects = Vec::new();

        for oid in self.walk_since(tag)? {
            let commit = self.repo.find_commit(oid)?;
            subjects.push(commit.summary().unwrap_or("(empty message)").to_string());
        }

        // revwalk yields newest first
        subjects.reverse();
        Ok(subjects)
    }

    fn is_dirty(&self) -> Result<bool> {
        let mut options = StatusOptions::new();
        options.include_untracked(false).include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(!statuses.is_empty())
    }

    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        head.shorthand()
            .map(|s| s.to_string())
            .ok_or_else(|| SemvError::tag("HEAD is not a valid branch reference"))
    }

    fn current_commit_short_hash(&self) -> Result<String> {
        let head = self.repo.head()?;
        let oid = head
            .target()
            .ok_or_else(|| SemvError::tag("HEAD is detached or invalid"))?;

        let object = self.repo.find_object(oid, None)?;
        let short_id = object.short_id()?;

        match short_id.as_str() {
            Some(s) => Ok(s.to_string()),
            None => Ok(oid.to_string()[..7].to_string()),
        }
    }

    fn default_branch_name(&self) -> Result<String> {
        // Prefer what origin/HEAD points at
        if let Ok(reference) = self.repo.find_reference("refs/remotes/origin/HEAD") {
            if let Some(target) = reference.symbolic_target() {
                if let Some(name) = target.strip_prefix("refs/remotes/origin/") {
                    return Ok(name.to_string());
                }
            }
        }

        // Fall back to whichever conventional branch exists locally
        for name in ["main", "master"] {
            if self.repo.find_branch(name, BranchType::Local).is_ok() {
                return Ok(name.to_string());
            }
        }

        Ok("main".to_string())
    }

    fn changed_line_percentage(&self, since_tag: Option<&str>) -> Result<f64> {
        let baseline = match since_tag {
            Some(tag_name) => {
                let commit = self.repo.find_commit(self.tag_commit_oid(tag_name)?)?;
                Some(commit.tree()?)
            }
            None => None,
        };

        let diff = self
            .repo
            .diff_tree_to_workdir_with_index(baseline.as_ref(), None)?;
        let stats = diff.stats()?;
        let changed = stats.insertions() + stats.deletions();

        let total = self.tag_tree_line_count(since_tag)?;
        if total == 0 {
            // No baseline to compare against; treat any change as total
            return Ok(if changed > 0 { 100.0 } else { 0.0 });
        }

        Ok(changed as f64 * 100.0 / total as f64)
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        let head = self.repo.head()?.peel_to_commit()?;
        let signature = self.repo.signature()?;

        self.repo
            .tag(name, head.as_object(), &signature, message, false)
            .map_err(|e| SemvError::tag(format!("Cannot create tag '{}': {}", name, e)))?;

        Ok(())
    }

    fn push_tag(&self, name: &str, remote: &str) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote)
            .map_err(|e| SemvError::remote(format!("Cannot find remote: {}", e)))?;

        let mut push_options = git2::PushOptions::new();

        // Set credentials callback for authentication
        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                let key_paths = vec![
                    format!("{}/.ssh/id_ed25519", home),
                    format!("{}/.ssh/id_rsa", home),
                    format!("{}/.ssh/id_ecdsa", home),
                ];

                for key_path in key_paths {
                    let path = std::path::Path::new(&key_path);
                    if path.exists() {
                        if let Ok(cred) = git2::Cred::ssh_key(
                            username_from_url.unwrap_or("git"),
                            None,
                            path,
                            None,
                        ) {
                            return Ok(cred);
                        }
                    }
                }

                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"))
                {
                    return Ok(cred);
                }
            }

            git2::Cred::default()
        });

        // Catch per-reference rejections during push
        callbacks.push_update_reference(|refname, status| {
            if let Some(status) = status {
                Err(git2::Error::from_str(&format!(
                    "Push rejected for {}: {}",
                    refname, status
                )))
            } else {
                Ok(())
            }
        });

        push_options.remote_callbacks(callbacks);

        let refspec = format!("refs/tags/{}:refs/tags/{}", name, name);
        remote
            .push(&[&refspec], Some(&mut push_options))
            .map_err(|e| SemvError::remote(format!("Failed to push tag '{}': {}", name, e)))?;

        Ok(())
    }
}

// SAFETY: Git2Repository wraps git2::Repository which is Send.
// git2 is thread-safe for read operations via libgit2's thread-safe design.
unsafe impl Sync for Git2Repository {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git2_repository_open() {
        // Discovery either succeeds (inside a repo) or fails gracefully
        let result = Git2Repository::open(".");
        let _ = result;
    }
}
