use crate::error::{Result, SemvError};
use crate::git::Repository;
use std::collections::HashMap;
use std::sync::Mutex;

/// Mock repository for testing without actual git operations
pub struct MockRepository {
    tags: Vec<String>,
    commits_since: HashMap<String, usize>,
    total_commits: usize,
    subjects: Vec<String>,
    dirty: bool,
    branch: String,
    short_hash: String,
    default_branch: String,
    changed_pct: f64,
    fail_push: bool,
    created: Mutex<Vec<(String, String)>>,
    pushed: Mutex<Vec<String>>,
}

impl MockRepository {
    /// Create a new empty mock repository on the default branch
    pub fn new() -> Self {
        MockRepository {
            tags: Vec::new(),
            commits_since: HashMap::new(),
            total_commits: 0,
            subjects: Vec::new(),
            dirty: false,
            branch: "main".to_string(),
            short_hash: "abc1234".to_string(),
            default_branch: "main".to_string(),
            changed_pct: 0.0,
            fail_push: false,
            created: Mutex::new(Vec::new()),
            pushed: Mutex::new(Vec::new()),
        }
    }

    /// Add an existing tag
    pub fn with_tag(mut self, name: impl Into<String>) -> Self {
        self.tags.push(name.into());
        self
    }

    /// Set the commit count since a specific tag
    pub fn with_commits_since(mut self, tag: impl Into<String>, count: usize) -> Self {
        self.commits_since.insert(tag.into(), count);
        self
    }

    /// Set the total history length (commits since no tag)
    pub fn with_total_commits(mut self, count: usize) -> Self {
        self.total_commits = count;
        self
    }

    /// Set the commit subjects returned for any range
    pub fn with_subjects(mut self, subjects: &[&str]) -> Self {
        self.subjects = subjects.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Mark the working tree dirty
    pub fn dirty(mut self) -> Self {
        self.dirty = true;
        self
    }

    /// Set the checked-out branch
    pub fn on_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Set the HEAD short hash
    pub fn with_short_hash(mut self, hash: impl Into<String>) -> Self {
        self.short_hash = hash.into();
        self
    }

    /// Set the changed-line percentage used by auto scope
    pub fn with_changed_pct(mut self, pct: f64) -> Self {
        self.changed_pct = pct;
        self
    }

    /// Make push_tag fail with a remote error
    pub fn failing_push(mut self) -> Self {
        self.fail_push = true;
        self
    }

    /// Tags created through create_annotated_tag, as (name, message) pairs
    pub fn created_tags(&self) -> Vec<(String, String)> {
        self.created.lock().unwrap().clone()
    }

    /// Tags pushed through push_tag
    pub fn pushed_tags(&self) -> Vec<String> {
        self.pushed.lock().unwrap().clone()
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self.tags.clone())
    }

    fn commits_since(&self, tag: Option<&str>) -> Result<usize> {
        match tag {
            Some(tag) => self.commits_since.get(tag).copied().ok_or_else(|| {
                SemvError::tag(format!("Mock has no commit count for tag '{}'", tag))
            }),
            None => Ok(self.total_commits),
        }
    }

    fn commit_subjects_since(&self, _tag: Option<&str>) -> Result<Vec<String>> {
        Ok(self.subjects.clone())
    }

    fn is_dirty(&self) -> Result<bool> {
        Ok(self.dirty)
    }

    fn current_branch(&self) -> Result<String> {
        Ok(self.branch.clone())
    }

    fn current_commit_short_hash(&self) -> Result<String> {
        Ok(self.short_hash.clone())
    }

    fn default_branch_name(&self) -> Result<String> {
        Ok(self.default_branch.clone())
    }

    fn changed_line_percentage(&self, _since_tag: Option<&str>) -> Result<f64> {
        Ok(self.changed_pct)
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        if self.tags.iter().any(|t| t == name) {
            return Err(SemvError::tag(format!("Tag '{}' already exists", name)));
        }
        self.created
            .lock()
            .unwrap()
            .push((name.to_string(), message.to_string()));
        Ok(())
    }

    fn push_tag(&self, name: &str, _remote: &str) -> Result<()> {
        if self.fail_push {
            return Err(SemvError::remote("mock push rejected"));
        }
        self.pushed.lock().unwrap().push(name.to_string());
        Ok(())
    }
}
