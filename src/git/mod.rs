//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the repository
//! queries the version resolver needs, allowing for multiple implementations
//! including real git repositories and mock implementations for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations include:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! Most code should depend on the [Repository] trait rather than concrete
//! implementations to enable easy testing and flexibility. The resolver and
//! formatter treat an implementation as a read-only snapshot of repository
//! state; the only mutating calls are tag creation and push.

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Repository queries and tag operations consumed by the core
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// underlying errors (like `git2::Error`) to the appropriate
/// [crate::error::SemvError] variants.
///
/// ## Implementations
///
/// - [Git2Repository](repository::Git2Repository): Real implementation using the `git2` crate
/// - [MockRepository](mock::MockRepository): Test implementation
pub trait Repository: Send + Sync {
    /// All tag names in the repository
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Number of commits reachable from HEAD but not from the given tag
    ///
    /// With `None`, the total history length of HEAD.
    fn commits_since(&self, tag: Option<&str>) -> Result<usize>;

    /// Commit subjects since the given tag, oldest first
    fn commit_subjects_since(&self, tag: Option<&str>) -> Result<Vec<String>>;

    /// Whether the working tree has uncommitted or unstaged changes
    fn is_dirty(&self) -> Result<bool>;

    /// Name of the currently checked-out branch
    fn current_branch(&self) -> Result<String>;

    /// Short hash of the current HEAD commit
    fn current_commit_short_hash(&self) -> Result<String>;

    /// Name of the repository's primary branch (e.g. "main")
    fn default_branch_name(&self) -> Result<String>;

    /// Percentage of lines changed since the given tag, against the size of
    /// the tagged tree
    ///
    /// Feeds the `auto` scope heuristic.
    fn changed_line_percentage(&self, since_tag: Option<&str>) -> Result<f64>;

    /// Create an annotated tag at HEAD
    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()>;

    /// Push a tag to the given remote
    fn push_tag(&self, name: &str, remote: &str) -> Result<()>;
}
