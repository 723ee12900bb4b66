//! Annotated tag creation and push.
//!
//! Tag creation and push are not transactional: when a push fails the local
//! tag is kept and the failure is reported in the outcome, so the caller can
//! retry the push manually.

use crate::domain::Version;
use crate::error::Result;
use crate::git::Repository;

/// Result of a tagging operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagOutcome {
    /// Name of the created tag
    pub tag: String,
    /// Whether the tag reached the remote
    pub pushed: bool,
    /// Push failure message, if the local tag was created but the push failed
    pub push_error: Option<String>,
}

/// Creates annotated tags for resolved versions
pub struct Tagger<'a, R: Repository + ?Sized> {
    repo: &'a R,
    remote: String,
}

impl<'a, R: Repository + ?Sized> Tagger<'a, R> {
    pub fn new(repo: &'a R, remote: impl Into<String>) -> Self {
        Tagger {
            repo,
            remote: remote.into(),
        }
    }

    /// Create an annotated tag at HEAD and optionally push it
    ///
    /// The tag message lists the given commit subjects, oldest first. A push
    /// failure does not roll back the local tag; it is reported through
    /// [TagOutcome::push_error].
    pub fn tag(
        &self,
        version: &Version,
        prefix: &str,
        subjects: &[String],
        push: bool,
    ) -> Result<TagOutcome> {
        let name = version.format(prefix);
        let message = annotation_message(version, subjects);

        self.repo.create_annotated_tag(&name, &message)?;

        let (pushed, push_error) = if push {
            match self.repo.push_tag(&name, &self.remote) {
                Ok(()) => (true, None),
                Err(e) => (false, Some(e.to_string())),
            }
        } else {
            (false, None)
        };

        Ok(TagOutcome {
            tag: name,
            pushed,
            push_error,
        })
    }
}

/// Tag message: a release headline followed by the commit subjects
fn annotation_message(version: &Version, subjects: &[String]) -> String {
    let mut message = format!("Release {}\n", version);
    for subject in subjects {
        message.push_str("\n- ");
        message.push_str(subject);
    }
    message
}
