use crate::domain::version::Version;

/// A version together with the repository tag it was parsed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedVersion {
    pub version: Version,
    pub tag: String,
}

/// Snapshot of every parseable version tag in the repository
///
/// Tags that do not conform to the version grammar are silently skipped;
/// they simply do not participate in resolution. The set is rebuilt from the
/// adapter's tag list on every invocation, never cached.
#[derive(Debug, Clone, Default)]
pub struct TagSet {
    entries: Vec<TaggedVersion>,
}

impl TagSet {
    /// Build a tag set from raw tag names, ignoring unparseable ones
    pub fn from_tags<I, S>(tags: I, prefix: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = tags
            .into_iter()
            .filter_map(|tag| {
                let tag = tag.as_ref();
                Version::parse(tag, prefix).ok().map(|version| TaggedVersion {
                    version,
                    tag: tag.to_string(),
                })
            })
            .collect();

        TagSet { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Highest version under the total order, final or not
    pub fn last(&self) -> Option<&TaggedVersion> {
        self.entries.iter().max_by(|a, b| a.version.cmp(&b.version))
    }

    /// Highest final (non-pre-release) version
    pub fn final_max(&self) -> Option<&TaggedVersion> {
        self.entries
            .iter()
            .filter(|e| e.version.is_final())
            .max_by(|a, b| a.version.cmp(&b.version))
    }
}
