use std::collections::BTreeSet;

use fqc_schemas::canonical_key;

/// Per-layer set of feature identities known to carry at least one file
/// attachment. Built once per source layer per run; membership tests are
/// O(log n) thereafter.
///
/// Parent ids are canonicalized on insertion so the brace/case form the
/// portal happens to return never affects membership.
#[derive(Clone, Debug, Default)]
pub struct AttachmentIndex {
    parents: BTreeSet<String>,
}

impl AttachmentIndex {
    /// The fail-open value: a layer whose attachment query failed or
    /// returned nothing is treated as having no attachments at all.
    pub fn empty() -> AttachmentIndex {
        AttachmentIndex::default()
    }

    pub fn from_parent_ids<I, S>(ids: I) -> AttachmentIndex
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        AttachmentIndex {
            parents: ids.into_iter().map(|s| canonical_key(s.as_ref())).collect(),
        }
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.parents.contains(identity)
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}
