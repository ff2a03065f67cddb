//! Batch-scoped identifier map
//!
//! Built fresh for every reconciliation run because no persistent
//! cross-reference table exists. Keys are every identifier shape observed
//! for a user; values are that user's canonical subject.

use std::collections::BTreeMap;

use gearbook_domain::UserRecord;

use super::resolver::canonical_from_composite;

/// Mapping from every observed identifier shape to the canonical subject
#[derive(Debug, Default)]
pub struct IdentifierMap {
    entries: BTreeMap<String, String>,
}

impl IdentifierMap {
    /// Build the map from the full set of user records.
    ///
    /// For each user the canonical id is derived by splitting the composite
    /// token identifier on the separator; a separator-less identifier is
    /// used raw (degraded but non-fatal). Keys inserted per user: internal
    /// storage id, full composite identifier, canonical id, stored subject,
    /// and the bare composite suffix.
    pub fn from_users(users: &[UserRecord]) -> Self {
        let mut entries = BTreeMap::new();

        for user in users {
            let canonical = canonical_from_composite(&user.token_identifier).to_string();

            entries.insert(user.id.clone(), canonical.clone());
            entries.insert(user.token_identifier.clone(), canonical.clone());
            entries.insert(canonical.clone(), canonical.clone());
            // The stored subject normally equals the derived canonical id;
            // when legacy rows disagree, both shapes must still resolve
            entries.entry(user.subject.clone()).or_insert_with(|| canonical.clone());
        }

        Self { entries }
    }

    /// Canonical subject for an observed identifier, when known
    pub fn canonical_for(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    /// Number of distinct identifier keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The full map, for audit reporting
    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }
}
