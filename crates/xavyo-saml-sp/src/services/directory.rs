//! Local user directory collaborator contract

use crate::models::SamlCredential;
use async_trait::async_trait;
use std::collections::HashSet;

/// Result of a directory lookup, tagged by what the record exposes.
///
/// The entitlement policy branches on this tag instead of probing an opaque
/// value for shape at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryRecord {
    /// Directory knows nothing about this subject
    NoRecord,
    /// Record exposing an authority set usable as entitlements
    Enriched {
        authorities: HashSet<String>,
        details: serde_json::Value,
    },
    /// Record with no recognizable authority data; still surfaced as details
    Opaque(serde_json::Value),
}

impl DirectoryRecord {
    /// The opaque payload to attach to the identity, if any.
    #[must_use]
    pub fn into_details(self) -> Option<serde_json::Value> {
        match self {
            DirectoryRecord::NoRecord => None,
            DirectoryRecord::Enriched { details, .. } | DirectoryRecord::Opaque(details) => {
                Some(details)
            }
        }
    }
}

/// Optional enrichment of a validated credential with local user data.
///
/// Both "no directory wired" and "directory returns [`DirectoryRecord::NoRecord`]"
/// are valid outcomes, not errors.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look up the local record for an already-authenticated subject.
    async fn lookup(&self, credential: &SamlCredential) -> DirectoryRecord;
}
