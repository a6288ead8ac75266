use crate::digest::DigestAlgorithm;
use crate::headers::ResourceHeaders;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One logical resource's state within a single OCFL version: its headers,
/// and the digest of its content file, if it has one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionedResource {
    pub headers: ResourceHeaders,
    pub content_digest: Option<String>,
}

/// The full state of an object at one version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionState {
    pub created: DateTime<Utc>,
    pub resources: BTreeMap<String, VersionedResource>,
}

impl VersionState {
    fn new(created: DateTime<Utc>) -> Self {
        VersionState {
            created,
            resources: BTreeMap::new(),
        }
    }
}

/// The persistent record of one OCFL object: every version it has, and the
/// content-addressed manifest of files backing them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    pub id: String,
    pub digest_algorithm: DigestAlgorithm,
    pub head: u32,
    pub versions: BTreeMap<u32, VersionState>,
    /// digest -> path of the content file, relative to the object root.
    pub manifest: BTreeMap<String, String>,
}

impl Inventory {
    pub fn new(id: String, digest_algorithm: DigestAlgorithm) -> Self {
        Inventory {
            id,
            digest_algorithm,
            head: 0,
            versions: BTreeMap::new(),
            manifest: BTreeMap::new(),
        }
    }

    pub fn version_count(&self) -> usize {
        self.versions.len()
    }

    /// The most recently committed version's state, if any.
    pub fn head_version(&self) -> Option<&VersionState> {
        if self.head == 0 {
            None
        } else {
            self.versions.get(&self.head)
        }
    }

    pub fn contains_resource(&self, resource_id: &str) -> bool {
        self.head_version()
            .map(|version| version.resources.contains_key(resource_id))
            .unwrap_or(false)
    }

    /// Starts a new pending version, carrying forward the previous version's
    /// resources (OCFL versions are full snapshots; writes during Step 2-4
    /// only touch what changed).
    pub(crate) fn begin_version(&mut self, created: DateTime<Utc>) -> VersionState {
        let mut state = VersionState::new(created);
        if let Some(previous) = self.head_version() {
            state.resources = previous.resources.clone();
        }
        state
    }

    pub(crate) fn commit_version(&mut self, state: VersionState) -> u32 {
        self.head += 1;
        self.versions.insert(self.head, state);
        self.head
    }
}
