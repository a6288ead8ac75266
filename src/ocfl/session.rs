use crate::digest::DigestAlgorithm;
use crate::error::Result;
use crate::headers::ResourceHeaders;
use crate::inventory::{Inventory, VersionState, VersionedResource};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// A scoped handle on one OCFL object. Acquired from a [`crate::factory::SessionFactory`],
/// exclusively owned by whichever task holds it, and released on `commit`/`abort`
/// or when dropped.
///
/// A session may straddle several committed versions: the migrator opens one
/// session per resource and, for each memento, sets the version timestamp,
/// writes the resource (and its sub-resources), and commits -- continuing to
/// use the same session for the next memento.
pub trait ObjectSession: Send {
    /// True if `resource_id` is present (and not deleted) in the most recently
    /// committed version.
    fn contains_resource(&self, resource_id: &str) -> bool;

    /// Stages a resource write for the pending version. `content`, if given,
    /// is digested and stored content-addressed; omit it for a resource with
    /// no content stream (e.g. an external binary using `redirect` handling).
    fn write_resource(&mut self, headers: ResourceHeaders, content: Option<Vec<u8>>)
        -> Result<()>;

    /// Removes a resource from the pending version.
    fn delete_resource(&mut self, resource_id: &str) -> Result<()>;

    /// Sets the creation timestamp that the next committed version will carry.
    fn set_version_timestamp(&mut self, instant: DateTime<Utc>);

    /// Finalizes the pending version. The session remains open and can
    /// immediately accept writes for a subsequent version.
    fn commit(&mut self) -> Result<()>;

    /// Discards any uncommitted writes for the pending version.
    fn abort(&mut self) -> Result<()>;
}

pub(crate) struct FsObjectSession {
    pub(crate) object_root: PathBuf,
    pub(crate) inventory: Inventory,
    pending: Option<VersionState>,
    pending_timestamp: Option<DateTime<Utc>>,
    pending_content: Vec<(String, Vec<u8>)>,
    open_objects: Arc<Mutex<HashSet<String>>>,
}

impl FsObjectSession {
    pub(crate) fn new(
        object_root: PathBuf,
        inventory: Inventory,
        open_objects: Arc<Mutex<HashSet<String>>>,
    ) -> Self {
        FsObjectSession {
            object_root,
            inventory,
            pending: None,
            pending_timestamp: None,
            pending_content: Vec::new(),
            open_objects,
        }
    }

    fn pending_mut(&mut self) -> &mut VersionState {
        if self.pending.is_none() {
            let created = self.pending_timestamp.unwrap_or_else(Utc::now);
            self.pending = Some(self.inventory.begin_version(created));
        }
        self.pending.as_mut().unwrap()
    }

    fn content_path(&self, digest: &str) -> PathBuf {
        let version = self.inventory.head + 1;
        PathBuf::from(format!("v{}", version))
            .join("content")
            .join(&digest[0..3])
            .join(digest)
    }
}

impl ObjectSession for FsObjectSession {
    fn contains_resource(&self, resource_id: &str) -> bool {
        if let Some(pending) = &self.pending {
            return pending.resources.contains_key(resource_id);
        }
        self.inventory.contains_resource(resource_id)
    }

    fn write_resource(
        &mut self,
        headers: ResourceHeaders,
        content: Option<Vec<u8>>,
    ) -> Result<()> {
        let algorithm = self.inventory.digest_algorithm;
        let digest = content.as_ref().map(|bytes| algorithm.digest_hex(bytes));
        if let (Some(digest), Some(bytes)) = (&digest, content) {
            if !self.inventory.manifest.contains_key(digest) {
                let relative = self.content_path(digest);
                self.inventory
                    .manifest
                    .insert(digest.clone(), relative.to_string_lossy().into_owned());
                self.pending_content.push((digest.clone(), bytes));
            }
        }
        let id = headers.id.clone();
        self.pending_mut().resources.insert(
            id,
            VersionedResource {
                headers,
                content_digest: digest,
            },
        );
        Ok(())
    }

    fn delete_resource(&mut self, resource_id: &str) -> Result<()> {
        self.pending_mut().resources.remove(resource_id);
        Ok(())
    }

    fn set_version_timestamp(&mut self, instant: DateTime<Utc>) {
        self.pending_timestamp = Some(instant);
        if let Some(pending) = self.pending.as_mut() {
            pending.created = instant;
        }
    }

    fn commit(&mut self) -> Result<()> {
        let state = match self.pending.take() {
            Some(state) => state,
            None => return Ok(()),
        };
        for (digest, bytes) in self.pending_content.drain(..) {
            let relative = self
                .inventory
                .manifest
                .get(&digest)
                .cloned()
                .unwrap_or_else(|| self.content_path(&digest).to_string_lossy().into_owned());
            let path = self.object_root.join(&relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, bytes)?;
        }
        let version = self.inventory.commit_version(state);
        self.write_inventory(version)?;
        self.pending_timestamp = None;
        Ok(())
    }

    fn abort(&mut self) -> Result<()> {
        self.pending = None;
        self.pending_timestamp = None;
        self.pending_content.clear();
        Ok(())
    }
}

impl FsObjectSession {
    fn write_inventory(&self, version: u32) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(&self.inventory)?;
        fs::write(self.object_root.join("inventory.json"), &bytes)?;
        let version_dir = self.object_root.join(format!("v{}", version));
        fs::create_dir_all(&version_dir)?;
        fs::write(version_dir.join("inventory.json"), &bytes)?;
        Ok(())
    }
}

impl Drop for FsObjectSession {
    fn drop(&mut self) {
        if let Ok(mut open) = self.open_objects.lock() {
            open.remove(&self.inventory.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::InteractionModel;

    fn headers(id: &str, when: DateTime<Utc>) -> ResourceHeaders {
        ResourceHeaders {
            id: id.to_string(),
            parent_id: None,
            interaction_model: InteractionModel::BasicContainer,
            object_root: true,
            archival_group: false,
            deleted: false,
            created_by: "fedoraAdmin".into(),
            created_date: when,
            last_modified_by: "fedoraAdmin".into(),
            last_modified_date: when,
            state_token: ResourceHeaders::compute_state_token(when),
            content_size: None,
            digests: Vec::new(),
            filename: None,
            mime_type: None,
            external_url: None,
            external_handling: None,
        }
    }

    #[test]
    fn commit_advances_head_and_carries_forward_state() {
        let dir = tempfile::tempdir().unwrap();
        let inventory = Inventory::new("info:fedora/x".into(), DigestAlgorithm::Sha256);
        let open = Arc::new(Mutex::new(HashSet::new()));
        let mut session = FsObjectSession::new(dir.path().to_path_buf(), inventory, open);

        let t1 = Utc::now();
        session.set_version_timestamp(t1);
        session
            .write_resource(headers("info:fedora/x", t1), Some(b"hello".to_vec()))
            .unwrap();
        session.commit().unwrap();
        assert_eq!(session.inventory.version_count(), 1);

        let t2 = t1 + chrono::Duration::seconds(1);
        session.set_version_timestamp(t2);
        session.commit().unwrap();
        assert_eq!(session.inventory.version_count(), 2);
        assert!(session.contains_resource("info:fedora/x"));
    }

    #[test]
    fn abort_discards_pending_writes() {
        let dir = tempfile::tempdir().unwrap();
        let inventory = Inventory::new("info:fedora/y".into(), DigestAlgorithm::Sha256);
        let open = Arc::new(Mutex::new(HashSet::new()));
        let mut session = FsObjectSession::new(dir.path().to_path_buf(), inventory, open);

        let when = Utc::now();
        session
            .write_resource(headers("info:fedora/y", when), None)
            .unwrap();
        session.abort().unwrap();
        assert_eq!(session.inventory.version_count(), 0);
        assert!(!session.contains_resource("info:fedora/y"));
    }

    #[test]
    fn identical_content_is_deduplicated_in_the_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let inventory = Inventory::new("info:fedora/z".into(), DigestAlgorithm::Sha256);
        let open = Arc::new(Mutex::new(HashSet::new()));
        let mut session = FsObjectSession::new(dir.path().to_path_buf(), inventory, open);

        let when = Utc::now();
        session
            .write_resource(headers("info:fedora/z", when), Some(b"same".to_vec()))
            .unwrap();
        session.commit().unwrap();
        session.set_version_timestamp(when + chrono::Duration::seconds(1));
        session
            .write_resource(headers("info:fedora/z", when), Some(b"same".to_vec()))
            .unwrap();
        session.commit().unwrap();

        assert_eq!(session.inventory.manifest.len(), 1);
    }
}
