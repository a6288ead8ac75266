use crate::digest::{object_root_relative_path, DigestAlgorithm};
use crate::error::{OcflError, Result};
use crate::inventory::Inventory;
use crate::session::{FsObjectSession, ObjectSession};
use log::debug;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

static OBJECT_DECLARATION: &str = "ocfl_object_1.0";

/// Produces [`ObjectSession`]s against a storage root, guaranteeing that at
/// most one session is open for a given object id at a time.
pub trait SessionFactory: Send + Sync {
    /// Opens (or continues) a session for `object_id`. Fails with
    /// `OcflError::ObjectLocked` if another session is already open for it.
    fn new_session(&self, object_id: &str) -> Result<Box<dyn ObjectSession>>;

    /// Permanently removes the object and its versions from the storage root.
    /// A no-op if the object doesn't exist.
    fn delete_object(&self, object_id: &str) -> Result<()>;

    /// True if the object has at least one committed version.
    fn contains_object(&self, object_id: &str) -> Result<bool>;

    /// Releases factory-wide resources. Idempotent.
    fn close(&self);
}

/// A [`SessionFactory`] backed by a plain directory tree under
/// `<storage_root>`, laid out with a hash-and-id n-tuple path per object
/// (see [`object_root_relative_path`]).
pub struct FsSessionFactory {
    storage_root: PathBuf,
    digest_algorithm: DigestAlgorithm,
    open_objects: Arc<Mutex<HashSet<String>>>,
}

impl FsSessionFactory {
    /// Creates the factory, creating `storage_root` if it doesn't exist.
    pub fn new(storage_root: PathBuf, digest_algorithm: DigestAlgorithm) -> Result<Self> {
        fs::create_dir_all(&storage_root)?;
        Ok(FsSessionFactory {
            storage_root,
            digest_algorithm,
            open_objects: Arc::new(Mutex::new(HashSet::new())),
        })
    }

    fn object_root(&self, object_id: &str) -> PathBuf {
        self.storage_root
            .join(object_root_relative_path(object_id))
    }

    fn load_inventory(&self, object_id: &str, object_root: &PathBuf) -> Result<Inventory> {
        let inventory_path = object_root.join("inventory.json");
        if inventory_path.exists() {
            let bytes = fs::read(inventory_path)?;
            Ok(serde_json::from_slice(&bytes)?)
        } else {
            Ok(Inventory::new(object_id.to_string(), self.digest_algorithm))
        }
    }
}

impl SessionFactory for FsSessionFactory {
    fn new_session(&self, object_id: &str) -> Result<Box<dyn ObjectSession>> {
        {
            let mut open = self
                .open_objects
                .lock()
                .expect("object lock table poisoned");
            if open.contains(object_id) {
                return Err(OcflError::ObjectLocked(object_id.to_string()));
            }
            open.insert(object_id.to_string());
        }

        let object_root = self.object_root(object_id);
        let result = (|| -> Result<Box<dyn ObjectSession>> {
            fs::create_dir_all(&object_root)?;
            let declaration = object_root.join("0=ocfl_object_1.0");
            if !declaration.exists() {
                fs::write(declaration, OBJECT_DECLARATION)?;
            }
            let inventory = self.load_inventory(object_id, &object_root)?;
            Ok(Box::new(FsObjectSession::new(
                object_root,
                inventory,
                self.open_objects.clone(),
            )))
        })();

        if result.is_err() {
            self.open_objects
                .lock()
                .expect("object lock table poisoned")
                .remove(object_id);
        }
        result
    }

    fn delete_object(&self, object_id: &str) -> Result<()> {
        let object_root = self.object_root(object_id);
        if object_root.exists() {
            fs::remove_dir_all(&object_root)?;
        }
        Ok(())
    }

    fn contains_object(&self, object_id: &str) -> Result<bool> {
        Ok(self.object_root(object_id).join("inventory.json").exists())
    }

    fn close(&self) {
        let open = self.open_objects.lock().expect("object lock table poisoned");
        if !open.is_empty() {
            debug!(
                "Closing OCFL session factory with {} object(s) still open: {:?}",
                open.len(),
                open
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_session_may_be_open_per_object() {
        let dir = tempfile::tempdir().unwrap();
        let factory =
            FsSessionFactory::new(dir.path().to_path_buf(), DigestAlgorithm::Sha256).unwrap();
        let session = factory.new_session("info:fedora/locked").unwrap();
        let second = factory.new_session("info:fedora/locked");
        assert!(matches!(second, Err(OcflError::ObjectLocked(_))));
        drop(session);
        assert!(factory.new_session("info:fedora/locked").is_ok());
    }

    #[test]
    fn delete_object_removes_its_directory() {
        let dir = tempfile::tempdir().unwrap();
        let factory =
            FsSessionFactory::new(dir.path().to_path_buf(), DigestAlgorithm::Sha256).unwrap();
        {
            let mut session = factory.new_session("info:fedora/gone").unwrap();
            let when = chrono::Utc::now();
            session.set_version_timestamp(when);
            session
                .write_resource(
                    crate::headers::ResourceHeaders {
                        id: "info:fedora/gone".into(),
                        parent_id: None,
                        interaction_model: crate::headers::InteractionModel::BasicContainer,
                        object_root: true,
                        archival_group: false,
                        deleted: false,
                        created_by: "fedoraAdmin".into(),
                        created_date: when,
                        last_modified_by: "fedoraAdmin".into(),
                        last_modified_date: when,
                        state_token: crate::headers::ResourceHeaders::compute_state_token(when),
                        content_size: None,
                        digests: Vec::new(),
                        filename: None,
                        mime_type: None,
                        external_url: None,
                        external_handling: None,
                    },
                    None,
                )
                .unwrap();
            session.commit().unwrap();
        }
        assert!(factory.contains_object("info:fedora/gone").unwrap());
        factory.delete_object("info:fedora/gone").unwrap();
        assert!(!factory.contains_object("info:fedora/gone").unwrap());
    }
}
