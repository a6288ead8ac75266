use percent_encoding::{percent_decode_str, percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::path::{Path, PathBuf};

/// Characters left unescaped by [`encode_segment`], matching the small set
/// `NON_ALPHANUMERIC` already reserves for path-safe punctuation.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'.').remove(b'-').remove(b'_');

/// Standard form-URL encoding of a decoded identifier segment into the
/// on-disk directory/file name it corresponds to.
pub fn encode_segment(decoded: &str) -> String {
    percent_encode(decoded.as_bytes(), SEGMENT).to_string()
}

/// The inverse of [`encode_segment`].
pub fn decode_segment(encoded: &str) -> String {
    percent_decode_str(encoded).decode_utf8_lossy().into_owned()
}

/// What a [`ResourceDescriptor`] names on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Container,
    Binary,
    ExternalBinary,
}

/// Describes one resource awaiting migration: where it lives in the export
/// tree, what it's called internally, and what kind of thing it is. Owns its
/// filesystem paths exclusively for the duration of the task that migrates it.
#[derive(Debug, Clone)]
pub struct ResourceDescriptor {
    pub parent_id: Option<String>,
    pub full_id: String,
    pub outer_dir: PathBuf,
    pub name_encoded: String,
    pub kind: ResourceKind,
}

impl ResourceDescriptor {
    /// The directory holding this resource's own contents: `outerDir/nameEncoded`.
    pub fn inner_dir(&self) -> PathBuf {
        self.outer_dir.join(&self.name_encoded)
    }

    fn new(
        parent_id: Option<String>,
        full_id: String,
        outer_dir: PathBuf,
        name_encoded: String,
        kind: ResourceKind,
    ) -> Self {
        ResourceDescriptor {
            parent_id,
            full_id,
            outer_dir,
            name_encoded,
            kind,
        }
    }

    pub fn container(
        parent_id: Option<String>,
        full_id: String,
        outer_dir: PathBuf,
        name_encoded: String,
    ) -> Self {
        Self::new(parent_id, full_id, outer_dir, name_encoded, ResourceKind::Container)
    }

    pub fn binary(
        parent_id: Option<String>,
        full_id: String,
        outer_dir: PathBuf,
        name_encoded: String,
    ) -> Self {
        Self::new(parent_id, full_id, outer_dir, name_encoded, ResourceKind::Binary)
    }

    pub fn external_binary(
        parent_id: Option<String>,
        full_id: String,
        outer_dir: PathBuf,
        name_encoded: String,
    ) -> Self {
        Self::new(
            parent_id,
            full_id,
            outer_dir,
            name_encoded,
            ResourceKind::ExternalBinary,
        )
    }

    /// Builds the full identifier for a child named `decoded_name` of this resource.
    pub fn child_id(&self, decoded_name: &str) -> String {
        format!("{}/{}", self.full_id, decoded_name)
    }

    /// The root descriptor for an entire export tree under `input_dir`, identified
    /// by `base_id` (the internal prefix, constant across a run).
    pub fn root(input_dir: &Path, base_id: &str) -> Self {
        ResourceDescriptor::container(
            None,
            base_id.to_string(),
            input_dir.to_path_buf(),
            String::new(),
        )
    }
}
