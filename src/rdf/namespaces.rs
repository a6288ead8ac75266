// Process-wide constants: namespace prefixes and the managed-predicate set.
// Initialized once, never mutated, matching the teacher's use of `lazy_static!`
// for similarly global, read-only lookup tables.
use std::collections::HashSet;

pub static RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

pub static LDP_NS: &str = "http://www.w3.org/ns/ldp#";
pub static FEDORA_NS: &str = "http://fedora.info/definitions/v4/repository#";
pub static MEMENTO_NS: &str = "http://mementoweb.org/ns#";
pub static PREMIS_NS: &str = "http://www.loc.gov/premis/rdf/v1#";
pub static EBUCORE_NS: &str = "http://www.ebu.ch/metadata/ontologies/ebucore/ebucore#";

pub static LDP_BASIC_CONTAINER: &str = "http://www.w3.org/ns/ldp#BasicContainer";
pub static LDP_DIRECT_CONTAINER: &str = "http://www.w3.org/ns/ldp#DirectContainer";
pub static LDP_INDIRECT_CONTAINER: &str = "http://www.w3.org/ns/ldp#IndirectContainer";

pub static FEDORA_CREATED: &str = "http://fedora.info/definitions/v4/repository#created";
pub static FEDORA_CREATED_BY: &str = "http://fedora.info/definitions/v4/repository#createdBy";
pub static FEDORA_LAST_MODIFIED: &str =
    "http://fedora.info/definitions/v4/repository#lastModified";
pub static FEDORA_LAST_MODIFIED_BY: &str =
    "http://fedora.info/definitions/v4/repository#lastModifiedBy";

pub static PREMIS_HAS_SIZE: &str = "http://www.loc.gov/premis/rdf/v1#hasSize";
pub static PREMIS_HAS_MESSAGE_DIGEST: &str = "http://www.loc.gov/premis/rdf/v1#hasMessageDigest";
pub static PREMIS_HAS_FIXITY: &str = "http://www.loc.gov/premis/rdf/v1#hasFixity";
pub static EBUCORE_HAS_MIME_TYPE: &str =
    "http://www.ebu.ch/metadata/ontologies/ebucore/ebucore#hasMimeType";
pub static EBUCORE_FILENAME: &str =
    "http://www.ebu.ch/metadata/ontologies/ebucore/ebucore#filename";
pub static LDP_CONTAINS: &str = "http://www.w3.org/ns/ldp#contains";

lazy_static! {
    /// Predicates that the target repository re-derives and which are therefore
    /// dropped on serialization.
    pub static ref MANAGED_PREDICATES: HashSet<&'static str> = {
        let mut set = HashSet::new();
        set.insert(LDP_CONTAINS);
        set.insert(PREMIS_HAS_FIXITY);
        set.insert(PREMIS_HAS_MESSAGE_DIGEST);
        set.insert(PREMIS_HAS_SIZE);
        set.insert(EBUCORE_HAS_MIME_TYPE);
        set.insert(EBUCORE_FILENAME);
        set
    };

    /// Namespace prefixes for container interaction-model detection, in the
    /// order they're checked (most specific first).
    pub static ref LDP_CONTAINER_TYPES: Vec<&'static str> = vec![
        LDP_DIRECT_CONTAINER,
        LDP_INDIRECT_CONTAINER,
        LDP_BASIC_CONTAINER,
    ];
}

/// True if the predicate, or the namespace it belongs to, is server-managed.
pub fn is_managed_predicate(predicate: &str) -> bool {
    MANAGED_PREDICATES.contains(predicate)
        || predicate.starts_with(FEDORA_NS)
        || predicate.starts_with(MEMENTO_NS)
}

/// True if a `rdf:type` object URI names a server-managed (LDP/Fedora) type.
pub fn is_managed_type(object_uri: &str) -> bool {
    object_uri.starts_with(LDP_NS) || object_uri.starts_with(FEDORA_NS)
}
