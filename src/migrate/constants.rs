// Process-wide constants: on-disk naming conventions for the export tree and
// the memento timestamp format. Initialized once, never mutated (§9 Global state).

/// Directory holding a resource's memento history.
pub static VERSIONS_DIR: &str = "fcr%3Aversions";
/// Directory/file holding a binary's RDF description.
pub static METADATA: &str = "fcr%3Ametadata";
/// File holding a resource's ACL RDF, if any.
pub static ACL_FILE: &str = "fcr%3Aacl";

pub static BINARY_EXT: &str = "binary";
pub static EXTERNAL_EXT: &str = "external";
pub static HEADERS_EXT: &str = "headers";

/// `YYYYMMDDhhmmss` in UTC, the on-disk memento basename format.
pub static MEMENTO_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Suffix appended to a parent's full identifier for its binary description sub-resource.
pub static FCR_METADATA_SUFFIX: &str = "fcr:metadata";
/// Suffix appended to a parent's full identifier for its ACL sub-resource.
pub static FCR_ACL_SUFFIX: &str = "fcr:acl";

/// On-disk file extension for `syntax`, used to name RDF sidecar files.
pub fn rdf_extension(syntax: rdf::RdfSyntax) -> &'static str {
    match syntax {
        rdf::RdfSyntax::Turtle => "ttl",
        rdf::RdfSyntax::NTriples => "nt",
    }
}

/// True for on-disk names reserved by the export format (`fcr%3A...`).
pub fn is_reserved(name: &str) -> bool {
    name.starts_with("fcr")
}
