use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The LDP interaction model a resource is addressed as. The container
/// variants are resolved by scanning a container's `rdf:type` statements
/// against the closed set of known LDP container types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum InteractionModel {
    BasicContainer,
    DirectContainer,
    IndirectContainer,
    /// A container whose type didn't match any of the known LDP container
    /// types; treated as a generic RDF source.
    RdfSource,
    NonRdfSource,
    NonRdfSourceDescription,
    Acl,
}

/// How an external binary's content is reached: redirected straight to the
/// client, or proxied through the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum ExternalHandling {
    Redirect,
    Proxy,
}

/// The header record synthesized for one OCFL resource version. Immutable
/// once handed to a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceHeaders {
    pub id: String,
    pub parent_id: Option<String>,
    pub interaction_model: InteractionModel,
    pub object_root: bool,
    pub archival_group: bool,
    pub deleted: bool,
    pub created_by: String,
    pub created_date: DateTime<Utc>,
    pub last_modified_by: String,
    pub last_modified_date: DateTime<Utc>,
    pub state_token: String,
    pub content_size: Option<i64>,
    pub digests: Vec<String>,
    pub filename: Option<String>,
    pub mime_type: Option<String>,
    pub external_url: Option<String>,
    pub external_handling: Option<ExternalHandling>,
}

impl ResourceHeaders {
    /// `stateToken = uppercase(md5-hex(lastModifiedDate.epochMilliseconds))`.
    pub fn compute_state_token(last_modified_date: DateTime<Utc>) -> String {
        use md5::{Digest, Md5};
        let millis = last_modified_date.timestamp_millis();
        let mut hasher = Md5::new();
        hasher.update(millis.to_string().as_bytes());
        hex::encode(hasher.finalize()).to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn state_token_is_deterministic_and_uppercase() {
        let when = Utc.ymd(2020, 10, 15).and_hms(5, 39, 47);
        let a = ResourceHeaders::compute_state_token(when);
        let b = ResourceHeaders::compute_state_token(when);
        assert_eq!(a, b);
        assert_eq!(a, a.to_uppercase());
    }
}
