use crate::error::RdfError;
use crate::model::Model;
use crate::namespaces;
use oxrdf::{NamedNode, Subject, Term, TripleRef};

/// Rewrites a URI that starts with `from_prefix` to start with `to_prefix` instead,
/// stripping any trailing slashes from the result. URIs that don't match `from_prefix`
/// are returned unchanged.
pub fn translate_uri(uri: &str, from_prefix: &str, to_prefix: &str) -> String {
    if let Some(suffix) = uri.strip_prefix(from_prefix) {
        let rewritten = format!("{}{}", to_prefix, suffix);
        rewritten.trim_end_matches('/').to_string()
    } else {
        uri.to_string()
    }
}

fn translate_subject(
    subject: &Subject,
    from_prefix: &str,
    to_prefix: &str,
) -> Result<Subject, RdfError> {
    match subject {
        Subject::NamedNode(node) => {
            let translated = translate_uri(node.as_str(), from_prefix, to_prefix);
            Ok(Subject::NamedNode(NamedNode::new(translated).map_err(
                |error| RdfError::SourceCorrupt(error.to_string()),
            )?))
        }
        other => Ok(other.clone()),
    }
}

fn translate_object(
    object: &Term,
    from_prefix: &str,
    to_prefix: &str,
) -> Result<Term, RdfError> {
    match object {
        Term::NamedNode(node) => {
            let translated = translate_uri(node.as_str(), from_prefix, to_prefix);
            Ok(Term::NamedNode(NamedNode::new(translated).map_err(
                |error| RdfError::SourceCorrupt(error.to_string()),
            )?))
        }
        other => Ok(other.clone()),
    }
}

/// True if this triple should be dropped because the target repository re-derives it.
fn is_server_managed(predicate: &str, object: &Term) -> bool {
    if predicate == namespaces::RDF_TYPE {
        if let Term::NamedNode(node) = object {
            if namespaces::is_managed_type(node.as_str()) {
                return true;
            }
        }
    }
    namespaces::is_managed_predicate(predicate)
}

/// Serializes `model` as N-Triples, dropping server-managed triples and rewriting
/// subject/object URIs that begin with `from_prefix` to begin with `to_prefix`.
pub fn write_rdf_translate_ids(
    model: &Model,
    from_prefix: &str,
    to_prefix: &str,
) -> Result<Vec<u8>, RdfError> {
    let mut serializer = oxttl::NTriplesSerializer::new().for_writer(Vec::new());
    for triple in model.triples() {
        if is_server_managed(triple.predicate.as_str(), &triple.object) {
            continue;
        }
        let subject = translate_subject(&triple.subject, from_prefix, to_prefix)?;
        let object = translate_object(&triple.object, from_prefix, to_prefix)?;
        serializer.serialize_triple(TripleRef::new(
            subject.as_ref(),
            triple.predicate.as_ref(),
            object.as_ref(),
        ))?;
    }
    Ok(serializer.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_slash_after_rewrite() {
        let translated = translate_uri(
            "http://example.org/rest/foo/",
            "http://example.org/rest",
            "info:fedora",
        );
        assert_eq!(translated, "info:fedora/foo");
    }

    #[test]
    fn leaves_unrelated_uris_untouched() {
        let translated = translate_uri(
            "http://example.com/other",
            "http://example.org/rest",
            "info:fedora",
        );
        assert_eq!(translated, "http://example.com/other");
    }

    #[test]
    fn drops_managed_predicates_and_types() {
        assert!(is_server_managed(
            namespaces::LDP_CONTAINS,
            &Term::Literal(oxrdf::Literal::new_simple_literal("x"))
        ));
        assert!(is_server_managed(
            namespaces::RDF_TYPE,
            &Term::NamedNode(NamedNode::new(namespaces::LDP_BASIC_CONTAINER).unwrap())
        ));
        assert!(!is_server_managed(
            "http://purl.org/dc/terms/title",
            &Term::Literal(oxrdf::Literal::new_simple_literal("x"))
        ));
    }
}
