// RDF document I/O: parsing an export's per-resource Turtle/N-Triples sidecar
// files, and re-serializing them for the target repository with server-managed
// triples dropped and identifiers translated to the internal URI scheme.
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate strum_macros;

mod error;
mod model;
pub mod namespaces;
mod translate;

pub use error::RdfError;
pub use model::{is_named, named_node, parse_rdf, parse_syntax, Model, RdfSyntax};
pub use translate::{translate_uri, write_rdf_translate_ids};

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_ttl(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parses_turtle_and_extracts_values() {
        let file = write_ttl(
            r#"
            @prefix fedora: <http://fedora.info/definitions/v4/repository#> .
            <http://example.org/rest/foo> fedora:lastModified "2020-10-15T05:39:47Z"^^<http://www.w3.org/2001/XMLSchema#dateTime> .
            <http://example.org/rest/foo> a <http://www.w3.org/ns/ldp#BasicContainer> .
            "#,
        );
        let model = parse_rdf(file.path(), RdfSyntax::Turtle).unwrap();
        let modified = model.date_value(namespaces::FEDORA_LAST_MODIFIED).unwrap();
        assert_eq!(modified.to_rfc3339(), "2020-10-15T05:39:47+00:00");
        assert_eq!(model.types(), vec![namespaces::LDP_BASIC_CONTAINER]);
    }

    #[test]
    fn translate_drops_managed_triples_and_rewrites_ids() {
        let file = write_ttl(
            r#"
            @prefix ldp: <http://www.w3.org/ns/ldp#> .
            @prefix dcterms: <http://purl.org/dc/terms/> .
            <http://example.org/rest/foo> ldp:contains <http://example.org/rest/foo/bar> .
            <http://example.org/rest/foo> dcterms:title "Title" .
            "#,
        );
        let model = parse_rdf(file.path(), RdfSyntax::Turtle).unwrap();
        let bytes =
            write_rdf_translate_ids(&model, "http://example.org/rest", "info:fedora").unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(!text.contains("ldp:contains"));
        assert!(!text.contains("example.org"));
        assert!(text.contains("info:fedora/foo"));
        assert!(text.contains("\"Title\""));
    }

    #[test]
    fn parse_syntax_falls_back_to_turtle() {
        assert_eq!(parse_syntax("ttl"), RdfSyntax::Turtle);
        assert_eq!(parse_syntax("nt"), RdfSyntax::NTriples);
        assert_eq!(parse_syntax("bogus"), RdfSyntax::Turtle);
    }
}
