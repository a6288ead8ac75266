use crate::error::RdfError;
use oxrdf::{NamedNode, Subject, Term, Triple};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

/// The RDF syntax a document is encoded in. Turtle is the export default;
/// N-Triples is accepted as well (`srcRdfLang`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum RdfSyntax {
    #[strum(serialize = "turtle", serialize = "ttl")]
    Turtle,
    #[strum(serialize = "ntriples", serialize = "nt")]
    NTriples,
}

impl Default for RdfSyntax {
    fn default() -> Self {
        RdfSyntax::Turtle
    }
}

/// An in-memory, unindexed triple store for a single resource's RDF document.
/// Kept intentionally simple: per-resource documents are small, and every
/// extraction the migrator needs is a linear scan by predicate.
#[derive(Debug, Clone, Default)]
pub struct Model {
    triples: Vec<Triple>,
}

impl Model {
    pub fn new(triples: Vec<Triple>) -> Self {
        Model { triples }
    }

    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    fn objects_for<'a>(&'a self, predicate: &'a str) -> impl Iterator<Item = &'a Term> {
        self.triples
            .iter()
            .filter(move |triple| triple.predicate.as_str() == predicate)
            .map(|triple| &triple.object)
    }

    /// The literal lexical value of the first statement with the given predicate.
    pub fn first_value(&self, predicate: &str) -> Option<String> {
        self.objects_for(predicate).find_map(|term| match term {
            Term::Literal(literal) => Some(literal.value().to_string()),
            _ => None,
        })
    }

    /// The first statement with the given predicate, parsed as an RFC 3339 date-time, in UTC.
    pub fn date_value(&self, predicate: &str) -> Option<chrono::DateTime<chrono::Utc>> {
        let value = self.first_value(predicate)?;
        chrono::DateTime::parse_from_rfc3339(&value)
            .ok()
            .map(|dt| dt.with_timezone(&chrono::Utc))
    }

    /// Every URI object of the given predicate, in encounter order.
    pub fn uris(&self, predicate: &str) -> Vec<String> {
        self.objects_for(predicate)
            .filter_map(|term| match term {
                Term::NamedNode(node) => Some(node.as_str().to_string()),
                _ => None,
            })
            .collect()
    }

    /// All `rdf:type` object URIs.
    pub fn types(&self) -> Vec<String> {
        self.uris(crate::namespaces::RDF_TYPE)
    }
}

/// Reads and parses the RDF document at `path` using the given syntax.
pub fn parse_rdf(path: &Path, syntax: RdfSyntax) -> Result<Model, RdfError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let triples = match syntax {
        RdfSyntax::Turtle => {
            let mut triples = Vec::new();
            for result in oxttl::TurtleParser::new().for_reader(reader) {
                triples.push(result?);
            }
            triples
        }
        RdfSyntax::NTriples => {
            let mut triples = Vec::new();
            for result in oxttl::NTriplesParser::new().for_reader(reader) {
                triples.push(result?);
            }
            triples
        }
    };
    Ok(Model::new(triples))
}

/// Parses `s` as an RDF syntax name; falls back to Turtle for an unrecognized value,
/// matching the export default.
pub fn parse_syntax(s: &str) -> RdfSyntax {
    RdfSyntax::from_str(&s.to_lowercase()).unwrap_or_default()
}

/// Returns true if `node` names a URI (as opposed to a blank node).
pub fn is_named(node: &Subject) -> bool {
    matches!(node, Subject::NamedNode(_))
}

pub fn named_node(uri: &str) -> Result<NamedNode, RdfError> {
    NamedNode::new(uri).map_err(|error| RdfError::SourceCorrupt(error.to_string()))
}
