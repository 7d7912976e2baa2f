//! Syntax module: lexer, parser, AST and document loading.

pub mod ast;
mod parser;
mod token;

pub use ast::{Statement, Term};
pub use parser::{parse, parse_statement, Parser};
pub use token::Token;

use crate::axiom::Axiom;
use crate::error::Result;
use crate::ontology::Ontology;
use std::path::Path;

/// A loaded document: the asserted ontology plus the queries it poses.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub ontology: Ontology,
    pub queries: Vec<Axiom>,
}

impl Document {
    pub fn parse(text: &str) -> Result<Self> {
        let mut doc = Document::default();
        for stmt in parse(text)? {
            match stmt {
                Statement::Declare(domain, name) => {
                    doc.ontology.declare(domain, name);
                }
                Statement::Assert(axiom) => {
                    doc.ontology.add_axiom(axiom);
                }
                Statement::Query(axiom) => doc.queries.push(axiom),
            }
        }
        Ok(doc)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axiom::EntityDomain;
    use crate::error::TrexError;

    #[test]
    fn test_document_split() {
        let doc = Document::parse(
            "Class(Orphan).\n\
             SubClassOf(A, B).\n\
             SubClassOf(A, B).\n\
             ObjectPropertyDomain(p, A).\n\
             SubClassOf(A, B)?\n",
        )
        .unwrap();
        assert_eq!(doc.ontology.len(), 2);
        assert_eq!(
            doc.ontology.declared(EntityDomain::Concept).collect::<Vec<_>>(),
            vec!["Orphan"]
        );
        assert_eq!(doc.queries, vec![Axiom::sub_class_of("A", "B")]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Document::load("/nonexistent/trex/doc.ofn").unwrap_err();
        assert!(matches!(err, TrexError::Io(_)));
    }
}
