//! AST for axiom documents.

use crate::axiom::{Axiom, Entity, EntityDomain};
use std::fmt;

/// A term as written: a bare name or a nested call.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// Identifier or `<iri>`
    Name(String),
    /// `Head(arg, ...)`
    Call { head: String, args: Vec<Term> },
}

impl Term {
    /// Named terms become named entities; nested calls are anonymous
    /// expressions kept in rendered form.
    pub fn to_entity(&self) -> Entity {
        match self {
            Term::Name(n) => Entity::Named(n.clone()),
            Term::Call { .. } => Entity::Anonymous(self.to_string()),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Name(n) => write!(f, "{}", n),
            Term::Call { head, args } => {
                write!(f, "{}(", head)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// A top-level statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `Class(A).` or `ObjectProperty(p).`
    Declare(EntityDomain, String),
    /// `SubClassOf(A, B).`
    Assert(Axiom),
    /// `SubClassOf(A, B)?`
    Query(Axiom),
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Declare(EntityDomain::Concept, n) => write!(f, "Class({}).", n),
            Statement::Declare(EntityDomain::Property, n) => write!(f, "ObjectProperty({}).", n),
            Statement::Assert(a) => write!(f, "{}.", a),
            Statement::Query(a) => write!(f, "{}?", a),
        }
    }
}
