//! In-memory asserted fact source.
//!
//! Holds the axioms a reasoner is seeded from plus any explicitly declared
//! entities, both in insertion order.

use crate::axiom::{Axiom, EntityDomain, FactKind};
use indexmap::IndexSet;

/// A set of asserted axioms and declared entities.
#[derive(Debug, Clone, Default)]
pub struct Ontology {
    axioms: IndexSet<Axiom>,
    concepts: IndexSet<String>,
    properties: IndexSet<String>,
}

impl Ontology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an axiom. Returns false if it was already present.
    pub fn add_axiom(&mut self, axiom: Axiom) -> bool {
        self.axioms.insert(axiom)
    }

    /// Declare an entity that may not occur in any axiom.
    pub fn declare(&mut self, domain: EntityDomain, name: impl Into<String>) -> bool {
        match domain {
            EntityDomain::Concept => self.concepts.insert(name.into()),
            EntityDomain::Property => self.properties.insert(name.into()),
        }
    }

    pub fn declare_concept(&mut self, name: impl Into<String>) -> bool {
        self.declare(EntityDomain::Concept, name)
    }

    pub fn declare_property(&mut self, name: impl Into<String>) -> bool {
        self.declare(EntityDomain::Property, name)
    }

    pub fn axioms(&self) -> impl Iterator<Item = &Axiom> {
        self.axioms.iter()
    }

    /// Axioms of any of the given kinds, in insertion order.
    pub fn axioms_of<'a>(&'a self, kinds: &'a [FactKind]) -> impl Iterator<Item = &'a Axiom> + 'a {
        self.axioms.iter().filter(move |a| kinds.contains(&a.kind()))
    }

    /// Declared entity names of one domain.
    pub fn declared(&self, domain: EntityDomain) -> impl Iterator<Item = &str> {
        let names = match domain {
            EntityDomain::Concept => &self.concepts,
            EntityDomain::Property => &self.properties,
        };
        names.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.axioms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axioms.is_empty()
    }
}

impl FromIterator<Axiom> for Ontology {
    fn from_iter<I: IntoIterator<Item = Axiom>>(iter: I) -> Self {
        let mut ont = Ontology::new();
        for axiom in iter {
            ont.add_axiom(axiom);
        }
        ont
    }
}
