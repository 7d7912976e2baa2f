//! Name to id lookup for concepts and properties.

use crate::axiom::{Entity, EntityDomain};
use crate::error::{Result, TrexError};
use crate::ontology::Ontology;
use rustc_hash::FxHashMap;

/// One interned domain: string -> dense id, and back.
#[derive(Debug, Clone, Default)]
struct SymbolTable {
    ids: FxHashMap<String, usize>,
    names: Vec<String>,
}

impl SymbolTable {
    fn intern(&mut self, s: &str) -> usize {
        if let Some(&id) = self.ids.get(s) {
            id
        } else {
            let id = self.names.len();
            self.ids.insert(s.to_string(), id);
            self.names.push(s.to_string());
            id
        }
    }

    fn id(&self, s: &str) -> Option<usize> {
        self.ids.get(s).copied()
    }

    fn name(&self, id: usize) -> Option<&str> {
        self.names.get(id).map(|s| s.as_str())
    }
}

/// Fixed enumeration of the named concepts and properties of an ontology.
///
/// Ids are assigned once, declarations first and then in order of first
/// appearance in the axioms, and are never renumbered.
#[derive(Debug, Clone, Default)]
pub struct NamingRegistry {
    concepts: SymbolTable,
    properties: SymbolTable,
}

impl NamingRegistry {
    pub fn from_ontology(ontology: &Ontology) -> Self {
        let mut registry = NamingRegistry::default();
        for domain in [EntityDomain::Concept, EntityDomain::Property] {
            for name in ontology.declared(domain) {
                registry.table_mut(domain).intern(name);
            }
        }
        for axiom in ontology.axioms() {
            let kind = axiom.kind();
            for (position, operand) in axiom.operands().iter().enumerate() {
                if let Entity::Named(name) = operand {
                    registry.table_mut(kind.operand_domain(position)).intern(name);
                }
            }
        }
        registry
    }

    fn table(&self, domain: EntityDomain) -> &SymbolTable {
        match domain {
            EntityDomain::Concept => &self.concepts,
            EntityDomain::Property => &self.properties,
        }
    }

    fn table_mut(&mut self, domain: EntityDomain) -> &mut SymbolTable {
        match domain {
            EntityDomain::Concept => &mut self.concepts,
            EntityDomain::Property => &mut self.properties,
        }
    }

    /// Id of `name` in `domain`.
    pub fn id(&self, domain: EntityDomain, name: &str) -> Result<usize> {
        self.table(domain)
            .id(name)
            .ok_or_else(|| TrexError::UnknownEntity(format!("{} {}", domain, name)))
    }

    pub fn name(&self, domain: EntityDomain, id: usize) -> Option<&str> {
        self.table(domain).name(id)
    }

    pub fn count(&self, domain: EntityDomain) -> usize {
        self.table(domain).names.len()
    }

    pub fn concept_id(&self, name: &str) -> Result<usize> {
        self.id(EntityDomain::Concept, name)
    }

    pub fn concept_name(&self, id: usize) -> Option<&str> {
        self.name(EntityDomain::Concept, id)
    }

    pub fn property_id(&self, name: &str) -> Result<usize> {
        self.id(EntityDomain::Property, name)
    }

    pub fn property_name(&self, id: usize) -> Option<&str> {
        self.name(EntityDomain::Property, id)
    }

    pub fn concept_count(&self) -> usize {
        self.count(EntityDomain::Concept)
    }

    pub fn property_count(&self) -> usize {
        self.count(EntityDomain::Property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axiom::{Axiom, FactKind};

    #[test]
    fn test_ids_follow_first_appearance() {
        let mut ont = Ontology::new();
        ont.declare_concept("Top");
        ont.add_axiom(Axiom::sub_class_of("A", "B"));
        ont.add_axiom(Axiom::domain("p", "A"));
        ont.add_axiom(Axiom::sub_class_of("B", "C"));
        let naming = NamingRegistry::from_ontology(&ont);

        assert_eq!(naming.concept_id("Top").unwrap(), 0);
        assert_eq!(naming.concept_id("A").unwrap(), 1);
        assert_eq!(naming.concept_id("C").unwrap(), 3);
        assert_eq!(naming.concept_count(), 4);
        assert_eq!(naming.property_count(), 1);
        assert_eq!(naming.property_name(0), Some("p"));
        assert_eq!(naming.concept_name(9), None);
    }

    #[test]
    fn test_domains_are_separate() {
        let ont: Ontology = [Axiom::domain("A", "A")].into_iter().collect();
        let naming = NamingRegistry::from_ontology(&ont);
        assert_eq!(naming.concept_id("A").unwrap(), 0);
        assert_eq!(naming.property_id("A").unwrap(), 0);
    }

    #[test]
    fn test_unknown_entity() {
        let naming = NamingRegistry::default();
        assert!(matches!(naming.concept_id("Nope"), Err(TrexError::UnknownEntity(_))));
    }

    #[test]
    fn test_anonymous_operands_are_not_named() {
        let axiom = Axiom::new(
            FactKind::SubClassOf,
            vec![
                Entity::named("A"),
                Entity::Anonymous("ObjectSomeValuesFrom(p, B)".into()),
            ],
        )
        .unwrap();
        let ont: Ontology = [axiom].into_iter().collect();
        let naming = NamingRegistry::from_ontology(&ont);
        assert_eq!(naming.concept_count(), 1);
        assert_eq!(naming.property_count(), 0);
    }
}
