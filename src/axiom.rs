//! External fact representation.
//!
//! An [`Axiom`] is a fact-kind tag plus the entity references it relates.
//! The reasoner routes axioms to matrices by their [`FactKind`] and maps
//! their operands onto matrix coordinates through the naming registry.

use crate::error::{Result, TrexError};
use crate::explain::Justification;
use std::fmt;

/// The two entity domains a matrix axis can range over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityDomain {
    Concept,
    Property,
}

impl fmt::Display for EntityDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityDomain::Concept => write!(f, "concept"),
            EntityDomain::Property => write!(f, "property"),
        }
    }
}

/// Kinds of facts the reasoner understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FactKind {
    SubClassOf,
    EquivalentClasses,
    DisjointClasses,
    SubObjectPropertyOf,
    EquivalentObjectProperties,
    DisjointObjectProperties,
    ObjectPropertyDomain,
    ObjectPropertyRange,
}

impl FactKind {
    pub const ALL: [FactKind; 8] = [
        FactKind::SubClassOf,
        FactKind::EquivalentClasses,
        FactKind::DisjointClasses,
        FactKind::SubObjectPropertyOf,
        FactKind::EquivalentObjectProperties,
        FactKind::DisjointObjectProperties,
        FactKind::ObjectPropertyDomain,
        FactKind::ObjectPropertyRange,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FactKind::SubClassOf => "SubClassOf",
            FactKind::EquivalentClasses => "EquivalentClasses",
            FactKind::DisjointClasses => "DisjointClasses",
            FactKind::SubObjectPropertyOf => "SubObjectPropertyOf",
            FactKind::EquivalentObjectProperties => "EquivalentObjectProperties",
            FactKind::DisjointObjectProperties => "DisjointObjectProperties",
            FactKind::ObjectPropertyDomain => "ObjectPropertyDomain",
            FactKind::ObjectPropertyRange => "ObjectPropertyRange",
        }
    }

    pub fn from_name(name: &str) -> Option<FactKind> {
        FactKind::ALL.into_iter().find(|k| k.name() == name)
    }

    /// N-ary kinds take one or more operands and are read pairwise.
    pub fn is_nary(self) -> bool {
        matches!(
            self,
            FactKind::EquivalentClasses
                | FactKind::DisjointClasses
                | FactKind::EquivalentObjectProperties
                | FactKind::DisjointObjectProperties
        )
    }

    /// Domain of the operand at `position`.
    pub fn operand_domain(self, position: usize) -> EntityDomain {
        match self {
            FactKind::SubClassOf | FactKind::EquivalentClasses | FactKind::DisjointClasses => {
                EntityDomain::Concept
            }
            FactKind::SubObjectPropertyOf
            | FactKind::EquivalentObjectProperties
            | FactKind::DisjointObjectProperties => EntityDomain::Property,
            FactKind::ObjectPropertyDomain | FactKind::ObjectPropertyRange => {
                if position == 0 {
                    EntityDomain::Property
                } else {
                    EntityDomain::Concept
                }
            }
        }
    }
}

impl fmt::Display for FactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An entity reference inside a fact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Entity {
    /// A named concept or property.
    Named(String),
    /// A complex expression, kept only in its rendered form.
    Anonymous(String),
}

impl Entity {
    pub fn named(name: impl Into<String>) -> Self {
        Entity::Named(name.into())
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Entity::Named(n) => Some(n),
            Entity::Anonymous(_) => None,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Named(n) | Entity::Anonymous(n) => f.write_str(n),
        }
    }
}

/// A fact: its kind and the entities it relates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Axiom {
    kind: FactKind,
    operands: Vec<Entity>,
}

impl Axiom {
    /// Build an axiom, checking the operand count against the kind.
    pub fn new(kind: FactKind, operands: Vec<Entity>) -> Result<Self> {
        let ok = if kind.is_nary() {
            !operands.is_empty()
        } else {
            operands.len() == 2
        };
        let axiom = Axiom { kind, operands };
        if !ok {
            return Err(TrexError::unprocessable(
                &axiom,
                format!("wrong number of operands for {}", kind),
            ));
        }
        Ok(axiom)
    }

    fn binary(kind: FactKind, a: &str, b: &str) -> Self {
        Axiom {
            kind,
            operands: vec![Entity::named(a), Entity::named(b)],
        }
    }

    fn nary(kind: FactKind, names: &[&str]) -> Self {
        Axiom {
            kind,
            operands: names.iter().map(|n| Entity::named(*n)).collect(),
        }
    }

    pub fn sub_class_of(sub: &str, sup: &str) -> Self {
        Self::binary(FactKind::SubClassOf, sub, sup)
    }

    pub fn sub_property_of(sub: &str, sup: &str) -> Self {
        Self::binary(FactKind::SubObjectPropertyOf, sub, sup)
    }

    pub fn domain(property: &str, concept: &str) -> Self {
        Self::binary(FactKind::ObjectPropertyDomain, property, concept)
    }

    pub fn range(property: &str, concept: &str) -> Self {
        Self::binary(FactKind::ObjectPropertyRange, property, concept)
    }

    /// # Panics
    /// Panics if `concepts` is empty.
    pub fn equivalent_classes(concepts: &[&str]) -> Self {
        assert!(!concepts.is_empty(), "equivalence needs an operand");
        Self::nary(FactKind::EquivalentClasses, concepts)
    }

    /// # Panics
    /// Panics if `concepts` is empty.
    pub fn disjoint_classes(concepts: &[&str]) -> Self {
        assert!(!concepts.is_empty(), "disjointness needs an operand");
        Self::nary(FactKind::DisjointClasses, concepts)
    }

    /// # Panics
    /// Panics if `properties` is empty.
    pub fn equivalent_properties(properties: &[&str]) -> Self {
        assert!(!properties.is_empty(), "equivalence needs an operand");
        Self::nary(FactKind::EquivalentObjectProperties, properties)
    }

    /// # Panics
    /// Panics if `properties` is empty.
    pub fn disjoint_properties(properties: &[&str]) -> Self {
        assert!(!properties.is_empty(), "disjointness needs an operand");
        Self::nary(FactKind::DisjointObjectProperties, properties)
    }

    pub fn kind(&self) -> FactKind {
        self.kind
    }

    pub fn operands(&self) -> &[Entity] {
        &self.operands
    }

    /// The first anonymous operand, if any.
    pub fn anonymous_operand(&self) -> Option<&Entity> {
        self.operands
            .iter()
            .find(|e| matches!(e, Entity::Anonymous(_)))
    }

    /// Operand index pairs this axiom states a relation between.
    ///
    /// Binary kinds give `(0, 1)`. N-ary kinds give every unordered pair of
    /// positions, or `(0, 0)` when there is a single operand.
    pub fn pair_indices(&self) -> Vec<(usize, usize)> {
        if !self.kind.is_nary() {
            return vec![(0, 1)];
        }
        if self.operands.len() == 1 {
            return vec![(0, 0)];
        }
        (1..self.operands.len())
            .flat_map(|i| (0..i).map(move |j| (i, j)))
            .collect()
    }

    /// The two-operand fact stating only the pair at `(i, j)`.
    ///
    /// Operands keep the order they were stated in.
    pub fn pairwise(&self, i: usize, j: usize) -> Axiom {
        if !self.kind.is_nary() || self.operands.len() <= 2 {
            return self.clone();
        }
        let (lo, hi) = (i.min(j), i.max(j));
        Axiom {
            kind: self.kind,
            operands: vec![self.operands[lo].clone(), self.operands[hi].clone()],
        }
    }

    /// The justification quoting this fact.
    pub fn justification(&self) -> Justification {
        Justification::new(self.to_string())
    }
}

impl fmt::Display for Axiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.kind)?;
        for (i, e) in self.operands.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", e)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_names() {
        assert_eq!(Axiom::sub_class_of("A", "B").to_string(), "SubClassOf(A, B)");
        assert_eq!(
            Axiom::disjoint_classes(&["A", "B", "C"]).to_string(),
            "DisjointClasses(A, B, C)"
        );
        for kind in FactKind::ALL {
            assert_eq!(FactKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn test_arity_checked() {
        let err = Axiom::new(FactKind::SubClassOf, vec![Entity::named("A")]);
        assert!(matches!(err, Err(TrexError::UnprocessableFact { .. })));
        assert!(Axiom::new(FactKind::DisjointClasses, vec![]).is_err());
        assert!(Axiom::new(FactKind::DisjointObjectProperties, vec![Entity::named("p")]).is_ok());
    }

    #[test]
    fn test_pairs() {
        let d = Axiom::disjoint_classes(&["A", "B", "C"]);
        assert_eq!(d.pair_indices(), vec![(1, 0), (2, 0), (2, 1)]);
        assert_eq!(d.pairwise(2, 1).to_string(), "DisjointClasses(B, C)");
        let pair = Axiom::disjoint_classes(&["A", "B"]);
        assert_eq!(pair.pairwise(1, 0), pair);
        assert_eq!(Axiom::disjoint_properties(&["p"]).pair_indices(), vec![(0, 0)]);
        assert_eq!(Axiom::domain("p", "A").pair_indices(), vec![(0, 1)]);
    }

    #[test]
    fn test_operand_domains() {
        assert_eq!(FactKind::ObjectPropertyRange.operand_domain(0), EntityDomain::Property);
        assert_eq!(FactKind::ObjectPropertyRange.operand_domain(1), EntityDomain::Concept);
        assert_eq!(FactKind::DisjointClasses.operand_domain(3), EntityDomain::Concept);
    }
}
