//! Subsumption and disjointness over a single entity domain.

use super::{cell_explanation, derive, InferenceStep, Peers, Relation};
use crate::axiom::{Axiom, EntityDomain, FactKind};
use crate::matrix::RelationMatrix;
use crate::reasoner::NamingRegistry;

/// Transitive closure of "is-a" over concepts or properties.
///
/// `subsumes(row, i) ∧ subsumes(i, col) ⇒ subsumes(row, col)`. A true
/// diagonal cell marks an entity on a cycle of the asserted hierarchy.
#[derive(Debug, Clone, Copy)]
pub struct Subsumption {
    domain: EntityDomain,
}

impl Subsumption {
    pub fn new(domain: EntityDomain) -> Self {
        Self { domain }
    }
}

impl InferenceStep for Subsumption {
    fn relation(&self) -> Relation {
        match self.domain {
            EntityDomain::Concept => Relation::ConceptSubsumption,
            EntityDomain::Property => Relation::PropertySubsumption,
        }
    }

    fn fact_kinds(&self) -> &'static [FactKind] {
        match self.domain {
            EntityDomain::Concept => &[FactKind::SubClassOf, FactKind::EquivalentClasses],
            EntityDomain::Property => &[
                FactKind::SubObjectPropertyOf,
                FactKind::EquivalentObjectProperties,
            ],
        }
    }

    fn is_symmetric(&self) -> bool {
        false
    }

    fn dimensions(&self, naming: &NamingRegistry) -> (usize, usize) {
        let n = naming.count(self.domain);
        (n, n)
    }

    fn cells_for(&self, kind: FactKind, a: usize, b: usize) -> Vec<(usize, usize)> {
        match kind {
            FactKind::EquivalentClasses | FactKind::EquivalentObjectProperties => {
                // An entity is trivially equivalent to itself; that is not a cycle.
                if a == b {
                    vec![]
                } else {
                    vec![(a, b), (b, a)]
                }
            }
            _ => vec![(a, b)],
        }
    }

    /// `EquivalentClasses(A, A)` maps to no cell but always holds.
    fn holds_trivially(&self, kind: FactKind) -> bool {
        matches!(
            kind,
            FactKind::EquivalentClasses | FactKind::EquivalentObjectProperties
        )
    }

    fn infer(&self, matrix: &mut RelationMatrix, _peers: &Peers<'_>, row: usize, col: usize) -> bool {
        let mut changed = false;
        for i in 0..matrix.rows() {
            if matrix.get(row, i) && matrix.get(i, col) {
                let left = cell_explanation(matrix, row, i);
                let right = cell_explanation(matrix, i, col);
                changed |= derive(matrix, row, col, left, right);
            }
        }
        changed
    }

    fn axiom_at(&self, row: usize, col: usize, naming: &NamingRegistry) -> Option<Axiom> {
        let sub = naming.name(self.domain, row)?;
        let sup = naming.name(self.domain, col)?;
        Some(match self.domain {
            EntityDomain::Concept => Axiom::sub_class_of(sub, sup),
            EntityDomain::Property => Axiom::sub_property_of(sub, sup),
        })
    }
}

/// Pairwise disjointness, propagated down the subsumption hierarchy.
///
/// `subsumes(row, i) ∧ disjoint(i, col) ⇒ disjoint(row, col)`. A true
/// diagonal cell marks an unsatisfiable entity.
#[derive(Debug, Clone, Copy)]
pub struct Disjointness {
    domain: EntityDomain,
}

impl Disjointness {
    pub fn new(domain: EntityDomain) -> Self {
        Self { domain }
    }

    fn subsumption(&self) -> Relation {
        match self.domain {
            EntityDomain::Concept => Relation::ConceptSubsumption,
            EntityDomain::Property => Relation::PropertySubsumption,
        }
    }
}

impl InferenceStep for Disjointness {
    fn relation(&self) -> Relation {
        match self.domain {
            EntityDomain::Concept => Relation::ConceptDisjointness,
            EntityDomain::Property => Relation::PropertyDisjointness,
        }
    }

    fn fact_kinds(&self) -> &'static [FactKind] {
        match self.domain {
            EntityDomain::Concept => &[FactKind::DisjointClasses],
            EntityDomain::Property => &[FactKind::DisjointObjectProperties],
        }
    }

    fn is_symmetric(&self) -> bool {
        true
    }

    fn dependencies(&self) -> &'static [Relation] {
        match self.domain {
            EntityDomain::Concept => &[Relation::ConceptSubsumption],
            EntityDomain::Property => &[Relation::PropertySubsumption],
        }
    }

    fn dimensions(&self, naming: &NamingRegistry) -> (usize, usize) {
        let n = naming.count(self.domain);
        (n, n)
    }

    fn infer(&self, matrix: &mut RelationMatrix, peers: &Peers<'_>, row: usize, col: usize) -> bool {
        let Some(subsumption) = peers.get(self.subsumption()) else {
            return false;
        };
        let mut changed = false;
        for i in 0..matrix.rows() {
            if subsumption.get(row, i) && matrix.get(i, col) {
                let left = cell_explanation(subsumption, row, i);
                let right = cell_explanation(matrix, i, col);
                changed |= derive(matrix, row, col, left, right);
            }
        }
        changed
    }

    fn axiom_at(&self, row: usize, col: usize, naming: &NamingRegistry) -> Option<Axiom> {
        let a = naming.name(self.domain, row)?;
        let b = naming.name(self.domain, col)?;
        Some(match self.domain {
            EntityDomain::Concept => Axiom::disjoint_classes(&[a, b]),
            EntityDomain::Property => Axiom::disjoint_properties(&[a, b]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explain::{Conjunction, Disjunction, Justification};
    use crate::materialize::materialize;
    use crate::ontology::Ontology;

    fn ontology(axioms: &[Axiom]) -> (Ontology, NamingRegistry) {
        let mut ont = Ontology::new();
        for a in axioms {
            ont.add_axiom(a.clone());
        }
        let naming = NamingRegistry::from_ontology(&ont);
        (ont, naming)
    }

    #[test]
    fn test_subsumption_chain() {
        let (ont, naming) = ontology(&[
            Axiom::sub_class_of("A", "B"),
            Axiom::sub_class_of("B", "C"),
        ]);
        let step = Subsumption::new(EntityDomain::Concept);
        let mut m = step.size_and_seed(&ont, &naming, &Peers::none(), true).unwrap();
        materialize(&mut m, &step, &Peers::none());

        let a = naming.concept_id("A").unwrap();
        let c = naming.concept_id("C").unwrap();
        assert!(m.get(a, c));
        assert!(!m.get(c, a));

        let expected: Disjunction = [[
            Justification::new("SubClassOf(A, B)"),
            Justification::new("SubClassOf(B, C)"),
        ]
        .into_iter()
        .collect::<Conjunction>()]
        .into_iter()
        .collect();
        assert_eq!(m.explanation(a, c).unwrap(), Some(&expected));
        assert!(m.diagonal().is_empty());
    }

    #[test]
    fn test_equivalence_seeds_both_directions() {
        let (ont, naming) = ontology(&[Axiom::equivalent_classes(&["A", "B"])]);
        let step = Subsumption::new(EntityDomain::Concept);
        let m = step.size_and_seed(&ont, &naming, &Peers::none(), true).unwrap();
        let (a, b) = (naming.concept_id("A").unwrap(), naming.concept_id("B").unwrap());
        assert!(m.get(a, b) && m.get(b, a));
        assert_eq!(
            m.explanation(b, a).unwrap(),
            Some(&Disjunction::asserted(Justification::new("EquivalentClasses(A, B)")))
        );
    }

    #[test]
    fn test_disjointness_propagates_to_subconcepts() {
        let (ont, naming) = ontology(&[
            Axiom::disjoint_classes(&["A", "B"]),
            Axiom::sub_class_of("C", "A"),
        ]);
        let sub = Subsumption::new(EntityDomain::Concept);
        let mut sub_m = sub.size_and_seed(&ont, &naming, &Peers::none(), true).unwrap();
        materialize(&mut sub_m, &sub, &Peers::none());

        let peers_vec = vec![sub_m];
        let peers = Peers::new(&peers_vec);
        let disj = Disjointness::new(EntityDomain::Concept);
        let mut m = disj.size_and_seed(&ont, &naming, &peers, true).unwrap();
        materialize(&mut m, &disj, &peers);

        let b = naming.concept_id("B").unwrap();
        let c = naming.concept_id("C").unwrap();
        assert!(m.get(c, b));
        assert!(m.get(b, c));
        let why = m.explanation(b, c).unwrap().unwrap();
        assert_eq!(why.len(), 1);
        assert_eq!(why.justifications().len(), 2);
    }

    #[test]
    fn test_disjointness_requires_subsumption() {
        let (ont, naming) = ontology(&[Axiom::disjoint_classes(&["A", "B"])]);
        let disj = Disjointness::new(EntityDomain::Concept);
        assert!(disj.size_and_seed(&ont, &naming, &Peers::none(), true).is_err());
    }

    #[test]
    fn test_axiom_rendering() {
        let (_, naming) = ontology(&[Axiom::sub_property_of("p", "q")]);
        let step = Subsumption::new(EntityDomain::Property);
        assert_eq!(
            step.axiom_at(0, 1, &naming).unwrap().to_string(),
            "SubObjectPropertyOf(p, q)"
        );
        assert!(step.axiom_at(5, 1, &naming).is_none());
    }
}
