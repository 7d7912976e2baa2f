//! Property domain/range restrictions and the unsatisfiability they imply.

use super::{cell_explanation, derive, InferenceStep, Peers, Relation};
use crate::axiom::{Axiom, EntityDomain, FactKind};
use crate::error::Result;
use crate::explain::{flatten, Disjunction};
use crate::matrix::{MatrixState, RelationMatrix};
use crate::ontology::Ontology;
use crate::reasoner::NamingRegistry;
use tracing::trace;

/// Which side of a property a restriction constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestrictionKind {
    Domain,
    Range,
}

/// Property domain or range, a `|properties| × |concepts|` relation.
///
/// Propagates upward along concept subsumption
/// (`restr(row, i) ∧ subsumes(i, col)`) and downward along property
/// subsumption (`subprop(row, i) ∧ restr(i, col)`).
#[derive(Debug, Clone, Copy)]
pub struct PropertyRestriction {
    kind: RestrictionKind,
}

impl PropertyRestriction {
    pub fn new(kind: RestrictionKind) -> Self {
        Self { kind }
    }
}

impl InferenceStep for PropertyRestriction {
    fn relation(&self) -> Relation {
        match self.kind {
            RestrictionKind::Domain => Relation::PropertyDomain,
            RestrictionKind::Range => Relation::PropertyRange,
        }
    }

    fn fact_kinds(&self) -> &'static [FactKind] {
        match self.kind {
            RestrictionKind::Domain => &[FactKind::ObjectPropertyDomain],
            RestrictionKind::Range => &[FactKind::ObjectPropertyRange],
        }
    }

    fn is_symmetric(&self) -> bool {
        false
    }

    fn dependencies(&self) -> &'static [Relation] {
        &[Relation::ConceptSubsumption, Relation::PropertySubsumption]
    }

    fn dimensions(&self, naming: &NamingRegistry) -> (usize, usize) {
        (naming.property_count(), naming.concept_count())
    }

    fn infer(&self, matrix: &mut RelationMatrix, peers: &Peers<'_>, row: usize, col: usize) -> bool {
        let (Some(concepts), Some(properties)) = (
            peers.get(Relation::ConceptSubsumption),
            peers.get(Relation::PropertySubsumption),
        ) else {
            return false;
        };
        let mut changed = false;

        for i in 0..matrix.cols() {
            if matrix.get(row, i) && concepts.get(i, col) {
                let left = cell_explanation(matrix, row, i);
                let right = cell_explanation(concepts, i, col);
                changed |= derive(matrix, row, col, left, right);
            }
        }

        for i in 0..matrix.rows() {
            if properties.get(row, i) && matrix.get(i, col) {
                let left = cell_explanation(properties, row, i);
                let right = cell_explanation(matrix, i, col);
                changed |= derive(matrix, row, col, left, right);
            }
        }

        changed
    }

    fn axiom_at(&self, row: usize, col: usize, naming: &NamingRegistry) -> Option<Axiom> {
        let property = naming.property_name(row)?;
        let concept = naming.concept_name(col)?;
        Some(match self.kind {
            RestrictionKind::Domain => Axiom::domain(property, concept),
            RestrictionKind::Range => Axiom::range(property, concept),
        })
    }
}

/// Properties whose domain or range contains two disjoint concepts.
///
/// A `1 × |properties|` vector. It is filled once its peers have converged;
/// each cell `(0, k)` is re-evaluated on later passes so facts added for a
/// rematerialization reach it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyUnsatisfiability;

impl PropertyUnsatisfiability {
    /// Explanations for `k` being unsatisfiable through `restrictions`.
    fn clashes(
        restrictions: &RelationMatrix,
        disjointness: &RelationMatrix,
        k: usize,
        tracking: bool,
    ) -> Option<Disjunction> {
        let n = disjointness.rows();
        let mut found = false;
        let mut why = Disjunction::new();
        for i in 0..n {
            if !restrictions.get(k, i) {
                continue;
            }
            for j in 0..=i {
                if !(disjointness.get(i, j) && restrictions.get(k, j)) {
                    continue;
                }
                found = true;
                if tracking {
                    let both = flatten(
                        &cell_explanation(restrictions, k, i),
                        &cell_explanation(restrictions, k, j),
                    );
                    let clash = flatten(&both, &cell_explanation(disjointness, i, j));
                    why = why.union(&clash);
                }
            }
        }
        found.then_some(why)
    }

    fn evaluate(&self, matrix: &mut RelationMatrix, peers: &Peers<'_>, k: usize) -> bool {
        let (Some(disjointness), Some(domain), Some(range)) = (
            peers.get(Relation::ConceptDisjointness),
            peers.get(Relation::PropertyDomain),
            peers.get(Relation::PropertyRange),
        ) else {
            return false;
        };
        let tracking = matrix.tracks_explanations();
        let mut changed = false;
        for restrictions in [domain, range] {
            if let Some(why) = Self::clashes(restrictions, disjointness, k, tracking) {
                trace!(property = k, via = %restrictions.relation(), "property unsatisfiable");
                changed |= matrix.assert_cell(0, k, &why);
            }
        }
        changed
    }
}

impl InferenceStep for PropertyUnsatisfiability {
    fn relation(&self) -> Relation {
        Relation::PropertyUnsatisfiability
    }

    fn fact_kinds(&self) -> &'static [FactKind] {
        &[FactKind::DisjointObjectProperties]
    }

    fn is_symmetric(&self) -> bool {
        false
    }

    fn dependencies(&self) -> &'static [Relation] {
        &[
            Relation::ConceptDisjointness,
            Relation::PropertyDomain,
            Relation::PropertyRange,
        ]
    }

    fn dimensions(&self, naming: &NamingRegistry) -> (usize, usize) {
        (1, naming.property_count())
    }

    /// Only the reflexive pair `(p, p)` maps to a cell.
    fn cells_for(&self, _kind: FactKind, a: usize, b: usize) -> Vec<(usize, usize)> {
        if a == b {
            vec![(0, a)]
        } else {
            vec![]
        }
    }

    fn size_and_seed(
        &self,
        _ontology: &Ontology,
        naming: &NamingRegistry,
        peers: &Peers<'_>,
        track_explanations: bool,
    ) -> Result<RelationMatrix> {
        peers.check(self.relation(), self.dependencies())?;
        let (rows, cols) = self.dimensions(naming);
        let mut matrix = RelationMatrix::new(self.relation(), rows, cols, false, track_explanations);
        for k in 0..cols {
            self.evaluate(&mut matrix, peers, k);
        }
        matrix.set_state(MatrixState::Seeded);
        Ok(matrix)
    }

    fn infer(&self, matrix: &mut RelationMatrix, peers: &Peers<'_>, _row: usize, col: usize) -> bool {
        self.evaluate(matrix, peers, col)
    }

    /// The vector is derived only; asserted facts are validated and ignored.
    fn add_fact(&self, _matrix: &mut RelationMatrix, axiom: &Axiom, naming: &NamingRegistry) -> Result<bool> {
        self.coordinates(axiom, naming)?;
        Ok(false)
    }

    fn axiom_at(&self, _row: usize, col: usize, naming: &NamingRegistry) -> Option<Axiom> {
        let p = naming.name(EntityDomain::Property, col)?;
        Some(Axiom::disjoint_properties(&[p, p]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::{Disjointness, Subsumption};
    use crate::materialize::materialize;

    fn build(axioms: &[Axiom]) -> (NamingRegistry, Vec<RelationMatrix>) {
        let mut ont = Ontology::new();
        for a in axioms {
            ont.add_axiom(a.clone());
        }
        let naming = NamingRegistry::from_ontology(&ont);
        let steps: Vec<Box<dyn InferenceStep>> = vec![
            Box::new(Subsumption::new(EntityDomain::Concept)),
            Box::new(Disjointness::new(EntityDomain::Concept)),
            Box::new(Subsumption::new(EntityDomain::Property)),
            Box::new(PropertyRestriction::new(RestrictionKind::Domain)),
            Box::new(PropertyRestriction::new(RestrictionKind::Range)),
            Box::new(PropertyUnsatisfiability),
        ];
        let mut done: Vec<RelationMatrix> = Vec::new();
        for step in &steps {
            let peers = Peers::new(&done);
            let mut m = step.size_and_seed(&ont, &naming, &peers, true).unwrap();
            materialize(&mut m, step.as_ref(), &peers);
            done.push(m);
        }
        (naming, done)
    }

    fn find(ms: &[RelationMatrix], r: Relation) -> &RelationMatrix {
        ms.iter().find(|m| m.relation() == r).unwrap()
    }

    #[test]
    fn test_domain_follows_concept_subsumption() {
        let (naming, ms) = build(&[
            Axiom::domain("p", "A"),
            Axiom::sub_class_of("A", "B"),
        ]);
        let dom = find(&ms, Relation::PropertyDomain);
        let p = naming.property_id("p").unwrap();
        assert!(dom.get(p, naming.concept_id("B").unwrap()));
        let why = dom.explanation(p, naming.concept_id("B").unwrap()).unwrap().unwrap();
        assert_eq!(why.justifications().len(), 2);
    }

    #[test]
    fn test_range_inherited_by_subproperty() {
        let (naming, ms) = build(&[
            Axiom::range("q", "A"),
            Axiom::sub_property_of("p", "q"),
        ]);
        let range = find(&ms, Relation::PropertyRange);
        let p = naming.property_id("p").unwrap();
        let a = naming.concept_id("A").unwrap();
        assert!(range.get(p, a));
        assert!(!find(&ms, Relation::PropertyDomain).get(p, a));
    }

    #[test]
    fn test_disjoint_domain_makes_property_unsatisfiable() {
        let (naming, ms) = build(&[
            Axiom::domain("p", "A"),
            Axiom::domain("p", "B"),
            Axiom::range("p", "A"),
            Axiom::range("p", "B"),
            Axiom::disjoint_classes(&["A", "B"]),
            Axiom::domain("q", "A"),
        ]);
        let unsat = find(&ms, Relation::PropertyUnsatisfiability);
        let p = naming.property_id("p").unwrap();
        let q = naming.property_id("q").unwrap();
        assert!(unsat.get(0, p));
        assert!(!unsat.get(0, q));

        let why = unsat.explanation(0, p).unwrap().unwrap();
        assert_eq!(why.len(), 2);
        for conj in why.iter() {
            assert_eq!(conj.len(), 3);
            assert!(conj
                .iter()
                .any(|j| j.as_str() == "DisjointClasses(A, B)"));
        }
    }

    #[test]
    fn test_unsatisfiable_concept_in_domain() {
        let (naming, ms) = build(&[
            Axiom::disjoint_classes(&["A"]),
            Axiom::domain("p", "A"),
        ]);
        let unsat = find(&ms, Relation::PropertyUnsatisfiability);
        assert!(unsat.get(0, naming.property_id("p").unwrap()));
    }
}
