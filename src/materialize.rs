//! Naive fixpoint evaluation of a single relation.
//!
//! Every pass visits all `(row, col)` cells in row-major order and asks the
//! step to apply its rule there. Passes repeat until one changes nothing.
//! Cells only flip false to true and explanations only grow by absorption,
//! so the loop terminates.

use crate::inference::{InferenceStep, Peers};
use crate::matrix::{MatrixState, RelationMatrix};
use tracing::{debug, trace};

/// What a materialization run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterializeStats {
    /// Full passes over the matrix, including the final quiet one.
    pub passes: usize,
    /// Cell updates (value or explanation) across all passes.
    pub changes: usize,
}

/// Drive `matrix` to a fixpoint of `step`'s rule.
pub fn materialize(
    matrix: &mut RelationMatrix,
    step: &dyn InferenceStep,
    peers: &Peers<'_>,
) -> MaterializeStats {
    debug!(relation = %step.relation(), rows = matrix.rows(), cols = matrix.cols(), "materializing");
    let mut stats = MaterializeStats::default();

    loop {
        let mut pass_changes = 0;
        for row in 0..matrix.rows() {
            for col in 0..matrix.cols() {
                if step.infer(matrix, peers, row, col) {
                    trace!(relation = %step.relation(), row, col, "cell updated");
                    pass_changes += 1;
                }
            }
        }
        stats.passes += 1;
        stats.changes += pass_changes;
        debug!(relation = %step.relation(), pass = stats.passes, changes = pass_changes, "pass done");
        if pass_changes == 0 {
            break;
        }
    }

    matrix.set_state(MatrixState::Converged);
    debug!(
        relation = %step.relation(),
        passes = stats.passes,
        facts = matrix.len(),
        "materialized"
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axiom::{Axiom, EntityDomain};
    use crate::inference::Subsumption;
    use crate::ontology::Ontology;
    use crate::reasoner::NamingRegistry;

    fn chain(n: usize) -> Ontology {
        let mut ont = Ontology::new();
        for i in 0..n {
            ont.add_axiom(Axiom::sub_class_of(&format!("C{}", i), &format!("C{}", i + 1)));
        }
        ont
    }

    #[test]
    fn test_chain_closure() {
        let ont = chain(5);
        let naming = NamingRegistry::from_ontology(&ont);
        let step = Subsumption::new(EntityDomain::Concept);
        let mut m = step.size_and_seed(&ont, &naming, &Peers::none(), true).unwrap();
        assert_eq!(m.state(), MatrixState::Seeded);

        let stats = materialize(&mut m, &step, &Peers::none());
        assert!(stats.changes > 0);
        assert_eq!(m.state(), MatrixState::Converged);
        // 6 concepts in a chain: 5 + 4 + 3 + 2 + 1 subsumptions.
        assert_eq!(m.len(), 15);

        let first = naming.concept_id("C0").unwrap();
        let last = naming.concept_id("C5").unwrap();
        let why = m.explanation(first, last).unwrap().unwrap();
        assert_eq!(why.len(), 1);
        assert_eq!(why.justifications().len(), 5);
    }

    #[test]
    fn test_second_run_is_quiet() {
        let ont = chain(4);
        let naming = NamingRegistry::from_ontology(&ont);
        let step = Subsumption::new(EntityDomain::Concept);
        let mut m = step.size_and_seed(&ont, &naming, &Peers::none(), true).unwrap();
        materialize(&mut m, &step, &Peers::none());
        let before = m.clone();

        let again = materialize(&mut m, &step, &Peers::none());
        assert_eq!(again, MaterializeStats { passes: 1, changes: 0 });
        assert_eq!(before.entries().collect::<Vec<_>>(), m.entries().collect::<Vec<_>>());
    }

    #[test]
    fn test_without_explanations() {
        let ont = chain(3);
        let naming = NamingRegistry::from_ontology(&ont);
        let step = Subsumption::new(EntityDomain::Concept);
        let mut m = step.size_and_seed(&ont, &naming, &Peers::none(), false).unwrap();
        materialize(&mut m, &step, &Peers::none());
        assert_eq!(m.len(), 6);
        assert!(m.explanation(0, 3).is_err());
    }
}
