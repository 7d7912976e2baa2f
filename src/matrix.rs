//! Dense boolean relation matrices with paired explanation storage.
//!
//! A relation over two entity domains is stored as a row-major `rows × cols`
//! grid. Symmetric relations only use the lower triangle (`row >= col`);
//! every access with `row < col` is folded onto `(col, row)`.

use crate::error::{Result, TrexError};
use crate::explain::{merge, minimize, Disjunction};
use crate::inference::Relation;

/// Lifecycle of a matrix inside the reasoner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixState {
    /// Allocated, no asserted facts written yet.
    Unseeded,
    /// Holds facts that have not been closed under the inference rule.
    Seeded,
    /// The last full materialization pass changed nothing.
    Converged,
}

/// A binary relation as a boolean grid plus optional explanations.
#[derive(Debug, Clone)]
pub struct RelationMatrix {
    relation: Relation,
    rows: usize,
    cols: usize,
    symmetric: bool,
    cells: Vec<bool>,
    /// Present only when explanation tracking is enabled.
    explanations: Option<Vec<Option<Disjunction>>>,
    state: MatrixState,
}

impl RelationMatrix {
    /// Allocate an all-false matrix.
    pub fn new(
        relation: Relation,
        rows: usize,
        cols: usize,
        symmetric: bool,
        track_explanations: bool,
    ) -> Self {
        debug_assert!(!symmetric || rows == cols, "symmetric matrices must be square");
        let size = rows * cols;
        Self {
            relation,
            rows,
            cols,
            symmetric,
            cells: vec![false; size],
            explanations: track_explanations.then(|| vec![None; size]),
            state: MatrixState::Unseeded,
        }
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    pub fn tracks_explanations(&self) -> bool {
        self.explanations.is_some()
    }

    pub fn state(&self) -> MatrixState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: MatrixState) {
        self.state = state;
    }

    fn index(&self, row: usize, col: usize) -> usize {
        let (row, col) = if self.symmetric && row < col {
            (col, row)
        } else {
            (row, col)
        };
        assert!(row < self.rows && col < self.cols, "cell ({}, {}) out of bounds", row, col);
        row * self.cols + col
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells[self.index(row, col)]
    }

    /// Write a cell, returning whether its value changed.
    ///
    /// Cells only ever go from false to true; passing `false` for a true cell
    /// is a caller bug.
    pub fn set(&mut self, row: usize, col: usize, val: bool) -> bool {
        let idx = self.index(row, col);
        if self.cells[idx] == val {
            return false;
        }
        debug_assert!(val, "attempt to retract {} cell ({}, {})", self.relation, row, col);
        self.cells[idx] = val;
        true
    }

    /// The minimized explanation stored for a cell, `None` if there is none.
    pub fn explanation(&self, row: usize, col: usize) -> Result<Option<&Disjunction>> {
        let idx = self.index(row, col);
        let explanations = self
            .explanations
            .as_ref()
            .ok_or(TrexError::ExplanationsUnavailable)?;
        Ok(explanations[idx].as_ref())
    }

    /// Merge `addition` into the cell's explanation.
    ///
    /// Returns true if new, non-redundant justification was added. Always
    /// false when tracking is disabled.
    pub fn add_explanation(&mut self, row: usize, col: usize, addition: &Disjunction) -> bool {
        let idx = self.index(row, col);
        let Some(explanations) = self.explanations.as_mut() else {
            return false;
        };
        match &explanations[idx] {
            None => {
                if addition.is_empty() {
                    return false;
                }
                explanations[idx] = Some(minimize(addition));
                true
            }
            Some(existing) => {
                let (merged, changed) = merge(existing, addition);
                if changed {
                    explanations[idx] = Some(merged);
                }
                changed
            }
        }
    }

    /// Set a cell true and record why, returning whether anything changed.
    pub fn assert_cell(&mut self, row: usize, col: usize, why: &Disjunction) -> bool {
        let flipped = self.set(row, col, true);
        let explained = self.add_explanation(row, col, why);
        flipped || explained
    }

    /// Number of stored true cells.
    pub fn len(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.cells.iter().any(|&c| c)
    }

    /// Stored true cells in row-major order; symmetric matrices yield the
    /// lower triangle only.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let cols = self.cols;
        let symmetric = self.symmetric;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c)
            .map(move |(idx, _)| (idx / cols, idx % cols))
            .filter(move |&(r, c)| !symmetric || r >= c)
    }

    /// Indices `i` with `get(i, i)` true.
    pub fn diagonal(&self) -> Vec<usize> {
        (0..self.rows.min(self.cols))
            .filter(|&i| self.get(i, i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explain::{Conjunction, Justification};

    fn why(s: &str) -> Disjunction {
        Disjunction::asserted(Justification::new(s))
    }

    #[test]
    fn test_set_is_monotone_guard() {
        let mut m = RelationMatrix::new(Relation::ConceptSubsumption, 3, 3, false, true);
        assert_eq!(m.state(), MatrixState::Unseeded);
        assert!(m.set(0, 1, true));
        assert!(!m.set(0, 1, true));
        assert!(m.get(0, 1));
        assert!(!m.get(1, 0));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn test_symmetric_fold() {
        let mut m = RelationMatrix::new(Relation::ConceptDisjointness, 3, 3, true, true);
        assert!(m.assert_cell(0, 2, &why("DisjointClasses(A, C)")));
        assert!(m.get(2, 0));
        assert!(m.get(0, 2));
        assert_eq!(m.explanation(0, 2).unwrap(), m.explanation(2, 0).unwrap());
        assert_eq!(m.entries().collect::<Vec<_>>(), vec![(2, 0)]);
    }

    #[test]
    fn test_add_explanation_merges_and_minimizes() {
        let mut m = RelationMatrix::new(Relation::ConceptSubsumption, 2, 2, false, true);
        let two: Disjunction = [[Justification::new("a"), Justification::new("b")]
            .into_iter()
            .collect::<Conjunction>()]
        .into_iter()
        .collect();
        assert!(m.assert_cell(0, 1, &two));
        assert!(!m.add_explanation(0, 1, &two));
        assert!(m.add_explanation(0, 1, &why("a")));
        assert_eq!(m.explanation(0, 1).unwrap(), Some(&why("a")));
        assert!(!m.add_explanation(0, 1, &two));
        assert_eq!(m.explanation(1, 0).unwrap(), None);
    }

    #[test]
    fn test_explanations_disabled() {
        let mut m = RelationMatrix::new(Relation::PropertyDomain, 2, 3, false, false);
        assert!(m.assert_cell(1, 2, &why("ObjectPropertyDomain(q, C)")));
        assert!(!m.assert_cell(1, 2, &why("ObjectPropertyDomain(q, C)")));
        assert!(matches!(
            m.explanation(1, 2),
            Err(TrexError::ExplanationsUnavailable)
        ));
    }

    #[test]
    fn test_rectangular_entries_and_diagonal() {
        let mut m = RelationMatrix::new(Relation::PropertyRange, 2, 3, false, false);
        m.set(1, 2, true);
        m.set(0, 0, true);
        assert_eq!(m.entries().collect::<Vec<_>>(), vec![(0, 0), (1, 2)]);
        assert_eq!(m.diagonal(), vec![0]);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_column_overflow_panics() {
        let mut m = RelationMatrix::new(Relation::PropertyRange, 2, 3, false, false);
        m.set(1, 0, true);
        // Would alias (1, 0) in the flat grid.
        m.get(0, 3);
    }
}
