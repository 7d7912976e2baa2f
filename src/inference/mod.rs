//! Inference step providers.
//!
//! Each relation the reasoner materializes is driven by one
//! [`InferenceStep`]: it sizes and seeds the matrix from asserted facts,
//! supplies the local closure rule, and translates external [`Axiom`]s to
//! matrix coordinates. Steps that read other relations get them through
//! [`Peers`], a read-only view of the matrices materialized before them.

mod property;
mod subsumption;

pub use property::{PropertyRestriction, PropertyUnsatisfiability, RestrictionKind};
pub use subsumption::{Disjointness, Subsumption};

use crate::axiom::{Axiom, Entity, EntityDomain, FactKind};
use crate::error::{Result, TrexError};
use crate::explain::{flatten, Conjunction, Disjunction};
use crate::matrix::{MatrixState, RelationMatrix};
use crate::ontology::Ontology;
use crate::reasoner::NamingRegistry;
use std::fmt;
use tracing::warn;

/// The relations materialized by the reasoner, in construction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Relation {
    ConceptSubsumption,
    ConceptDisjointness,
    PropertySubsumption,
    PropertyDisjointness,
    PropertyDomain,
    PropertyRange,
    PropertyUnsatisfiability,
}

impl Relation {
    /// Dependency order: every relation only reads relations listed before it.
    pub const ORDER: [Relation; 7] = [
        Relation::ConceptSubsumption,
        Relation::ConceptDisjointness,
        Relation::PropertySubsumption,
        Relation::PropertyDisjointness,
        Relation::PropertyDomain,
        Relation::PropertyRange,
        Relation::PropertyUnsatisfiability,
    ];

    pub fn identifier(self) -> &'static str {
        match self {
            Relation::ConceptSubsumption => "SubClassOf",
            Relation::ConceptDisjointness => "DisjointWith",
            Relation::PropertySubsumption => "SubObjectPropertyOf",
            Relation::PropertyDisjointness => "DisjointObjectProperties",
            Relation::PropertyDomain => "ObjectPropertyDomain",
            Relation::PropertyRange => "ObjectPropertyRange",
            Relation::PropertyUnsatisfiability => "PropertyUnsatisfiability",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Read-only view of already materialized matrices.
#[derive(Clone, Copy)]
pub struct Peers<'a> {
    matrices: &'a [RelationMatrix],
}

impl<'a> Peers<'a> {
    pub fn new(matrices: &'a [RelationMatrix]) -> Self {
        Self { matrices }
    }

    pub fn none() -> Self {
        Self { matrices: &[] }
    }

    pub fn get(&self, relation: Relation) -> Option<&'a RelationMatrix> {
        self.matrices.iter().find(|m| m.relation() == relation)
    }

    /// Fail unless every relation in `dependencies` is available.
    pub fn check(&self, relation: Relation, dependencies: &[Relation]) -> Result<()> {
        match dependencies.iter().find(|&&d| self.get(d).is_none()) {
            Some(&dependency) => Err(TrexError::MissingDependency {
                relation,
                dependency,
            }),
            None => Ok(()),
        }
    }
}

/// A matrix cell an axiom maps to, with the fact justifying it.
#[derive(Debug, Clone)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub fact: Axiom,
}

/// Strategy object driving one relation matrix.
pub trait InferenceStep {
    /// The relation this step materializes.
    fn relation(&self) -> Relation;

    /// Fact kinds this step can seed from and answer for.
    fn fact_kinds(&self) -> &'static [FactKind];

    fn is_symmetric(&self) -> bool;

    /// Relations that must be materialized before this one.
    fn dependencies(&self) -> &'static [Relation] {
        &[]
    }

    /// `(rows, cols)` of the matrix.
    fn dimensions(&self, naming: &NamingRegistry) -> (usize, usize);

    /// Check one cell against the local rule, writing it if licensed.
    ///
    /// Returns true if the cell or its explanation changed. Only reads
    /// explanations of cells that are already true.
    fn infer(&self, matrix: &mut RelationMatrix, peers: &Peers<'_>, row: usize, col: usize) -> bool;

    /// Render a true cell back into a fact.
    fn axiom_at(&self, row: usize, col: usize, naming: &NamingRegistry) -> Option<Axiom>;

    /// Cells a pair of resolved operands of `kind` denotes.
    fn cells_for(&self, _kind: FactKind, a: usize, b: usize) -> Vec<(usize, usize)> {
        vec![(a, b)]
    }

    /// Allocate the matrix and write every asserted fact into it.
    fn size_and_seed(
        &self,
        ontology: &Ontology,
        naming: &NamingRegistry,
        peers: &Peers<'_>,
        track_explanations: bool,
    ) -> Result<RelationMatrix> {
        peers.check(self.relation(), self.dependencies())?;
        let (rows, cols) = self.dimensions(naming);
        let mut matrix =
            RelationMatrix::new(self.relation(), rows, cols, self.is_symmetric(), track_explanations);
        for axiom in ontology.axioms_of(self.fact_kinds()) {
            let pairs = if axiom.anonymous_operand().is_none() {
                axiom.pair_indices()
            } else if axiom.kind().is_nary() {
                named_pairs(self.relation(), axiom)
            } else {
                warn!(relation = %self.relation(), %axiom, "skipping fact with anonymous operand");
                continue;
            };
            for cell in pair_cells(self, axiom, naming, pairs)? {
                matrix.assert_cell(
                    cell.row,
                    cell.col,
                    &Disjunction::asserted(cell.fact.justification()),
                );
            }
        }
        matrix.set_state(MatrixState::Seeded);
        Ok(matrix)
    }

    /// Fail unless `axiom` has a supported kind and only named operands.
    fn check_processable(&self, axiom: &Axiom) -> Result<()> {
        if !self.fact_kinds().contains(&axiom.kind()) {
            return Err(TrexError::unprocessable(
                axiom,
                format!("{} cannot handle {} facts", self.relation(), axiom.kind()),
            ));
        }
        if let Some(anon) = axiom.anonymous_operand() {
            return Err(TrexError::unprocessable(
                axiom,
                format!("anonymous expression {} is not supported", anon),
            ));
        }
        Ok(())
    }

    /// Map a fact onto the cells that must all hold for it.
    fn coordinates(&self, axiom: &Axiom, naming: &NamingRegistry) -> Result<Vec<Cell>> {
        self.check_processable(axiom)?;
        pair_cells(self, axiom, naming, axiom.pair_indices())
    }

    /// Whether a fact of `kind` that maps to no cell holds anyway.
    fn holds_trivially(&self, _kind: FactKind) -> bool {
        false
    }

    /// True if every cell the fact maps to holds.
    fn is_entailed(&self, matrix: &RelationMatrix, axiom: &Axiom, naming: &NamingRegistry) -> Result<bool> {
        let cells = self.coordinates(axiom, naming)?;
        if cells.is_empty() {
            return Ok(self.holds_trivially(axiom.kind()));
        }
        Ok(cells.iter().all(|c| matrix.get(c.row, c.col)))
    }

    /// Conjunction of the explanations of every cell the fact maps to.
    ///
    /// `None` if the fact is not entailed by this matrix.
    fn explanation_for(
        &self,
        matrix: &RelationMatrix,
        axiom: &Axiom,
        naming: &NamingRegistry,
    ) -> Result<Option<Disjunction>> {
        let cells = self.coordinates(axiom, naming)?;
        if cells.is_empty() {
            // A tautology: explained by the empty conjunction.
            let why = self
                .holds_trivially(axiom.kind())
                .then(|| Disjunction::from_iter([Conjunction::new()]));
            return Ok(why);
        }
        let mut combined: Option<Disjunction> = None;
        for cell in &cells {
            if !matrix.get(cell.row, cell.col) {
                return Ok(None);
            }
            let Some(why) = matrix.explanation(cell.row, cell.col)? else {
                return Ok(None);
            };
            combined = Some(match combined {
                None => why.clone(),
                Some(acc) => flatten(&acc, why),
            });
        }
        Ok(combined)
    }

    /// Insert a newly asserted fact over known entities.
    ///
    /// All operands are resolved before the matrix is touched.
    fn add_fact(&self, matrix: &mut RelationMatrix, axiom: &Axiom, naming: &NamingRegistry) -> Result<bool> {
        let cells = self.coordinates(axiom, naming)?;
        let mut changed = false;
        for cell in cells {
            changed |= matrix.assert_cell(
                cell.row,
                cell.col,
                &Disjunction::asserted(cell.fact.justification()),
            );
        }
        if changed {
            matrix.set_state(MatrixState::Seeded);
        }
        Ok(changed)
    }
}

/// Pairs of an n-ary fact whose operands are both named.
fn named_pairs(relation: Relation, axiom: &Axiom) -> Vec<(usize, usize)> {
    let operands = axiom.operands();
    axiom
        .pair_indices()
        .into_iter()
        .filter(|&(i, j)| {
            let named = operands[i].name().is_some() && operands[j].name().is_some();
            if !named {
                warn!(
                    %relation,
                    %axiom,
                    "skipping pair ({}, {}) with an anonymous operand",
                    operands[i],
                    operands[j]
                );
            }
            named
        })
        .collect()
}

/// Resolve each operand pair and map it onto the step's cells.
fn pair_cells<S: InferenceStep + ?Sized>(
    step: &S,
    axiom: &Axiom,
    naming: &NamingRegistry,
    pairs: Vec<(usize, usize)>,
) -> Result<Vec<Cell>> {
    let kind = axiom.kind();
    let operands = axiom.operands();
    let mut cells = Vec::new();
    for (i, j) in pairs {
        let a = resolve(naming, kind.operand_domain(i), &operands[i])?;
        let b = resolve(naming, kind.operand_domain(j), &operands[j])?;
        let fact = axiom.pairwise(i, j);
        for (row, col) in step.cells_for(kind, a, b) {
            cells.push(Cell {
                row,
                col,
                fact: fact.clone(),
            });
        }
    }
    Ok(cells)
}

fn resolve(naming: &NamingRegistry, domain: EntityDomain, entity: &Entity) -> Result<usize> {
    let name = entity
        .name()
        .ok_or_else(|| TrexError::UnknownEntity(entity.to_string()))?;
    naming.id(domain, name)
}

/// Explanation of a true cell, or an empty one when tracking is off.
pub(crate) fn cell_explanation(matrix: &RelationMatrix, row: usize, col: usize) -> Disjunction {
    match matrix.explanation(row, col) {
        Ok(Some(d)) => d.clone(),
        _ => Disjunction::new(),
    }
}

/// Set `(row, col)` true with the conjunction of two premises' explanations.
pub(crate) fn derive(
    matrix: &mut RelationMatrix,
    row: usize,
    col: usize,
    left: Disjunction,
    right: Disjunction,
) -> bool {
    let flipped = matrix.set(row, col, true);
    if !matrix.tracks_explanations() {
        return flipped;
    }
    let explained = matrix.add_explanation(row, col, &flatten(&left, &right));
    flipped || explained
}

/// The standard set of steps, in [`Relation::ORDER`].
pub fn default_steps() -> Vec<Box<dyn InferenceStep>> {
    vec![
        Box::new(Subsumption::new(EntityDomain::Concept)),
        Box::new(Disjointness::new(EntityDomain::Concept)),
        Box::new(Subsumption::new(EntityDomain::Property)),
        Box::new(Disjointness::new(EntityDomain::Property)),
        Box::new(PropertyRestriction::new(RestrictionKind::Domain)),
        Box::new(PropertyRestriction::new(RestrictionKind::Range)),
        Box::new(PropertyUnsatisfiability),
    ]
}
