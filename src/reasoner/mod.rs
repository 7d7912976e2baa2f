//! Reasoner orchestrator.
//!
//! Owns one matrix per [`Relation`], builds them in dependency order, and
//! routes external facts to every matrix registered for the fact's kind.
//!
//! # Example
//!
//! ```
//! use trex::{Axiom, Ontology, Reasoner, ReasonerConfig};
//!
//! let ont: Ontology = [
//!     Axiom::sub_class_of("A", "B"),
//!     Axiom::sub_class_of("B", "C"),
//! ]
//! .into_iter()
//! .collect();
//! let reasoner = Reasoner::new(&ont, ReasonerConfig::default()).unwrap();
//! assert!(reasoner.is_subclass_of("A", "C").unwrap());
//! ```

mod naming;

pub use naming::NamingRegistry;

use crate::axiom::{Axiom, EntityDomain, FactKind};
use crate::error::{Result, TrexError};
use crate::explain::{merge, Disjunction};
use crate::inference::{default_steps, InferenceStep, Peers, Relation};
use crate::materialize::{materialize, MaterializeStats};
use crate::matrix::{MatrixState, RelationMatrix};
use crate::ontology::Ontology;
use indexmap::{IndexMap, IndexSet};
use std::collections::BTreeSet;
use std::fmt::Write;
use tracing::{debug, info};

/// Construction-time switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReasonerConfig {
    /// Track explanations for every true cell.
    pub explanations: bool,
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        Self { explanations: true }
    }
}

impl ReasonerConfig {
    /// Skip all explanation bookkeeping.
    pub fn without_explanations() -> Self {
        Self {
            explanations: false,
        }
    }
}

/// Materialized relations over a fixed set of named entities.
pub struct Reasoner {
    steps: Vec<Box<dyn InferenceStep>>,
    /// Parallel to `steps`.
    matrices: Vec<RelationMatrix>,
    naming: NamingRegistry,
    config: ReasonerConfig,
    /// Fact kind -> indices into `steps`/`matrices`.
    registry: IndexMap<FactKind, Vec<usize>>,
}

impl Reasoner {
    /// Build and materialize every standard relation for `ontology`.
    pub fn new(ontology: &Ontology, config: ReasonerConfig) -> Result<Self> {
        Self::with_steps(ontology, default_steps(), config)
    }

    /// Build from an explicit list of steps.
    ///
    /// Steps must be ordered so that every step comes after the relations
    /// it depends on.
    pub fn with_steps(
        ontology: &Ontology,
        steps: Vec<Box<dyn InferenceStep>>,
        config: ReasonerConfig,
    ) -> Result<Self> {
        let naming = NamingRegistry::from_ontology(ontology);
        let mut matrices: Vec<RelationMatrix> = Vec::with_capacity(steps.len());
        let mut registry: IndexMap<FactKind, Vec<usize>> = IndexMap::new();

        for (index, step) in steps.iter().enumerate() {
            let peers = Peers::new(&matrices);
            let mut matrix = step.size_and_seed(ontology, &naming, &peers, config.explanations)?;
            let seeded = matrix.len();
            let stats = materialize(&mut matrix, step.as_ref(), &peers);
            debug!(
                relation = %step.relation(),
                seeded,
                derived = matrix.len() - seeded,
                passes = stats.passes,
                "relation built"
            );
            matrices.push(matrix);
            for &kind in step.fact_kinds() {
                registry.entry(kind).or_default().push(index);
            }
        }

        info!(
            concepts = naming.concept_count(),
            properties = naming.property_count(),
            axioms = ontology.len(),
            relations = matrices.len(),
            explanations = config.explanations,
            "reasoner ready"
        );

        Ok(Self {
            steps,
            matrices,
            naming,
            config,
            registry,
        })
    }

    pub fn naming(&self) -> &NamingRegistry {
        &self.naming
    }

    pub fn config(&self) -> ReasonerConfig {
        self.config
    }

    fn position(&self, relation: Relation) -> Option<usize> {
        self.steps.iter().position(|s| s.relation() == relation)
    }

    /// Read access to the matrix of one relation.
    pub fn matrix(&self, relation: Relation) -> Option<&RelationMatrix> {
        self.position(relation).map(|i| &self.matrices[i])
    }

    pub fn state(&self, relation: Relation) -> Option<MatrixState> {
        self.matrix(relation).map(|m| m.state())
    }

    fn routes(&self, kind: FactKind) -> Result<&[usize]> {
        self.registry
            .get(&kind)
            .map(|v| v.as_slice())
            .ok_or(TrexError::UnsupportedRelation(kind))
    }

    /// True if any matrix registered for the fact's kind entails it.
    pub fn is_entailed(&self, axiom: &Axiom) -> Result<bool> {
        let mut entailed = false;
        for &i in self.routes(axiom.kind())? {
            entailed |= self.steps[i].is_entailed(&self.matrices[i], axiom, &self.naming)?;
        }
        Ok(entailed)
    }

    /// Merged explanation across every matrix registered for the fact's kind.
    ///
    /// `Ok(None)` if the fact is not entailed.
    pub fn explanation(&self, axiom: &Axiom) -> Result<Option<Disjunction>> {
        let routes = self.routes(axiom.kind())?;
        if !self.config.explanations {
            return Err(TrexError::ExplanationsUnavailable);
        }
        let mut merged: Option<Disjunction> = None;
        for &i in routes {
            let Some(why) = self.steps[i].explanation_for(&self.matrices[i], axiom, &self.naming)? else {
                continue;
            };
            merged = Some(match merged {
                None => why,
                Some(acc) => merge(&acc, &why).0,
            });
        }
        Ok(merged)
    }

    /// Assert a new fact over known entities.
    ///
    /// Every route validates the fact before any matrix is written, so a
    /// rejected fact leaves the reasoner untouched. Call
    /// [`rematerialize`](Self::rematerialize) to propagate it.
    pub fn add_fact(&mut self, axiom: &Axiom) -> Result<bool> {
        let routes = self.routes(axiom.kind())?.to_vec();
        for &i in &routes {
            self.steps[i].coordinates(axiom, &self.naming)?;
        }
        let mut changed = false;
        for i in routes {
            changed |= self.steps[i].add_fact(&mut self.matrices[i], axiom, &self.naming)?;
        }
        debug!(%axiom, changed, "fact added");
        Ok(changed)
    }

    /// Re-run materialization over every relation in construction order.
    pub fn rematerialize(&mut self) -> Vec<(Relation, MaterializeStats)> {
        let mut report = Vec::with_capacity(self.matrices.len());
        for i in 0..self.matrices.len() {
            let (done, rest) = self.matrices.split_at_mut(i);
            let peers = Peers::new(done);
            let step = self.steps[i].as_ref();
            let stats = materialize(&mut rest[0], step, &peers);
            report.push((step.relation(), stats));
        }
        let changes: usize = report.iter().map(|(_, s)| s.changes).sum();
        info!(changes, "rematerialized");
        report
    }

    fn names(&self, domain: EntityDomain, ids: impl IntoIterator<Item = usize>) -> Vec<&str> {
        ids.into_iter()
            .filter_map(|id| self.naming.name(domain, id))
            .collect()
    }

    fn diagonal_of(&self, relation: Relation) -> Vec<usize> {
        self.matrix(relation).map(|m| m.diagonal()).unwrap_or_default()
    }

    /// Concepts disjoint with themselves.
    pub fn unsatisfiable_concepts(&self) -> Vec<&str> {
        let ids = self.diagonal_of(Relation::ConceptDisjointness);
        self.names(EntityDomain::Concept, ids)
    }

    /// Properties disjoint with themselves or with clashing domain/range.
    pub fn unsatisfiable_properties(&self) -> Vec<&str> {
        let mut ids: BTreeSet<usize> = self
            .diagonal_of(Relation::PropertyDisjointness)
            .into_iter()
            .collect();
        if let Some(vector) = self.matrix(Relation::PropertyUnsatisfiability) {
            ids.extend(vector.entries().map(|(_, k)| k));
        }
        self.names(EntityDomain::Property, ids)
    }

    /// Concepts on a cycle of the subsumption hierarchy.
    pub fn concept_cycles(&self) -> Vec<&str> {
        let ids = self.diagonal_of(Relation::ConceptSubsumption);
        self.names(EntityDomain::Concept, ids)
    }

    pub fn property_cycles(&self) -> Vec<&str> {
        let ids = self.diagonal_of(Relation::PropertySubsumption);
        self.names(EntityDomain::Property, ids)
    }

    pub fn unsatisfiability_explanation_concept(&self, name: &str) -> Result<Option<Disjunction>> {
        self.explanation(&Axiom::disjoint_classes(&[name]))
    }

    /// Merged explanation from property disjointness and domain/range clashes.
    pub fn unsatisfiability_explanation_property(&self, name: &str) -> Result<Option<Disjunction>> {
        self.explanation(&Axiom::disjoint_properties(&[name]))
    }

    pub fn is_subclass_of(&self, sub: &str, sup: &str) -> Result<bool> {
        self.is_entailed(&Axiom::sub_class_of(sub, sup))
    }

    pub fn are_disjoint_classes(&self, a: &str, b: &str) -> Result<bool> {
        self.is_entailed(&Axiom::disjoint_classes(&[a, b]))
    }

    pub fn is_subproperty_of(&self, sub: &str, sup: &str) -> Result<bool> {
        self.is_entailed(&Axiom::sub_property_of(sub, sup))
    }

    pub fn are_disjoint_properties(&self, p: &str, q: &str) -> Result<bool> {
        self.is_entailed(&Axiom::disjoint_properties(&[p, q]))
    }

    /// Every true cell rendered back into a fact, without duplicates.
    pub fn entailed_axioms(&self) -> Vec<Axiom> {
        let mut out: IndexSet<Axiom> = IndexSet::new();
        for (step, matrix) in self.steps.iter().zip(&self.matrices) {
            for (row, col) in matrix.entries() {
                if let Some(axiom) = step.axiom_at(row, col, &self.naming) {
                    out.insert(axiom);
                }
            }
        }
        out.into_iter().collect()
    }

    /// Human-readable listing of each relation and its facts.
    pub fn report(&self) -> String {
        let mut out = String::new();
        for (step, matrix) in self.steps.iter().zip(&self.matrices) {
            let _ = writeln!(out, "{} ({} facts)", step.relation(), matrix.len());
            for (row, col) in matrix.entries() {
                let Some(axiom) = step.axiom_at(row, col, &self.naming) else {
                    continue;
                };
                match matrix.explanation(row, col) {
                    Ok(Some(why)) => {
                        let _ = writeln!(out, "  {}  <=  {}", axiom, why);
                    }
                    _ => {
                        let _ = writeln!(out, "  {}", axiom);
                    }
                }
            }
        }
        out
    }
}
