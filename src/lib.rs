//! trex: explained materialization of schema relations
//!
//! trex closes a fixed set of binary relations over the named concepts and
//! properties of a schema (subsumption, disjointness, property domain and
//! range) and derives which properties are unsatisfiable. Every derived
//! fact carries a minimized explanation: the alternative sets of asserted
//! facts it follows from.
//!
//! # Key Insight
//!
//! Each relation is a dense boolean matrix closed by a local rule such as
//! `sub(x,z) ← sub(x,y), sub(y,z)`. Explanations ride along in DNF: a two-hop
//! derivation takes the cross product of its premises' explanations, then
//! absorbs every conjunction that is a superset of another.

pub mod axiom;
pub mod error;
pub mod explain;
pub mod inference;
pub mod materialize;
pub mod matrix;
pub mod ontology;
pub mod reasoner;
pub mod syntax;

pub use axiom::{Axiom, Entity, EntityDomain, FactKind};
pub use error::{Result, TrexError};
pub use explain::{flatten, merge, minimize, Conjunction, Disjunction, Justification};
pub use inference::{default_steps, InferenceStep, Peers, Relation};
pub use materialize::{materialize, MaterializeStats};
pub use matrix::{MatrixState, RelationMatrix};
pub use ontology::Ontology;
pub use reasoner::{NamingRegistry, Reasoner, ReasonerConfig};
pub use syntax::{parse, parse_statement, Document, Statement};
