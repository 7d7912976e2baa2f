//! Justification algebra.
//!
//! Derived facts carry a minimized disjunction of conjunctions of atomic
//! justifications. Two-hop derivations combine their premises with
//! [`flatten`]; matrix cells accumulate alternatives with [`merge`].

mod expr;
mod minimize;

pub use expr::{Conjunction, Disjunction, Justification};
pub use minimize::{flatten, is_minimal, merge, minimize};
