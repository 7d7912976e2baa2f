//! Justification expressions.
//!
//! Explanations are kept in disjunctive normal form: a [`Disjunction`] of
//! [`Conjunction`]s of atomic [`Justification`]s. All three are immutable
//! values; combining them always builds a new value.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// An atomic piece of evidence, usually the rendering of an asserted fact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Justification(Arc<str>);

impl Justification {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Justification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A set of justifications that jointly explain a fact along one path.
///
/// The empty conjunction stands for a fact that holds without any cause and
/// absorbs every other conjunction it is minimized against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Conjunction(BTreeSet<Justification>);

impl Conjunction {
    pub fn new() -> Self {
        Self::default()
    }

    /// A conjunction holding exactly one justification.
    pub fn single(justification: Justification) -> Self {
        Self(BTreeSet::from([justification]))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, justification: &Justification) -> bool {
        self.0.contains(justification)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Justification> {
        self.0.iter()
    }

    /// True if `self` is absorbed by `other`, i.e. `other ⊆ self`.
    pub fn is_absorbed_by(&self, other: &Conjunction) -> bool {
        other.0.is_subset(&self.0)
    }

    /// Union of both literal sets.
    pub fn union(&self, other: &Conjunction) -> Conjunction {
        Self(self.0.union(&other.0).cloned().collect())
    }
}

impl FromIterator<Justification> for Conjunction {
    fn from_iter<I: IntoIterator<Item = Justification>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, j) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " AND ")?;
            }
            write!(f, "{}", j)?;
        }
        write!(f, ")")
    }
}

/// Alternative conjunctions, any one of which explains a fact.
///
/// An empty disjunction means "no justification available". It is not the
/// same as a false relation cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Disjunction(BTreeSet<Conjunction>);

impl Disjunction {
    pub fn new() -> Self {
        Self::default()
    }

    /// The explanation of an asserted fact: one conjunction quoting it.
    pub fn asserted(justification: Justification) -> Self {
        Self(BTreeSet::from([Conjunction::single(justification)]))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, conjunction: &Conjunction) -> bool {
        self.0.contains(conjunction)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Conjunction> {
        self.0.iter()
    }

    /// Union of both conjunction sets, without minimization.
    pub(crate) fn union(&self, other: &Disjunction) -> Disjunction {
        Self(self.0.union(&other.0).cloned().collect())
    }

    /// Every justification mentioned anywhere in this disjunction.
    pub fn justifications(&self) -> BTreeSet<&Justification> {
        self.0.iter().flat_map(|c| c.iter()).collect()
    }
}

impl FromIterator<Conjunction> for Disjunction {
    fn from_iter<I: IntoIterator<Item = Conjunction>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Disjunction {
    type Item = Conjunction;
    type IntoIter = std::collections::btree_set::IntoIter<Conjunction>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for Disjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<none>");
        }
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " OR ")?;
            }
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}
