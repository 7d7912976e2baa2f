//! Absorption-based minimization and the two combinators built on it.

use super::expr::Disjunction;

/// Remove every conjunction that is a strict superset of another one.
///
/// Equally minimal alternatives are all kept. If the empty conjunction is
/// present the result is exactly `{()}`.
pub fn minimize(d: &Disjunction) -> Disjunction {
    let result: Disjunction = d
        .iter()
        .filter(|c| !d.iter().any(|other| other != *c && c.is_absorbed_by(other)))
        .cloned()
        .collect();
    debug_assert!(is_minimal(&result), "minimize left an absorbed conjunction");
    result
}

/// Conjunction of two disjunctions, distributed back into DNF and minimized.
///
/// Every `ca ∈ a` is unioned with every `cb ∈ b`. An empty side yields an
/// empty result.
pub fn flatten(a: &Disjunction, b: &Disjunction) -> Disjunction {
    minimize(&cross(a, b))
}

/// Union `addition` into `existing` and minimize.
///
/// The flag is true exactly when the minimized result differs from
/// `existing`, i.e. when non-redundant justification was added.
pub fn merge(existing: &Disjunction, addition: &Disjunction) -> (Disjunction, bool) {
    if addition.is_empty() {
        return (existing.clone(), false);
    }
    let merged = minimize(&existing.union(addition));
    let changed = merged != *existing;
    (merged, changed)
}

/// Unminimized cross product of two disjunctions.
pub(crate) fn cross(a: &Disjunction, b: &Disjunction) -> Disjunction {
    a.iter()
        .flat_map(|ca| b.iter().map(move |cb| ca.union(cb)))
        .collect::<Disjunction>()
}

/// True if no conjunction of `d` absorbs another one.
pub fn is_minimal(d: &Disjunction) -> bool {
    d.iter()
        .all(|c| !d.iter().any(|other| other != c && c.is_absorbed_by(other)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explain::{Conjunction, Justification};
    use proptest::prelude::*;

    fn conj(lits: &[&str]) -> Conjunction {
        lits.iter().map(|s| Justification::new(*s)).collect()
    }

    fn disj(conjs: &[&[&str]]) -> Disjunction {
        conjs.iter().map(|c| conj(c)).collect()
    }

    #[test]
    fn test_minimize_removes_supersets() {
        let d = disj(&[&["a"], &["a", "b"], &["b", "c"], &["a", "b", "c"]]);
        assert_eq!(minimize(&d), disj(&[&["a"], &["b", "c"]]));
    }

    #[test]
    fn test_minimize_keeps_alternatives() {
        let d = disj(&[&["a", "b"], &["b", "c"], &["a", "c"]]);
        assert_eq!(minimize(&d), d);
    }

    #[test]
    fn test_empty_conjunction_absorbs_everything() {
        let d = disj(&[&[], &["a"], &["b", "c"]]);
        assert_eq!(minimize(&d), disj(&[&[]]));
    }

    #[test]
    fn test_flatten_two_hop() {
        let ab = disj(&[&["A sub B"]]);
        let bc = disj(&[&["B sub C"]]);
        assert_eq!(flatten(&ab, &bc), disj(&[&["A sub B", "B sub C"]]));
    }

    #[test]
    fn test_flatten_with_empty_side_is_empty() {
        let ab = disj(&[&["x"]]);
        assert!(flatten(&ab, &Disjunction::new()).is_empty());
        assert!(flatten(&Disjunction::new(), &ab).is_empty());
    }

    #[test]
    fn test_flatten_minimizes_product() {
        let a = disj(&[&["x"], &["y"]]);
        let b = disj(&[&["x"], &["z"]]);
        // (x) absorbs (x y) and (x z); (y z) survives.
        assert_eq!(flatten(&a, &b), disj(&[&["x"], &["y", "z"]]));
    }

    #[test]
    fn test_merge_reports_change() {
        let existing = disj(&[&["a", "b"]]);
        let (merged, changed) = merge(&existing, &disj(&[&["c"]]));
        assert!(changed);
        assert_eq!(merged, disj(&[&["a", "b"], &["c"]]));

        let (merged, changed) = merge(&merged, &disj(&[&["a", "b", "c"]]));
        assert!(!changed);
        assert_eq!(merged, disj(&[&["a", "b"], &["c"]]));

        let (merged, changed) = merge(&merged, &disj(&[&["a"]]));
        assert!(changed);
        assert_eq!(merged, disj(&[&["a"], &["c"]]));
    }

    fn arb_disjunction() -> impl Strategy<Value = Disjunction> {
        let lit = prop::sample::select(vec!["a", "b", "c", "d", "e"]);
        let conjunction = prop::collection::btree_set(lit, 0..4)
            .prop_map(|s| s.into_iter().map(Justification::new).collect::<Conjunction>());
        prop::collection::vec(conjunction, 0..6).prop_map(|v| v.into_iter().collect())
    }

    proptest! {
        #[test]
        fn minimize_satisfies_absorption(d in arb_disjunction()) {
            let m = minimize(&d);
            for c1 in m.iter() {
                for c2 in m.iter() {
                    prop_assert!(c1 == c2 || !c1.is_absorbed_by(c2));
                }
            }
        }

        #[test]
        fn minimize_is_idempotent(d in arb_disjunction()) {
            let once = minimize(&d);
            prop_assert_eq!(minimize(&once), once);
        }

        #[test]
        fn merge_with_empty_is_unchanged(d in arb_disjunction()) {
            let m = minimize(&d);
            let (merged, changed) = merge(&m, &Disjunction::new());
            prop_assert!(!changed);
            prop_assert_eq!(merged, m);
        }

        #[test]
        fn cross_is_pairwise_union(a in arb_disjunction(), b in arb_disjunction()) {
            let product = cross(&a, &b);
            prop_assert!(product.len() <= a.len() * b.len());
            for ca in a.iter() {
                for cb in b.iter() {
                    prop_assert!(product.contains(&ca.union(cb)));
                }
            }
            for c in product.iter() {
                prop_assert!(a.iter().any(|ca| b.iter().any(|cb| ca.union(cb) == *c)));
            }
        }
    }
}
