//! Set algebra used to propagate constraints across relation hops.
//!
//! All functions are pure. Results are `BTreeSet`s, so they depend only on
//! the contents of the inputs and never on iteration order.
//!
//! Note that an empty key set expands to an empty set. Callers must keep
//! "nothing selected" (no constraint) apart from "selection reaches
//! nothing" (empty visibility); the resolver does this by skipping facets
//! without a selection.

use crate::FacetValue;
use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

/// Ordered set of facet values.
pub type ValueSet = BTreeSet<FacetValue>;

/// Union of `map[k]` over every `k` in `keys`. Keys absent from the map
/// contribute nothing.
pub fn expand<'a, K, V>(keys: impl IntoIterator<Item = &'a K>, map: &HashMap<K, BTreeSet<V>>) -> BTreeSet<V>
where
    K: Eq + Hash + 'a,
    V: Ord + Clone,
{
    let mut out = BTreeSet::new();
    for key in keys {
        if let Some(values) = map.get(key) {
            out.extend(values.iter().cloned());
        }
    }
    out
}

/// Two hops: `keys -> first -> second`.
pub fn expand_chain<'a, K, M, V>(
    keys: impl IntoIterator<Item = &'a K>,
    first: &HashMap<K, BTreeSet<M>>,
    second: &HashMap<M, BTreeSet<V>>,
) -> BTreeSet<V>
where
    K: Eq + Hash + 'a,
    M: Eq + Hash + Ord + Clone,
    V: Ord + Clone,
{
    expand(&expand(keys, first), second)
}

/// Three hops: `keys -> first -> second -> third`.
pub fn expand_chain3<'a, K, M, N, V>(
    keys: impl IntoIterator<Item = &'a K>,
    first: &HashMap<K, BTreeSet<M>>,
    second: &HashMap<M, BTreeSet<N>>,
    third: &HashMap<N, BTreeSet<V>>,
) -> BTreeSet<V>
where
    K: Eq + Hash + 'a,
    M: Eq + Hash + Ord + Clone,
    N: Eq + Hash + Ord + Clone,
    V: Ord + Clone,
{
    expand(&expand_chain(keys, first, second), third)
}

pub fn intersect<T: Ord + Clone>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> BTreeSet<T> {
    a.intersection(b).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multimap(pairs: &[(u32, u32)]) -> HashMap<u32, BTreeSet<u32>> {
        let mut map: HashMap<u32, BTreeSet<u32>> = HashMap::new();
        for &(k, v) in pairs {
            map.entry(k).or_default().insert(v);
        }
        map
    }

    fn set(values: &[u32]) -> BTreeSet<u32> {
        values.iter().copied().collect()
    }

    #[test]
    fn expand_unions_and_skips_missing_keys() {
        let map = multimap(&[(1, 10), (1, 11), (2, 11), (2, 12)]);
        assert_eq!(expand(&set(&[1, 2, 99]), &map), set(&[10, 11, 12]));
        assert_eq!(expand(&set(&[99]), &map), set(&[]));
        assert_eq!(expand(&set(&[]), &map), set(&[]));
    }

    #[test]
    fn chains_compose_hops() {
        let a = multimap(&[(1, 10), (2, 20)]);
        let b = multimap(&[(10, 100), (20, 200), (20, 201)]);
        let c = multimap(&[(100, 1000), (201, 2010)]);

        assert_eq!(expand_chain(&set(&[2]), &a, &b), set(&[200, 201]));
        assert_eq!(expand_chain3(&set(&[1, 2]), &a, &b, &c), set(&[1000, 2010]));
        assert_eq!(expand_chain3(&set(&[3]), &a, &b, &c), set(&[]));
    }

    #[test]
    fn intersect_keeps_common_values() {
        assert_eq!(intersect(&set(&[1, 2, 3]), &set(&[2, 3, 4])), set(&[2, 3]));
        assert_eq!(intersect(&set(&[1]), &set(&[2])), set(&[]));
    }
}
