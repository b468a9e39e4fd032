//! Category subtree closure

use std::collections::{BTreeSet, HashMap};

use super::store::CategoryStore;
use crate::error::ServiceResult;

/// Ids of every active category under the given slugs, roots included.
///
/// Unknown slugs contribute nothing. An empty slug set yields an empty set;
/// callers wanting "no restriction" omit the filter instead.
pub async fn expand_category_slugs<S>(store: &S, slugs: &[String]) -> ServiceResult<BTreeSet<i64>>
where
    S: CategoryStore + ?Sized,
{
    if slugs.is_empty() {
        return Ok(BTreeSet::new());
    }
    store.subtree_ids(slugs).await
}

/// Closure of `roots` under the child relation described by `(id, parent_id)` edges.
///
/// Edges should list active categories only; a root missing from `edges` is
/// still part of the result.
pub fn expand_subtrees<I>(edges: &[(i64, Option<i64>)], roots: I) -> BTreeSet<i64>
where
    I: IntoIterator<Item = i64>,
{
    let mut children: HashMap<i64, Vec<i64>> = HashMap::new();
    for &(id, parent_id) in edges {
        if let Some(parent_id) = parent_id {
            children.entry(parent_id).or_default().push(id);
        }
    }

    let mut closure = BTreeSet::new();
    let mut frontier: Vec<i64> = roots.into_iter().collect();
    while let Some(id) = frontier.pop() {
        if !closure.insert(id) {
            continue;
        }
        if let Some(kids) = children.get(&id) {
            frontier.extend(kids.iter().copied().filter(|kid| !closure.contains(kid)));
        }
    }
    closure
}
