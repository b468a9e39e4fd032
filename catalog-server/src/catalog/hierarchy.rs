//! Category ancestry resolution
//!
//! The store hands back the flat chain rows; this module rebuilds the nested
//! `parent` links from an id-indexed arena and polices the depth bound.

use shared::models::Category;
use std::collections::{HashMap, HashSet};

use super::store::CategoryStore;
use crate::error::{Entity, ServiceError, ServiceResult};

/// Deepest category chain accepted before the data is treated as corrupt
pub const MAX_CATEGORY_DEPTH: usize = 32;

/// Resolve `id` into a category carrying its full active ancestor chain
pub async fn resolve_ancestry<S>(store: &S, id: i64) -> ServiceResult<Category>
where
    S: CategoryStore + ?Sized,
{
    let rows = store.ancestry_rows(id).await?;
    assemble_ancestry(id, rows)
}

/// Link flat chain rows into nested parents, starting from `id`.
///
/// A parent id with no matching row ends the chain (the parent is inactive), so
/// the last node reached acts as the root for this request.
pub fn assemble_ancestry(id: i64, rows: Vec<Category>) -> ServiceResult<Category> {
    let mut arena: HashMap<i64, Category> = HashMap::with_capacity(rows.len());
    for row in rows {
        arena.entry(row.id).or_insert(row);
    }

    let mut chain: Vec<Category> = Vec::new();
    let mut visited = HashSet::new();
    let mut cursor = Some(id);

    while let Some(current) = cursor {
        if !visited.insert(current) {
            return Err(ServiceError::DataIntegrity(format!(
                "category {id} has a cycle through category {current}"
            )));
        }
        let Some(node) = arena.remove(&current) else {
            break;
        };
        if chain.len() == MAX_CATEGORY_DEPTH {
            return Err(ServiceError::DataIntegrity(format!(
                "category {id} is nested deeper than {MAX_CATEGORY_DEPTH} levels"
            )));
        }
        cursor = node.parent_id;
        chain.push(node);
    }

    // Fold root-first so every node owns its parent
    chain
        .into_iter()
        .rev()
        .fold(None, |parent: Option<Box<Category>>, mut node| {
            node.parent = parent;
            Some(Box::new(node))
        })
        .map(|node| *node)
        .ok_or(ServiceError::NotFound(Entity::Category(id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(id: i64, parent_id: Option<i64>) -> Category {
        Category {
            id,
            name: format!("Category {id}"),
            slug: format!("category-{id}"),
            description: None,
            parent_id,
            image_url: None,
            parent: None,
        }
    }

    #[test]
    fn test_chain_length_matches_depth() {
        // 4 -> 3 -> 2 -> 1 (root), rows in arbitrary order
        let rows = vec![cat(2, Some(1)), cat(4, Some(3)), cat(1, None), cat(3, Some(2))];
        let leaf = assemble_ancestry(4, rows).unwrap();

        assert_eq!(leaf.id, 4);
        assert_eq!(leaf.depth(), 4);
        let ids: Vec<i64> = leaf.chain().map(|c| c.id).collect();
        assert_eq!(ids, vec![4, 3, 2, 1]);
        assert!(leaf.root().parent.is_none());
        assert!(leaf.root().parent_id.is_none());
    }

    #[test]
    fn test_root_only() {
        let root = assemble_ancestry(1, vec![cat(1, None)]).unwrap();
        assert_eq!(root.depth(), 1);
    }

    #[test]
    fn test_missing_id_is_not_found() {
        let err = assemble_ancestry(9, vec![]).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(Entity::Category(9))));

        // rows that do not include the requested id never form a partial chain
        let err = assemble_ancestry(9, vec![cat(1, None)]).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn test_inactive_parent_becomes_effective_root() {
        // 3's parent 2 is soft-deleted, so the store returned no row for it
        let leaf = assemble_ancestry(3, vec![cat(3, Some(2))]).unwrap();
        assert_eq!(leaf.depth(), 1);
        assert!(leaf.parent.is_none());
    }

    #[test]
    fn test_cycle_is_data_integrity() {
        let rows = vec![cat(1, Some(3)), cat(2, Some(1)), cat(3, Some(2))];
        let err = assemble_ancestry(1, rows).unwrap_err();
        assert!(matches!(err, ServiceError::DataIntegrity(_)));
    }

    #[test]
    fn test_self_parent_is_data_integrity() {
        let err = assemble_ancestry(5, vec![cat(5, Some(5))]).unwrap_err();
        assert!(matches!(err, ServiceError::DataIntegrity(_)));
    }

    #[test]
    fn test_depth_bound() {
        let deepest = MAX_CATEGORY_DEPTH as i64;
        let rows: Vec<Category> = (1..=deepest)
            .map(|id| cat(id, (id > 1).then(|| id - 1)))
            .collect();
        assert_eq!(assemble_ancestry(deepest, rows.clone()).unwrap().depth(), MAX_CATEGORY_DEPTH);

        let mut too_deep = rows;
        too_deep.push(cat(deepest + 1, Some(deepest)));
        let err = assemble_ancestry(deepest + 1, too_deep).unwrap_err();
        assert!(matches!(err, ServiceError::DataIntegrity(_)));
    }
}
