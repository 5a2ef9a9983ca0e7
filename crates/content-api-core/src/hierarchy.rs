//! Nested category trees from flat term lists.
//!
//! Terms are placed in an arena in first-seen order and linked by index, so
//! no node is ever aliased while the tree is being assembled. The nested
//! [`CategoryNode`] shape is only materialized once linking is complete.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::terms::{Term, TermId};

/// Response shape of one category and its descendants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryNode {
    pub id: TermId,
    pub name: String,
    pub slug: String,
    pub children: Vec<CategoryNode>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HierarchyError {
    /// The term sits on (or below) a parent cycle and can never reach a root.
    #[error("term {term_id} is part of a cyclic parent chain")]
    CyclicHierarchy { term_id: TermId },
}

struct Slot<'a> {
    term: &'a Term,
    children: Vec<usize>,
}

/// Build the category forest for `terms`.
///
/// Roots are terms without a parent or whose parent is not in the input;
/// they keep their relative input order, as do siblings. A duplicated id
/// keeps its first position but takes the last occurrence's fields.
///
/// # Errors
///
/// Returns [`HierarchyError::CyclicHierarchy`] naming the first term (in
/// input order) that cannot reach a root. Acyclic input never fails.
pub fn build_tree(terms: &[Term]) -> Result<Vec<CategoryNode>, HierarchyError> {
    let mut index: HashMap<TermId, usize> = HashMap::with_capacity(terms.len());
    let mut arena: Vec<Slot<'_>> = Vec::with_capacity(terms.len());

    for term in terms {
        if let Some(&pos) = index.get(&term.id) {
            arena[pos].term = term;
        } else {
            index.insert(term.id, arena.len());
            arena.push(Slot {
                term,
                children: Vec::new(),
            });
        }
    }

    let mut roots = Vec::new();
    for pos in 0..arena.len() {
        let parent_pos = arena[pos]
            .term
            .parent
            .and_then(|parent| index.get(&parent).copied());
        match parent_pos {
            Some(parent_pos) => arena[parent_pos].children.push(pos),
            None => roots.push(pos),
        }
    }

    // Every node has at most one parent slot, so a walk from the roots
    // visits each reachable node once. Whatever it misses hangs off a cycle.
    let mut reached = vec![false; arena.len()];
    let mut stack = roots.clone();
    while let Some(pos) = stack.pop() {
        reached[pos] = true;
        stack.extend(arena[pos].children.iter().copied());
    }
    if let Some(pos) = reached.iter().position(|seen| !seen) {
        let term_id = arena[pos].term.id;
        tracing::warn!(term_id, "category parent chain forms a cycle");
        return Err(HierarchyError::CyclicHierarchy { term_id });
    }

    Ok(roots.iter().map(|&pos| materialize(&arena, pos)).collect())
}

fn materialize(arena: &[Slot<'_>], pos: usize) -> CategoryNode {
    let slot = &arena[pos];
    CategoryNode {
        id: slot.term.id,
        name: slot.term.name.clone(),
        slug: slot.term.slug.clone(),
        children: slot
            .children
            .iter()
            .map(|&child| materialize(arena, child))
            .collect(),
    }
}
