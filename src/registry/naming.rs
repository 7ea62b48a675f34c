//! Unique object names within a form.

use std::collections::HashSet;

use tracing::debug;

use crate::model::tree::{ObjectId, ObjectTree};
use crate::model::types::Category;

/// Object whose name matters for `id`: item wrappers stand for their child.
fn named_object(tree: &ObjectTree, id: ObjectId) -> Option<ObjectId> {
    match tree.category(id)? {
        Category::Sizeritem
        | Category::Splitteritem
        | Category::Notebookpage
        | Category::Flatnotebookpage
        | Category::Listbookpage
        | Category::Choicebookpage => tree.child(id, 0),
        _ => Some(id),
    }
}

/// Renames `id` by appending `_` until no other object in its form (or in the
/// whole tree, outside any form) has the same name.
pub fn resolve_name_conflict(tree: &mut ObjectTree, id: ObjectId) {
    let Some(object) = named_object(tree, id) else {
        return;
    };
    let Some(name) = tree.property(object, "name").map(|p| p.value().to_string()) else {
        return;
    };

    let scope = tree
        .find_near_ancestor(object, Category::Form)
        .unwrap_or_else(|| tree.root(object));
    let taken: HashSet<&str> = tree
        .descendants(scope)
        .into_iter()
        .filter(|&other| other != object)
        .filter_map(|other| tree.property(other, "name"))
        .map(|p| p.value())
        .collect();

    let mut unique = name.clone();
    while taken.contains(unique.as_str()) {
        unique.push('_');
    }
    if unique != name {
        debug!(from = %name, to = %unique, "Renamed object to resolve a name conflict");
        tree.set_value(object, "name", unique);
    }
}

/// Applies [`resolve_name_conflict`] to every object of a subtree, parents
/// before children.
pub fn resolve_subtree_name_conflicts(tree: &mut ObjectTree, id: ObjectId) {
    for object in tree.descendants(id) {
        resolve_name_conflict(tree, object);
    }
}
