//! Project documents.
//!
//! ```yaml
//! object:
//!   class: Project
//!   properties:
//!     file: gui
//!   children:
//!     - class: Frame
//!       children: [...]
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::{info, warn};

use super::TypeRegistry;
use super::loader::{parse_document, scalar_to_string};
use crate::error::Result;
use crate::model::tree::{ObjectId, ObjectTree};

#[derive(Debug, Clone, Deserialize)]
struct ProjectDocument {
    object: ObjectDef,
}

#[derive(Debug, Clone, Deserialize)]
struct ObjectDef {
    class: String,
    #[serde(default)]
    properties: BTreeMap<String, serde_yaml::Value>,
    #[serde(default)]
    children: Vec<ObjectDef>,
}

/// Builds an object tree from a project document.
///
/// Instance counters are reset first. Objects the registry refuses (unknown
/// class, no place under their parent) are logged and skipped along with
/// their subtree; unknown properties are logged and ignored.
pub fn load_project(registry: &TypeRegistry, text: &str) -> Result<(ObjectTree, ObjectId)> {
    let document: ProjectDocument = parse_document("project", text)?;
    registry.reset_instance_counters();

    let mut tree = ObjectTree::new();
    let root = registry.create_instance(&mut tree, &document.object.class, None)?;
    apply_properties(&mut tree, root, &document.object);
    for child in &document.object.children {
        build(registry, &mut tree, root, child)?;
    }
    info!(objects = tree.len(), "Project loaded");
    Ok((tree, root))
}

fn build(
    registry: &TypeRegistry,
    tree: &mut ObjectTree,
    parent: ObjectId,
    def: &ObjectDef,
) -> Result<()> {
    let Ok(created) = registry.create_child(tree, &def.class, parent) else {
        warn!(class = %def.class, "Skipping object");
        return Ok(());
    };
    // an auto-inserted item wrapper stands between parent and object
    let object = if tree.class_name(created) == def.class {
        created
    } else {
        tree.child(created, 0).unwrap_or(created)
    };
    apply_properties(tree, object, def);
    for child in &def.children {
        build(registry, tree, object, child)?;
    }
    Ok(())
}

fn apply_properties(tree: &mut ObjectTree, object: ObjectId, def: &ObjectDef) {
    for (name, value) in &def.properties {
        if !tree.set_value(object, name, scalar_to_string(value)) {
            warn!(class = %def.class, property = %name, "Unknown property");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::registry;
    use super::*;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn test_load_project_tree() {
        let registry = registry();
        let text = r#"
object:
  class: Project
  properties:
    file: gui
  children:
    - class: Frame
      properties:
        name: MainFrame
        colour: red
      children:
        - class: wxBoxSizer
          children:
            - class: sizeritem
              properties:
                proportion: 1
              children:
                - class: wxButton
                  properties:
                    name: ok
            - class: wxButton
              properties:
                name: cancel
            - class: wxGizmo
"#;
        let (tree, root) = load_project(&registry, text).unwrap();
        assert_eq!(tree.value(root, "file"), "gui");
        let frame = tree.child(root, 0).unwrap();
        assert_eq!(tree.value(frame, "name"), "MainFrame");
        assert!(logs_contain("Unknown property"));

        let sizer = tree.child(frame, 0).unwrap();
        assert_eq!(tree.children(sizer).len(), 2);
        let first = tree.child(sizer, 0).unwrap();
        assert_eq!(tree.value(first, "proportion"), "1");
        assert_eq!(tree.value(tree.child(first, 0).unwrap(), "name"), "ok");
        let second = tree.child(sizer, 1).unwrap();
        assert_eq!(tree.class_name(second), "sizeritem");
        assert_eq!(tree.value(tree.child(second, 0).unwrap(), "name"), "cancel");
        assert!(logs_contain("Skipping object"));
    }

    #[test]
    fn test_unknown_root_class_fails() {
        let registry = registry();
        let result = load_project(&registry, "object:\n  class: Nothing\n");
        assert!(result.is_err());
    }
}
