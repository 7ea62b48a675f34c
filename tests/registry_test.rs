//! Integration tests for loading the shipped definitions and building trees

mod common;

use formgen::Error;
use formgen::model::{Category, ObjectTree, PropertyType};
use formgen::registry::{load_project, resolve_name_conflict};
use pretty_assertions::assert_eq;

#[test]
fn test_shipped_definitions_load() {
    let registry = common::registry();

    let packages: Vec<&str> = registry.packages().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(packages, vec!["default", "common", "layout", "additional"]);
    assert_eq!(registry.missing_macros().count(), 0);

    let button = registry.class("wxButton").unwrap();
    let bases: Vec<&str> = button
        .bases()
        .iter()
        .map(|&b| registry.class_by_id(b).unwrap().name())
        .collect();
    assert_eq!(bases, vec!["wxWindow", "C++"]);
    assert!(button.template("C++", "construction").is_some());

    // sizers and item wrappers never get the language interface
    assert!(registry.class("wxBoxSizer").unwrap().bases().is_empty());
    assert!(registry.class("sizeritem").unwrap().bases().is_empty());

    let permission = registry.class("C++").unwrap().property("permission").unwrap();
    assert_eq!(permission.kind, PropertyType::Option);
    assert_eq!(permission.options.as_ref().map(|o| o.len()), Some(4));
}

#[test]
fn test_palette_hides_interfaces_and_items() {
    let registry = common::registry();
    let palette = registry.palette();

    let (_, default) = &palette[0];
    assert!(default.contains(&"Frame"));
    assert!(default.contains(&"Panel"));
    assert!(!default.contains(&"Project"));
    assert!(!default.contains(&"wxWindow"));
    assert!(!default.contains(&"C++"));

    let (_, common) = &palette[1];
    assert!(common.contains(&"wxButton"));
    assert!(common.contains(&"wxSplitterWindow"));
    assert!(!common.contains(&"notebookpage"));
    assert!(!common.contains(&"splitteritem"));
}

#[test]
fn test_base_overrides_from_definitions() {
    let registry = common::registry();
    let mut tree = ObjectTree::new();

    let frame = registry.create_instance(&mut tree, "Frame", None).unwrap();
    assert_eq!(tree.value(frame, "size"), "500,300");
    assert_eq!(tree.value(frame, "name"), "MyFrame1");
    assert_eq!(tree.value(frame, "permission"), "");

    let panel = registry.create_instance(&mut tree, "wxPanel", None).unwrap();
    assert_eq!(tree.value(panel, "window_style"), "wxTAB_TRAVERSAL");
    assert_eq!(tree.value(panel, "permission"), "protected");

    let button = registry.create_instance(&mut tree, "wxButton", None).unwrap();
    assert_eq!(tree.value(button, "window_style"), "");
    assert!(tree.property(button, "size").unwrap().is_default());
}

#[test]
fn test_item_wrappers_are_inserted() {
    let registry = common::registry();
    let mut tree = ObjectTree::new();
    let frame = registry.create_instance(&mut tree, "Frame", None).unwrap();
    let sizer = registry.create_child(&mut tree, "wxBoxSizer", frame).unwrap();
    assert_eq!(tree.parent(sizer), Some(frame));

    let item = registry.create_child(&mut tree, "wxButton", sizer).unwrap();
    assert_eq!(tree.class_name(item), "sizeritem");
    assert_eq!(tree.category(item), Some(Category::Sizeritem));
    let button = tree.child(item, 0).unwrap();
    assert_eq!(tree.class_name(button), "wxButton");
    assert_eq!(tree.value(item, "proportion"), "0");
    assert_eq!(tree.value(item, "flag"), "wxALL");

    let item = registry.create_child(&mut tree, "wxPanel", sizer).unwrap();
    assert_eq!(tree.value(item, "proportion"), "1");
    assert_eq!(tree.value(item, "flag"), "wxEXPAND|wxALL");

    let item = registry.create_child(&mut tree, "wxGridSizer", sizer).unwrap();
    assert_eq!(tree.class_name(tree.child(item, 0).unwrap()), "wxGridSizer");
    assert_eq!(tree.value(item, "flag"), "wxEXPAND");

    let spacer = registry.create_child(&mut tree, "spacer", sizer).unwrap();
    assert_eq!(tree.parent(spacer), Some(sizer));
    assert_eq!(tree.children(sizer).len(), 4);
}

#[test]
fn test_child_limits() {
    let registry = common::registry();
    let mut tree = ObjectTree::new();
    let frame = registry.create_instance(&mut tree, "Frame", None).unwrap();
    let sizer = registry.create_child(&mut tree, "wxBoxSizer", frame).unwrap();

    // a form holds a single top-level sizer
    let second = registry.create_child(&mut tree, "wxBoxSizer", frame);
    assert!(matches!(second, Err(Error::StructuralViolation { .. })));

    let item = registry.create_child(&mut tree, "wxSplitterWindow", sizer).unwrap();
    let splitter = tree.child(item, 0).unwrap();
    registry.create_child(&mut tree, "wxPanel", splitter).unwrap();
    registry.create_child(&mut tree, "wxPanel", splitter).unwrap();
    let third = registry.create_child(&mut tree, "wxPanel", splitter);
    assert!(matches!(third, Err(Error::StructuralViolation { .. })));
    assert_eq!(tree.children(splitter).len(), 2);

    // a widget never goes straight into a form
    let button = registry.create_child(&mut tree, "wxButton", frame);
    assert!(matches!(button, Err(Error::StructuralViolation { .. })));

    let unknown = registry.create_child(&mut tree, "wxGizmo", sizer);
    assert!(matches!(unknown, Err(Error::TypeNotFound(_))));
}

#[test]
fn test_copy_is_independent() {
    let registry = common::registry();
    let project = r#"
object:
  class: Project
  children:
    - class: Frame
      children:
        - class: wxBoxSizer
          children:
            - class: wxButton
              properties:
                label: Original
            - class: wxTextCtrl
"#;
    let (mut tree, root) = load_project(&registry, project).unwrap();
    let frame = tree.child(root, 0).unwrap();

    let copy = registry.copy_instance(&mut tree, frame).unwrap();
    assert_eq!(tree.parent(copy), None);

    let original_nodes = tree.descendants(frame);
    let copied_nodes = tree.descendants(copy);
    assert_eq!(original_nodes.len(), copied_nodes.len());
    for (&a, &b) in original_nodes.iter().zip(&copied_nodes) {
        assert_ne!(a, b);
        assert_eq!(tree.class_name(a), tree.class_name(b));
        assert_eq!(tree.depth(a) - tree.depth(frame), tree.depth(b) - tree.depth(copy));
        let values = |id| {
            tree.get(id)
                .unwrap()
                .properties()
                .iter()
                .map(|p| (p.name().to_string(), p.value().to_string()))
                .collect::<Vec<_>>()
        };
        assert_eq!(values(a), values(b));
    }

    let copied_button = copied_nodes
        .iter()
        .copied()
        .find(|&id| tree.class_name(id) == "wxButton")
        .unwrap();
    tree.set_value(copied_button, "label", "Changed");
    let original_button = original_nodes
        .iter()
        .copied()
        .find(|&id| tree.class_name(id) == "wxButton")
        .unwrap();
    assert_eq!(tree.value(original_button, "label"), "Original");
}

#[test]
fn test_project_loading_resets_counters() {
    let registry = common::registry();
    let project = r#"
object:
  class: Project
  children:
    - class: Frame
"#;
    let (tree, root) = load_project(&registry, project).unwrap();
    assert_eq!(tree.value(tree.child(root, 0).unwrap(), "name"), "MyFrame1");

    let (tree, root) = load_project(&registry, project).unwrap();
    assert_eq!(tree.value(tree.child(root, 0).unwrap(), "name"), "MyFrame1");
}

#[test]
fn test_name_conflicts_within_form() {
    let registry = common::registry();
    let project = r#"
object:
  class: Project
  children:
    - class: Frame
      children:
        - class: wxBoxSizer
          children:
            - class: wxButton
              properties:
                name: m_ok
            - class: wxButton
              properties:
                name: m_ok
"#;
    let (mut tree, root) = load_project(&registry, project).unwrap();
    let frame = tree.child(root, 0).unwrap();
    let sizer = tree.child(frame, 0).unwrap();
    let second_item = tree.child(sizer, 1).unwrap();

    resolve_name_conflict(&mut tree, second_item);

    let first = tree.child(tree.child(sizer, 0).unwrap(), 0).unwrap();
    let second = tree.child(second_item, 0).unwrap();
    assert_eq!(tree.value(first, "name"), "m_ok");
    assert_eq!(tree.value(second, "name"), "m_ok_");
}
