//! Object instance tree backed by a slotmap arena.
//!
//! Every node lives in a single `SlotMap`. A node owns its ordered child list;
//! the parent link is a plain key used for lookups only. All mutations go
//! through [`ObjectTree`] so parent and child links stay symmetric.

use std::collections::VecDeque;
use std::sync::Arc;

use slotmap::{SlotMap, new_key_type};

use crate::error::{Error, Result};
use crate::model::convert::{
    self, BitmapRef, Colour, Font, Point, Size, format_int_list, format_string_list,
};
use crate::model::descriptor::{ClassId, PropertyDescriptor};
use crate::model::types::{Category, PropertyType};

new_key_type! {
    pub struct ObjectId;
}

/// A property value bound to its descriptor.
///
/// `default` is the effective default for the owning class, which may differ
/// from the descriptor's own default when a derived class overrides it.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    descriptor: Arc<PropertyDescriptor>,
    default: String,
    value: String,
}

impl Property {
    pub fn new(descriptor: Arc<PropertyDescriptor>, default: String) -> Self {
        Self {
            value: default.clone(),
            descriptor,
            default,
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn kind(&self) -> PropertyType {
        self.descriptor.kind
    }

    pub fn descriptor(&self) -> &Arc<PropertyDescriptor> {
        &self.descriptor
    }

    pub fn default_value(&self) -> &str {
        &self.default
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// A property still holding its default is treated as unset.
    pub fn is_default(&self) -> bool {
        self.value == self.default
    }

    pub fn reset_to_default(&mut self) {
        self.value = self.default.clone();
    }

    pub fn as_int(&self) -> i64 {
        self.value.trim().parse().unwrap_or(0)
    }

    pub fn set_int(&mut self, value: i64) {
        self.value = value.to_string();
    }

    pub fn as_float(&self) -> f64 {
        self.value.trim().parse().unwrap_or(0.0)
    }

    pub fn set_float(&mut self, value: f64) {
        self.value = value.to_string();
    }

    pub fn as_bool(&self) -> bool {
        convert::parse_bool(&self.value)
    }

    pub fn set_bool(&mut self, value: bool) {
        self.value = u8::from(value).to_string();
    }

    pub fn as_point(&self) -> Option<Point> {
        Point::parse(&self.value)
    }

    pub fn set_point(&mut self, value: Option<Point>) {
        self.value = value.map(|p| p.to_string()).unwrap_or_default();
    }

    pub fn as_size(&self) -> Option<Size> {
        Size::parse(&self.value)
    }

    pub fn set_size(&mut self, value: Option<Size>) {
        self.value = value.map(|s| s.to_string()).unwrap_or_default();
    }

    pub fn as_colour(&self) -> Option<Colour> {
        Colour::parse(&self.value)
    }

    pub fn set_colour(&mut self, value: Option<Colour>) {
        self.value = value.map(|c| c.to_string()).unwrap_or_default();
    }

    pub fn as_font(&self) -> Option<Font> {
        Font::parse(&self.value)
    }

    pub fn set_font(&mut self, value: Option<Font>) {
        self.value = value.map(|f| f.to_string()).unwrap_or_default();
    }

    pub fn as_bitmap(&self) -> BitmapRef {
        BitmapRef::parse(&self.value)
    }

    pub fn as_string_list(&self) -> Vec<String> {
        convert::parse_string_list(&self.value)
    }

    pub fn set_string_list<S: AsRef<str>>(&mut self, items: &[S]) {
        self.value = format_string_list(items);
    }

    pub fn as_int_list(&self) -> Vec<i64> {
        convert::parse_int_list(&self.value)
    }

    pub fn set_int_list(&mut self, values: &[i64]) {
        self.value = format_int_list(values);
    }

    pub fn flags(&self) -> Vec<String> {
        convert::split_flags(&self.value)
    }

    pub fn flag_set(&self, flag: &str) -> bool {
        self.flags().iter().any(|f| f == flag)
    }

    pub fn set_flag(&mut self, flag: &str) {
        let mut flags = self.flags();
        if !flags.iter().any(|f| f == flag) {
            flags.push(flag.to_string());
            self.value = convert::join_flags(&flags);
        }
    }

    pub fn clear_flag(&mut self, flag: &str) {
        let flags: Vec<String> = self.flags().into_iter().filter(|f| f != flag).collect();
        self.value = convert::join_flags(&flags);
    }
}

#[derive(Debug, Clone)]
pub struct ObjectNode {
    pub(crate) class: ClassId,
    pub(crate) class_name: String,
    pub(crate) category: Category,
    pub(crate) parent: Option<ObjectId>,
    pub(crate) children: Vec<ObjectId>,
    pub(crate) properties: Vec<Property>,
}

impl ObjectNode {
    pub fn new(class: ClassId, class_name: impl Into<String>, category: Category) -> Self {
        Self {
            class,
            class_name: class_name.into(),
            category,
            parent: None,
            children: Vec::new(),
            properties: Vec::new(),
        }
    }

    pub fn class(&self) -> ClassId {
        self.class
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<ObjectId> {
        self.children.get(index).copied()
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name() == name)
    }

    pub fn property_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.properties.iter_mut().find(|p| p.name() == name)
    }

    /// Appends a property unless one with the same name already exists.
    pub fn add_property(&mut self, property: Property) -> bool {
        if self.property(property.name()).is_some() {
            return false;
        }
        self.properties.push(property);
        true
    }

    /// Value of a property, or the empty string if the class has none.
    pub fn value(&self, name: &str) -> &str {
        self.property(name).map(Property::value).unwrap_or("")
    }

    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.property_mut(name) {
            Some(property) => {
                property.set_value(value);
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ObjectTree {
    nodes: SlotMap<ObjectId, ObjectNode>,
}

impl ObjectTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Inserts a detached node.
    pub fn insert(&mut self, mut node: ObjectNode) -> ObjectId {
        node.parent = None;
        node.children.clear();
        self.nodes.insert(node)
    }

    pub fn get(&self, id: ObjectId) -> Option<&ObjectNode> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut ObjectNode> {
        self.nodes.get_mut(id)
    }

    fn node(&self, id: ObjectId) -> Result<&ObjectNode> {
        self.nodes
            .get(id)
            .ok_or_else(|| Error::tree(format!("unknown object {id:?}")))
    }

    fn node_mut(&mut self, id: ObjectId) -> Result<&mut ObjectNode> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| Error::tree(format!("unknown object {id:?}")))
    }

    pub fn parent(&self, id: ObjectId) -> Option<ObjectId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: ObjectId) -> &[ObjectId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn child(&self, id: ObjectId, index: usize) -> Option<ObjectId> {
        self.children(id).get(index).copied()
    }

    pub fn category(&self, id: ObjectId) -> Option<Category> {
        self.nodes.get(id).map(|n| n.category)
    }

    pub fn class_name(&self, id: ObjectId) -> &str {
        self.nodes.get(id).map(|n| n.class_name.as_str()).unwrap_or("")
    }

    pub fn property(&self, id: ObjectId, name: &str) -> Option<&Property> {
        self.nodes.get(id).and_then(|n| n.property(name))
    }

    pub fn property_mut(&mut self, id: ObjectId, name: &str) -> Option<&mut Property> {
        self.nodes.get_mut(id).and_then(|n| n.property_mut(name))
    }

    pub fn value(&self, id: ObjectId, name: &str) -> &str {
        self.nodes.get(id).map(|n| n.value(name)).unwrap_or("")
    }

    pub fn set_value(&mut self, id: ObjectId, name: &str, value: impl Into<String>) -> bool {
        self.nodes
            .get_mut(id)
            .map(|n| n.set_value(name, value))
            .unwrap_or(false)
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: ObjectId, id: ObjectId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    pub fn add_child(&mut self, parent: ObjectId, child: ObjectId) -> Result<()> {
        let index = self.node(parent)?.children.len();
        self.insert_child(parent, child, index)
    }

    /// Links a detached `child` under `parent` at `index` (clamped).
    pub fn insert_child(&mut self, parent: ObjectId, child: ObjectId, index: usize) -> Result<()> {
        let child_node = self.node(child)?;
        if child_node.parent.is_some() {
            return Err(Error::tree(format!(
                "'{}' already has a parent",
                child_node.class_name
            )));
        }
        self.node(parent)?;
        if self.is_ancestor_or_self(child, parent) {
            return Err(Error::tree(format!(
                "'{}' can not be placed inside itself",
                self.class_name(child)
            )));
        }
        let parent_node = self.node_mut(parent)?;
        let index = index.min(parent_node.children.len());
        parent_node.children.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Detaches `child` from `parent`. The child subtree stays in the arena.
    pub fn remove_child(&mut self, parent: ObjectId, child: ObjectId) -> Result<()> {
        let parent_node = self.node_mut(parent)?;
        let Some(position) = parent_node.children.iter().position(|&c| c == child) else {
            return Err(Error::tree("object is not a child of the given parent"));
        };
        parent_node.children.remove(position);
        self.node_mut(child)?.parent = None;
        Ok(())
    }

    /// Detaches `id` from its parent, if any.
    pub fn detach(&mut self, id: ObjectId) -> Result<()> {
        match self.parent(id) {
            Some(parent) => self.remove_child(parent, id),
            None => Ok(()),
        }
    }

    pub fn child_position(&self, parent: ObjectId, child: ObjectId) -> Option<usize> {
        self.children(parent).iter().position(|&c| c == child)
    }

    /// Moves `child` to `position` among its siblings.
    pub fn change_child_position(
        &mut self,
        parent: ObjectId,
        child: ObjectId,
        position: usize,
    ) -> Result<()> {
        let parent_node = self.node_mut(parent)?;
        let Some(current) = parent_node.children.iter().position(|&c| c == child) else {
            return Err(Error::tree("object is not a child of the given parent"));
        };
        if position >= parent_node.children.len() {
            return Err(Error::tree(format!("position {position} out of range")));
        }
        let moved = parent_node.children.remove(current);
        parent_node.children.insert(position, moved);
        Ok(())
    }

    /// Detaches `id` and frees its whole subtree.
    pub fn destroy(&mut self, id: ObjectId) -> Result<()> {
        self.detach(id)?;
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            if let Some(node) = self.nodes.remove(current) {
                queue.extend(node.children);
            }
        }
        Ok(())
    }

    /// Number of ancestors. A root has depth 0.
    pub fn depth(&self, id: ObjectId) -> usize {
        self.ancestors(id).len()
    }

    /// Ancestors from the parent up to the root.
    pub fn ancestors(&self, id: ObjectId) -> Vec<ObjectId> {
        let mut result = Vec::new();
        let mut current = self.parent(id);
        while let Some(node) = current {
            result.push(node);
            current = self.parent(node);
        }
        result
    }

    pub fn root(&self, id: ObjectId) -> ObjectId {
        self.ancestors(id).last().copied().unwrap_or(id)
    }

    /// Closest ancestor, excluding `id` itself, of the given category.
    pub fn find_near_ancestor(&self, id: ObjectId, category: Category) -> Option<ObjectId> {
        self.ancestors(id)
            .into_iter()
            .find(|&a| self.category(a) == Some(category))
    }

    /// Preorder walk of the subtree rooted at `id`, including `id`.
    pub fn descendants(&self, id: ObjectId) -> Vec<ObjectId> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !self.contains(current) {
                continue;
            }
            result.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        result
    }

    pub fn count_children_with_category(&self, parent: ObjectId, category: Category) -> usize {
        self.children(parent)
            .iter()
            .filter(|&&c| self.category(c) == Some(category))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, category: Category) -> ObjectNode {
        let mut node = ObjectNode::new(ClassId::default(), name, category);
        let descriptor = Arc::new(PropertyDescriptor::new("name", PropertyType::Text, ""));
        node.add_property(Property::new(descriptor, String::new()));
        node.set_value("name", name);
        node
    }

    fn sample() -> (ObjectTree, ObjectId, ObjectId, ObjectId) {
        let mut tree = ObjectTree::new();
        let form = tree.insert(node("Frame", Category::Form));
        let sizer = tree.insert(node("wxBoxSizer", Category::Sizer));
        let item = tree.insert(node("sizeritem", Category::Sizeritem));
        tree.add_child(form, sizer).unwrap();
        tree.add_child(sizer, item).unwrap();
        (tree, form, sizer, item)
    }

    #[test]
    fn test_links_are_symmetric() {
        let (tree, form, sizer, item) = sample();
        assert_eq!(tree.parent(sizer), Some(form));
        assert_eq!(tree.children(form), &[sizer]);
        assert_eq!(tree.depth(item), 2);
        assert_eq!(tree.root(item), form);
        assert_eq!(tree.find_near_ancestor(item, Category::Form), Some(form));
        assert_eq!(tree.find_near_ancestor(item, Category::Notebook), None);
    }

    #[test]
    fn test_add_child_rejects_second_parent_and_cycles() {
        let (mut tree, form, sizer, item) = sample();
        assert!(tree.add_child(form, item).is_err());
        assert!(tree.add_child(item, form).is_err());
        assert!(tree.add_child(sizer, sizer).is_err());
        assert_eq!(tree.children(form), &[sizer]);
    }

    #[test]
    fn test_remove_and_reposition() {
        let (mut tree, form, sizer, _) = sample();
        let other = tree.insert(node("wxPanel", Category::Container));
        tree.add_child(form, other).unwrap();
        tree.change_child_position(form, other, 0).unwrap();
        assert_eq!(tree.children(form), &[other, sizer]);
        assert_eq!(tree.value(other, "name"), "wxPanel");
        assert!(tree.change_child_position(form, other, 5).is_err());

        tree.remove_child(form, other).unwrap();
        assert_eq!(tree.parent(other), None);
        assert!(tree.contains(other));
        assert!(tree.remove_child(form, other).is_err());
    }

    #[test]
    fn test_destroy_frees_subtree() {
        let (mut tree, form, sizer, item) = sample();
        tree.destroy(sizer).unwrap();
        assert!(!tree.contains(sizer));
        assert!(!tree.contains(item));
        assert!(tree.children(form).is_empty());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_descendants_preorder() {
        let (mut tree, form, sizer, item) = sample();
        let second = tree.insert(node("wxPanel", Category::Container));
        tree.add_child(form, second).unwrap();
        assert_eq!(tree.descendants(form), vec![form, sizer, item, second]);
        assert_eq!(tree.count_children_with_category(form, Category::Sizer), 1);
    }

    #[test]
    fn test_property_typed_accessors() {
        let descriptor = Arc::new(PropertyDescriptor::new("flag", PropertyType::BitList, ""));
        let mut property = Property::new(descriptor, "wxALL".to_string());
        assert!(property.is_default());
        property.set_flag("wxEXPAND");
        assert_eq!(property.value(), "wxALL|wxEXPAND");
        assert!(property.flag_set("wxEXPAND"));
        property.clear_flag("wxALL");
        assert_eq!(property.value(), "wxEXPAND");
        assert!(!property.is_default());
        property.reset_to_default();
        assert_eq!(property.value(), "wxALL");

        property.set_point(Some(Point::new(3, 4)));
        assert_eq!(property.as_point(), Some(Point::new(3, 4)));
        property.set_size(None);
        assert_eq!(property.as_size(), None);
        property.set_bool(true);
        assert!(property.as_bool());
        property.set_int(42);
        assert_eq!(property.as_int(), 42);
        property.set_float(1.5);
        assert_eq!(property.as_float(), 1.5);
        property.set_string_list(&["a", "b"]);
        assert_eq!(property.as_string_list(), vec!["a", "b"]);
        property.set_int_list(&[1, 2]);
        assert_eq!(property.as_int_list(), vec![1, 2]);
        property.set_colour(Some(Colour::Rgb(1, 2, 3)));
        assert_eq!(property.as_colour(), Some(Colour::Rgb(1, 2, 3)));
        property.set_font(None);
        assert_eq!(property.as_font(), None);
    }
}
