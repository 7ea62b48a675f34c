//! Instance creation and deep copies.

use std::collections::HashMap;

use tracing::{debug, error};

use super::TypeRegistry;
use crate::error::{Error, Result};
use crate::model::descriptor::ClassId;
use crate::model::tree::{ObjectId, ObjectNode, ObjectTree, Property};
use crate::model::types::Category;

impl TypeRegistry {
    /// Creates a detached instance of `class` with its flattened property set.
    ///
    /// Properties are collected from the class and then its bases in
    /// [`TypeRegistry::base_chain`] order; the first declaration of a name wins.
    /// Default overrides are applied the same way, most-derived class first.
    pub fn new_instance(&self, tree: &mut ObjectTree, class: ClassId) -> Result<ObjectId> {
        let descriptor = self
            .class_by_id(class)
            .ok_or_else(|| Error::type_not_found(format!("{class:?}")))?;
        let chain = self.base_chain(class);

        let mut overrides: HashMap<&str, &str> = HashMap::new();
        for &id in &chain {
            let Some(current) = self.class_by_id(id) else {
                continue;
            };
            for index in 0..current.base_count() {
                if let Some(defaults) = current.base_defaults(index) {
                    for (name, value) in defaults {
                        overrides.entry(name.as_str()).or_insert(value.as_str());
                    }
                }
            }
        }

        let mut node = ObjectNode::new(class, descriptor.name(), descriptor.category());
        for &id in &chain {
            let Some(current) = self.class_by_id(id) else {
                continue;
            };
            for property in current.properties() {
                let default = overrides
                    .get(property.name.as_str())
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| property.default.clone());
                node.add_property(Property::new(property.clone(), default));
            }
        }

        let count = descriptor.next_instance();
        if let Some(name) = node.property_mut("name") {
            let numbered = format!("{}{count}", name.value());
            name.set_value(numbered);
        }
        Ok(tree.insert(node))
    }

    /// Creates an instance of `class_name` suitable for `parent`, without
    /// linking it.
    ///
    /// When the parent's category accepts the class directly, the bare instance
    /// is returned. Otherwise an item category of the parent that can host the
    /// class is looked up, and a detached item wrapper holding the new instance
    /// is returned instead.
    pub fn create_instance(
        &self,
        tree: &mut ObjectTree,
        class_name: &str,
        parent: Option<ObjectId>,
    ) -> Result<ObjectId> {
        let Some(descriptor) = self.class(class_name) else {
            error!(class = %class_name, "Unknown class");
            return Err(Error::type_not_found(class_name));
        };
        let class = descriptor.id();
        let category = descriptor.category();

        let Some(parent) = parent else {
            return self.new_instance(tree, class);
        };
        let Some(parent_category) = tree.category(parent) else {
            return Err(Error::tree("unknown parent object"));
        };
        let parent_class = tree.class_name(parent).to_string();

        if let Some(limit) = self.categories().child_limit(parent_category, category) {
            if limit.admits(tree.count_children_with_category(parent, category)) {
                return self.new_instance(tree, class);
            }
            error!(class = %class_name, parent = %parent_class, "Child limit reached");
            return Err(Error::structural(class_name, parent_class));
        }

        let item = self.find_item_slot(tree, parent, parent_category, category);
        let Some(item_category) = item else {
            error!(class = %class_name, parent = %parent_class, "No place for class under parent");
            return Err(Error::structural(class_name, parent_class));
        };

        let Some(item_class) = self.class(item_category.as_str()).map(|d| d.id()) else {
            error!(class = %item_category.as_str(), "Item wrapper class not registered");
            return Err(Error::type_not_found(item_category.as_str()));
        };
        let wrapper = self.new_instance(tree, item_class)?;
        let object = self.new_instance(tree, class)?;
        tree.add_child(wrapper, object)?;
        if item_category == Category::Sizeritem {
            apply_sizeritem_layout(tree, wrapper, category);
        }
        debug!(class = %class_name, item = %item_category, "Inserted item wrapper");
        Ok(wrapper)
    }

    fn find_item_slot(
        &self,
        tree: &ObjectTree,
        parent: ObjectId,
        parent_category: Category,
        category: Category,
    ) -> Option<Category> {
        let table = self.categories();
        let info = table.get(parent_category)?;
        info.children().iter().find_map(|&(item, limit)| {
            let hosts = table.is_item(item) && table.child_limit(item, category).is_some();
            let room = limit.admits(tree.count_children_with_category(parent, item));
            (hosts && room).then_some(item)
        })
    }

    /// Creates an instance for `parent` and links it as the last child.
    /// Returns the linked node, which is the item wrapper when one was inserted.
    pub fn create_child(
        &self,
        tree: &mut ObjectTree,
        class_name: &str,
        parent: ObjectId,
    ) -> Result<ObjectId> {
        let created = self.create_instance(tree, class_name, Some(parent))?;
        tree.add_child(parent, created)?;
        Ok(created)
    }

    /// Deep copy of the subtree rooted at `object`. The copy is detached and
    /// shares no nodes with the original.
    pub fn copy_instance(&self, tree: &mut ObjectTree, object: ObjectId) -> Result<ObjectId> {
        let Some(source) = tree.get(object) else {
            return Err(Error::tree("unknown object"));
        };
        let class = source.class();
        let values: Vec<(String, String)> = source
            .properties()
            .iter()
            .map(|p| (p.name().to_string(), p.value().to_string()))
            .collect();
        let children = source.children().to_vec();

        let copy = self.new_instance(tree, class)?;
        for (name, value) in values {
            tree.set_value(copy, &name, value);
        }
        for child in children {
            let child_copy = self.copy_instance(tree, child)?;
            tree.add_child(copy, child_copy)?;
        }
        Ok(copy)
    }
}

/// Sensible layout for a window or sizer that was just wrapped in a sizer item.
fn apply_sizeritem_layout(tree: &mut ObjectTree, item: ObjectId, child: Category) {
    let (proportion, flag) = match child {
        Category::Notebook
        | Category::Flatnotebook
        | Category::Listbook
        | Category::Choicebook
        | Category::ExpandedWidget
        | Category::Container => ("1", "wxEXPAND|wxALL"),
        Category::Widget | Category::Statusbar => ("0", "wxALL"),
        Category::Sizer | Category::Splitter => ("1", "wxEXPAND"),
        _ => return,
    };
    tree.set_value(item, "proportion", proportion);
    tree.set_value(item, "flag", flag);
}
