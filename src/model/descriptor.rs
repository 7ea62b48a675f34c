//! Property and type descriptors.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use slotmap::new_key_type;

use crate::components::{Component, ComponentKind};
use crate::model::types::{Category, OptionList, PropertyType};

new_key_type! {
    /// Handle of a [`TypeDescriptor`] inside a [`crate::registry::TypeRegistry`].
    pub struct ClassId;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub name: String,
    pub kind: PropertyType,
    pub default: String,
    pub hidden: bool,
    pub description: String,
    pub options: Option<OptionList>,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, kind: PropertyType, default: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            default: default.into(),
            hidden: false,
            description: String::new(),
            options: None,
        }
    }

    pub fn with_options(mut self, options: OptionList) -> Self {
        self.options = Some(options);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

/// Named templates of one class for one target language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeInfo {
    slots: HashMap<String, String>,
}

impl CodeInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: &str) -> Option<&str> {
        self.slots.get(slot).map(String::as_str)
    }

    pub fn insert(&mut self, slot: impl Into<String>, template: impl Into<String>) {
        self.slots.insert(slot.into(), template.into());
    }

    pub fn merge(&mut self, other: CodeInfo) {
        self.slots.extend(other.slots);
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Class metadata: category, declared properties, bases and templates.
///
/// `bases` and `base_defaults` are parallel: `base_defaults[i]` holds the
/// default overrides this class applies to properties inherited through
/// `bases[i]`.
#[derive(Debug)]
pub struct TypeDescriptor {
    pub(crate) id: ClassId,
    pub(crate) name: String,
    pub(crate) category: Category,
    pub(crate) package: String,
    pub(crate) properties: Vec<Arc<PropertyDescriptor>>,
    pub(crate) bases: Vec<ClassId>,
    pub(crate) base_defaults: Vec<HashMap<String, String>>,
    pub(crate) code: HashMap<String, CodeInfo>,
    pub(crate) component: Option<Arc<dyn Component>>,
    instances: AtomicU32,
}

impl TypeDescriptor {
    pub(crate) fn new(name: impl Into<String>, category: Category, package: impl Into<String>) -> Self {
        Self {
            id: ClassId::default(),
            name: name.into(),
            category,
            package: package.into(),
            properties: Vec::new(),
            bases: Vec::new(),
            base_defaults: Vec::new(),
            code: HashMap::new(),
            component: None,
            instances: AtomicU32::new(0),
        }
    }

    pub fn id(&self) -> ClassId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    /// Declared properties only, without inherited ones.
    pub fn properties(&self) -> &[Arc<PropertyDescriptor>] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Arc<PropertyDescriptor>> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn bases(&self) -> &[ClassId] {
        &self.bases
    }

    pub fn base_count(&self) -> usize {
        self.bases.len()
    }

    /// Default overrides applied to properties inherited through `bases()[index]`.
    pub fn base_defaults(&self, index: usize) -> Option<&HashMap<String, String>> {
        self.base_defaults.get(index)
    }

    pub(crate) fn add_base(&mut self, base: ClassId, overrides: HashMap<String, String>) {
        self.bases.push(base);
        self.base_defaults.push(overrides);
    }

    pub fn code_info(&self, language: &str) -> Option<&CodeInfo> {
        self.code.get(language)
    }

    pub fn template(&self, language: &str, slot: &str) -> Option<&str> {
        self.code.get(language).and_then(|info| info.get(slot))
    }

    pub fn component(&self) -> Option<&Arc<dyn Component>> {
        self.component.as_ref()
    }

    pub fn component_kind(&self) -> Option<ComponentKind> {
        self.component.as_ref().map(|c| c.kind())
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.load(Ordering::Relaxed)
    }

    /// Increments the instance counter and returns the new value.
    pub(crate) fn next_instance(&self) -> u32 {
        self.instances.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub(crate) fn reset_instances(&self) {
        self.instances.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_counter() {
        let descriptor = TypeDescriptor::new("wxButton", Category::Widget, "common");
        assert_eq!(descriptor.instance_count(), 0);
        assert_eq!(descriptor.next_instance(), 1);
        assert_eq!(descriptor.next_instance(), 2);
        descriptor.reset_instances();
        assert_eq!(descriptor.instance_count(), 0);
    }

    #[test]
    fn test_template_lookup() {
        let mut descriptor = TypeDescriptor::new("wxButton", Category::Widget, "common");
        let mut info = CodeInfo::new();
        info.insert("construction", "$name = new wxButton();");
        descriptor.code.insert("C++".to_string(), info);
        assert_eq!(
            descriptor.template("C++", "construction"),
            Some("$name = new wxButton();")
        );
        assert_eq!(descriptor.template("C++", "settings"), None);
        assert_eq!(descriptor.template("XRC", "construction"), None);
    }

    #[test]
    fn test_property_descriptor_builders() {
        let descriptor = PropertyDescriptor::new("label", PropertyType::StringI18n, "OK").hidden();
        assert!(descriptor.hidden);
        assert!(descriptor.options.is_none());
        assert_eq!(descriptor.default, "OK");
    }
}
