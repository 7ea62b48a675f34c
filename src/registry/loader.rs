//! Definition document formats.
//!
//! Four YAML documents feed the registry:
//! - `objtypes.yaml` describes categories and their child table,
//! - package documents declare classes, properties and inheritance,
//! - code documents map `(class, slot)` to template text for one language,
//! - `packages.yaml` lists package documents in load order.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};
use crate::model::types::{Category, OptionEntry, PropertyType};

/// Renders a YAML scalar the way it would be written in a property value.
pub(crate) fn scalar_to_string(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::Null => String::new(),
        serde_yaml::Value::Bool(b) => u8::from(*b).to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

fn deserialize_scalar<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_yaml::Value::deserialize(deserializer)?;
    Ok(scalar_to_string(&value))
}

fn deserialize_scalar_map<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = BTreeMap::<String, serde_yaml::Value>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .map(|(k, v)| (k, scalar_to_string(&v)))
        .collect())
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectTypesDocument {
    pub categories: Vec<CategoryDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryDef {
    pub name: Category,
    #[serde(default)]
    pub hidden: bool,
    /// Item categories are inserted transparently between a parent and a child.
    #[serde(default)]
    pub item: bool,
    #[serde(default)]
    pub children: Vec<ChildDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChildDef {
    pub name: Category,
    /// Absent or negative means unlimited.
    #[serde(default)]
    pub max: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PackageDocument {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Component library providing the native side of the classes.
    #[serde(default)]
    pub lib: Option<String>,
    #[serde(default)]
    pub classes: Vec<ClassDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassDef {
    pub class: String,
    pub category: Category,
    #[serde(default)]
    pub properties: Vec<PropertyDef>,
    #[serde(default)]
    pub inherits: Vec<InheritDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PropertyDef {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    #[serde(default, deserialize_with = "deserialize_scalar")]
    pub default: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub help: String,
    #[serde(default)]
    pub options: Vec<OptionEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InheritDef {
    pub class: String,
    /// Default overrides for properties inherited through this base.
    #[serde(default, deserialize_with = "deserialize_scalar_map")]
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodeDocument {
    pub language: String,
    #[serde(default)]
    pub templates: Vec<TemplateDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateDef {
    pub class: String,
    #[serde(default)]
    pub slots: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageList {
    #[serde(default)]
    pub packages: Vec<String>,
}

/// Parses one document, scoping any failure to its name.
pub fn parse_document<T: for<'de> Deserialize<'de>>(document: &str, text: &str) -> Result<T> {
    serde_yaml::from_str(text).map_err(|e| Error::definition(document, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_package_document() {
        let text = r#"
name: common
lib: standard
classes:
  - class: wxButton
    category: widget
    properties:
      - name: label
        type: wxString_i18n
        default: MyButton
      - name: default
        type: bool
        default: 0
    inherits:
      - class: wxWindow
        properties:
          size: "-1,30"
          hidden: true
"#;
        let document: PackageDocument = parse_document("common.yaml", text).unwrap();
        assert_eq!(document.lib.as_deref(), Some("standard"));
        let class = &document.classes[0];
        assert_eq!(class.category, Category::Widget);
        assert_eq!(class.properties[1].default, "0");
        assert_eq!(class.inherits[0].properties["size"], "-1,30");
        assert_eq!(class.inherits[0].properties["hidden"], "1");
    }

    #[test]
    fn test_parse_object_types() {
        let text = r#"
categories:
  - name: sizer
    children:
      - name: sizeritem
  - name: sizeritem
    item: true
    children:
      - name: widget
        max: 1
"#;
        let document: ObjectTypesDocument = parse_document("objtypes.yaml", text).unwrap();
        assert_eq!(document.categories.len(), 2);
        assert!(document.categories[1].item);
        assert_eq!(document.categories[0].children[0].max, None);
        assert_eq!(document.categories[1].children[0].max, Some(1));
    }

    #[test]
    fn test_parse_error_names_document() {
        let result: Result<CodeDocument> = parse_document("broken.cppcode.yaml", "templates: 3");
        let error = result.unwrap_err();
        assert!(matches!(error, Error::DefinitionLoad { .. }));
        assert!(error.to_string().contains("broken.cppcode.yaml"));
    }
}
