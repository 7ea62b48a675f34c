//! Category compatibility table.

use std::collections::HashMap;

use crate::model::types::Category;
use crate::registry::loader::ObjectTypesDocument;

/// How many children of one category a parent may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildLimit {
    Unlimited,
    AtMost(usize),
}

impl ChildLimit {
    fn from_max(max: Option<i64>) -> Self {
        match max {
            Some(n) if n >= 0 => Self::AtMost(n as usize),
            _ => Self::Unlimited,
        }
    }

    /// Whether a parent already holding `count` such children accepts another.
    pub fn admits(self, count: usize) -> bool {
        match self {
            Self::Unlimited => true,
            Self::AtMost(max) => count < max,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CategoryInfo {
    pub hidden: bool,
    pub item: bool,
    children: Vec<(Category, ChildLimit)>,
}

impl CategoryInfo {
    pub fn children(&self) -> &[(Category, ChildLimit)] {
        &self.children
    }

    pub fn child_limit(&self, child: Category) -> Option<ChildLimit> {
        self.children
            .iter()
            .find(|(c, _)| *c == child)
            .map(|(_, limit)| *limit)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CategoryTable {
    entries: HashMap<Category, CategoryInfo>,
}

impl CategoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, document: ObjectTypesDocument) {
        for def in document.categories {
            let info = CategoryInfo {
                hidden: def.hidden,
                item: def.item,
                children: def
                    .children
                    .into_iter()
                    .map(|c| (c.name, ChildLimit::from_max(c.max)))
                    .collect(),
            };
            self.entries.insert(def.name, info);
        }
    }

    pub fn get(&self, category: Category) -> Option<&CategoryInfo> {
        self.entries.get(&category)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_hidden(&self, category: Category) -> bool {
        self.get(category).is_some_and(|i| i.hidden)
    }

    pub fn is_item(&self, category: Category) -> bool {
        self.get(category).is_some_and(|i| i.item)
    }

    /// `None` when `child` may not appear directly under `parent`.
    pub fn child_limit(&self, parent: Category, child: Category) -> Option<ChildLimit> {
        self.get(parent).and_then(|i| i.child_limit(child))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::loader::parse_document;

    fn table() -> CategoryTable {
        let document = parse_document(
            "objtypes.yaml",
            r#"
categories:
  - name: form
    children:
      - name: sizer
        max: 1
      - name: statusbar
        max: 0
  - name: sizeritem
    item: true
    hidden: true
"#,
        )
        .unwrap();
        let mut table = CategoryTable::new();
        table.extend(document);
        table
    }

    #[test]
    fn test_child_limits() {
        let table = table();
        let limit = table.child_limit(Category::Form, Category::Sizer).unwrap();
        assert!(limit.admits(0));
        assert!(!limit.admits(1));
        assert!(
            !table
                .child_limit(Category::Form, Category::Statusbar)
                .unwrap()
                .admits(0)
        );
        assert_eq!(table.child_limit(Category::Form, Category::Widget), None);
        assert_eq!(table.child_limit(Category::Widget, Category::Widget), None);
    }

    #[test]
    fn test_flags() {
        let table = table();
        assert!(table.is_item(Category::Sizeritem));
        assert!(table.is_hidden(Category::Sizeritem));
        assert!(!table.is_item(Category::Form));
        assert_eq!(table.len(), 2);
        assert!(ChildLimit::Unlimited.admits(usize::MAX - 1));
    }
}
