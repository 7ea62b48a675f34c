//! Value kinds, option lists and structural categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Kind of value a property holds. Every value is stored as text and decoded
/// on demand by the typed accessors of [`crate::model::tree::Property`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "bitlist")]
    BitList,
    #[serde(rename = "intlist")]
    IntList,
    #[serde(rename = "option")]
    Option,
    #[serde(rename = "macro")]
    Macro,
    #[serde(rename = "path")]
    Path,
    #[serde(rename = "wxString")]
    String,
    #[serde(rename = "wxString_i18n")]
    StringI18n,
    #[serde(rename = "wxPoint")]
    Point,
    #[serde(rename = "wxSize")]
    Size,
    #[serde(rename = "wxFont")]
    Font,
    #[serde(rename = "wxColour")]
    Colour,
    #[serde(rename = "bitmap")]
    Bitmap,
    #[serde(rename = "stringlist")]
    StringList,
    #[serde(rename = "float")]
    Float,
}

impl PropertyType {
    /// Whether `foreach` can iterate over values of this kind.
    pub fn is_list(self) -> bool {
        matches!(self, Self::IntList | Self::StringList)
    }
}

/// A named symbolic constant of an option or bit-list property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionEntry {
    pub name: String,
    #[serde(default, rename = "help")]
    pub description: String,
    #[serde(default)]
    pub value: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionList {
    entries: Vec<OptionEntry>,
}

impl OptionList {
    pub fn new(entries: Vec<OptionEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[OptionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&OptionEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// Structural role of a type. Governs child arity and generation dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Project,
    Form,
    Container,
    Notebook,
    Flatnotebook,
    Listbook,
    Choicebook,
    Notebookpage,
    Flatnotebookpage,
    Listbookpage,
    Choicebookpage,
    Splitter,
    Splitteritem,
    Widget,
    ExpandedWidget,
    Statusbar,
    Menubar,
    Menu,
    Submenu,
    Menuitem,
    Toolbar,
    Tool,
    Sizer,
    Sizeritem,
    Spacer,
    Component,
    Interface,
}

/// Categories searched by `#wxparent`, in priority order.
pub const WXPARENT_CANDIDATES: [Category; 6] = [
    Category::Container,
    Category::Notebook,
    Category::Splitter,
    Category::Flatnotebook,
    Category::Listbook,
    Category::Choicebook,
];

impl Category {
    pub const ALL: [Category; 27] = [
        Self::Project,
        Self::Form,
        Self::Container,
        Self::Notebook,
        Self::Flatnotebook,
        Self::Listbook,
        Self::Choicebook,
        Self::Notebookpage,
        Self::Flatnotebookpage,
        Self::Listbookpage,
        Self::Choicebookpage,
        Self::Splitter,
        Self::Splitteritem,
        Self::Widget,
        Self::ExpandedWidget,
        Self::Statusbar,
        Self::Menubar,
        Self::Menu,
        Self::Submenu,
        Self::Menuitem,
        Self::Toolbar,
        Self::Tool,
        Self::Sizer,
        Self::Sizeritem,
        Self::Spacer,
        Self::Component,
        Self::Interface,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Form => "form",
            Self::Container => "container",
            Self::Notebook => "notebook",
            Self::Flatnotebook => "flatnotebook",
            Self::Listbook => "listbook",
            Self::Choicebook => "choicebook",
            Self::Notebookpage => "notebookpage",
            Self::Flatnotebookpage => "flatnotebookpage",
            Self::Listbookpage => "listbookpage",
            Self::Choicebookpage => "choicebookpage",
            Self::Splitter => "splitter",
            Self::Splitteritem => "splitteritem",
            Self::Widget => "widget",
            Self::ExpandedWidget => "expanded_widget",
            Self::Statusbar => "statusbar",
            Self::Menubar => "menubar",
            Self::Menu => "menu",
            Self::Submenu => "submenu",
            Self::Menuitem => "menuitem",
            Self::Toolbar => "toolbar",
            Self::Tool => "tool",
            Self::Sizer => "sizer",
            Self::Sizeritem => "sizeritem",
            Self::Spacer => "spacer",
            Self::Component => "component",
            Self::Interface => "interface",
        }
    }

    /// Categories whose instances can be stored as class members and therefore
    /// get the synthetic target-language base with a `permission` property.
    pub fn is_member_capable(self) -> bool {
        matches!(
            self,
            Self::Notebook
                | Self::Flatnotebook
                | Self::Listbook
                | Self::Choicebook
                | Self::Widget
                | Self::ExpandedWidget
                | Self::Statusbar
                | Self::Component
                | Self::Container
                | Self::Menubar
                | Self::Toolbar
                | Self::Splitter
        )
    }

    /// Categories that are windows from the point of view of a sizer.
    pub fn is_window_like(self) -> bool {
        matches!(
            self,
            Self::Notebook
                | Self::Flatnotebook
                | Self::Listbook
                | Self::Choicebook
                | Self::Widget
                | Self::ExpandedWidget
                | Self::Statusbar
                | Self::Container
                | Self::Splitter
                | Self::Menubar
                | Self::Toolbar
        )
    }

    pub fn is_book(self) -> bool {
        matches!(
            self,
            Self::Notebook | Self::Flatnotebook | Self::Listbook | Self::Choicebook
        )
    }

    pub fn is_page(self) -> bool {
        matches!(
            self,
            Self::Notebookpage | Self::Flatnotebookpage | Self::Listbookpage | Self::Choicebookpage
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::config(format!("Unknown category '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_through_name() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert!("gizmo".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serde_names_match_as_str() {
        let parsed: Category = serde_yaml::from_str("expanded_widget").unwrap();
        assert_eq!(parsed, Category::ExpandedWidget);
        assert_eq!(parsed.as_str(), "expanded_widget");
    }

    #[test]
    fn test_property_type_names() {
        let parsed: Vec<PropertyType> =
            serde_yaml::from_str("[bool, wxString_i18n, stringlist, wxColour]").unwrap();
        assert_eq!(
            parsed,
            vec![
                PropertyType::Bool,
                PropertyType::StringI18n,
                PropertyType::StringList,
                PropertyType::Colour
            ]
        );
        assert!(PropertyType::IntList.is_list());
        assert!(!PropertyType::Text.is_list());
    }

    #[test]
    fn test_option_list_lookup() {
        let list = OptionList::new(vec![OptionEntry {
            name: "wxVERTICAL".to_string(),
            description: String::new(),
            value: Some(8),
        }]);
        assert!(list.contains("wxVERTICAL"));
        assert_eq!(list.get("wxVERTICAL").and_then(|e| e.value), Some(8));
        assert!(!list.contains("wxHORIZONTAL"));
    }

    #[test]
    fn test_category_groups() {
        assert!(Category::Splitter.is_member_capable());
        assert!(!Category::Sizer.is_member_capable());
        assert!(Category::Choicebook.is_book());
        assert!(Category::Listbookpage.is_page());
        assert!(Category::Widget.is_window_like());
        assert!(!Category::Sizer.is_window_like());
    }
}
