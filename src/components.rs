//! Native capability collaborators and the services shared with them.
//!
//! A [`ComponentLibrary`] supplies [`Component`]s for the classes of a package
//! and the symbolic constants (macros) those classes use. Code generation only
//! needs a component's [`ComponentKind`]; the preview and XRC hooks exist for
//! editor shells and default to doing nothing.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::model::tree::{ObjectId, ObjectTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Window,
    Sizer,
    Abstract,
}

/// Opaque per-class capability object.
pub trait Component: Send + Sync {
    fn kind(&self) -> ComponentKind;

    /// Called once a node and its first child have been built by a preview.
    fn on_created(&self, _tree: &ObjectTree, _object: ObjectId) {}

    /// Serializes the object to the secondary XML dialect, if supported.
    fn export_to_xrc(&self, _tree: &ObjectTree, _object: ObjectId) -> Option<String> {
        None
    }
}

impl fmt::Debug for dyn Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component").field("kind", &self.kind()).finish()
    }
}

/// A component that only reports its classification.
#[derive(Debug, Clone, Copy)]
pub struct BasicComponent(pub ComponentKind);

impl Component for BasicComponent {
    fn kind(&self) -> ComponentKind {
        self.0
    }
}

pub trait ComponentLibrary: Send + Sync {
    fn name(&self) -> &str;

    /// Components keyed by class name.
    fn components(&self) -> Vec<(String, Arc<dyn Component>)>;

    /// Symbolic constants and their numeric values.
    fn macros(&self) -> Vec<(String, i64)>;
}

/// In-process library backing the shipped definitions.
#[derive(Debug, Default)]
pub struct StandardLibrary;

const STANDARD_WINDOWS: &[&str] = &[
    "wxButton",
    "wxStaticText",
    "wxTextCtrl",
    "wxCheckBox",
    "wxChoice",
    "wxListBox",
    "wxCalendarCtrl",
    "wxPanel",
    "wxStatusBar",
    "wxMenuBar",
    "wxToolBar",
    "wxNotebook",
    "wxSplitterWindow",
];

const STANDARD_SIZERS: &[&str] = &["wxBoxSizer", "wxGridSizer"];

const STANDARD_MACROS: &[(&str, i64)] = &[
    ("wxID_ANY", -1),
    ("wxID_OK", 5100),
    ("wxID_CANCEL", 5101),
    ("wxHORIZONTAL", 0x0004),
    ("wxVERTICAL", 0x0008),
    ("wxLEFT", 0x0010),
    ("wxRIGHT", 0x0020),
    ("wxTOP", 0x0040),
    ("wxBOTTOM", 0x0080),
    ("wxALL", 0x00f0),
    ("wxEXPAND", 0x2000),
    ("wxALIGN_CENTER", 0x0900),
    ("wxSP_3D", 0x0300),
    ("wxTE_MULTILINE", 0x0020),
    ("wxTE_READONLY", 0x0010),
    ("wxNB_TOP", 0x0000),
    ("wxNB_BOTTOM", 0x0020),
    ("wxTB_HORIZONTAL", 0x0004),
    ("wxTB_FLAT", 0x0020),
    ("wxITEM_NORMAL", 0),
    ("wxITEM_CHECK", 1),
    ("wxITEM_RADIO", 2),
    ("wxDEFAULT_FRAME_STYLE", 0x20001e40),
    ("wxTAB_TRAVERSAL", 0x00080000),
];

impl ComponentLibrary for StandardLibrary {
    fn name(&self) -> &str {
        "standard"
    }

    fn components(&self) -> Vec<(String, Arc<dyn Component>)> {
        let windows = STANDARD_WINDOWS.iter().map(|name| {
            let component: Arc<dyn Component> = Arc::new(BasicComponent(ComponentKind::Window));
            (name.to_string(), component)
        });
        let sizers = STANDARD_SIZERS.iter().map(|name| {
            let component: Arc<dyn Component> = Arc::new(BasicComponent(ComponentKind::Sizer));
            (name.to_string(), component)
        });
        windows.chain(sizers).collect()
    }

    fn macros(&self) -> Vec<(String, i64)> {
        STANDARD_MACROS
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect()
    }
}

/// Symbolic constants provided by imported component libraries.
#[derive(Debug, Clone, Default)]
pub struct MacroDictionary {
    values: HashMap<String, i64>,
}

impl MacroDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, value: i64) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.values.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Evaluates a `A|B|C` bit-list, treating unknown flags and integer
    /// literals the way the toolkit headers would.
    pub fn evaluate_flags(&self, text: &str) -> i64 {
        crate::model::convert::split_flags(text)
            .iter()
            .map(|flag| {
                self.get(flag)
                    .or_else(|| flag.parse().ok())
                    .unwrap_or(0)
            })
            .fold(0, |acc, v| acc | v)
    }
}

/// Bounded cache of decoded bitmaps keyed by path. When full, inserting a new
/// entry evicts the oldest one.
#[derive(Debug)]
pub struct BitmapCache<T> {
    capacity: usize,
    order: VecDeque<String>,
    entries: BTreeMap<String, T>,
}

impl<T> BitmapCache<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            order: VecDeque::new(),
            entries: BTreeMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: T) {
        let key = key.into();
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = value;
            return;
        }
        self.make_room();
        self.order.push_back(key.clone());
        self.entries.insert(key, value);
    }

    /// Returns the cached value or computes, caches and returns it.
    pub fn get_or_insert_with<F: FnOnce() -> T>(&mut self, key: &str, make: F) -> &T {
        if !self.entries.contains_key(key) {
            self.make_room();
            self.order.push_back(key.to_string());
        }
        self.entries.entry(key.to_string()).or_insert_with(make)
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.entries.clear();
    }

    fn make_room(&mut self) {
        while self.order.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    debug!(path = %oldest, "Evicting cached bitmap");
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_library_kinds() {
        let library = StandardLibrary;
        let components: HashMap<_, _> = library.components().into_iter().collect();
        assert_eq!(components["wxButton"].kind(), ComponentKind::Window);
        assert_eq!(components["wxBoxSizer"].kind(), ComponentKind::Sizer);
        assert!(library.macros().iter().any(|(n, _)| n == "wxEXPAND"));
    }

    #[test]
    fn test_macro_dictionary_evaluates_flags() {
        let mut macros = MacroDictionary::new();
        macros.add("wxALL", 0x00f0);
        macros.add("wxEXPAND", 0x2000);
        assert_eq!(macros.evaluate_flags("wxALL|wxEXPAND"), 0x20f0);
        assert_eq!(macros.evaluate_flags("wxALL | 1 | wxUNKNOWN"), 0x00f1);
        assert_eq!(macros.evaluate_flags(""), 0);
    }

    #[test]
    fn test_bitmap_cache_evicts_oldest() {
        let mut cache = BitmapCache::new(2);
        cache.insert("a.png", 1);
        cache.insert("b.png", 2);
        cache.insert("c.png", 3);
        assert_eq!(cache.len(), 2);
        assert!(cache.get("a.png").is_none());
        assert_eq!(cache.get("b.png"), Some(&2));
        assert_eq!(cache.get("c.png"), Some(&3));
    }

    #[test]
    fn test_bitmap_cache_reinsert_keeps_position() {
        let mut cache = BitmapCache::new(2);
        cache.insert("a.png", 1);
        cache.insert("b.png", 2);
        cache.insert("a.png", 10);
        cache.insert("c.png", 3);
        assert!(cache.get("a.png").is_none());
        assert_eq!(cache.get("b.png"), Some(&2));
    }

    #[test]
    fn test_bitmap_cache_get_or_insert_with() {
        let mut cache = BitmapCache::new(1);
        assert_eq!(*cache.get_or_insert_with("x", || 7), 7);
        assert_eq!(*cache.get_or_insert_with("x", || 9), 7);
        assert_eq!(cache.capacity(), 1);
    }
}
