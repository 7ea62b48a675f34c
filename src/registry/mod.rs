//! Type registry: class descriptors, the category table and component libraries.
//!
//! Loading happens in two passes. The first pass registers categories, classes
//! and templates document by document; a failing document is logged and
//! skipped without touching the registry. The second pass ([`TypeRegistry::resolve`])
//! links `inherits` edges, imports component libraries and attaches the
//! target-language interface to member-capable classes.

mod categories;
mod factory;
pub mod loader;
mod naming;
mod project;

pub use categories::{CategoryInfo, CategoryTable, ChildLimit};
pub use naming::{resolve_name_conflict, resolve_subtree_name_conflicts};
pub use project::load_project;

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use slotmap::SlotMap;
use tracing::{debug, error, info, warn};

use crate::components::{ComponentLibrary, MacroDictionary};
use crate::error::{Error, Result};
use crate::model::descriptor::{ClassId, CodeInfo, PropertyDescriptor, TypeDescriptor};
use crate::model::types::{OptionList, PropertyType};
use loader::{
    CodeDocument, InheritDef, ObjectTypesDocument, PackageDocument, PackageList, parse_document,
};

/// Name of the interface class carrying target-language member settings.
pub const DEFAULT_LANGUAGE: &str = "C++";

#[derive(Debug, Clone)]
pub struct PackageInfo {
    pub name: String,
    pub description: String,
    pub classes: Vec<ClassId>,
}

#[derive(Debug)]
struct PendingPackage {
    name: String,
    lib: Option<String>,
    inherits: Vec<(ClassId, Vec<InheritDef>)>,
}

pub struct TypeRegistry {
    classes: SlotMap<ClassId, TypeDescriptor>,
    by_name: HashMap<String, ClassId>,
    categories: CategoryTable,
    packages: Vec<PackageInfo>,
    libraries: HashMap<String, Arc<dyn ComponentLibrary>>,
    macros: MacroDictionary,
    declared_macros: BTreeSet<String>,
    pending: Vec<PendingPackage>,
    language: String,
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("classes", &self.classes.len())
            .field("categories", &self.categories.len())
            .field("packages", &self.packages.len())
            .field("language", &self.language)
            .finish()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self {
            classes: SlotMap::with_key(),
            by_name: HashMap::new(),
            categories: CategoryTable::new(),
            packages: Vec::new(),
            libraries: HashMap::new(),
            macros: MacroDictionary::new(),
            declared_macros: BTreeSet::new(),
            pending: Vec::new(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Sets the class name of the target-language interface base.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Makes a component library available to packages naming it in `lib`.
    pub fn register_library(&mut self, library: Arc<dyn ComponentLibrary>) {
        self.libraries.insert(library.name().to_string(), library);
    }

    /// Loads a definitions directory: `objtypes.yaml`, the `default` package,
    /// then every package listed in `packages.yaml`, and resolves inheritance.
    ///
    /// Only a broken `objtypes.yaml` fails the whole load. Broken package or
    /// code documents are logged and skipped.
    pub fn load_definitions(&mut self, dir: &Path) -> Result<()> {
        info!(path = %dir.display(), "Loading definitions");
        let objtypes = dir.join("objtypes.yaml");
        let text = std::fs::read_to_string(&objtypes)
            .map_err(|e| Error::definition(objtypes.display().to_string(), e.to_string()))?;
        self.load_object_types("objtypes.yaml", &text)?;

        let list_path = dir.join("packages.yaml");
        let list: PackageList = if list_path.exists() {
            let text = std::fs::read_to_string(&list_path)?;
            parse_document("packages.yaml", &text)?
        } else {
            PackageList::default()
        };

        let names = std::iter::once("default".to_string())
            .chain(list.packages.into_iter().filter(|p| p != "default"));
        for name in names {
            self.load_package_files(dir, &name);
        }

        self.resolve();
        info!(
            classes = self.classes.len(),
            packages = self.packages.len(),
            "Definitions loaded"
        );
        Ok(())
    }

    fn load_package_files(&mut self, dir: &Path, name: &str) {
        let package = dir.join(format!("{name}.yaml"));
        match std::fs::read_to_string(&package) {
            Ok(text) => {
                if let Err(e) = self.load_package(&format!("{name}.yaml"), &text) {
                    error!(path = %package.display(), "{e}");
                    return;
                }
            }
            Err(e) => {
                error!(path = %package.display(), "Failed to read package: {e}");
                return;
            }
        }

        let code = dir.join(format!("{name}.cppcode.yaml"));
        if !code.exists() {
            debug!(package = %name, "No code document");
            return;
        }
        let result = std::fs::read_to_string(&code)
            .map_err(Error::from)
            .and_then(|text| self.load_code(&format!("{name}.cppcode.yaml"), &text));
        if let Err(e) = result {
            error!(path = %code.display(), "{e}");
        }
    }

    pub fn load_object_types(&mut self, document: &str, text: &str) -> Result<()> {
        let parsed: ObjectTypesDocument = parse_document(document, text)?;
        debug!(document = %document, categories = parsed.categories.len(), "Loaded categories");
        self.categories.extend(parsed);
        Ok(())
    }

    /// Registers the classes of one package. Inheritance is linked later by
    /// [`TypeRegistry::resolve`].
    pub fn load_package(&mut self, document: &str, text: &str) -> Result<()> {
        let parsed: PackageDocument = parse_document(document, text)?;

        let mut seen = HashSet::new();
        for class in &parsed.classes {
            if !seen.insert(class.class.as_str()) {
                return Err(Error::definition(
                    document,
                    format!("class '{}' declared twice", class.class),
                ));
            }
            let mut property_names = HashSet::new();
            for property in &class.properties {
                if !property_names.insert(property.name.as_str()) {
                    return Err(Error::definition(
                        document,
                        format!(
                            "property '{}' declared twice in '{}'",
                            property.name, class.class
                        ),
                    ));
                }
            }
        }

        let mut package = PackageInfo {
            name: parsed.name.clone(),
            description: parsed.description,
            classes: Vec::new(),
        };
        let mut pending = PendingPackage {
            name: parsed.name.clone(),
            lib: parsed.lib,
            inherits: Vec::new(),
        };

        for class in parsed.classes {
            if self.by_name.contains_key(&class.class) {
                warn!(class = %class.class, document = %document, "Class already registered, skipping");
                continue;
            }
            let mut descriptor = TypeDescriptor::new(&class.class, class.category, &parsed.name);
            for def in class.properties {
                if def.kind == PropertyType::Macro && !def.default.is_empty() {
                    self.declared_macros.insert(def.default.clone());
                }
                let mut property = PropertyDescriptor::new(def.name, def.kind, def.default);
                property.hidden = def.hidden;
                property.description = def.help;
                if !def.options.is_empty() {
                    property.options = Some(OptionList::new(def.options));
                }
                descriptor.properties.push(Arc::new(property));
            }
            let id = self.classes.insert_with_key(|id| {
                descriptor.id = id;
                descriptor
            });
            self.by_name.insert(class.class, id);
            package.classes.push(id);
            if !class.inherits.is_empty() {
                pending.inherits.push((id, class.inherits));
            }
        }

        debug!(document = %document, package = %package.name, classes = package.classes.len(), "Loaded package");
        self.packages.push(package);
        self.pending.push(pending);
        Ok(())
    }

    /// Attaches templates of one language to already registered classes.
    pub fn load_code(&mut self, document: &str, text: &str) -> Result<()> {
        let parsed: CodeDocument = parse_document(document, text)?;
        for template in parsed.templates {
            let Some(&id) = self.by_name.get(&template.class) else {
                warn!(class = %template.class, document = %document, "Templates for unknown class");
                continue;
            };
            let mut info = CodeInfo::new();
            for (slot, text) in template.slots {
                info.insert(slot, text);
            }
            if let Some(descriptor) = self.classes.get_mut(id) {
                descriptor
                    .code
                    .entry(parsed.language.clone())
                    .or_default()
                    .merge(info);
            }
        }
        Ok(())
    }

    /// Second loading pass. Safe to call repeatedly; only packages loaded
    /// since the previous call are processed.
    pub fn resolve(&mut self) {
        let language_base = self.by_name.get(&self.language).copied();
        for pending in std::mem::take(&mut self.pending) {
            for (id, inherits) in pending.inherits {
                for def in inherits {
                    let Some(&base) = self.by_name.get(&def.class) else {
                        warn!(
                            class = %self.class_name_of(id),
                            base = %def.class,
                            "Unknown base class, skipping"
                        );
                        continue;
                    };
                    if base == id {
                        warn!(class = %def.class, "Class can not inherit from itself");
                        continue;
                    }
                    if let Some(descriptor) = self.classes.get_mut(id) {
                        descriptor.add_base(base, def.properties.into_iter().collect());
                    }
                }
            }

            if let Some(lib) = &pending.lib {
                self.import_library(&pending.name, lib);
            }

            let Some(package) = self.packages.iter().find(|p| p.name == pending.name) else {
                continue;
            };
            let Some(language_base) = language_base else {
                continue;
            };
            let eligible: Vec<ClassId> = package
                .classes
                .iter()
                .copied()
                .filter(|&id| {
                    id != language_base
                        && self
                            .classes
                            .get(id)
                            .is_some_and(|d| d.category.is_member_capable() && !d.bases.contains(&language_base))
                })
                .collect();
            for id in eligible {
                if let Some(descriptor) = self.classes.get_mut(id) {
                    descriptor.add_base(language_base, HashMap::new());
                }
            }
        }
        if language_base.is_none() {
            debug!(language = %self.language, "No target-language interface class registered");
        }
    }

    fn import_library(&mut self, package: &str, lib: &str) {
        let Some(library) = self.libraries.get(lib).cloned() else {
            warn!(package = %package, lib = %lib, "Component library not registered");
            return;
        };
        for (class, component) in library.components() {
            match self.by_name.get(&class) {
                Some(&id) => {
                    if let Some(descriptor) = self.classes.get_mut(id) {
                        descriptor.component = Some(component);
                    }
                }
                None => debug!(class = %class, lib = %lib, "Component for unknown class"),
            }
        }
        for (name, value) in library.macros() {
            self.declared_macros.remove(&name);
            self.macros.add(name, value);
        }
    }

    fn class_name_of(&self, id: ClassId) -> &str {
        self.classes.get(id).map(|d| d.name()).unwrap_or("")
    }

    pub fn class(&self, name: &str) -> Option<&TypeDescriptor> {
        self.by_name.get(name).and_then(|&id| self.classes.get(id))
    }

    pub fn class_by_id(&self, id: ClassId) -> Option<&TypeDescriptor> {
        self.classes.get(id)
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    pub fn packages(&self) -> &[PackageInfo] {
        &self.packages
    }

    pub fn macros(&self) -> &MacroDictionary {
        &self.macros
    }

    /// Macros referenced by definitions but provided by no imported library.
    pub fn missing_macros(&self) -> impl Iterator<Item = &str> {
        self.declared_macros
            .iter()
            .filter(|m| !self.macros.contains(m))
            .map(String::as_str)
    }

    /// Non-hidden classes grouped by package, in load order.
    pub fn palette(&self) -> Vec<(&str, Vec<&str>)> {
        self.packages
            .iter()
            .map(|package| {
                let classes = package
                    .classes
                    .iter()
                    .filter_map(|&id| self.classes.get(id))
                    .filter(|d| !self.categories.is_hidden(d.category))
                    .map(|d| d.name())
                    .collect();
                (package.name.as_str(), classes)
            })
            .collect()
    }

    /// The class itself followed by all its bases, depth first in declaration
    /// order. A base reached twice is listed once.
    pub fn base_chain(&self, id: ClassId) -> Vec<ClassId> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            let Some(descriptor) = self.classes.get(current) else {
                continue;
            };
            chain.push(current);
            stack.extend(descriptor.bases.iter().rev());
        }
        chain
    }

    /// Visits the class and each of its bases in [`TypeRegistry::base_chain`] order.
    pub fn for_each_base_in_order<F: FnMut(&TypeDescriptor)>(&self, id: ClassId, mut visit: F) {
        for class in self.base_chain(id) {
            if let Some(descriptor) = self.classes.get(class) {
                visit(descriptor);
            }
        }
    }

    /// Resets every class instance counter. Call before a full reload.
    pub fn reset_instance_counters(&self) {
        for descriptor in self.classes.values() {
            descriptor.reset_instances();
        }
    }
}
