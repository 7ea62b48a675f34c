//! C++ code generation.
//!
//! [`CppTarget`] encodes property values as C++ expressions. [`CppCodeGenerator`]
//! walks a project tree and fills a header and a source buffer from the class
//! templates registered for the `C++` language.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use tracing::{debug, info, warn};

use crate::codegen::parser::{CodeTarget, TemplateParser};
use crate::codegen::writer::CodeWriter;
use crate::components::{BitmapCache, ComponentKind};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::model::convert::{self, BitmapRef, BitmapSource, Colour, Font, Point, Size};
use crate::model::descriptor::ClassId;
use crate::model::tree::{ObjectId, ObjectTree};
use crate::model::types::{Category, PropertyType};
use crate::registry::TypeRegistry;

pub const DEFAULT_FIRST_ID: i64 = 1000;

pub const DEFAULT_BITMAP_CACHE_SIZE: usize = 64;

/// Slots that many classes legitimately leave empty.
static OPTIONAL_SLOTS: Lazy<BTreeSet<&'static str>> = Lazy::new(|| {
    [
        "include",
        "library",
        "settings",
        "toolbar_add",
        "after_addchild",
        "header_preamble",
        "header_epilogue",
        "cpp_preamble",
        "cpp_epilogue",
    ]
    .into_iter()
    .collect()
});

/// Escapes text for a C++ string literal.
pub fn cpp_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\t' => escaped.push_str("\\t"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Value encoder for C++.
#[derive(Debug)]
pub struct CppTarget {
    i18n: bool,
    relative_paths: bool,
    base_path: PathBuf,
    paths: RefCell<BitmapCache<String>>,
}

impl Default for CppTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl CppTarget {
    pub fn new() -> Self {
        Self {
            i18n: false,
            relative_paths: false,
            base_path: PathBuf::new(),
            paths: RefCell::new(BitmapCache::new(DEFAULT_BITMAP_CACHE_SIZE)),
        }
    }

    pub fn set_i18n(&mut self, i18n: bool) {
        self.i18n = i18n;
    }

    /// Emits bitmap paths relative to `base_path` when `relative` is set, and
    /// absolute (joined onto `base_path`) otherwise.
    pub fn set_paths(&mut self, base_path: impl Into<PathBuf>, relative: bool) {
        self.base_path = base_path.into();
        self.relative_paths = relative;
        self.paths.borrow_mut().clear();
    }

    pub fn set_cache_size(&mut self, capacity: usize) {
        self.paths = RefCell::new(BitmapCache::new(capacity));
    }

    fn string_code(&self, text: &str) -> String {
        format!("wxT(\"{}\")", cpp_string(text))
    }

    fn i18n_code(&self, text: &str) -> String {
        if self.i18n {
            format!("_(\"{}\")", cpp_string(text))
        } else {
            self.string_code(text)
        }
    }

    /// Path as written into generated code, cached per input path.
    pub fn resolve_path(&self, path: &str) -> String {
        let mut cache = self.paths.borrow_mut();
        cache
            .get_or_insert_with(path, || {
                let input = Path::new(path);
                let resolved = if self.relative_paths {
                    input
                        .strip_prefix(&self.base_path)
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|_| input.to_path_buf())
                } else if input.is_relative() && !self.base_path.as_os_str().is_empty() {
                    self.base_path.join(input)
                } else {
                    input.to_path_buf()
                };
                resolved.to_string_lossy().replace('\\', "/")
            })
            .clone()
    }

    fn bitmap_code(&self, value: &str) -> String {
        let bitmap = BitmapRef::parse(value);
        if bitmap.is_empty() {
            return "wxNullBitmap".to_string();
        }
        match bitmap.source {
            BitmapSource::File if bitmap.is_xpm() => format!("wxBitmap( {} )", bitmap.xpm_name()),
            BitmapSource::File => format!(
                "wxBitmap( {}, wxBITMAP_TYPE_ANY )",
                self.string_code(&self.resolve_path(&bitmap.path))
            ),
            BitmapSource::Resource => format!(
                "wxBitmap( {}, wxBITMAP_TYPE_RESOURCE )",
                self.string_code(&bitmap.path)
            ),
            BitmapSource::IconResource => format!("wxICON( {} )", bitmap.path),
        }
    }
}

impl CodeTarget for CppTarget {
    fn value_to_code(&self, kind: PropertyType, value: &str) -> String {
        match kind {
            PropertyType::String | PropertyType::Path => self.string_code(value),
            PropertyType::StringI18n => self.i18n_code(value),
            PropertyType::Macro
            | PropertyType::Text
            | PropertyType::Option
            | PropertyType::Float
            | PropertyType::IntList => value.to_string(),
            PropertyType::BitList => {
                if value.trim().is_empty() {
                    "0".to_string()
                } else {
                    value.to_string()
                }
            }
            PropertyType::Bool => {
                if convert::parse_bool(value) {
                    "true".to_string()
                } else {
                    "false".to_string()
                }
            }
            PropertyType::Point => match Point::parse(value) {
                Some(point) => format!("wxPoint( {point} )"),
                None => "wxDefaultPosition".to_string(),
            },
            PropertyType::Size => match Size::parse(value) {
                Some(size) => format!("wxSize( {size} )"),
                None => "wxDefaultSize".to_string(),
            },
            PropertyType::Font => match Font::parse(value) {
                Some(font) => format!(
                    "wxFont( {}, {}, {}, {}, {}, {} )",
                    font.point_size,
                    font.family,
                    font.style,
                    font.weight,
                    font.underlined,
                    self.string_code(&font.face)
                ),
                None => "wxFont()".to_string(),
            },
            PropertyType::Colour => match Colour::parse(value) {
                Some(Colour::System(name)) => format!("wxSystemSettings::GetColour( {name} )"),
                Some(Colour::Rgb(r, g, b)) => format!("wxColour( {r}, {g}, {b} )"),
                None => "wxColour()".to_string(),
            },
            PropertyType::Bitmap => self.bitmap_code(value),
            PropertyType::StringList => convert::parse_string_list(value)
                .iter()
                .map(|item| self.i18n_code(item))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    fn root_parent_token(&self) -> &str {
        "this"
    }
}

/// Generates a C++ header and source file from a project tree.
///
/// The registry is only read. Failures on individual nodes are recorded in
/// [`CppCodeGenerator::diagnostics`] and generation carries on; only a
/// project without a `file` property aborts the run.
pub struct CppCodeGenerator<'a> {
    registry: &'a TypeRegistry,
    target: CppTarget,
    header: CodeWriter,
    source: CodeWriter,
    diagnostics: Diagnostics,
    first_id: i64,
}

impl<'a> CppCodeGenerator<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            target: CppTarget::new(),
            header: CodeWriter::new(),
            source: CodeWriter::new(),
            diagnostics: Diagnostics::new(),
            first_id: DEFAULT_FIRST_ID,
        }
    }

    pub fn with_first_id(mut self, first_id: i64) -> Self {
        self.first_id = first_id;
        self
    }

    pub fn with_paths(mut self, base_path: impl Into<PathBuf>, relative: bool) -> Self {
        self.target.set_paths(base_path, relative);
        self
    }

    pub fn with_bitmap_cache_size(mut self, capacity: usize) -> Self {
        self.target.set_cache_size(capacity);
        self
    }

    pub fn header(&self) -> &str {
        self.header.as_str()
    }

    pub fn source(&self) -> &str {
        self.source.as_str()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Name of the generated files, from the project `file` property.
    pub fn file_name(tree: &ObjectTree, project: ObjectId) -> Option<String> {
        tree.property(project, "file").map(|p| {
            if p.value().is_empty() {
                "noname".to_string()
            } else {
                p.value().to_string()
            }
        })
    }

    pub fn generate_code(&mut self, tree: &ObjectTree, project: ObjectId) -> bool {
        self.header.clear();
        self.source.clear();
        self.diagnostics.clear();

        let Some(file) = Self::file_name(tree, project) else {
            self.diagnostics.error(
                DiagnosticKind::MissingProperty,
                Some(tree.class_name(project)),
                "Missing \"file\" property on project",
            );
            self.header.clear();
            self.source.clear();
            return false;
        };
        let use_enum = tree.property(project, "use_enum").is_some_and(|p| p.as_bool());
        let i18n = tree
            .property(project, "internationalize")
            .is_some_and(|p| p.as_bool());
        self.target.set_i18n(i18n);
        info!(file = %file, use_enum, i18n, "Generating C++ code");

        let banner = [
            "///////////////////////////////////////////////////////////////////////////".to_string(),
            format!(
                "// C++ code generated with formgen (version {})",
                env!("CARGO_PKG_VERSION")
            ),
            "//".to_string(),
            "// PLEASE DO \"NOT\" EDIT THIS FILE!".to_string(),
            "///////////////////////////////////////////////////////////////////////////".to_string(),
        ];

        for line in &banner {
            self.header.write_ln(line);
        }
        self.header.write_ln("");
        self.header.write_ln(&format!("#ifndef __{file}__"));
        self.header.write_ln(&format!("#define __{file}__"));
        self.header.write_ln("");

        self.write_optional(tree, project, "header_preamble", Output::Header);
        self.gen_libraries(tree, project);
        self.gen_includes(tree, project);
        self.write_optional(tree, project, "header_epilogue", Output::Header);

        for line in &banner {
            self.source.write_ln(line);
        }
        self.source.write_ln("");
        self.write_optional(tree, project, "cpp_preamble", Output::Source);
        self.source.write_ln(&format!("#include \"{file}.h\""));
        self.source.write_ln("");
        self.gen_xpm_includes(tree, project);
        self.write_optional(tree, project, "cpp_epilogue", Output::Source);

        if use_enum {
            self.header.write_ln("#define ID_DEFAULT wxID_ANY // Default");
            self.header.write_ln("");
        } else {
            self.gen_defines(tree, project);
        }

        for &form in tree.children(project) {
            if tree.category(form) != Some(Category::Form) {
                debug!(class = %tree.class_name(form), "Skipping non-form project child");
                continue;
            }
            self.gen_class_declaration(tree, form, use_enum);
            self.gen_constructor(tree, form);
        }

        self.header.write_ln(&format!("#endif //__{file}__"));
        info!(diagnostics = self.diagnostics.len(), "C++ generation finished");
        true
    }

    fn interpret(&self, tree: &ObjectTree, object: ObjectId, template: &str) -> String {
        TemplateParser::new(tree, object, template, &self.target, &self.diagnostics).parse()
    }

    /// Template `slot` of the object's own class, interpreted for the object.
    fn code(&self, tree: &ObjectTree, object: ObjectId, slot: &str) -> String {
        let Some(node) = tree.get(object) else {
            return String::new();
        };
        self.class_code(tree, node.class(), object, slot)
    }

    fn class_code(&self, tree: &ObjectTree, class: ClassId, object: ObjectId, slot: &str) -> String {
        let template = self
            .registry
            .class_by_id(class)
            .and_then(|d| d.template(self.registry.language(), slot));
        match template {
            Some(template) => self.interpret(tree, object, template),
            None => {
                if !OPTIONAL_SLOTS.contains(slot) {
                    let class_name = self
                        .registry
                        .class_by_id(class)
                        .map(|d| d.name())
                        .unwrap_or_else(|| tree.class_name(object));
                    self.diagnostics.warning(
                        DiagnosticKind::TemplateResolution,
                        Some(class_name),
                        format!("Missing \"{slot}\" template"),
                    );
                }
                String::new()
            }
        }
    }

    fn write_optional(&mut self, tree: &ObjectTree, object: ObjectId, slot: &str, output: Output) {
        let code = self.code(tree, object, slot);
        if code.is_empty() {
            return;
        }
        let writer = match output {
            Output::Header => &mut self.header,
            Output::Source => &mut self.source,
        };
        writer.write_ln(&code);
        writer.write_ln("");
    }

    fn write_source(&mut self, code: &str) {
        if !code.is_empty() {
            self.source.write_ln(code);
        }
    }

    /// Collects `slot` output of every node below `root`, one entry per line.
    fn collect_lines(&self, tree: &ObjectTree, root: ObjectId, slot: &str) -> BTreeSet<String> {
        let mut lines = BTreeSet::new();
        for object in tree.descendants(root) {
            let code = self.code(tree, object, slot);
            lines.extend(
                code.lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(str::to_string),
            );
        }
        lines
    }

    fn gen_libraries(&mut self, tree: &ObjectTree, project: ObjectId) {
        let libraries = self.collect_lines(tree, project, "library");
        if libraries.is_empty() {
            return;
        }
        let variants = |lib: &str| {
            [
                format!("#pragma comment( lib, \"wxmsw26ud_{lib}.lib\" )"),
                format!("#pragma comment( lib, \"wxmsw26d_{lib}.lib\" )"),
                format!("#pragma comment( lib, \"wxmsw26u_{lib}.lib\" )"),
                format!("#pragma comment( lib, \"wxmsw26_{lib}.lib\" )"),
            ]
        };
        let h = &mut self.header;
        h.write_ln("#ifdef __WXMSW__");
        h.indent();
        h.write_ln("#ifdef _MSC_VER");
        h.indent();
        for (guard, first, second) in [("#ifdef _DEBUG", 0, 1), ("#else", 2, 3)] {
            if guard == "#else" {
                h.unindent();
            }
            h.write_ln(guard);
            h.indent();
            h.write_ln("#ifdef UNICODE");
            h.indent();
            for lib in &libraries {
                h.write_ln(&variants(lib)[first]);
            }
            h.unindent();
            h.write_ln("#else");
            h.indent();
            for lib in &libraries {
                h.write_ln(&variants(lib)[second]);
            }
            h.unindent();
            h.write_ln("#endif");
        }
        h.unindent();
        h.write_ln("#endif");
        h.unindent();
        h.write_ln("#endif");
        h.unindent();
        h.write_ln("#endif");
        h.write_ln("");
    }

    fn gen_includes(&mut self, tree: &ObjectTree, project: ObjectId) {
        let includes = self.collect_lines(tree, project, "include");
        if includes.is_empty() {
            return;
        }
        for include in &includes {
            self.header.write_ln(include);
        }
        self.header.write_ln("");
    }

    fn gen_xpm_includes(&mut self, tree: &ObjectTree, project: ObjectId) {
        let mut includes = BTreeSet::new();
        for object in tree.descendants(project) {
            let Some(node) = tree.get(object) else {
                continue;
            };
            for property in node.properties() {
                if property.kind() != PropertyType::Bitmap {
                    continue;
                }
                let bitmap = property.as_bitmap();
                if bitmap.is_xpm() {
                    includes.insert(format!(
                        "#include \"{}\"",
                        self.target.resolve_path(&bitmap.path)
                    ));
                }
            }
        }
        if includes.is_empty() {
            return;
        }
        for include in &includes {
            self.source.write_ln(include);
        }
        self.source.write_ln("");
    }

    /// Symbolic IDs used below `root` that no component library provides.
    fn collect_ids(&self, tree: &ObjectTree, root: ObjectId) -> BTreeSet<String> {
        let macros = self.registry.macros();
        let mut ids = BTreeSet::new();
        for object in tree.descendants(root) {
            let Some(node) = tree.get(object) else {
                continue;
            };
            for property in node.properties() {
                let value = property.value().trim();
                if property.kind() != PropertyType::Macro || value.is_empty() {
                    continue;
                }
                if value == "ID_DEFAULT" || value.starts_with("wxID_") || macros.contains(value) {
                    continue;
                }
                ids.insert(value.to_string());
            }
        }
        ids
    }

    fn gen_defines(&mut self, tree: &ObjectTree, project: ObjectId) {
        if self.first_id < DEFAULT_FIRST_ID {
            warn!(first_id = self.first_id, "First ID is less than {DEFAULT_FIRST_ID}");
        }
        let ids = self.collect_ids(tree, project);
        self.header.write_ln("#define ID_DEFAULT wxID_ANY // Default");
        for (offset, id) in ids.iter().enumerate() {
            self.header
                .write_ln(&format!("#define {id} {}", self.first_id + offset as i64));
        }
        self.header.write_ln("");
    }

    fn gen_enum_ids(&mut self, tree: &ObjectTree, form: ObjectId) {
        let ids = self.collect_ids(tree, form);
        if ids.is_empty() {
            return;
        }
        self.header.write_ln("enum");
        self.header.write_ln("{");
        self.header.indent();
        for (index, id) in ids.iter().enumerate() {
            if index == 0 {
                self.header.write_ln(&format!("{id} = {},", self.first_id));
            } else {
                self.header.write_ln(&format!("{id},"));
            }
        }
        self.header.unindent();
        self.header.write_ln("};");
        self.header.write_ln("");
    }

    fn gen_class_declaration(&mut self, tree: &ObjectTree, form: ObjectId, use_enum: bool) {
        let class_name = tree.value(form, "name").to_string();
        let base = self.code(tree, form, "base");

        self.header.write_ln("/**");
        self.header.write_ln(&format!(" * Class {class_name}"));
        self.header.write_ln(" */");
        self.header.write_ln(&format!("class {class_name} : {base}"));
        self.header.write_ln("{");
        self.header.indent();

        self.header.write_ln("private:");
        self.header.indent();
        if use_enum {
            self.gen_enum_ids(tree, form);
        }
        self.gen_attribute_declaration(tree, form, "private");
        self.header.unindent();
        self.header.write_ln("");

        self.header.write_ln("protected:");
        self.header.indent();
        self.gen_attribute_declaration(tree, form, "protected");
        self.header.unindent();
        self.header.write_ln("");

        self.header.write_ln("public:");
        self.header.indent();
        self.gen_attribute_declaration(tree, form, "public");
        let constructor = self.code(tree, form, "cons_decl");
        self.header.write_ln(&constructor);
        self.header.unindent();

        self.header.unindent();
        self.header.write_ln("};");
        self.header.write_ln("");
    }

    /// Member declarations whose `permission` equals `permission`, for the
    /// whole subtree.
    fn gen_attribute_declaration(&mut self, tree: &ObjectTree, object: ObjectId, permission: &str) {
        let Some(category) = tree.category(object) else {
            return;
        };
        if category.is_member_capable() && tree.value(object, "permission") == permission {
            let code = self.code(tree, object, "declaration");
            if !code.is_empty() {
                self.header.write_ln(&code);
            }
        }
        for &child in tree.children(object) {
            self.gen_attribute_declaration(tree, child, permission);
        }
    }

    fn gen_constructor(&mut self, tree: &ObjectTree, form: ObjectId) {
        let definition = self.code(tree, form, "cons_def");
        self.source.write_ln(&definition);
        self.source.write_ln("{");
        self.source.indent();

        let settings = self.code(tree, form, "settings");
        self.write_source(&settings);
        for &child in tree.children(form) {
            self.gen_construction(tree, child);
        }

        self.source.unindent();
        self.source.write_ln("}");
        self.source.write_ln("");
    }

    /// Writes `slot` of the object's class and of every base, most-derived first.
    fn gen_per_base(&mut self, tree: &ObjectTree, object: ObjectId, slot: &str) {
        let Some(node) = tree.get(object) else {
            return;
        };
        let mut blocks = Vec::new();
        self.registry.for_each_base_in_order(node.class(), |descriptor| {
            if let Some(template) = descriptor.template(self.registry.language(), slot) {
                blocks.push(self.interpret(tree, object, template));
            }
        });
        for block in blocks {
            self.write_source(&block);
        }
    }

    fn gen_settings(&mut self, tree: &ObjectTree, object: ObjectId) {
        self.gen_per_base(tree, object, "settings");
    }

    fn gen_toolbar_add(&mut self, tree: &ObjectTree, object: ObjectId) {
        self.gen_per_base(tree, object, "toolbar_add");
    }

    fn write_slot(&mut self, tree: &ObjectTree, object: ObjectId, slot: &str) {
        let code = self.code(tree, object, slot);
        self.write_source(&code);
    }

    /// Closest ancestor that is not an item wrapper.
    fn effective_parent(&self, tree: &ObjectTree, object: ObjectId) -> Option<ObjectId> {
        let categories = self.registry.categories();
        tree.ancestors(object)
            .into_iter()
            .find(|&a| tree.category(a).is_some_and(|c| !categories.is_item(c)))
    }

    fn gen_construction(&mut self, tree: &ObjectTree, object: ObjectId) {
        let Some(category) = tree.category(object) else {
            return;
        };
        match category {
            Category::Notebook
            | Category::Flatnotebook
            | Category::Listbook
            | Category::Choicebook
            | Category::Widget
            | Category::ExpandedWidget
            | Category::Statusbar
            | Category::Container
            | Category::Splitter
            | Category::Menubar
            | Category::Toolbar
            | Category::Component => {
                if tree.value(object, "permission") == "none" {
                    self.write_slot(tree, object, "declaration");
                }
                self.write_slot(tree, object, "construction");
                self.gen_settings(tree, object);

                for &child in tree.children(object) {
                    self.gen_construction(tree, child);
                    if category == Category::Toolbar {
                        self.gen_toolbar_add(tree, child);
                    }
                }

                if category == Category::Splitter {
                    self.gen_split(tree, object);
                } else if category.is_book()
                    || matches!(category, Category::Menubar | Category::Toolbar)
                {
                    let after = self.code(tree, object, "after_addchild");
                    self.write_source(&after);
                    self.source.write_ln("");
                }
            }
            Category::Sizer => {
                self.write_slot(tree, object, "declaration");
                self.write_slot(tree, object, "construction");
                self.gen_settings(tree, object);
                for &child in tree.children(object) {
                    self.gen_construction(tree, child);
                }

                let parent_is_sizer = self
                    .effective_parent(tree, object)
                    .and_then(|p| tree.category(p))
                    == Some(Category::Sizer);
                if !parent_is_sizer {
                    let attach = self.interpret(
                        tree,
                        object,
                        "#wxparent $name->SetSizer( $name );\n#wxparent $name->Layout();",
                    );
                    self.write_source(&attach);
                }
            }
            Category::Menu | Category::Submenu => {
                self.write_slot(tree, object, "declaration");
                self.write_slot(tree, object, "construction");
                for &child in tree.children(object) {
                    self.gen_construction(tree, child);
                }
                self.write_slot(tree, object, "menu_add");
            }
            Category::Spacer => self.write_slot(tree, object, "spacer_add"),
            Category::Sizeritem => {
                let Some(child) = tree.child(object, 0) else {
                    self.diagnostics.error(
                        DiagnosticKind::MalformedTemplate,
                        Some(tree.class_name(object)),
                        "Sizer item without child",
                    );
                    return;
                };
                self.gen_construction(tree, child);
                match self.sizer_item_slot(tree, child) {
                    Some(slot) => self.write_slot(tree, object, slot),
                    None => self.diagnostics.error(
                        DiagnosticKind::MalformedTemplate,
                        Some(tree.class_name(child)),
                        "Sizer item child is neither a window nor a sizer",
                    ),
                }
            }
            Category::Notebookpage
            | Category::Flatnotebookpage
            | Category::Listbookpage
            | Category::Choicebookpage => {
                if let Some(child) = tree.child(object, 0) {
                    self.gen_construction(tree, child);
                }
                self.write_slot(tree, object, "page_add");
                self.gen_settings(tree, object);
            }
            Category::Menuitem => {
                self.write_slot(tree, object, "construction");
                self.write_slot(tree, object, "menuitem_add");
                self.gen_settings(tree, object);
            }
            Category::Tool => self.write_slot(tree, object, "construction"),
            Category::Project
            | Category::Form
            | Category::Splitteritem
            | Category::Interface => {
                for &child in tree.children(object) {
                    self.gen_construction(tree, child);
                }
            }
        }
    }

    /// `window_add` or `sizer_add`, chosen by what the sizer item wraps.
    fn sizer_item_slot(&self, tree: &ObjectTree, child: ObjectId) -> Option<&'static str> {
        let kind = tree
            .get(child)
            .and_then(|n| self.registry.class_by_id(n.class()))
            .and_then(|d| d.component_kind());
        match kind {
            Some(ComponentKind::Window) => Some("window_add"),
            Some(ComponentKind::Sizer) => Some("sizer_add"),
            _ => match tree.category(child)? {
                Category::Sizer => Some("sizer_add"),
                c if c.is_window_like() => Some("window_add"),
                _ => None,
            },
        }
    }

    fn gen_split(&mut self, tree: &ObjectTree, splitter: ObjectId) {
        let windows: Vec<ObjectId> = tree
            .children(splitter)
            .iter()
            .filter_map(|&item| tree.child(item, 0))
            .collect();
        let template = match windows.as_slice() {
            [first, second] => {
                let call = if tree.value(splitter, "splitmode") == "wxSPLIT_VERTICAL" {
                    "SplitVertically"
                } else {
                    "SplitHorizontally"
                };
                format!(
                    "$name->{call}( {}, {}, $sashpos );",
                    tree.value(*first, "name"),
                    tree.value(*second, "name")
                )
            }
            [only] => format!("$name->Initialize( {} );", tree.value(*only, "name")),
            _ => {
                self.diagnostics.warning(
                    DiagnosticKind::MalformedTemplate,
                    Some(tree.class_name(splitter)),
                    format!(
                        "Missing subwindows for splitter '{}'",
                        tree.value(splitter, "name")
                    ),
                );
                return;
            }
        };
        let code = self.interpret(tree, splitter, &template);
        self.write_source(&code);
    }
}

#[derive(Debug, Clone, Copy)]
enum Output {
    Header,
    Source,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_string_encodings() {
        let mut target = CppTarget::new();
        assert_eq!(
            target.value_to_code(PropertyType::String, "say \"hi\"\n"),
            r#"wxT("say \"hi\"\n")"#
        );
        assert_eq!(target.value_to_code(PropertyType::StringI18n, "OK"), r#"wxT("OK")"#);
        target.set_i18n(true);
        assert_eq!(target.value_to_code(PropertyType::StringI18n, "OK"), r#"_("OK")"#);
        assert_eq!(
            target.value_to_code(PropertyType::StringList, r#""Red" "Green""#),
            r#"_("Red"), _("Green")"#
        );
    }

    #[test]
    fn test_unset_sentinels() {
        let target = CppTarget::new();
        assert_eq!(target.value_to_code(PropertyType::Point, ""), "wxDefaultPosition");
        assert_eq!(target.value_to_code(PropertyType::Size, ""), "wxDefaultSize");
        assert_eq!(target.value_to_code(PropertyType::Colour, ""), "wxColour()");
        assert_eq!(target.value_to_code(PropertyType::Font, ""), "wxFont()");
        assert_eq!(target.value_to_code(PropertyType::BitList, ""), "0");
        assert_eq!(target.value_to_code(PropertyType::Bitmap, ""), "wxNullBitmap");
    }

    #[test]
    fn test_composite_encodings() {
        let target = CppTarget::new();
        assert_eq!(target.value_to_code(PropertyType::Point, "5,6"), "wxPoint( 5,6 )");
        assert_eq!(target.value_to_code(PropertyType::Size, "-1,30"), "wxSize( -1,30 )");
        assert_eq!(target.value_to_code(PropertyType::Bool, "0"), "false");
        assert_eq!(target.value_to_code(PropertyType::Bool, "1"), "true");
        assert_eq!(
            target.value_to_code(PropertyType::Colour, "wxSYS_COLOUR_WINDOW"),
            "wxSystemSettings::GetColour( wxSYS_COLOUR_WINDOW )"
        );
        assert_eq!(
            target.value_to_code(PropertyType::Colour, "255,0,0"),
            "wxColour( 255, 0, 0 )"
        );
        assert_eq!(
            target.value_to_code(PropertyType::Font, "Arial,90,92,12,74,1"),
            r#"wxFont( 12, 74, 90, 92, true, wxT("Arial") )"#
        );
        assert_eq!(target.value_to_code(PropertyType::Macro, "ID_OK"), "ID_OK");
    }

    #[test]
    fn test_bitmap_sources() {
        let mut target = CppTarget::new();
        target.set_paths("/home/me/project", true);
        assert_eq!(
            target.value_to_code(PropertyType::Bitmap, "res/open.xpm; Load From File"),
            "wxBitmap( open_xpm )"
        );
        assert_eq!(
            target.value_to_code(PropertyType::Bitmap, "/home/me/project/res/logo.png"),
            r#"wxBitmap( wxT("res/logo.png"), wxBITMAP_TYPE_ANY )"#
        );
        assert_eq!(
            target.value_to_code(PropertyType::Bitmap, "IDB_LOGO; Load From Resource"),
            r#"wxBitmap( wxT("IDB_LOGO"), wxBITMAP_TYPE_RESOURCE )"#
        );
        assert_eq!(
            target.value_to_code(PropertyType::Bitmap, "appicon; Load From Icon Resource"),
            "wxICON( appicon )"
        );

        target.set_paths("/base", false);
        assert_eq!(target.resolve_path("img/a.png"), "/base/img/a.png");
        assert_eq!(target.resolve_path("/abs/a.png"), "/abs/a.png");
    }

    #[test]
    fn test_cpp_string_escapes() {
        assert_eq!(cpp_string("a\\b\t\r"), "a\\\\b\\t\\r");
        assert_eq!(cpp_string("plain"), "plain");
    }
}
