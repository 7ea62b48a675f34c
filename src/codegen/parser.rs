//! Template interpreter.
//!
//! Templates are plain text with three sigils:
//!
//! - `#name` runs a macro (`wxparent`, `parent`, `child`, `ifnotnull`,
//!   `ifnull`, `ifequal`, `ifnotequal`, `foreach`, `pred`, `nl`, `append`),
//! - `$name` substitutes the target-language encoding of a property,
//! - `@x` writes `x` literally. `@{` and `@}` delimit macro bodies, which
//!   nest.
//!
//! Literal runs made only of whitespace are dropped, so templates can be laid
//! out freely and use `#nl` for line breaks.
//!
//! ```
//! use formgen::codegen::parser::{CodeTarget, TemplateParser};
//! use formgen::diagnostics::Diagnostics;
//! use formgen::model::{ObjectTree, PropertyType};
//! use formgen::registry::TypeRegistry;
//!
//! struct Plain;
//!
//! impl CodeTarget for Plain {
//!     fn value_to_code(&self, _kind: PropertyType, value: &str) -> String {
//!         value.to_string()
//!     }
//!     fn root_parent_token(&self) -> &str {
//!         "this"
//!     }
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry.load_object_types("objtypes.yaml", "categories: []").unwrap();
//! registry
//!     .load_package(
//!         "p.yaml",
//!         "name: p\nclasses:\n  - class: W\n    category: widget\n    properties:\n      - name: label\n        type: text\n        default: hi\n",
//!     )
//!     .unwrap();
//! registry.resolve();
//! let mut tree = ObjectTree::new();
//! let object = registry.create_instance(&mut tree, "W", None).unwrap();
//! let diagnostics = Diagnostics::new();
//! let out = TemplateParser::new(&tree, object, "say( $label )@;", &Plain, &diagnostics).parse();
//! assert_eq!(out, "say( hi );");
//! ```

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::model::tree::{ObjectId, ObjectTree, Property};
use crate::model::types::{PropertyType, WXPARENT_CANDIDATES};

/// Target-language hooks used by the interpreter.
pub trait CodeTarget {
    /// Encodes a property value as a target-language expression.
    fn value_to_code(&self, kind: PropertyType, value: &str) -> String;

    /// Token used by `#wxparent` when the object has no window-like ancestor.
    fn root_parent_token(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Macro,
    Property,
    Text,
    End,
}

const WHITESPACE: [char; 4] = ['\r', '\n', '\t', ' '];

pub struct TemplateParser<'a> {
    tree: &'a ObjectTree,
    object: ObjectId,
    target: &'a dyn CodeTarget,
    diagnostics: &'a Diagnostics,
    input: Vec<char>,
    pos: usize,
    output: String,
    predefined: Option<String>,
}

impl<'a> TemplateParser<'a> {
    pub fn new(
        tree: &'a ObjectTree,
        object: ObjectId,
        template: &str,
        target: &'a dyn CodeTarget,
        diagnostics: &'a Diagnostics,
    ) -> Self {
        Self {
            tree,
            object,
            target,
            diagnostics,
            input: template.chars().collect(),
            pos: 0,
            output: String::new(),
            predefined: None,
        }
    }

    /// Binds the value returned by `#pred`.
    pub fn with_predefined(mut self, predefined: Option<String>) -> Self {
        self.predefined = predefined;
        self
    }

    pub fn parse(mut self) -> String {
        loop {
            match self.next_token() {
                Token::Macro => self.parse_macro(),
                Token::Property => self.parse_property(),
                Token::Text => self.parse_text(),
                Token::End => break,
            }
        }
        self.output
    }

    fn class_name(&self) -> &str {
        self.tree.class_name(self.object)
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }

    fn next_token(&self) -> Token {
        match self.peek() {
            None => Token::End,
            Some('#') => Token::Macro,
            Some('$') => Token::Property,
            Some(_) => Token::Text,
        }
    }

    fn skip_spaces(&mut self) {
        while self.peek() == Some(' ') {
            self.pos += 1;
        }
    }

    fn read_while(&mut self, accept: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while self.peek().is_some_and(&accept) {
            self.pos += 1;
        }
        self.input[start..self.pos].iter().collect()
    }

    /// Literal run up to the next `#` or `$`. `@c` stands for `c` and stays
    /// part of the run, so only runs that are whitespace once unescaped are
    /// dropped.
    fn parse_text(&mut self) {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            match c {
                '#' | '$' => break,
                '@' => {
                    self.pos += 1;
                    if let Some(escaped) = self.peek() {
                        text.push(escaped);
                        self.pos += 1;
                    }
                }
                _ => {
                    text.push(c);
                    self.pos += 1;
                }
            }
        }
        if !text.chars().all(|c| WHITESPACE.contains(&c)) {
            self.output.push_str(&text);
        }
    }

    fn parse_property(&mut self) {
        self.pos += 1;
        let name = self.read_while(|c| c.is_alphanumeric() || c == '_');
        match self.tree.property(self.object, &name) {
            Some(property) => {
                let code = self.property_to_code(property);
                self.output.push_str(&code);
            }
            None if name == "pred" && self.predefined.is_some() => {
                let predefined = self.predefined.clone().unwrap_or_default();
                self.output.push_str(&predefined);
            }
            None => self.diagnostics.error(
                DiagnosticKind::TemplateResolution,
                Some(self.class_name()),
                format!("Property '{name}' not found"),
            ),
        }
    }

    fn property_to_code(&self, property: &Property) -> String {
        self.target.value_to_code(property.kind(), property.value())
    }

    /// Reads `$name` after optional spaces.
    fn parse_property_name(&mut self) -> Option<String> {
        self.skip_spaces();
        if self.peek() != Some('$') {
            self.diagnostics.error(
                DiagnosticKind::MalformedTemplate,
                Some(self.class_name()),
                "Expected a property reference",
            );
            return None;
        }
        self.pos += 1;
        Some(self.read_while(|c| c.is_alphanumeric() || c == '_'))
    }

    fn related_property(&mut self, related: ObjectId) -> Option<&'a Property> {
        let name = self.parse_property_name()?;
        let tree = self.tree;
        let property = tree.property(related, &name);
        if property.is_none() {
            self.diagnostics.error(
                DiagnosticKind::TemplateResolution,
                Some(tree.class_name(related)),
                format!("Property '{name}' not found"),
            );
        }
        property
    }

    /// Closest ancestor whose category is one of [`WXPARENT_CANDIDATES`].
    fn wx_parent(&self) -> Option<ObjectId> {
        self.tree.ancestors(self.object).into_iter().find(|&a| {
            self.tree
                .category(a)
                .is_some_and(|c| WXPARENT_CANDIDATES.contains(&c))
        })
    }

    fn parse_macro(&mut self) {
        self.pos += 1;
        let name = self.read_while(char::is_alphanumeric);
        match name.as_str() {
            "wxparent" => self.parse_wx_parent(),
            "parent" => self.parse_parent(),
            "child" => self.parse_child(),
            "ifnotnull" => self.parse_if_null(false),
            "ifnull" => self.parse_if_null(true),
            "ifequal" => self.parse_if_equal(true),
            "ifnotequal" => self.parse_if_equal(false),
            "foreach" => self.parse_foreach(),
            "pred" => {
                if let Some(predefined) = &self.predefined {
                    self.output.push_str(predefined);
                }
            }
            "nl" => self.output.push('\n'),
            "append" => self.skip_spaces(),
            other => self.diagnostics.warning(
                DiagnosticKind::MalformedTemplate,
                Some(self.class_name()),
                format!("Unknown macro '#{other}'"),
            ),
        }
    }

    fn parse_wx_parent(&mut self) {
        match self.wx_parent() {
            Some(ancestor) => {
                if let Some(property) = self.related_property(ancestor) {
                    let code = self.property_to_code(property);
                    self.output.push_str(&code);
                }
            }
            None => {
                self.parse_property_name();
                let token = self.target.root_parent_token().to_string();
                self.output.push_str(&token);
            }
        }
    }

    fn parse_parent(&mut self) {
        match self.tree.parent(self.object) {
            Some(parent) => {
                if let Some(property) = self.related_property(parent) {
                    let code = self.property_to_code(property);
                    self.output.push_str(&code);
                }
            }
            None => {
                self.parse_property_name();
                self.diagnostics.error(
                    DiagnosticKind::TemplateResolution,
                    Some(self.class_name()),
                    "#parent used on an object without parent",
                );
            }
        }
    }

    fn parse_child(&mut self) {
        match self.tree.child(self.object, 0) {
            Some(child) => {
                if let Some(property) = self.related_property(child) {
                    let code = self.property_to_code(property);
                    self.output.push_str(&code);
                }
            }
            None => {
                self.parse_property_name();
                let token = self.target.root_parent_token().to_string();
                self.output.push_str(&token);
            }
        }
    }

    /// Resolves `$name`, or `#wxparent $name`, `#parent $name`, `#child $name`.
    fn get_property(&mut self) -> Option<&'a Property> {
        self.skip_spaces();
        if self.next_token() == Token::Macro {
            let start = self.pos;
            self.pos += 1;
            let name = self.read_while(char::is_alphanumeric);
            let related = match name.as_str() {
                "wxparent" => Some(self.wx_parent()),
                "parent" => Some(self.tree.parent(self.object)),
                "child" => Some(self.tree.child(self.object, 0)),
                _ => None,
            };
            match related {
                Some(Some(object)) => return self.related_property(object),
                Some(None) => {
                    self.parse_property_name();
                    self.diagnostics.warning(
                        DiagnosticKind::TemplateResolution,
                        Some(self.class_name()),
                        format!("No object for '#{name}'"),
                    );
                    return None;
                }
                None => self.pos = start,
            }
        }
        let object = self.object;
        self.related_property(object)
    }

    /// Extracts the body of `@{ ... @}` verbatim, nested pairs included.
    fn extract_inner_template(&mut self) -> String {
        self.skip_spaces();
        if self.peek() != Some('@') || self.peek_at(1) != Some('{') {
            self.diagnostics.error(
                DiagnosticKind::MalformedTemplate,
                Some(self.class_name()),
                "Expected '@{'",
            );
            return String::new();
        }
        self.pos += 2;
        self.skip_spaces();

        let mut inner = String::new();
        let mut depth = 1usize;
        let mut closed = false;
        while let Some(c) = self.peek() {
            self.pos += 1;
            if c != '@' {
                inner.push(c);
                continue;
            }
            match self.peek() {
                Some('{') => {
                    self.pos += 1;
                    depth += 1;
                    inner.push_str("@{");
                }
                Some('}') => {
                    self.pos += 1;
                    depth -= 1;
                    if depth == 0 {
                        closed = true;
                        break;
                    }
                    inner.push_str("@}");
                }
                Some(other) => {
                    self.pos += 1;
                    inner.push('@');
                    inner.push(other);
                }
                None => inner.push('@'),
            }
        }
        if !closed {
            self.diagnostics.error(
                DiagnosticKind::MalformedTemplate,
                Some(self.class_name()),
                "Unterminated '@{' block",
            );
        }
        trim_unescaped_spaces(&mut inner);
        inner
    }

    /// Reads `"..."` where `""` stands for a quote, then drops anything up to
    /// the next space.
    fn extract_literal(&mut self) -> String {
        self.skip_spaces();
        if self.peek() != Some('"') {
            self.diagnostics.error(
                DiagnosticKind::MalformedTemplate,
                Some(self.class_name()),
                "Expected a quoted literal",
            );
            return String::new();
        }
        self.pos += 1;
        let mut literal = String::new();
        while let Some(c) = self.peek() {
            self.pos += 1;
            if c != '"' {
                literal.push(c);
                continue;
            }
            if self.peek() == Some('"') {
                self.pos += 1;
                literal.push('"');
            } else {
                break;
            }
        }
        while self.peek().is_some_and(|c| c != ' ') {
            self.pos += 1;
        }
        literal
    }

    fn interpret(&self, template: &str, predefined: Option<String>) -> String {
        TemplateParser::new(self.tree, self.object, template, self.target, self.diagnostics)
            .with_predefined(predefined)
            .parse()
    }

    fn parse_if_null(&mut self, expect_null: bool) {
        let property = self.get_property();
        let inner = self.extract_inner_template();
        let Some(property) = property else {
            return;
        };
        if property.is_empty() == expect_null {
            let code = self.interpret(&inner, self.predefined.clone());
            self.output.push_str(&code);
        }
    }

    fn parse_if_equal(&mut self, expect_equal: bool) {
        let property = self.get_property();
        let literal = self.extract_literal();
        let inner = self.extract_inner_template();
        let Some(property) = property else {
            return;
        };
        if (property.value() == literal) == expect_equal {
            let code = self.interpret(&inner, self.predefined.clone());
            self.output.push_str(&code);
        }
    }

    fn parse_foreach(&mut self) {
        let property = self.get_property();
        let inner = self.extract_inner_template();
        let Some(property) = property else {
            return;
        };
        let items: Vec<String> = match property.kind() {
            PropertyType::IntList => property
                .value()
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
            PropertyType::StringList => property
                .as_string_list()
                .iter()
                .map(|item| self.target.value_to_code(PropertyType::StringI18n, item))
                .collect(),
            other => {
                self.diagnostics.error(
                    DiagnosticKind::MalformedTemplate,
                    Some(self.class_name()),
                    format!("#foreach over '{}' of non-list type {other:?}", property.name()),
                );
                return;
            }
        };
        let iterations: Vec<String> = items
            .into_iter()
            .map(|item| self.interpret(&inner, Some(item)))
            .collect();
        self.output.push_str(&iterations.join("\n"));
    }
}

/// Drops trailing spaces that are not escaped with `@`.
fn trim_unescaped_spaces(text: &mut String) {
    while text.ends_with(' ') {
        let before = &text[..text.len() - 1];
        let escapes = before.chars().rev().take_while(|&c| c == '@').count();
        if escapes % 2 == 1 {
            break;
        }
        text.pop();
    }
}
