//! TypeScript/JavaScript declaration extractor.
//!
//! Collects top-level (optionally exported) classes, interfaces, enums,
//! function declarations, type aliases and `const` bindings. A `const` bound
//! to a function or arrow function counts as a function.

use tree_sitter::{Node, Tree};

use super::{field_text, named_child_texts, node_text, DeclarationExtractor, Declarations};
use crate::facts::{DeclaredType, TypeFlags};

/// TypeScript, TSX and JavaScript declaration extractor.
pub struct TypeScriptExtractor {
    language: &'static str,
}

impl TypeScriptExtractor {
    /// Create an extractor registered under `language`
    /// ("typescript", "tsx" or "javascript").
    pub fn new(language: &'static str) -> Self {
        Self { language }
    }
}

impl DeclarationExtractor for TypeScriptExtractor {
    fn language_id(&self) -> &'static str {
        self.language
    }

    fn extract(&self, tree: &Tree, source: &[u8]) -> Declarations {
        let mut out = Declarations::default();
        let root = tree.root_node();
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            self.collect(&child, source, &mut out);
        }
        out
    }
}

impl TypeScriptExtractor {
    fn collect(&self, node: &Node, source: &[u8], out: &mut Declarations) {
        match node.kind() {
            "export_statement" => {
                if let Some(declaration) = node.child_by_field_name("declaration") {
                    self.collect(&declaration, source, out);
                }
            }
            "class_declaration" | "abstract_class_declaration" => {
                let mut flags = TypeFlags::CLASS;
                if node.kind() == "abstract_class_declaration" {
                    flags |= TypeFlags::ABSTRACT;
                }
                self.push_type(node, source, flags, out);
            }
            "interface_declaration" => self.push_type(node, source, TypeFlags::INTERFACE, out),
            "enum_declaration" => self.push_type(node, source, TypeFlags::ENUM, out),
            "function_declaration" | "generator_function_declaration" => {
                if let Some(name) = field_text(node, "name", source) {
                    out.functions.push(name);
                }
            }
            "type_alias_declaration" => {
                if let Some(name) = field_text(node, "name", source) {
                    out.type_aliases.push(name);
                }
            }
            "lexical_declaration" => self.collect_const(node, source, out),
            _ => {}
        }
    }

    fn push_type(&self, node: &Node, source: &[u8], flags: TypeFlags, out: &mut Declarations) {
        let Some(name) = field_text(node, "name", source) else {
            return;
        };
        out.types
            .push(DeclaredType::new(name, flags).with_bases(self.heritage(node, source)));
    }

    /// Extended and implemented type names from `class_heritage` or
    /// `extends_type_clause`.
    fn heritage(&self, node: &Node, source: &[u8]) -> Vec<String> {
        let mut bases = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "class_heritage" => {
                    let mut inner = child.walk();
                    for clause in child.named_children(&mut inner) {
                        match clause.kind() {
                            "extends_clause" | "implements_clause" => bases.extend(
                                named_child_texts(&clause, source, &["type_arguments"]),
                            ),
                            // JavaScript: `class A extends B` has the expression directly
                            _ => bases.push(node_text(&clause, source).to_string()),
                        }
                    }
                }
                "extends_type_clause" => bases.extend(named_child_texts(&child, source, &[])),
                _ => {}
            }
        }
        bases
    }

    fn collect_const(&self, node: &Node, source: &[u8], out: &mut Declarations) {
        let is_const = node
            .child(0)
            .map(|keyword| keyword.kind() == "const")
            .unwrap_or(false);
        if !is_const {
            return;
        }

        let mut cursor = node.walk();
        for declarator in node.named_children(&mut cursor) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let Some(name) = declarator.child_by_field_name("name") else {
                continue;
            };
            if name.kind() != "identifier" {
                continue;
            }
            let name = node_text(&name, source).to_string();
            let is_function = declarator
                .child_by_field_name("value")
                .map(|value| matches!(value.kind(), "arrow_function" | "function_expression" | "function"))
                .unwrap_or(false);
            if is_function {
                out.functions.push(name);
            } else {
                out.constants.push(name);
            }
        }
    }
}
