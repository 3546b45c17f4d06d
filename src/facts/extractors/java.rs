//! Java declaration extractor.
//!
//! Collects top-level class_declaration, interface_declaration,
//! enum_declaration and record_declaration with their modifiers and
//! supertypes. Java has no free functions or top-level constants.

use tree_sitter::{Node, Tree};

use super::{field_text, named_child_texts, node_text, DeclarationExtractor, Declarations};
use crate::facts::{DeclaredType, TypeFlags};

/// Java language declaration extractor.
pub struct JavaExtractor;

impl DeclarationExtractor for JavaExtractor {
    fn language_id(&self) -> &'static str {
        "java"
    }

    fn extract(&self, tree: &Tree, source: &[u8]) -> Declarations {
        let mut out = Declarations::default();
        let root = tree.root_node();
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            let flags = match child.kind() {
                "class_declaration" => TypeFlags::CLASS,
                "interface_declaration" => TypeFlags::INTERFACE,
                "enum_declaration" => TypeFlags::ENUM,
                "record_declaration" => TypeFlags::RECORD,
                _ => continue,
            };
            let Some(name) = field_text(&child, "name", source) else {
                continue;
            };
            let flags = flags | self.modifier_flags(&child, source);
            let bases = self.base_types(&child, source);
            out.types.push(DeclaredType::new(name, flags).with_bases(bases));
        }
        out
    }
}

impl JavaExtractor {
    fn modifier_flags(&self, node: &Node, source: &[u8]) -> TypeFlags {
        let mut flags = TypeFlags::empty();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() != "modifiers" {
                continue;
            }
            for word in node_text(&child, source).split_whitespace() {
                match word {
                    "abstract" => flags |= TypeFlags::ABSTRACT,
                    "final" => flags |= TypeFlags::FINAL,
                    _ => {}
                }
            }
        }
        flags
    }

    /// Superclass first, then implemented or extended interfaces.
    fn base_types(&self, node: &Node, source: &[u8]) -> Vec<String> {
        let mut bases = Vec::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "superclass" => bases.extend(named_child_texts(&child, source, &[])),
                "super_interfaces" | "extends_interfaces" => {
                    let mut inner = child.walk();
                    for list in child.named_children(&mut inner) {
                        if list.kind() == "type_list" {
                            bases.extend(named_child_texts(&list, source, &[]));
                        }
                    }
                }
                _ => {}
            }
        }
        bases
    }
}
