//! Rust declaration extractor.
//!
//! Collects: struct_item, enum_item, union_item, trait_item, function_item,
//! const_item, static_item, type_item. Inline `mod` blocks are descended;
//! impl, trait and function bodies are not.

use tree_sitter::{Node, Tree};

use super::{field_text, named_child_texts, DeclarationExtractor, Declarations};
use crate::facts::{DeclaredType, TypeFlags};

/// Rust language declaration extractor.
pub struct RustExtractor;

impl DeclarationExtractor for RustExtractor {
    fn language_id(&self) -> &'static str {
        "rust"
    }

    fn extract(&self, tree: &Tree, source: &[u8]) -> Declarations {
        let mut out = Declarations::default();
        self.collect(&tree.root_node(), source, &mut out);
        out
    }
}

impl RustExtractor {
    fn collect(&self, node: &Node, source: &[u8], out: &mut Declarations) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "struct_item" => self.push_type(&child, source, TypeFlags::STRUCT, out),
                "enum_item" => self.push_type(&child, source, TypeFlags::ENUM, out),
                "union_item" => self.push_type(&child, source, TypeFlags::UNION, out),
                "trait_item" => self.push_type(&child, source, TypeFlags::TRAIT, out),
                "function_item" => {
                    if let Some(name) = field_text(&child, "name", source) {
                        out.functions.push(name);
                    }
                }
                "const_item" | "static_item" => {
                    if let Some(name) = field_text(&child, "name", source) {
                        out.constants.push(name);
                    }
                }
                "type_item" => {
                    if let Some(name) = field_text(&child, "name", source) {
                        out.type_aliases.push(name);
                    }
                }
                "mod_item" => {
                    // `mod foo;` has no body; the file is indexed on its own
                    if let Some(body) = child.child_by_field_name("body") {
                        self.collect(&body, source, out);
                    }
                }
                _ => {}
            }
        }
    }

    fn push_type(&self, node: &Node, source: &[u8], flags: TypeFlags, out: &mut Declarations) {
        let Some(name) = field_text(node, "name", source) else {
            return;
        };

        let bases = node
            .child_by_field_name("bounds")
            .map(|bounds| named_child_texts(&bounds, source, &["lifetime"]))
            .unwrap_or_default();

        out.types.push(DeclaredType::new(name, flags).with_bases(bases));
    }
}
