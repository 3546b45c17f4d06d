//! Go declaration extractor.
//!
//! Collects: function_declaration, type_declaration (type_spec and
//! type_alias), const_declaration. Methods are skipped.

use tree_sitter::{Node, Tree};

use super::{field_text, node_text, DeclarationExtractor, Declarations};
use crate::facts::{DeclaredType, TypeFlags};

/// Go language declaration extractor.
pub struct GoExtractor;

impl DeclarationExtractor for GoExtractor {
    fn language_id(&self) -> &'static str {
        "go"
    }

    fn extract(&self, tree: &Tree, source: &[u8]) -> Declarations {
        let mut out = Declarations::default();
        let root = tree.root_node();
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            match child.kind() {
                "function_declaration" => {
                    if let Some(name) = field_text(&child, "name", source) {
                        out.functions.push(name);
                    }
                }
                "type_declaration" => self.collect_types(&child, source, &mut out),
                "const_declaration" => self.collect_constants(&child, source, &mut out),
                _ => {}
            }
        }
        out
    }
}

impl GoExtractor {
    fn collect_types(&self, node: &Node, source: &[u8], out: &mut Declarations) {
        let mut cursor = node.walk();
        for spec in node.named_children(&mut cursor) {
            let Some(name) = field_text(&spec, "name", source) else {
                continue;
            };
            match spec.kind() {
                "type_alias" => out.type_aliases.push(name),
                "type_spec" => {
                    let flags = match spec.child_by_field_name("type").map(|t| t.kind()) {
                        Some("struct_type") => TypeFlags::STRUCT,
                        Some("interface_type") => TypeFlags::INTERFACE,
                        _ => TypeFlags::empty(),
                    };
                    out.types.push(DeclaredType::new(name, flags));
                }
                _ => {}
            }
        }
    }

    fn collect_constants(&self, node: &Node, source: &[u8], out: &mut Declarations) {
        let mut cursor = node.walk();
        for spec in node.named_children(&mut cursor) {
            if spec.kind() != "const_spec" {
                continue;
            }
            let mut names = spec.walk();
            for name in spec.children_by_field_name("name", &mut names) {
                out.constants.push(node_text(&name, source).to_string());
            }
        }
    }
}
