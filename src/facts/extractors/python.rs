//! Python declaration extractor.
//!
//! Collects module-level class_definition and function_definition (decorated
//! or not) and UPPER_CASE assignments as constants.

use tree_sitter::{Node, Tree};

use super::{field_text, named_child_texts, node_text, DeclarationExtractor, Declarations};
use crate::facts::{DeclaredType, TypeFlags};

/// Python language declaration extractor.
pub struct PythonExtractor;

impl DeclarationExtractor for PythonExtractor {
    fn language_id(&self) -> &'static str {
        "python"
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

impl PythonExtractor {
    fn collect(&self, node: &Node, source: &[u8], out: &mut Declarations) {
        match node.kind() {
            "decorated_definition" => {
                if let Some(definition) = node.child_by_field_name("definition") {
                    self.collect(&definition, source, out);
                }
            }
            "class_definition" => {
                if let Some(name) = field_text(node, "name", source) {
                    let bases = node
                        .child_by_field_name("superclasses")
                        .map(|args| named_child_texts(&args, source, &["keyword_argument", "comment"]))
                        .unwrap_or_default();
                    out.types
                        .push(DeclaredType::new(name, TypeFlags::CLASS).with_bases(bases));
                }
            }
            "function_definition" => {
                if let Some(name) = field_text(node, "name", source) {
                    out.functions.push(name);
                }
            }
            "expression_statement" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    if child.kind() != "assignment" {
                        continue;
                    }
                    let Some(left) = child.child_by_field_name("left") else {
                        continue;
                    };
                    if left.kind() == "identifier" {
                        let name = node_text(&left, source);
                        if is_constant_name(name) {
                            out.constants.push(name.to_string());
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

/// Python has no constant declarations; module-level UPPER_CASE names are
/// treated as constants by convention.
fn is_constant_name(name: &str) -> bool {
    name.chars().any(|c| c.is_ascii_uppercase())
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
