use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use defindex::cache::MemoryBackend;
use defindex::facts::TreeSitterExtractor;
use defindex::{AutoloadService, SourceRoot, SymbolKind};

use crate::helpers::test_harness::TestHarness;

#[test]
fn test_mixed_language_tree() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file(
        "src/server.rs",
        r#"
pub struct HttpServer;
pub trait Handler: Send {}
pub fn start_server() {}
pub const DEFAULT_PORT: u16 = 8080;
pub type Port = u16;
"#,
    )?;
    harness.create_test_file(
        "src/models/user.py",
        r#"
class UserModel(Base):
    pass

def load_users():
    pass

MAX_USERS = 100
"#,
    )?;
    harness.create_test_file(
        "src/cmd/main.go",
        r#"
package main

type Config struct{}

const Version = "1.0"

func Run() {}
"#,
    )?;
    harness.create_test_file(
        "src/web/app.ts",
        r#"
export interface Props { id: number }
export type Id = string;
export function render(props: Props) {}
export const API_URL = "/api";
"#,
    )?;
    harness.create_test_file("src/notes.txt", "class NotCode")?;

    let service = harness.service(Arc::new(TreeSitterExtractor::with_threads(Some(2))));
    let map = service.build(
        &[harness.root("src", r"\.(rs|py|go|ts)$")],
        false,
    )?;

    assert_eq!(map.lookup(SymbolKind::Class, "HttpServer"), Some("src/server.rs"));
    assert_eq!(map.lookup(SymbolKind::Class, "handler"), Some("src/server.rs"));
    assert_eq!(map.lookup(SymbolKind::Function, "start_server"), Some("src/server.rs"));
    assert_eq!(map.lookup(SymbolKind::Constant, "DEFAULT_PORT"), Some("src/server.rs"));
    assert_eq!(map.lookup(SymbolKind::Type, "Port"), Some("src/server.rs"));

    assert_eq!(map.lookup(SymbolKind::Class, "usermodel"), Some("src/models/user.py"));
    assert_eq!(map.lookup(SymbolKind::Function, "load_users"), Some("src/models/user.py"));
    assert_eq!(map.lookup(SymbolKind::Constant, "MAX_USERS"), Some("src/models/user.py"));

    assert_eq!(map.lookup(SymbolKind::Class, "config"), Some("src/cmd/main.go"));
    assert_eq!(map.lookup(SymbolKind::Constant, "Version"), Some("src/cmd/main.go"));
    assert_eq!(map.lookup(SymbolKind::Function, "run"), Some("src/cmd/main.go"));

    assert_eq!(map.lookup(SymbolKind::Class, "props"), Some("src/web/app.ts"));
    assert_eq!(map.lookup(SymbolKind::Type, "id"), Some("src/web/app.ts"));
    assert_eq!(map.lookup(SymbolKind::Function, "render"), Some("src/web/app.ts"));
    assert_eq!(map.lookup(SymbolKind::Constant, "API_URL"), Some("src/web/app.ts"));

    assert_eq!(map.lookup(SymbolKind::Class, "notcode"), None);

    Ok(())
}

#[test]
fn test_fixture_project() -> Result<()> {
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/project");
    let service = AutoloadService::new(
        &fixtures,
        Arc::new(MemoryBackend::new()),
        Arc::new(TreeSitterExtractor::new()),
    );

    let roots = [
        SourceRoot::new("src", r"\.rs$"),
        SourceRoot::new("scripts", r"\.py$"),
    ];
    let results = service.build_indexes(&roots, false)?;

    let rust = &results[0].index;
    assert_eq!(rust.file_count(), 2);
    let geometry = rust.file("src/geometry.rs").unwrap();
    assert_eq!(geometry.constants, vec!["ORIGIN_X"]);
    assert_eq!(geometry.type_aliases, vec!["meters"]);
    assert!(geometry.functions.contains(&"distance".to_string()));
    assert!(rust.is_consistent());

    let map = AutoloadService::merge(&results);
    assert_eq!(map.lookup(SymbolKind::Class, "Point"), Some("src/geometry.rs"));
    assert_eq!(map.lookup(SymbolKind::Class, "Area"), Some("src/geometry.rs"));
    assert_eq!(map.lookup(SymbolKind::Class, "Circle"), Some("src/shapes/circle.rs"));
    assert_eq!(map.lookup(SymbolKind::Class, "fill"), Some("src/shapes/circle.rs"));
    assert_eq!(map.lookup(SymbolKind::Class, "renderer"), Some("scripts/render.py"));
    assert_eq!(map.lookup(SymbolKind::Function, "render_all"), Some("scripts/render.py"));
    assert_eq!(map.lookup(SymbolKind::Constant, "DEFAULT_SCALE"), Some("scripts/render.py"));

    Ok(())
}
