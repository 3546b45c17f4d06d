use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;

use defindex::cache::MemoryBackend;
use defindex::config::{CacheBackendKind, CacheConfig};
use defindex::facts::{StaticExtractor, TreeSitterExtractor};
use defindex::{merge_maps, AutoloadMap, AutoloadService, Config, SourceRoot, SymbolKind};

use crate::helpers::test_harness::{facts, TestHarness};

fn pairs(map: &AutoloadMap, kind: SymbolKind) -> HashMap<String, String> {
    map.partition(kind).clone()
}

fn owned(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_end_to_end_map() -> Result<()> {
    let harness = TestHarness::new()?;
    let foo = harness.create_test_file("foo.src", "")?;
    let bar = harness.create_test_file("sub/bar.src", "")?;

    let extractor = StaticExtractor::new()
        .with_file(&foo, facts(&["Foo"], &["bar"], &["BAZ"]))
        .with_file(&bar, facts(&["Qux"], &[], &[]));

    let service = harness.service(Arc::new(extractor));
    let map = service.build(&[harness.root(".", r"\.src$")], false)?;

    assert_eq!(
        pairs(&map, SymbolKind::Class),
        owned(&[("foo", "foo.src"), ("qux", "sub/bar.src")])
    );
    assert_eq!(pairs(&map, SymbolKind::Function), owned(&[("bar", "foo.src")]));
    assert_eq!(pairs(&map, SymbolKind::Constant), owned(&[("BAZ", "foo.src")]));
    assert!(map.partition(SymbolKind::Type).is_empty());

    let json = serde_json::to_value(&map)?;
    assert_eq!(json["class"]["qux"], "sub/bar.src");
    assert_eq!(json["constant"]["BAZ"], "foo.src");
    assert!(json["type"].as_object().unwrap().is_empty());

    Ok(())
}

#[test]
fn test_case_normalization() -> Result<()> {
    let harness = TestHarness::new()?;
    let file = harness.create_test_file("src/my_class.src", "")?;

    let extractor = StaticExtractor::new().with_file(&file, facts(&["MyClass"], &[], &["MY_CONST"]));
    let service = harness.service(Arc::new(extractor));
    let map = service.build(&[harness.root("src", r"\.src$")], false)?;

    assert!(map.class.contains_key("myclass"));
    assert!(!map.class.contains_key("MyClass"));
    assert!(map.constant.contains_key("MY_CONST"));
    assert!(!map.constant.contains_key("my_const"));

    assert_eq!(map.lookup(SymbolKind::Class, "MYCLASS"), Some("src/my_class.src"));
    assert_eq!(map.lookup(SymbolKind::Constant, "my_const"), None);

    Ok(())
}

#[test]
fn test_rebuild_is_idempotent() -> Result<()> {
    let harness = TestHarness::new()?;
    let a = harness.create_test_file("lib/a.src", "")?;
    let b = harness.create_test_file("lib/nested/b.src", "")?;

    let extractor = StaticExtractor::new()
        .with_file(&a, facts(&["Alpha"], &["helper"], &[]))
        .with_file(&b, facts(&["Beta"], &[], &["LIMIT"]));
    let service = harness.service(Arc::new(extractor));
    let roots = [harness.root("lib", r"\.src$")];

    let first = service.build(&roots, true)?;
    let second = service.build(&roots, true)?;

    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_failed_extraction_is_skipped() -> Result<()> {
    let harness = TestHarness::new()?;
    let good = harness.create_test_file("src/good.src", "")?;
    let broken = harness.create_test_file("src/broken.src", "")?;

    let extractor = StaticExtractor::new()
        .with_file(&good, facts(&["Good"], &["run"], &[]))
        .with_failure(&broken);
    let service = harness.service(Arc::new(extractor));

    let results = service.build_indexes(&[harness.root("src", r"\.src$")], false)?;
    let result = &results[0];

    assert_eq!(result.files_scanned, 2);
    assert_eq!(result.skipped, vec![broken]);
    assert!(result.index.file("src/broken.src").is_none());
    assert!(result.index.is_consistent());
    assert!(result
        .index
        .map
        .iter()
        .all(|(_, _, path)| path != "src/broken.src"));

    Ok(())
}

#[test]
fn test_roots_merge_in_priority_order() -> Result<()> {
    let harness = TestHarness::new()?;
    let base = harness.create_test_file("vendor/widget.src", "")?;
    let local = harness.create_test_file("app/widget.src", "")?;

    let extractor = StaticExtractor::new()
        .with_file(&base, facts(&["Widget"], &["vendor_only"], &[]))
        .with_file(&local, facts(&["Widget"], &[], &[]));
    let service = harness.service(Arc::new(extractor));

    let map = service.build(
        &[harness.root("vendor", r"\.src$"), harness.root("app", r"\.src$")],
        false,
    )?;

    assert_eq!(map.lookup(SymbolKind::Class, "widget"), Some("app/widget.src"));
    assert_eq!(map.lookup(SymbolKind::Function, "vendor_only"), Some("vendor/widget.src"));

    let reversed = service.build(
        &[harness.root("app", r"\.src$"), harness.root("vendor", r"\.src$")],
        false,
    )?;
    assert_eq!(reversed.lookup(SymbolKind::Class, "widget"), Some("vendor/widget.src"));

    Ok(())
}

#[test]
fn test_merge_precedence() {
    let mut left = AutoloadMap::new();
    left.insert(SymbolKind::Class, "a".to_string(), "f1".to_string());
    let mut right = AutoloadMap::new();
    right.insert(SymbolKind::Class, "a".to_string(), "f2".to_string());

    let merged = merge_maps(left, &right);

    assert_eq!(merged.class.get("a").map(String::as_str), Some("f2"));
    assert_eq!(merged.len(), 1);
}

#[test]
fn test_resolve_against_project_root() -> Result<()> {
    let harness = TestHarness::new()?;
    let file = harness.create_test_file("src/models/user.src", "")?;

    let extractor = StaticExtractor::new().with_file(&file, facts(&["User"], &[], &[]));
    let service = harness.service(Arc::new(extractor));
    let map = service.build(&[harness.root("src", r"\.src$")], false)?;

    let resolved = map
        .resolve(SymbolKind::Class, "User", service.project_root())
        .unwrap();
    assert_eq!(resolved, harness.path().join("src/models/user.src"));
    assert!(resolved.exists());

    Ok(())
}

#[test]
fn test_relative_project_dir_publishes_relative_paths() -> Result<()> {
    let dir = tempfile::TempDir::new_in(".")?;
    assert!(dir.path().is_relative());
    std::fs::create_dir_all(dir.path().join("src/models"))?;
    std::fs::write(dir.path().join("src/models/user.rs"), "pub struct User;\n")?;

    let service = AutoloadService::new(
        dir.path(),
        Arc::new(MemoryBackend::new()),
        Arc::new(TreeSitterExtractor::with_threads(Some(1))),
    );
    let map = service.build(&[SourceRoot::new("src", r"\.rs$")], false)?;

    assert!(service.project_root().is_absolute());
    assert_eq!(
        map.lookup(SymbolKind::Class, "User"),
        Some("src/models/user.rs")
    );
    let resolved = map
        .resolve(SymbolKind::Class, "User", service.project_root())
        .unwrap();
    assert!(resolved.exists());

    Ok(())
}

#[test]
fn test_parent_project_root_from_config() -> Result<()> {
    let harness = TestHarness::new()?;
    let app = harness.create_dir("app")?;
    harness.create_test_file("app/src/lib.rs", "pub fn boot() {}\n")?;

    let config = Config {
        project_root: Some("..".into()),
        roots: vec![SourceRoot::new("src", r"\.rs$")],
        cache: CacheConfig {
            backend: CacheBackendKind::Memory,
            ..Default::default()
        },
        ..Default::default()
    };
    let service = AutoloadService::from_config(&config, &app);
    let map = service.build(&config.roots, false)?;

    assert_eq!(service.project_root(), harness.path());
    assert_eq!(map.lookup(SymbolKind::Function, "boot"), Some("app/src/lib.rs"));

    Ok(())
}

#[test]
fn test_root_with_parent_components() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_dir("lib")?;
    let file = harness.create_test_file("src/a.src", "")?;

    let extractor = StaticExtractor::new().with_file(&file, facts(&[], &["f"], &[]));
    let service = harness.service(Arc::new(extractor));
    let map = service.build(&[harness.root("lib/../src", r"\.src$")], false)?;

    assert_eq!(map.lookup(SymbolKind::Function, "f"), Some("src/a.src"));

    Ok(())
}
