use anyhow::Result;
use std::sync::Arc;

use defindex::cache::{CacheBackend, CacheKey, FileBackend};
use defindex::facts::StaticExtractor;
use defindex::{AutoloadService, SymbolKind};

use crate::helpers::test_harness::{facts, TestHarness};

#[test]
fn test_cache_hit_skips_rescan() -> Result<()> {
    let harness = TestHarness::new()?;
    let file = harness.create_test_file("src/foo.src", "")?;
    let extractor = Arc::new(StaticExtractor::new().with_file(&file, facts(&["Foo"], &[], &[])));
    let service = harness.service(extractor.clone());
    let roots = [harness.root("src", r"\.src$")];

    let first = service.build_indexes(&roots, false)?;
    let second = service.build_indexes(&roots, false)?;

    assert!(!first[0].from_cache);
    assert!(second[0].from_cache);
    assert_eq!(second[0].files_scanned, 0);
    assert_eq!(second[0].index.map, first[0].index.map);
    assert_eq!(extractor.call_count(), 1);

    Ok(())
}

#[test]
fn test_flush_first_forces_rescan() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_dir("src")?;
    let extractor = Arc::new(StaticExtractor::new());
    let service = harness.service(extractor.clone());
    let roots = [harness.root("src", r"\.src$")];

    service.build(&roots, false)?;
    service.build(&roots, true)?;

    assert_eq!(extractor.call_count(), 2);
    Ok(())
}

#[test]
fn test_flush_root_drops_entry() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_dir("src")?;
    let extractor = Arc::new(StaticExtractor::new());
    let service = harness.service(extractor.clone());
    let root = harness.root("src", r"\.src$");

    service.build(std::slice::from_ref(&root), false)?;
    assert_eq!(harness.backend.len(), 1);

    service.flush_root(&root)?;
    assert!(harness.backend.is_empty());

    service.build(std::slice::from_ref(&root), false)?;
    assert_eq!(extractor.call_count(), 2);
    Ok(())
}

#[test]
fn test_changes_inside_grace_window_are_not_noticed() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("src/a.src", "")?;
    let late = harness.path().join("src/late.src");
    let extractor = Arc::new(StaticExtractor::new().with_file(&late, facts(&["Late"], &[], &[])));
    let service = harness.service(extractor.clone());
    let roots = [harness.root("src", r"\.src$")];

    service.build(&roots, false)?;
    harness.create_test_file("src/late.src", "")?;
    let map = service.build(&roots, false)?;

    assert_eq!(extractor.call_count(), 1);
    assert_eq!(map.lookup(SymbolKind::Class, "late"), None);
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_newer_subdirectory_invalidates_cache() -> Result<()> {
    use std::time::{Duration, SystemTime};

    let harness = TestHarness::new()?;
    let nested = harness.create_dir("src/models")?;
    let file = harness.create_test_file("src/models/user.src", "")?;
    let extractor = Arc::new(StaticExtractor::new().with_file(&file, facts(&["User"], &[], &[])));
    let service = harness.service(extractor.clone());
    let roots = [harness.root("src", r"\.src$")];

    service.build(&roots, false)?;

    let later = SystemTime::now() + Duration::from_secs(60);
    std::fs::File::open(&nested)?.set_modified(later)?;

    let results = service.build_indexes(&roots, false)?;
    assert!(!results[0].from_cache);
    assert_eq!(extractor.call_count(), 2);
    assert_eq!(
        results[0].index.map.lookup(SymbolKind::Class, "user"),
        Some("src/models/user.src")
    );

    Ok(())
}

#[test]
fn test_scan_parameters_address_separate_entries() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_dir("src")?;
    let extractor = Arc::new(StaticExtractor::new());
    let service = harness.service(extractor.clone());

    service.build(&[harness.root("src", r"\.src$")], false)?;
    service.build(&[harness.root("src", r"\.inc$")], false)?;

    assert_eq!(extractor.call_count(), 2);
    assert_eq!(harness.backend.len(), 2);
    Ok(())
}

#[test]
fn test_file_cache_survives_new_service() -> Result<()> {
    let harness = TestHarness::new()?;
    let file = harness.create_test_file("src/foo.src", "")?;
    let cache_dir = harness.path().join(".cache");
    let roots = [harness.root("src", r"\.src$")];

    let first_extractor =
        Arc::new(StaticExtractor::new().with_file(&file, facts(&[], &["boot"], &[])));
    let first = AutoloadService::new(
        harness.path(),
        Arc::new(FileBackend::new(&cache_dir)),
        first_extractor.clone(),
    );
    let built = first.build(&roots, false)?;

    let second_extractor = Arc::new(StaticExtractor::new());
    let second = AutoloadService::new(
        harness.path(),
        Arc::new(FileBackend::new(&cache_dir)),
        second_extractor.clone(),
    );
    let cached = second.build(&roots, false)?;

    assert_eq!(cached, built);
    assert_eq!(cached.lookup(SymbolKind::Function, "boot"), Some("src/foo.src"));
    assert_eq!(second_extractor.call_count(), 0);
    Ok(())
}

#[test]
fn test_corrupt_file_entry_triggers_rescan() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_dir("src")?;
    let cache_dir = harness.path().join(".cache");
    let backend = Arc::new(FileBackend::new(&cache_dir));
    let extractor = Arc::new(StaticExtractor::new());
    let service = AutoloadService::new(harness.path(), backend.clone(), extractor.clone());
    let root = harness.root("src", r"\.src$");

    service.build(std::slice::from_ref(&root), false)?;

    let resolved = service.resolve_root(&root)?;
    let key = CacheKey::for_root(&resolved);
    backend.set(key.as_str(), b"\x00garbage")?;

    service.build(std::slice::from_ref(&root), false)?;
    assert_eq!(extractor.call_count(), 2);
    Ok(())
}
