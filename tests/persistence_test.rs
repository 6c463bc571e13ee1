//! Tests for JsonFileStore against a real temporary directory

use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use famtree::application::{FamilySession, JsonFileStore, LoadSource, PersistenceAdapter};
use famtree::domain::{add_member, count_members, MemberDraft, MemberRef, TreeDocument};
use famtree::infrastructure::traits::RealFileSystem;
use famtree::util::testing;

fn store_in(dir: &TempDir) -> JsonFileStore {
    JsonFileStore::new(Arc::new(RealFileSystem), dir.path(), "familyTreeData")
}

#[test]
fn given_empty_data_dir_when_loading_then_default_root() {
    testing::init_test_setup();
    let temp = TempDir::new().unwrap();

    let loaded = store_in(&temp).load().unwrap();

    assert_eq!(loaded.source, LoadSource::Missing);
    assert_eq!(loaded.tree.name, "Root Family");
    assert!(loaded.tree.children.is_empty());
}

#[test]
fn given_saved_tree_when_loading_then_same_tree_with_ids() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);
    let tree = add_member(
        &TreeDocument::default(),
        &MemberRef::by_name("Root Family"),
        &MemberDraft::new("Alice").unwrap(),
    )
    .tree;

    store.save(&tree).unwrap();
    let loaded = store.load().unwrap();

    assert_eq!(loaded.source, LoadSource::Stored);
    assert_eq!(loaded.tree, tree);
    assert_eq!(store.path(), temp.path().join("familyTreeData.json"));
}

#[test]
fn given_nested_missing_data_dir_when_saving_then_created() {
    let temp = TempDir::new().unwrap();
    let store = JsonFileStore::new(
        Arc::new(RealFileSystem),
        &temp.path().join("a/b"),
        "familyTreeData",
    );

    store.save(&TreeDocument::default()).unwrap();

    assert!(temp.path().join("a/b/familyTreeData.json").exists());
}

#[test]
fn given_saved_tree_when_saving_again_then_no_temp_files_left() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);

    store.save(&TreeDocument::default()).unwrap();
    store.save(&TreeDocument::default()).unwrap();

    let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn given_corrupt_file_when_loading_then_recovered_default() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("familyTreeData.json"), "{ not json").unwrap();

    let loaded = store_in(&temp).load().unwrap();

    assert!(matches!(loaded.source, LoadSource::Recovered { .. }));
    assert_eq!(count_members(&loaded.tree), 1);
}

#[test]
fn given_structurally_invalid_tree_when_loading_then_recovered_default() {
    let temp = TempDir::new().unwrap();
    // child rank must be 2
    let raw = r#"{
        "name": "Root Family",
        "attributes": {"birth": "", "married": false, "hasChildren": true, "spouse": "", "rank": 1, "wealth": 3},
        "children": [
            {"name": "Kid", "attributes": {"birth": "", "married": false, "hasChildren": false, "spouse": "", "rank": 5, "wealth": 3}}
        ]
    }"#;
    fs::write(temp.path().join("familyTreeData.json"), raw).unwrap();

    let loaded = store_in(&temp).load().unwrap();

    match loaded.source {
        LoadSource::Recovered { reason } => assert!(reason.contains("Kid"), "{reason}"),
        other => panic!("unexpected source: {other:?}"),
    }
}

#[test]
fn given_legacy_document_without_ids_when_loading_then_ids_assigned_as_migration() {
    let temp = TempDir::new().unwrap();
    let raw = r#"{
        "name": "Root Family",
        "attributes": {"birth": "", "married": false, "hasChildren": true, "spouse": "", "rank": 1, "wealth": 3},
        "children": [
            {"name": "Alice", "attributes": {"birth": "1990-04-01", "married": true, "hasChildren": false, "spouse": "Sam", "rank": 2, "wealth": 4}}
        ]
    }"#;
    fs::write(temp.path().join("familyTreeData.json"), raw).unwrap();

    let loaded = store_in(&temp).load().unwrap();

    assert_eq!(loaded.source, LoadSource::Migrated { assigned: 2 });
    let alice = &loaded.tree.children[0];
    assert!(!alice.id.as_str().is_empty());
    assert_ne!(alice.id, loaded.tree.id);
    assert_eq!(alice.attributes.spouse, "Sam");
    assert!(alice.children.is_empty());
}

#[test]
fn given_wealth_out_of_range_when_loading_then_recovered_default() {
    let temp = TempDir::new().unwrap();
    let raw = r#"{
        "name": "Root Family",
        "attributes": {"birth": "", "married": false, "hasChildren": false, "spouse": "", "rank": 1, "wealth": 9},
        "children": []
    }"#;
    fs::write(temp.path().join("familyTreeData.json"), raw).unwrap();

    let loaded = store_in(&temp).load().unwrap();

    assert!(matches!(loaded.source, LoadSource::Recovered { .. }));
    assert_eq!(loaded.tree.attributes.wealth.get(), 3);
}

#[test]
fn given_legacy_document_when_opening_two_sessions_then_member_ids_match() {
    let temp = TempDir::new().unwrap();
    let raw = r#"{
        "name": "Root Family",
        "attributes": {"birth": "", "married": false, "hasChildren": true, "spouse": "", "rank": 1, "wealth": 3},
        "children": [
            {"name": "Alice", "attributes": {"birth": "", "married": false, "hasChildren": false, "spouse": "", "rank": 2, "wealth": 4}}
        ]
    }"#;
    fs::write(temp.path().join("familyTreeData.json"), raw).unwrap();
    let store = Arc::new(store_in(&temp));

    let first = FamilySession::open(store.clone()).unwrap();
    let second = FamilySession::open(store.clone()).unwrap();

    assert!(matches!(first.source(), LoadSource::Migrated { .. }));
    assert_eq!(second.source(), &LoadSource::Stored);
    assert_eq!(first.tree().children[0].id, second.tree().children[0].id);
    assert_eq!(first.tree().id, second.tree().id);
}

#[test]
fn given_root_rank_not_one_when_loading_then_recovered_default() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("familyTreeData.json"),
        r#"{"name": "R", "attributes": {"rank": 7}}"#,
    )
    .unwrap();

    let loaded = store_in(&temp).load().unwrap();

    assert!(matches!(loaded.source, LoadSource::Recovered { .. }));
    assert_eq!(loaded.tree.attributes.rank, 1);
}

#[test]
fn given_overflowing_rank_when_loading_then_recovered_default() {
    let temp = TempDir::new().unwrap();
    let raw = r#"{"name": "R", "attributes": {"rank": 4294967295, "hasChildren": true},
                  "children": [{"name": "C", "attributes": {"rank": 1}}]}"#;
    fs::write(temp.path().join("familyTreeData.json"), raw).unwrap();

    let loaded = store_in(&temp).load().unwrap();

    assert!(matches!(loaded.source, LoadSource::Recovered { .. }));
    assert_eq!(count_members(&loaded.tree), 1);
}
