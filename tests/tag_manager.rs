// Adapter behavior against an in-memory store double: idempotent
// add/remove, write suppression on no-ops, exact-match search.

use drivetags_cli::api::{FileRecord, FileStore, StatusCode, StoreError, StoreResult};
use drivetags_cli::manager::TagManager;
use std::cell::RefCell;
use std::collections::HashMap;

const FOLDER: &str = "folder-1";

/// In-memory stand-in for the remote store. Counts writes so tests can
/// assert that no-ops really skip the update call.
#[derive(Default)]
struct MemStore {
    files: RefCell<Vec<FileRecord>>,
    writes: RefCell<usize>,
}

impl MemStore {
    fn with_files(files: Vec<FileRecord>) -> Self {
        MemStore {
            files: RefCell::new(files),
            writes: RefCell::new(0),
        }
    }

    fn write_count(&self) -> usize {
        *self.writes.borrow()
    }

    fn properties_of(&self, file_id: &str) -> HashMap<String, String> {
        self.files
            .borrow()
            .iter()
            .find(|f| f.id == file_id)
            .map(|f| f.properties.clone())
            .expect("file exists")
    }
}

impl FileStore for MemStore {
    fn list_files(&self, _folder_id: &str) -> StoreResult<Vec<FileRecord>> {
        Ok(self.files.borrow().clone())
    }

    fn get_properties(&self, file_id: &str) -> StoreResult<HashMap<String, String>> {
        self.files
            .borrow()
            .iter()
            .find(|f| f.id == file_id)
            .map(|f| f.properties.clone())
            .ok_or_else(|| StoreError::Api {
                status: StatusCode::NOT_FOUND,
                body: format!("file not found: {file_id}"),
            })
    }

    fn update_properties(
        &self,
        file_id: &str,
        properties: &HashMap<String, String>,
    ) -> StoreResult<()> {
        let mut files = self.files.borrow_mut();
        let file = files
            .iter_mut()
            .find(|f| f.id == file_id)
            .ok_or_else(|| StoreError::Api {
                status: StatusCode::NOT_FOUND,
                body: format!("file not found: {file_id}"),
            })?;
        file.properties = properties.clone();
        *self.writes.borrow_mut() += 1;
        Ok(())
    }
}

fn record(id: &str, name: &str, tags: Option<&str>) -> FileRecord {
    let mut properties = HashMap::new();
    if let Some(t) = tags {
        properties.insert("tags".to_string(), t.to_string());
    }
    FileRecord {
        id: id.to_string(),
        name: name.to_string(),
        mime_type: "text/plain".to_string(),
        properties,
    }
}

#[test]
fn add_tag_appends_and_writes_back() {
    let store = MemStore::with_files(vec![record("f1", "report.txt", Some("a"))]);
    let manager = TagManager::new(&store, FOLDER);

    assert!(manager.add_tag("f1", "b").unwrap());

    assert_eq!(store.write_count(), 1);
    assert_eq!(store.properties_of("f1")["tags"], "a,b");
}

#[test]
fn add_tag_twice_is_a_no_op_the_second_time() {
    let store = MemStore::with_files(vec![record("f1", "report.txt", None)]);
    let manager = TagManager::new(&store, FOLDER);

    assert!(manager.add_tag("f1", "urgent").unwrap());
    assert!(!manager.add_tag("f1", "urgent").unwrap());

    assert_eq!(store.write_count(), 1);
    assert_eq!(store.properties_of("f1")["tags"], "urgent");
}

#[test]
fn add_tag_preserves_unrelated_properties() {
    let mut file = record("f1", "report.txt", Some("a"));
    file.properties
        .insert("owner".to_string(), "alice".to_string());
    let store = MemStore::with_files(vec![file]);
    let manager = TagManager::new(&store, FOLDER);

    assert!(manager.add_tag("f1", "b").unwrap());

    let props = store.properties_of("f1");
    assert_eq!(props["owner"], "alice");
    assert_eq!(props["tags"], "a,b");
}

#[test]
fn remove_absent_tag_performs_no_write() {
    let store = MemStore::with_files(vec![record("f1", "report.txt", Some("a"))]);
    let manager = TagManager::new(&store, FOLDER);

    assert!(!manager.remove_tag("f1", "b").unwrap());

    assert_eq!(store.write_count(), 0);
}

#[test]
fn removing_the_last_tag_stores_an_empty_string() {
    let store = MemStore::with_files(vec![record("f1", "report.txt", Some("a"))]);
    let manager = TagManager::new(&store, FOLDER);

    assert!(manager.remove_tag("f1", "a").unwrap());

    assert_eq!(store.properties_of("f1")["tags"], "");
}

#[test]
fn remove_keeps_the_other_tags_in_order() {
    let store = MemStore::with_files(vec![record("f1", "report.txt", Some("a,b,c"))]);
    let manager = TagManager::new(&store, FOLDER);

    assert!(manager.remove_tag("f1", "b").unwrap());

    assert_eq!(store.properties_of("f1")["tags"], "a,c");
}

#[test]
fn search_matches_exact_tags_only() {
    let store = MemStore::with_files(vec![
        record("f1", "one.txt", Some("a,b")),
        record("f2", "two.txt", Some("c")),
        record("f3", "three.txt", None),
    ]);
    let manager = TagManager::new(&store, FOLDER);

    let hits = manager.search_by_tag("b").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "f1");

    // Case-sensitive; no substring matching.
    assert!(manager.search_by_tag("B").unwrap().is_empty());
    assert!(manager.search_by_tag("a,b").unwrap().is_empty());
}

#[test]
fn search_trims_the_query_tag() {
    let store = MemStore::with_files(vec![record("f1", "one.txt", Some("a, b ,c"))]);
    let manager = TagManager::new(&store, FOLDER);

    let hits = manager.search_by_tag(" b ").unwrap();
    assert_eq!(hits.len(), 1);
}

#[test]
fn store_errors_surface_to_the_caller() {
    let store = MemStore::with_files(vec![]);
    let manager = TagManager::new(&store, FOLDER);

    let err = manager.add_tag("missing", "x").unwrap_err();
    assert!(matches!(err, StoreError::Api { status, .. } if status == StatusCode::NOT_FOUND));
}
