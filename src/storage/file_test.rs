use super::*;

#[tokio::test]
async fn get_before_any_write_returns_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    assert_eq!(store.get("theme").await.unwrap(), None);
    assert!(!store.path().exists());
}

#[tokio::test]
async fn set_creates_directory_and_file() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("nested").join("academy");
    let store = FileStore::new(&nested);

    store.set("theme", "dark").await.unwrap();

    assert!(store.path().exists());
    assert_eq!(store.get("theme").await.unwrap().as_deref(), Some("dark"));
}

#[tokio::test]
async fn values_survive_a_new_instance() {
    let dir = tempfile::tempdir().unwrap();
    FileStore::new(dir.path()).set("theme", "light").await.unwrap();

    let reopened = FileStore::new(dir.path());
    assert_eq!(reopened.get("theme").await.unwrap().as_deref(), Some("light"));
}

#[tokio::test]
async fn keys_do_not_clobber_each_other() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    store.set("theme", "dark").await.unwrap();
    store.set("auth-storage", "{}").await.unwrap();

    assert_eq!(store.get("theme").await.unwrap().as_deref(), Some("dark"));
    assert_eq!(store.get("auth-storage").await.unwrap().as_deref(), Some("{}"));
}

#[tokio::test]
async fn remove_drops_only_that_key() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    store.set("theme", "dark").await.unwrap();
    store.set("other", "x").await.unwrap();

    store.remove("theme").await.unwrap();
    store.remove("missing").await.unwrap();

    assert_eq!(store.get("theme").await.unwrap(), None);
    assert_eq!(store.get("other").await.unwrap().as_deref(), Some("x"));
}

#[tokio::test]
async fn garbage_file_is_reported_as_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    std::fs::write(store.path(), "not json at all").unwrap();

    let err = store.get("theme").await.unwrap_err();
    assert!(matches!(err, StorageError::Corrupt(_)));
}

#[tokio::test]
async fn non_string_values_are_reported_as_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    std::fs::write(store.path(), r#"{"theme": 42}"#).unwrap();

    let err = store.get("theme").await.unwrap_err();
    assert!(matches!(err, StorageError::Corrupt(_)));
}

#[tokio::test]
async fn write_over_garbage_file_recovers() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    std::fs::write(store.path(), r#"{"theme": "dar"#).unwrap();

    store.set("theme", "dark").await.unwrap();

    assert_eq!(store.get("theme").await.unwrap().as_deref(), Some("dark"));
    let aside = std::fs::read_to_string(dir.path().join("storage.json.corrupt")).unwrap();
    assert_eq!(aside, r#"{"theme": "dar"#);
}

#[tokio::test]
async fn remove_over_garbage_file_clears_it() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    std::fs::write(store.path(), r#"{"theme": 42}"#).unwrap();

    store.remove("theme").await.unwrap();

    assert_eq!(store.get("theme").await.unwrap(), None);
    store.set("other", "x").await.unwrap();
    assert_eq!(store.get("other").await.unwrap().as_deref(), Some("x"));
}

#[tokio::test]
async fn empty_file_reads_as_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    std::fs::write(store.path(), "  \n").unwrap();

    assert_eq!(store.get("theme").await.unwrap(), None);
}

#[tokio::test]
async fn concurrent_writes_to_different_keys_all_land() {
    let dir = tempfile::tempdir().unwrap();
    let store = std::sync::Arc::new(FileStore::new(dir.path()));

    let mut handles = Vec::new();
    for i in 0..8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.set(&format!("key{i}"), &i.to_string()).await.unwrap();
        }));
    }
    for h in handles {
        h.await.unwrap();
    }

    for i in 0..8 {
        assert_eq!(store.get(&format!("key{i}")).await.unwrap(), Some(i.to_string()));
    }
}
