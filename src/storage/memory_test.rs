use super::*;

#[tokio::test]
async fn get_missing_key_returns_none() {
    let store = MemoryStore::new();
    assert_eq!(store.get("theme").await.unwrap(), None);
}

#[tokio::test]
async fn set_then_get_returns_value() {
    let store = MemoryStore::new();
    store.set("theme", "dark").await.unwrap();
    assert_eq!(store.get("theme").await.unwrap().as_deref(), Some("dark"));
}

#[tokio::test]
async fn set_overwrites_previous_value() {
    let store = MemoryStore::new();
    store.set("theme", "dark").await.unwrap();
    store.set("theme", "light").await.unwrap();
    assert_eq!(store.get("theme").await.unwrap().as_deref(), Some("light"));
}

#[tokio::test]
async fn remove_deletes_key_and_tolerates_absence() {
    let store = MemoryStore::with_entries([("theme", "dark")]);
    store.remove("theme").await.unwrap();
    store.remove("theme").await.unwrap();
    assert!(store.snapshot().is_empty());
}

#[test]
fn with_entries_prepopulates() {
    let store = MemoryStore::with_entries([("a", "1"), ("b", "2")]);
    let snap = store.snapshot();
    assert_eq!(snap.len(), 2);
    assert_eq!(snap.get("b").map(String::as_str), Some("2"));
}
