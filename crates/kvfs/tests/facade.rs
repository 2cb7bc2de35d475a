pub mod fixtures;

use fixtures::*;
use kvfs::prelude::*;
use kvfs::{DiskStore, KvfsBuilder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::Path;
use std::sync::atomic::Ordering;

#[tokio::test]
async fn test_write_then_read_roundtrip() {
    let (fs, store) = setup_paths(&[]);
    let value = json!({ "name": "ada", "tags": ["x", "y"], "n": 1.5 });

    fs.write("/users/ada", &value).await.unwrap();

    assert_eq!(fs.read("/users/ada").await.unwrap(), Some(value));
    assert!(store.inner.snapshot().contains_key("/kvfs/users/ada"));
}

#[tokio::test]
async fn test_read_missing_path_is_none() {
    let (fs, _) = setup_paths(&[]);
    assert_eq!(fs.read("/nothing").await.unwrap(), None);
}

#[tokio::test]
async fn test_overwrite_replaces_value() {
    let (fs, _) = setup_paths(&[]);
    fs.write("/a", &json!(1)).await.unwrap();
    fs.write("/a", &json!("two")).await.unwrap();

    assert_eq!(fs.read("/a").await.unwrap(), Some(json!("two")));
}

#[tokio::test]
async fn test_empty_paths_rejected_before_store_access() {
    let (fs, store) = setup_paths(&[]);

    assert!(matches!(fs.read("").await, Err(KvfsError::Validation { .. })));
    assert!(matches!(fs.write("", &json!(1)).await, Err(KvfsError::Validation { .. })));
    assert!(matches!(fs.remove("").await, Err(KvfsError::Validation { .. })));
    assert!(matches!(fs.remove_multi(&["/a", ""]).await, Err(KvfsError::Validation { .. })));
    assert!(matches!(
        fs.write_multi(None, &[Entry::new("/a", json!(1)), Entry::new("", json!(2))]).await,
        Err(KvfsError::Validation { .. })
    ));

    assert_eq!(store.calls.total(), 0);
    assert!(store.inner.is_empty());
}

#[tokio::test]
async fn test_list_strips_prefix_and_ignores_other_namespaces() {
    let (fs, _) = setup_fs([
        ("/kvfs/a", "1"),
        ("/kvfs/b/c", "2"),
        ("/other/a", "3"),
        ("/kv", "4"),
    ]);

    assert_eq!(fs.list(None).await.unwrap(), ["/a", "/b/c"]);
    assert_eq!(fs.list(Some("")).await.unwrap(), ["/a", "/b/c"]);
    assert_eq!(fs.list(Some("/b*")).await.unwrap(), ["/b/c"]);
}

#[tokio::test]
async fn test_instances_with_distinct_prefixes_are_isolated() {
    let shared = MemoryStore::new();
    let left = Kvfs::new(shared.clone(), "/left").unwrap();
    let right = Kvfs::new(shared.clone(), "/right").unwrap();

    left.write("/x", &json!("l")).await.unwrap();
    right.write("/x", &json!("r")).await.unwrap();

    assert_eq!(left.read("/x").await.unwrap(), Some(json!("l")));
    assert_eq!(right.read("/x").await.unwrap(), Some(json!("r")));

    assert_eq!(left.remove_all_force().await.unwrap(), 1);
    assert_eq!(left.list(None).await.unwrap(), Vec::<String>::new());
    assert_eq!(right.list(None).await.unwrap(), ["/x"]);
    assert_eq!(shared.len(), 1);
}

#[tokio::test]
async fn test_read_multi_fetches_in_one_batch() {
    let (fs, store) = setup_paths(&["/foo12", "/foo24", "/fom"]);

    let found = fs.read_multi("/foo*").await.unwrap();

    assert_eq!(found, vec![
        PathValue { path: "/foo12".into(), value: Some(json!("/foo12")) },
        PathValue { path: "/foo24".into(), value: Some(json!("/foo24")) },
    ]);
    assert_eq!(store.calls.get_many.load(Ordering::SeqCst), 1);
    assert_eq!(store.calls.get.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_read_multi_without_matches_skips_fetch() {
    let (fs, store) = setup_paths(&["/a"]);

    assert!(fs.read_multi("/zzz*").await.unwrap().is_empty());
    assert_eq!(store.calls.data_calls(), 0);
}

#[tokio::test]
async fn test_read_multi_serializes_as_path_value_objects() {
    let (fs, _) = setup_paths(&["/k"]);
    let found = fs.read_multi("*").await.unwrap();

    assert_eq!(serde_json::to_value(&found).unwrap(), json!([{ "path": "/k", "value": "/k" }]));
}

#[tokio::test]
async fn test_write_multi_joins_base_and_batches() {
    let (fs, store) = setup_paths(&[]);
    let entries = [Entry::new("/one", json!(1)), Entry::new("/two", json!([2]))];

    fs.write_multi(Some("/nums"), &entries).await.unwrap();

    assert_eq!(store.calls.set_many.load(Ordering::SeqCst), 1);
    assert_eq!(store.calls.set.load(Ordering::SeqCst), 0);
    assert_eq!(fs.list(None).await.unwrap(), ["/nums/one", "/nums/two"]);
    assert_eq!(fs.read("/nums/two").await.unwrap(), Some(json!([2])));
}

#[tokio::test]
async fn test_write_multi_without_base_uses_entry_paths() {
    let (fs, _) = setup_paths(&[]);
    fs.write_multi(None, &[Entry::new("/solo", json!(null))]).await.unwrap();

    assert_eq!(fs.read("/solo").await.unwrap(), Some(json!(null)));
}

#[tokio::test]
async fn test_base_alone_is_a_valid_path() {
    let (fs, _) = setup_paths(&[]);
    fs.write_multi(Some("/cfg"), &[Entry::new("", json!(true))]).await.unwrap();

    assert_eq!(fs.read("/cfg").await.unwrap(), Some(json!(true)));
}

#[tokio::test]
async fn test_empty_bulk_calls_never_reach_store() {
    let (fs, store) = setup_paths(&[]);

    fs.write_multi(Some("/base"), &[]).await.unwrap();
    fs.remove_multi::<&str>(&[]).await.unwrap();

    assert_eq!(store.calls.total(), 0);
}

#[tokio::test]
async fn test_remove_is_idempotent() {
    let (fs, _) = setup_paths(&["/gone"]);

    fs.remove("/gone").await.unwrap();
    fs.remove("/gone").await.unwrap();

    assert_eq!(fs.read("/gone").await.unwrap(), None);
}

#[tokio::test]
async fn test_remove_treats_wildcards_literally() {
    let (fs, _) = setup_paths(&["/a*", "/ab"]);

    fs.remove("/a*").await.unwrap();

    assert_eq!(fs.list(None).await.unwrap(), ["/ab"]);
}

#[tokio::test]
async fn test_remove_matching_counts_and_batches() {
    let (fs, store) = setup_paths(&["/foo12", "/foo24", "/fom", "/bar"]);

    assert_eq!(fs.remove_matching("/foo*").await.unwrap(), 2);

    assert_eq!(store.calls.remove_many.load(Ordering::SeqCst), 1);
    assert_eq!(fs.list(None).await.unwrap(), ["/bar", "/fom"]);
}

#[tokio::test]
async fn test_remove_matching_refuses_empty_spec() {
    let (fs, store) = setup_paths(&["/a"]);

    assert!(matches!(fs.remove_matching("").await, Err(KvfsError::Validation { .. })));
    assert_eq!(store.calls.total(), 0);
    assert_eq!(store.inner.len(), 1);
}

#[tokio::test]
async fn test_remove_matching_without_matches_skips_removal() {
    let (fs, store) = setup_paths(&["/a"]);

    assert_eq!(fs.remove_matching("/b*").await.unwrap(), 0);
    assert_eq!(store.calls.remove_many.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_remove_multi_batches_literal_paths() {
    let (fs, store) = setup_paths(&["/a", "/b", "/c"]);

    fs.remove_multi(&["/a", "/c", "/missing"]).await.unwrap();

    assert_eq!(store.calls.remove_many.load(Ordering::SeqCst), 1);
    assert_eq!(fs.list(None).await.unwrap(), ["/b"]);
}

#[tokio::test]
async fn test_remove_all_force_on_empty_namespace() {
    let (fs, store) = setup_fs([("/elsewhere", "1")]);

    assert_eq!(fs.remove_all_force().await.unwrap(), 0);
    assert_eq!(store.calls.remove_many.load(Ordering::SeqCst), 0);
    assert_eq!(store.inner.len(), 1);
}

#[tokio::test]
async fn test_undecodable_value_is_a_codec_error() {
    let (fs, _) = setup_fs([("/kvfs/bad", "{not json")]);

    let err = fs.read("/bad").await.unwrap_err();
    assert!(matches!(err, KvfsError::Codec { .. }));
    assert!(err.to_string().contains("Decoding /bad"));
}

#[tokio::test]
async fn test_store_failures_propagate() {
    let fs = Kvfs::new(FailingStore, PREFIX).unwrap();

    assert!(matches!(fs.read("/a").await, Err(KvfsError::Store { .. })));
    assert!(matches!(fs.write("/a", &json!(1)).await, Err(KvfsError::Store { .. })));
    assert!(matches!(fs.list(None).await, Err(KvfsError::Store { .. })));
    assert!(matches!(fs.remove_all_force().await, Err(KvfsError::Store { .. })));
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Profile {
    username: String,
    enabled: bool,
}

#[tokio::test]
async fn test_builder_with_typed_codec() {
    let fs = Kvfs::builder()
        .prefix("app:")
        .store(MemoryStore::new())
        .codec(TypedJsonCodec::<Profile>::new())
        .build()
        .unwrap();
    let profile = Profile { username: "ada".into(), enabled: true };

    fs.write("profile", &profile).await.unwrap();

    assert_eq!(fs.prefix(), "app:");
    assert_eq!(fs.read("profile").await.unwrap(), Some(profile));
    assert_eq!(fs.store().snapshot().keys().collect::<Vec<_>>(), ["app:profile"]);
}

#[test]
fn test_builder_requires_prefix() {
    let result = KvfsBuilder::new().store(MemoryStore::new()).build();
    assert!(matches!(result, Err(KvfsError::Configuration { .. })));

    assert!(matches!(Kvfs::new(MemoryStore::new(), ""), Err(KvfsError::Configuration { .. })));
}

async fn open_disk(root: &Path) -> Kvfs<DiskStore> {
    let store = DiskStore::builder()
        .root(root)
        .compression(Compression::Lz4)
        .connect()
        .await
        .expect("DiskStore setup failed");
    Kvfs::new(store, PREFIX).expect("Kvfs setup failed")
}

#[tokio::test]
async fn test_disk_backed_instance_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let fs = open_disk(dir.path()).await;
    fs.write_multi(Some("/docs"), &[
        Entry::new("/a", json!({ "t": "alpha" })),
        Entry::new("/b", json!({ "t": "beta" })),
    ])
    .await
    .unwrap();
    drop(fs);

    let fs = open_disk(dir.path()).await;
    assert_eq!(fs.list(Some("/docs/*")).await.unwrap(), ["/docs/a", "/docs/b"]);
    assert_eq!(fs.read("/docs/b").await.unwrap(), Some(json!({ "t": "beta" })));
    assert_eq!(fs.remove_all_force().await.unwrap(), 2);
    assert!(fs.list(None).await.unwrap().is_empty());
}
