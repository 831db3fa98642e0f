use label_review_core::{CoreError, ItemStore, NewItem};
use label_review_storage::{read_snapshot, write_snapshot, Snapshot};
use pretty_assertions::assert_eq;

fn sample_store() -> ItemStore {
    let mut store = ItemStore::new("reviews").with_user("alice");
    store.import(vec![
        NewItem::new("great").with_label("pos").with_tags(["a", "b"]),
        NewItem::new("awful").with_label("neg"),
    ]);
    store.quick_label(1, "pos").unwrap();
    store.update_fields(0, &[("category", "film")]).unwrap();
    store
}

#[test]
fn test_round_trip_preserves_items() {
    let store = sample_store();
    let mut buffer = Vec::new();
    write_snapshot(&mut buffer, store.metadata(), store.as_slice()).unwrap();

    let snapshot = read_snapshot(buffer.as_slice()).unwrap();
    assert_eq!(snapshot.metadata, *store.metadata());
    assert_eq!(snapshot.data, store.as_slice());

    let restored = snapshot.into_store().unwrap();
    assert_eq!(restored.metadata().verified_items, 1);
    assert_eq!(restored.get(0).unwrap().tags, vec!["a", "b"]);
    assert_eq!(restored.get(1).unwrap().history.len(), 1);
    assert_eq!(restored.get(1).unwrap().history.latest().unwrap().user, "alice");
}

#[test]
fn test_document_shape() {
    let store = sample_store();
    let mut buffer = Vec::new();
    write_snapshot(&mut buffer, store.metadata(), store.as_slice()).unwrap();

    let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
    assert_eq!(value["metadata"]["name"], "reviews");
    assert_eq!(value["metadata"]["total_items"], 2);
    assert_eq!(value["data"][1]["verified_by"], "alice");
    assert!(value["data"][0]["history"].is_array());
    assert!(value["data"][0]["model_predictions"].is_object());
}

#[test]
fn test_snapshot_of_store() {
    let store = sample_store();
    let snapshot = Snapshot::of(&store);
    assert_eq!(snapshot.data.len(), 2);
    assert_eq!(snapshot.metadata.version, store.metadata().version);
}

#[test]
fn test_truncated_document_is_serialization_error() {
    let err = read_snapshot(r#"{"metadata": {"name": "x""#.as_bytes()).unwrap_err();
    assert!(matches!(err, CoreError::Serialization(_)));
}

#[test]
fn test_invalid_confidence_rejected_on_restore() {
    let store = sample_store();
    let mut snapshot = Snapshot::of(&store);
    snapshot.data[0].confidence = 3.0;

    let err = snapshot.into_store().unwrap_err();
    assert!(matches!(err, CoreError::MalformedInput(_)));
}
