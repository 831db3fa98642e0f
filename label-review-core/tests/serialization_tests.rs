use label_review_core::*;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_item_roundtrip_keeps_history() {
    let mut store = ItemStore::new("roundtrip").with_user("alice");
    store.import(vec![NewItem::new("hello world").with_label("pos").with_tags(["a", "b"])]);
    store.update_fields(0, &[("category", "greeting")]).unwrap();
    store.quick_label(0, "neg").unwrap();

    let original = store.get(0).unwrap().clone();
    let json = serde_json::to_string(&original).unwrap();
    let restored: Item = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, original);
    assert_eq!(restored.history.len(), 2);
}

#[test]
fn test_item_defaults_for_missing_fields() {
    let value = json!({
        "id": 9,
        "text": "bare",
        "last_updated": "2024-05-01T12:00:00Z"
    });

    let item: Item = serde_json::from_value(value).unwrap();
    assert_eq!(item.id, ItemId(9));
    assert_eq!(item.version, 0);
    assert!(item.tags.is_empty());
    assert!(item.history.is_empty());
}

#[test]
fn test_metadata_serialization_keys() {
    let meta = DatasetMetadata::new("reviews");
    let value = serde_json::to_value(&meta).unwrap();

    assert_eq!(value["name"], "reviews");
    assert_eq!(value["version"], 1);
    assert_eq!(value["total_items"], 0);
    assert_eq!(value["verified_items"], 0);
    assert!(value["last_modified"].is_string());
}

#[test]
fn test_invalid_json_maps_to_serialization_error() {
    let err: CoreError = serde_json::from_str::<Item>("{not json").unwrap_err().into();
    assert!(matches!(err, CoreError::Serialization(_)));
}
