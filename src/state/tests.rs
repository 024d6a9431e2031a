//! Tests for classification and wire conversion

use super::*;
use crate::catalog::StreamDescriptor;
use crate::error::Error;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::HashSet;
use uuid::Uuid;

fn stream_message(name: &str, namespace: Option<&str>, cursor: i64) -> serde_json::Value {
    let mut descriptor = json!({ "name": name });
    if let Some(ns) = namespace {
        descriptor["namespace"] = json!(ns);
    }
    json!({
        "type": "STREAM",
        "stream": {
            "stream_descriptor": descriptor,
            "stream_state": { "cursor": cursor }
        },
        "data": { "legacy_cursor": cursor }
    })
}

// ============================================================================
// Classification Tests
// ============================================================================

#[test]
fn test_classify_absent_payload() {
    assert!(classify(None, true).unwrap().is_none());
    assert!(classify(None, false).unwrap().is_none());
}

#[test]
fn test_classify_plain_object_is_legacy() {
    let raw = json!({ "users": { "cursor": "2024-01-01" } });
    let checkpoint = classify(Some(&raw), true).unwrap().unwrap();
    assert_eq!(checkpoint, SyncCheckpoint::Legacy(raw));
}

#[test]
fn test_classify_empty_list_is_nothing() {
    assert!(classify(Some(&json!([])), true).unwrap().is_none());
}

#[test]
fn test_classify_untyped_list_is_legacy() {
    let raw = json!([{ "cursor": 1 }, { "cursor": 2 }]);
    let checkpoint = classify(Some(&raw), true).unwrap().unwrap();
    assert_eq!(checkpoint, SyncCheckpoint::Legacy(raw));
}

#[test]
fn test_classify_single_untyped_message_is_legacy() {
    let raw = json!([{ "data": { "cursor": 1 } }]);
    let checkpoint = classify(Some(&raw), true).unwrap().unwrap();
    assert_eq!(checkpoint, SyncCheckpoint::Legacy(raw));
}

#[test]
fn test_classify_scalar_list_is_legacy() {
    let raw = json!([1, 2, 3]);
    let checkpoint = classify(Some(&raw), true).unwrap().unwrap();
    assert_eq!(checkpoint.state_type(), StateType::Legacy);
}

#[test]
fn test_classify_legacy_message_uses_data() {
    let raw = json!([{ "type": "LEGACY", "data": { "cursor": 42 } }]);
    let checkpoint = classify(Some(&raw), true).unwrap().unwrap();
    assert_eq!(checkpoint, SyncCheckpoint::Legacy(json!({ "cursor": 42 })));
}

#[test]
fn test_classify_stream_messages_with_flag() {
    let raw = json!([
        stream_message("users", Some("public"), 10),
        stream_message("orders", None, 20)
    ]);

    let checkpoint = classify(Some(&raw), true).unwrap().unwrap();

    let SyncCheckpoint::Stream(streams) = checkpoint else {
        panic!("expected per-stream checkpoint");
    };
    assert_eq!(streams.len(), 2);
    assert_eq!(streams[0].name(), "users");
    assert_eq!(streams[0].namespace(), Some("public"));
    assert_eq!(streams[0].state, json!({ "cursor": 10 }));
    assert_eq!(streams[1].name(), "orders");
    assert_eq!(streams[1].namespace(), None);
}

#[test]
fn test_classify_stream_messages_without_flag_uses_last_data() {
    let raw = json!([
        stream_message("users", None, 10),
        stream_message("orders", None, 20)
    ]);

    let checkpoint = classify(Some(&raw), false).unwrap().unwrap();
    assert_eq!(
        checkpoint,
        SyncCheckpoint::Legacy(json!({ "legacy_cursor": 20 }))
    );
}

#[test]
fn test_classify_global_message() {
    let raw = json!([{
        "type": "GLOBAL",
        "global": {
            "shared_state": { "lsn": 1234 },
            "stream_states": [
                { "stream_descriptor": { "name": "users" }, "stream_state": { "pk": 5 } }
            ]
        },
        "data": { "legacy": true }
    }]);

    let checkpoint = classify(Some(&raw), true).unwrap().unwrap();
    let SyncCheckpoint::Global(global) = checkpoint else {
        panic!("expected global checkpoint");
    };
    assert_eq!(global.shared_state, Some(json!({ "lsn": 1234 })));
    assert_eq!(global.stream_states.len(), 1);
    assert_eq!(global.stream_states[0].name(), "users");

    let checkpoint = classify(Some(&raw), false).unwrap().unwrap();
    assert_eq!(checkpoint, SyncCheckpoint::Legacy(json!({ "legacy": true })));
}

#[test]
fn test_classify_conflicting_types_is_malformed() {
    let raw = json!([
        stream_message("users", None, 1),
        { "type": "LEGACY", "data": {} }
    ]);
    let err = classify(Some(&raw), true).unwrap_err();
    assert!(matches!(err, Error::MalformedState { .. }));
}

#[test]
fn test_classify_multiple_global_is_malformed() {
    let global = json!({ "type": "GLOBAL", "global": { "stream_states": [] } });
    let raw = json!([global.clone(), global]);
    assert!(classify(Some(&raw), true).is_err());
}

#[test]
fn test_classify_stream_without_section_is_malformed() {
    let raw = json!([{ "type": "STREAM", "data": {} }]);
    let err = classify(Some(&raw), true).unwrap_err();
    assert!(err.to_string().contains("stream section"));
}

#[test]
fn test_classify_duplicate_streams_is_malformed() {
    let raw = json!([
        stream_message("users", Some("public"), 1),
        stream_message("users", Some("public"), 2)
    ]);
    let err = classify(Some(&raw), true).unwrap_err();
    assert!(err.to_string().contains("public.users"));
}

// ============================================================================
// Conversion Tests
// ============================================================================

#[test]
fn test_to_wire_legacy() {
    let id = Uuid::new_v4();
    let record = to_wire(id, &SyncCheckpoint::Legacy(json!({ "cursor": 1 })));

    assert_eq!(record.connection_id, id);
    assert_eq!(record.state_type, ConnectionStateType::Legacy);
    assert_eq!(record.state, Some(json!({ "cursor": 1 })));
    assert!(record.stream_state.is_none());
    assert!(record.global_state.is_none());
}

#[test]
fn test_to_wire_json_shape() {
    let id = Uuid::nil();
    let checkpoint = SyncCheckpoint::Stream(vec![StreamCheckpoint::new(
        StreamDescriptor::with_namespace("users", "public"),
        json!({ "cursor": 3 }),
    )]);

    let json = serde_json::to_value(to_wire(id, &checkpoint)).unwrap();
    assert_eq!(
        json,
        json!({
            "connectionId": "00000000-0000-0000-0000-000000000000",
            "stateType": "stream",
            "streamState": [{
                "streamDescriptor": { "name": "users", "namespace": "public" },
                "streamState": { "cursor": 3 }
            }]
        })
    );
}

#[test]
fn test_empty_converts_to_not_set() {
    let id = Uuid::new_v4();
    let record = to_wire(id, &SyncCheckpoint::Empty);
    assert_eq!(record, ConnectionState::not_set(id));
    assert_eq!(from_wire(&record).unwrap(), SyncCheckpoint::Empty);
}

#[test]
fn test_stream_round_trip_preserves_triples() {
    let streams = vec![
        StreamCheckpoint::new(StreamDescriptor::with_namespace("a", "x"), json!({ "c": 1 })),
        StreamCheckpoint::new(StreamDescriptor::new("b"), json!(null)),
        StreamCheckpoint::new(StreamDescriptor::new("c"), json!([1, 2])),
    ];
    let checkpoint = SyncCheckpoint::stream(streams.clone()).unwrap();

    let restored = from_wire(&to_wire(Uuid::new_v4(), &checkpoint)).unwrap();

    let triples = |items: &[StreamCheckpoint]| -> HashSet<String> {
        items
            .iter()
            .map(|c| format!("{}|{:?}|{}", c.name(), c.namespace(), c.state))
            .collect()
    };
    assert_eq!(triples(restored.stream_checkpoints()), triples(&streams));
}

#[test]
fn test_global_round_trip() {
    let checkpoint = SyncCheckpoint::Global(GlobalCheckpoint {
        shared_state: Some(json!({ "lsn": 9 })),
        stream_states: vec![StreamCheckpoint::new(
            StreamDescriptor::new("users"),
            json!({ "pk": 1 }),
        )],
    });

    let restored = from_wire(&to_wire(Uuid::new_v4(), &checkpoint)).unwrap();
    assert_eq!(restored, checkpoint);
}

#[test]
fn test_from_wire_rejects_duplicates() {
    let raw = json!({
        "connectionId": Uuid::new_v4(),
        "stateType": "stream",
        "streamState": [
            { "streamDescriptor": { "name": "users" }, "streamState": {} },
            { "streamDescriptor": { "name": "users" }, "streamState": {} }
        ]
    });
    let record: ConnectionState = serde_json::from_value(raw).unwrap();
    assert!(from_wire(&record).is_err());
}

#[test]
fn test_wire_record_with_unknown_type_fails() {
    let raw = json!({
        "connectionId": Uuid::new_v4(),
        "stateType": "per_stream"
    });
    assert!(serde_json::from_value::<ConnectionState>(raw).is_err());
}
