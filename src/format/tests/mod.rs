//! Behaviour tests for the document codec.
//!
//! These tests exercise decoding, encoding and round trips through the public
//! codec functions, using records shaped like the ones Excalidraw writes.

mod file_tests;

use serde_json::{Value, json};

/// A complete current-generation base record for the given type tag.
pub(super) fn base_record(element_type: &str, id: &str) -> Value {
    json!({
        "id": id,
        "type": element_type,
        "x": 10.0,
        "y": 20.0,
        "width": 100.0,
        "height": 50.0,
        "angle": 0.0,
        "strokeColor": "#1e1e1e",
        "backgroundColor": "transparent",
        "fillStyle": "solid",
        "strokeWidth": 2.0,
        "strokeStyle": "solid",
        "roughness": 1.0,
        "opacity": 100.0,
        "groupIds": [],
        "frameId": null,
        "roundness": {"type": 3},
        "seed": 1968410350,
        "version": 12,
        "versionNonce": 1445211214,
        "isDeleted": false,
        "boundElements": null,
        "updated": 1700000000000_i64,
        "link": null,
        "locked": false
    })
}

/// `base_record` with the listed fields removed.
pub(super) fn without(mut record: Value, fields: &[&str]) -> Value {
    if let Some(map) = record.as_object_mut() {
        for field in fields {
            map.remove(*field);
        }
    }
    record
}

/// `base_record` with extra fields merged in.
pub(super) fn with(mut record: Value, fields: Value) -> Value {
    if let (Some(map), Value::Object(extra)) = (record.as_object_mut(), fields) {
        for (key, value) in extra {
            map.insert(key, value);
        }
    }
    record
}

/// A complete text record.
pub(super) fn text_record(id: &str, text: &str) -> Value {
    with(
        base_record("text", id),
        json!({
            "fontSize": 20,
            "fontFamily": 1,
            "text": text,
            "textAlign": "left",
            "verticalAlign": "top"
        }),
    )
}

/// A complete arrow record bound to `from` and `to`.
pub(super) fn arrow_record(id: &str, from: &str, to: &str) -> Value {
    with(
        base_record("arrow", id),
        json!({
            "points": [[0, 0], [100, 50]],
            "lastCommittedPoint": null,
            "startBinding": {"elementId": from, "focus": 0.1, "gap": 4},
            "endBinding": {"elementId": to, "focus": -0.2, "gap": 4},
            "startArrowhead": null,
            "endArrowhead": "arrow"
        }),
    )
}
