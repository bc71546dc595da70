//! Tests for the `.excalidraw` file envelope.

use serde_json::{Value, json};

use super::{arrow_record, base_record, text_record};
use crate::format::{EncodeOptions, ExcalidrawFile, FormatError, FormatGeneration};
use crate::schema::{Element, ElementBase, ElementType, GenericElement};

fn envelope(elements: Value) -> Value {
    json!({
        "type": "excalidraw",
        "version": 2,
        "source": "https://excalidraw.com",
        "elements": elements,
        "appState": {"gridSize": 20, "viewBackgroundColor": "#ffffff"},
        "files": {
            "file-abc": {
                "mimeType": "image/png",
                "id": "file-abc",
                "dataURL": "data:image/png;base64,AAAA"
            }
        }
    })
}

#[test]
fn test_read_full_envelope() {
    let raw = envelope(json!([
        base_record("rectangle", "box"),
        text_record("label", "hi"),
        arrow_record("a", "box", "box")
    ]));
    let file = ExcalidrawFile::from_value(&raw).unwrap();

    assert_eq!(file.kind.as_deref(), Some("excalidraw"));
    assert_eq!(file.version, Some(2));
    assert!(file.is_version_supported());
    assert!(!file.is_clipboard());
    assert_eq!(file.elements.len(), 3);
    assert_eq!(file.generation(), FormatGeneration::Current);
    assert_eq!(
        file.count_by_type(),
        vec![
            (ElementType::Rectangle, 1),
            (ElementType::Text, 1),
            (ElementType::Arrow, 1)
        ]
    );
}

#[test]
fn test_app_state_and_files_survive() {
    let raw = envelope(json!([base_record("rectangle", "box")]));
    let file = ExcalidrawFile::from_value(&raw).unwrap();
    let written = file.to_value(FormatGeneration::Current);

    assert_eq!(written["appState"], raw["appState"]);
    assert_eq!(written["files"], raw["files"]);
    assert_eq!(written["source"], raw["source"]);

    let keys: Vec<&str> = written
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(
        keys,
        vec!["type", "version", "source", "elements", "appState", "files"]
    );
}

#[test]
fn test_foreign_type_rejected() {
    let mut raw = envelope(json!([]));
    raw["type"] = json!("excalidrawlib");
    assert!(matches!(
        ExcalidrawFile::from_value(&raw),
        Err(FormatError::InvalidFormat { .. })
    ));

    raw["type"] = json!(7);
    assert!(matches!(
        ExcalidrawFile::from_value(&raw),
        Err(FormatError::InvalidFormat { .. })
    ));
}

#[test]
fn test_clipboard_type_accepted() {
    let mut raw = envelope(json!([]));
    raw["type"] = json!("excalidraw/clipboard");
    let file = ExcalidrawFile::from_value(&raw).unwrap();
    assert!(file.is_clipboard());
}

#[test]
fn test_missing_elements_rejected() {
    let raw = json!({"type": "excalidraw", "version": 2});
    assert!(matches!(
        ExcalidrawFile::from_value(&raw),
        Err(FormatError::InvalidFormat { .. })
    ));
}

#[test]
fn test_bare_array_accepted() {
    let raw = json!([base_record("ellipse", "e")]);
    let file = ExcalidrawFile::from_value(&raw).unwrap();
    assert_eq!(file.kind, None);
    assert_eq!(file.elements.len(), 1);

    let written = file.to_value(FormatGeneration::Current);
    assert_eq!(written["type"], json!("excalidraw"));
    assert_eq!(written["version"], json!(2));
    assert!(written.get("appState").is_none());
}

#[test]
fn test_newer_version_flagged() {
    let mut raw = envelope(json!([]));
    raw["version"] = json!(3);
    let file = ExcalidrawFile::from_value(&raw).unwrap();
    assert!(!file.is_version_supported());
}

#[test]
fn test_element_error_propagates() {
    let raw = envelope(json!([base_record("rectangle", "ok"), base_record("sticker", "bad")]));
    match ExcalidrawFile::from_value(&raw) {
        Err(FormatError::Decode(err)) => assert_eq!(err.index(), Some(1)),
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[test]
fn test_syntax_error_is_json_error() {
    let result: Result<ExcalidrawFile, _> = "{\"type\": ".parse();
    assert!(matches!(result, Err(FormatError::Json(_))));
}

#[test]
fn test_to_vec_compact_and_pretty() {
    let raw = envelope(json!([base_record("rectangle", "r")]));
    let file = ExcalidrawFile::from_value(&raw).unwrap();

    let compact = file
        .to_vec(&EncodeOptions::new().pretty(false).generation(FormatGeneration::V1))
        .unwrap();
    let text = String::from_utf8(compact).unwrap();
    assert!(!text.contains('\n'));
    assert!(!text.contains("\"updated\""));
    assert!(text.starts_with("{\"type\":\"excalidraw\""));

    let pretty = file.to_vec(&EncodeOptions::default()).unwrap();
    let reread = ExcalidrawFile::from_slice(&pretty).unwrap();
    assert_eq!(reread, file);
}

#[test]
fn test_unknown_envelope_keys_survive() {
    let mut raw = envelope(json!([]));
    raw["libraryItems"] = json!([]);
    let file = ExcalidrawFile::from_value(&raw).unwrap();
    assert!(file.extra.contains_key("libraryItems"));
    assert_eq!(file.to_value(FormatGeneration::Current)["libraryItems"], json!([]));
}

#[test]
fn test_coordinates_survive_text_round_trip() {
    // xorshift64, fixed seed
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 11) as f64 / (1u64 << 53) as f64
    };

    let elements: Vec<Element> = (0..20_000)
        .map(|i| {
            let x = next() * 2000.0 - 1000.0;
            let base = ElementBase::new(format!("r{i}"))
                .with_position(x, x / 3.0)
                .with_size(next() * 500.0, x.abs() / 7.0);
            Element::Rectangle(GenericElement::new(base))
        })
        .collect();
    let file = ExcalidrawFile::with_elements(elements);

    for options in [EncodeOptions::new().pretty(false), EncodeOptions::default()] {
        let bytes = file.to_vec(&options).unwrap();
        let reread = ExcalidrawFile::from_slice(&bytes).unwrap();

        for (before, after) in file.elements.iter().zip(&reread.elements) {
            let (b, a) = (before.base(), after.base());
            assert_eq!(a.x.to_bits(), b.x.to_bits(), "x of {}", b.id);
            assert_eq!(a.y.to_bits(), b.y.to_bits(), "y of {}", b.id);
            assert_eq!(a.width.to_bits(), b.width.to_bits(), "width of {}", b.id);
            assert_eq!(a.height.to_bits(), b.height.to_bits(), "height of {}", b.id);
        }
        assert_eq!(reread.elements, file.elements);
    }
}
