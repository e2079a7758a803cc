use super::*;
use serde_json::{from_str, to_string};

#[test]
fn test_entry_type_serialization() {
    assert_eq!(to_string(&EntryType::File).unwrap(), r#""file""#);
    assert_eq!(to_string(&EntryType::Dir).unwrap(), r#""dir""#);
    assert_eq!(to_string(&EntryType::Symlink).unwrap(), r#""symlink""#);
    assert_eq!(to_string(&EntryType::Submodule).unwrap(), r#""submodule""#);
}

#[test]
fn test_tree_entry_deserialization() {
    let json_str = r#"{
        "name": "dashboard",
        "path": "app/dashboard",
        "type": "dir",
        "sha": "xyz789",
        "size": 0,
        "download_url": null
    }"#;

    let entry: TreeEntry = from_str(json_str).expect("Failed to deserialize TreeEntry");

    assert_eq!(entry.name, "dashboard");
    assert_eq!(entry.path, "app/dashboard");
    assert_eq!(entry.entry_type, EntryType::Dir);
    assert_eq!(entry.sha, "xyz789");
    assert!(entry.is_dir());
    assert!(!entry.is_file());
}

#[test]
fn test_tree_entry_minimal_fields() {
    let json_str = r#"{ "name": "page.tsx", "path": "app/page.tsx", "type": "file" }"#;

    let entry: TreeEntry = from_str(json_str).expect("Failed to deserialize minimal TreeEntry");

    assert!(entry.is_file());
    assert_eq!(entry.sha, "");
    assert_eq!(entry.size, 0);
    assert_eq!(entry.download_url, None);
}

#[test]
fn test_tree_entry_serializes_type_field() {
    let entry = TreeEntry {
        name: "route.ts".to_string(),
        path: "app/api/stats/route.ts".to_string(),
        entry_type: EntryType::File,
        sha: "abc".to_string(),
        size: 42,
        download_url: None,
    };

    let parsed: serde_json::Value =
        serde_json::from_str(&to_string(&entry).unwrap()).expect("Failed to parse JSON");

    assert_eq!(parsed["type"], "file");
    assert_eq!(parsed["path"], "app/api/stats/route.ts");
}

#[test]
fn test_decode_text_with_wrapped_base64() {
    // "export async function GET(){}" split across lines the way GitHub wraps it
    let payload = FileContentPayload {
        content: Some("ZXhwb3J0IGFzeW5jIGZ1bmN0\naW9uIEdFVCgpe30=\n".to_string()),
        encoding: Some("base64".to_string()),
        ..Default::default()
    };

    assert_eq!(
        payload.decode_text().unwrap(),
        "export async function GET(){}"
    );
}

#[test]
fn test_decode_text_without_content_is_empty() {
    let payload = FileContentPayload::default();
    assert_eq!(payload.decode_text().unwrap(), "");
}

#[test]
fn test_decode_text_invalid_base64() {
    let payload = FileContentPayload {
        content: Some("!!!not base64!!!".to_string()),
        encoding: Some("base64".to_string()),
        ..Default::default()
    };

    assert!(matches!(payload.decode_text(), Err(Error::InvalidResponse)));
}

#[test]
fn test_decode_text_unknown_encoding_passes_through() {
    let payload = FileContentPayload {
        content: Some("plain body".to_string()),
        encoding: Some("utf-8".to_string()),
        ..Default::default()
    };

    assert_eq!(payload.decode_text().unwrap(), "plain body");
}
