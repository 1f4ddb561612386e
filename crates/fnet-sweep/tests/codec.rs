use std::collections::HashMap;
use std::fs;

use fnet_core::FnetError;
use fnet_sweep::codec::{canonical_json, content_digest, read_yaml, write_canonical_json};
use serde_json::json;

#[test]
fn nested_keys_come_out_sorted() {
    let mut inner = HashMap::new();
    inner.insert("zeta", 1);
    inner.insert("alpha", 2);
    let value = json!({ "runs": [{ "dir": "b", "index": 1 }], "inner": inner, "a": null });
    let bytes = canonical_json(&value).expect("encode");
    assert_eq!(
        String::from_utf8(bytes).expect("utf8"),
        r#"{"a":null,"inner":{"alpha":2,"zeta":1},"runs":[{"dir":"b","index":1}]}"#
    );
}

#[test]
fn digest_ignores_insertion_order() {
    let mut forward = HashMap::new();
    let mut backward = HashMap::new();
    for key in ["radius", "tension", "force"] {
        forward.insert(key, key.len());
    }
    for key in ["force", "tension", "radius"] {
        backward.insert(key, key.len());
    }
    let digest = content_digest(&forward).expect("digest");
    assert_eq!(digest, content_digest(&backward).expect("digest"));
    assert_eq!(digest.len(), 64);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn file_errors_name_the_path() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let missing = temp.path().join("absent.yaml");
    let err = read_yaml::<serde_json::Value>(&missing).expect_err("missing file");
    assert!(matches!(err, FnetError::Serde(ref info) if info.code == "plan_read"));
    assert_eq!(
        err.info().context.get("path").map(String::as_str),
        Some(missing.display().to_string().as_str())
    );

    let broken = temp.path().join("broken.yaml");
    fs::write(&broken, "statistics: [\n").expect("write");
    let err = read_yaml::<serde_json::Value>(&broken).expect_err("bad yaml");
    assert_eq!(err.info().code, "yaml_decode");

    let out = temp.path().join("value.json");
    write_canonical_json(&out, &json!({ "b": 1, "a": 2 })).expect("write json");
    assert_eq!(fs::read_to_string(&out).expect("read"), r#"{"a":2,"b":1}"#);
}
