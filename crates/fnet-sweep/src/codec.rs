use std::fs;
use std::path::Path;

use fnet_core::errors::{ErrorInfo, FnetError};
use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};

fn codec_error(code: &str, err: impl ToString, path: Option<&Path>) -> FnetError {
    let info = ErrorInfo::new(code, err.to_string());
    FnetError::Serde(match path {
        Some(path) => info.with_context("path", path.display().to_string()),
        None => info,
    })
}

/// JSON bytes with every object's keys in sorted order.
///
/// Values pass through `serde_json::Value`, whose map is key-ordered as long as
/// the `preserve_order` feature stays off.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<Vec<u8>, FnetError> {
    let value = serde_json::to_value(value).map_err(|err| codec_error("json_encode", err, None))?;
    serde_json::to_vec(&value).map_err(|err| codec_error("json_encode", err, None))
}

/// Lowercase hex SHA-256 of [`canonical_json`].
pub fn content_digest<T: Serialize>(value: &T) -> Result<String, FnetError> {
    let digest = Sha256::digest(canonical_json(value)?);
    Ok(digest.iter().map(|byte| format!("{byte:02x}")).collect())
}

/// Writes [`canonical_json`] of `value` to `path`.
pub fn write_canonical_json<T: Serialize>(path: &Path, value: &T) -> Result<(), FnetError> {
    let bytes = canonical_json(value)?;
    fs::write(path, bytes).map_err(|err| codec_error("json_file_write", err, Some(path)))
}

/// Reads a YAML document from `path`.
pub fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, FnetError> {
    let bytes = fs::read(path).map_err(|err| codec_error("plan_read", err, Some(path)))?;
    serde_yaml::from_slice(&bytes).map_err(|err| codec_error("yaml_decode", err, Some(path)))
}

/// YAML text of `value`.
pub fn yaml_string<T: Serialize>(value: &T) -> Result<String, FnetError> {
    serde_yaml::to_string(value).map_err(|err| codec_error("yaml_encode", err, None))
}
