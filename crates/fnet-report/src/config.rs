use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use fnet_core::{ErrorInfo, FnetError};
use serde::{Deserialize, Serialize};

/// Name of the simulation configuration file inside a run directory.
pub const CONFIG_FILE: &str = "config.cym";

fn config_error(code: &str, message: impl Into<String>, origin: &str) -> FnetError {
    FnetError::Config(ErrorInfo::new(code, message).with_context("dir", origin))
}

/// Independent variables of one run in a parameter sweep, in file order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ParameterSet {
    /// Parameter values as listed at the top of the config file.
    pub values: Vec<f64>,
}

impl ParameterSet {
    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no parameters were requested.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of the `index`-th parameter.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }
}

/// Reads the first `numparams` sweep parameters from `dir/config_file`.
pub fn read_params(
    dir: &Path,
    config_file: &str,
    numparams: usize,
) -> Result<ParameterSet, FnetError> {
    let origin = dir.display().to_string();
    let path = dir.join(config_file);
    let text = fs::read_to_string(&path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => config_error(
            "missing_config",
            format!("config file {} not found", path.display()),
            &origin,
        ),
        _ => config_error(
            "config_read",
            format!("could not read {}: {err}", path.display()),
            &origin,
        ),
    })?;
    parse_params(&text, numparams, &origin)
}

/// Collects `numparams` values from the leading `%`-prefixed lines of a config.
///
/// Lines look like `%1000%5000` or `%1000`; their `%`-separated tokens are
/// concatenated in file order. Blank lines are skipped. Any other line reached
/// before the quota is met makes the config malformed.
pub fn parse_params(text: &str, numparams: usize, origin: &str) -> Result<ParameterSet, FnetError> {
    let mut values = Vec::with_capacity(numparams);
    for (idx, raw) in text.lines().enumerate() {
        if values.len() == numparams {
            break;
        }
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let Some(body) = line.strip_prefix('%') else {
            return Err(config_error(
                "malformed_config",
                format!(
                    "line {} ends the parameter header after {} of {numparams} values: '{line}'",
                    idx + 1,
                    values.len()
                ),
                origin,
            ));
        };
        for token in body.split('%').map(str::trim).filter(|t| !t.is_empty()) {
            if values.len() == numparams {
                break;
            }
            let value = token.parse::<f64>().map_err(|_| {
                config_error(
                    "bad_param_token",
                    format!("could not parse parameter '{token}' on line {}", idx + 1),
                    origin,
                )
            })?;
            values.push(value);
        }
    }
    if values.len() < numparams {
        return Err(config_error(
            "too_few_params",
            format!("found {} of {numparams} parameters", values.len()),
            origin,
        ));
    }
    Ok(ParameterSet { values })
}
