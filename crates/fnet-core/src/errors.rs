//! Structured error types shared across FNET crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`FnetError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (source path, line number, directory, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for report parsing, statistics and sweep aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum FnetError {
    /// Malformed report text.
    #[error("parse error: {0}")]
    Parse(ErrorInfo),
    /// Missing or malformed run configuration.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Unknown statistic name, peak policy or invalid request shape.
    #[error("dispatch error: {0}")]
    Dispatch(ErrorInfo),
    /// Mismatched series lengths handed to the peak extractor.
    #[error("shape error: {0}")]
    Shape(ErrorInfo),
    /// Parsed data that cannot support the requested statistic.
    #[error("statistic error: {0}")]
    Statistic(ErrorInfo),
    /// Failure while invoking the external report binary.
    #[error("report error: {0}")]
    Report(ErrorInfo),
    /// Filesystem and serialization errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl FnetError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            FnetError::Parse(info)
            | FnetError::Config(info)
            | FnetError::Dispatch(info)
            | FnetError::Shape(info)
            | FnetError::Statistic(info)
            | FnetError::Report(info)
            | FnetError::Serde(info) => info,
        }
    }

    fn info_mut(&mut self) -> &mut ErrorInfo {
        match self {
            FnetError::Parse(info)
            | FnetError::Config(info)
            | FnetError::Dispatch(info)
            | FnetError::Shape(info)
            | FnetError::Statistic(info)
            | FnetError::Report(info)
            | FnetError::Serde(info) => info,
        }
    }

    /// Adds a context entry to the payload, keeping the error family.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.info_mut().context.insert(key.into(), value.into());
        self
    }

    /// True for errors caused by one run directory's data rather than by the caller.
    ///
    /// Dispatch and shape errors are programming errors and abort regardless of
    /// how many directories are involved.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            FnetError::Parse(_)
                | FnetError::Config(_)
                | FnetError::Statistic(_)
                | FnetError::Report(_)
        )
    }
}
