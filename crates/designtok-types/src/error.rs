//! Structured error taxonomy shared by every pipeline stage.
//!
//! Fatal codes abort a run before anything is written. Non-fatal codes
//! never surface as errors; they become `UnresolvedBinding` and
//! `UnidentifiedValue` entries in the record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error codes for designtok operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Input is not a well-formed node tree (missing root, cycle, too deep).
    MalformedInput,
    /// Output could not be written.
    IoFailure,
    /// A bound variable could not be resolved to a token. Recorded, non-fatal.
    UnresolvableBinding,
    /// A value matched no token within tolerance. Recorded, non-fatal.
    ToleranceMiss,
    /// Invalid JSON input.
    InvalidJson,
    /// Invalid settings/arguments.
    InvalidSettings,
    /// Unknown operation mode in the JSON entrypoint.
    UnknownMode,
    /// Internal error (unexpected state).
    InternalError,
}

impl ErrorCode {
    pub fn is_fatal(self) -> bool {
        !matches!(
            self,
            ErrorCode::UnresolvableBinding | ErrorCode::ToleranceMiss
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::MalformedInput => write!(f, "malformed_input"),
            ErrorCode::IoFailure => write!(f, "io_failure"),
            ErrorCode::UnresolvableBinding => write!(f, "unresolvable_binding"),
            ErrorCode::ToleranceMiss => write!(f, "tolerance_miss"),
            ErrorCode::InvalidJson => write!(f, "invalid_json"),
            ErrorCode::InvalidSettings => write!(f, "invalid_settings"),
            ErrorCode::UnknownMode => write!(f, "unknown_mode"),
            ErrorCode::InternalError => write!(f, "internal_error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignTokError {
    /// Error code for programmatic handling.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl DesignTokError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        code: ErrorCode,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            details: Some(details.into()),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MalformedInput, message)
    }

    pub fn invalid_json(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InvalidJson, format!("Invalid JSON: {}", err))
    }

    pub fn invalid_settings(err: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::InvalidSettings,
            format!("Invalid settings: {}", err),
        )
    }

    pub fn unknown_mode(mode: &str) -> Self {
        Self::new(ErrorCode::UnknownMode, format!("Unknown mode: {}", mode))
    }

    pub fn io_failure(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::IoFailure, format!("I/O failure: {}", err))
    }

    pub fn internal(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InternalError, format!("Internal error: {}", err))
    }

    /// Convert to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                r#"{{"code":"{}","message":"{}"}}"#,
                self.code, self.message
            )
        })
    }
}

impl fmt::Display for DesignTokError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(details) = &self.details {
            write!(f, "[{}] {}: {}", self.code, self.message, details)
        } else {
            write!(f, "[{}] {}", self.code, self.message)
        }
    }
}

impl std::error::Error for DesignTokError {}

impl From<anyhow::Error> for DesignTokError {
    fn from(err: anyhow::Error) -> Self {
        // Keep the code when the chain already carries one.
        match err.downcast::<DesignTokError>() {
            Ok(inner) => inner,
            Err(other) if other.chain().any(|cause| cause.is::<std::io::Error>()) => {
                Self::io_failure(format!("{other:#}"))
            }
            Err(other) => Self::internal(format!("{other:#}")),
        }
    }
}

impl From<serde_json::Error> for DesignTokError {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_json(err)
    }
}

impl From<std::io::Error> for DesignTokError {
    fn from(err: std::io::Error) -> Self {
        Self::io_failure(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_serialize_to_snake_case() {
        let err = DesignTokError::malformed("no root node");
        let json = err.to_json();
        assert!(json.contains("\"code\":\"malformed_input\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn error_display_includes_code_and_details() {
        let err = DesignTokError::with_details(ErrorCode::IoFailure, "write failed", "/tmp/x");
        assert_eq!(err.to_string(), "[io_failure] write failed: /tmp/x");
    }

    #[test]
    fn recorded_codes_are_not_fatal() {
        assert!(ErrorCode::MalformedInput.is_fatal());
        assert!(ErrorCode::IoFailure.is_fatal());
        assert!(!ErrorCode::UnresolvableBinding.is_fatal());
        assert!(!ErrorCode::ToleranceMiss.is_fatal());
    }

    #[test]
    fn anyhow_round_trip_keeps_code() {
        let original = DesignTokError::malformed("duplicate node id 1:2");
        let wrapped = anyhow::Error::new(original.clone());
        let back: DesignTokError = wrapped.into();
        assert_eq!(back, original);
    }

    #[test]
    fn io_errors_map_to_io_failure() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: DesignTokError = io.into();
        assert_eq!(err.code, ErrorCode::IoFailure);
    }

    #[test]
    fn anyhow_chain_with_io_cause_maps_to_io_failure() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let wrapped = anyhow::Error::new(io).context("write out/button-analysis.json");
        let err: DesignTokError = wrapped.into();
        assert_eq!(err.code, ErrorCode::IoFailure);
        assert!(err.message.contains("button-analysis.json"), "{}", err.message);
    }
}
