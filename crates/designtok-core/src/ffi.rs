//! JSON entrypoint for language bindings and tool adapters.
//!
//! ## Response Envelope
//!
//! - Success: `{"ok": true, "data": {...}}`
//! - Error: `{"ok": false, "error": {"code": "...", "message": "...", "details": ...}}`
//!
//! Missing optional keys use defaults; present keys with the wrong shape
//! are errors.

use serde::Serialize;
use serde_json::{Value, json};

use designtok_analysis::{AnalysisContext, AnalysisRequest, analyze};
use designtok_format::{AnalysisFormat, render};
use designtok_settings::AnalyzeSettings;
use designtok_tokens::{TokenTable, VariableTable};
use designtok_tree::RawNode;
use designtok_types::{
    ANALYSIS_SCHEMA_VERSION, ComponentAnalysis, DesignTokError, ErrorCode, ScreenshotMeta,
};

use crate::{TokenFormat, check_schema_version};

#[derive(Debug, Clone, Serialize)]
pub struct ResponseEnvelope {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<DesignTokError>,
}

impl ResponseEnvelope {
    pub fn success(data: Value) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(err: DesignTokError) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(err),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"ok":false,"error":{"code":"internal_error","message":"envelope serialization failed"}}"#
                .to_string()
        })
    }
}

/// Run a designtok operation with JSON arguments, returning JSON output.
///
/// Modes:
/// * `analyze`: `{"node", "tokens", "tokens_format"?, "variables"?,
///   "settings"?, "screenshots"?, "file_key"?, "extracted_at"?}` gives the
///   analysis record.
/// * `render`: `{"analysis", "format"?}` gives `{"format", "content"}`.
/// * `version`: tool and schema versions.
pub fn run_json(mode: &str, args_json: &str) -> String {
    match run_json_inner(mode, args_json) {
        Ok(data) => ResponseEnvelope::success(data).to_json(),
        Err(err) => ResponseEnvelope::error(err).to_json(),
    }
}

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub fn schema_version() -> u32 {
    ANALYSIS_SCHEMA_VERSION
}

fn run_json_inner(mode: &str, args_json: &str) -> Result<Value, DesignTokError> {
    let args: Value = designtok_types::json::from_str_bounded(args_json)?;
    if !args.is_object() {
        return Err(DesignTokError::invalid_settings("arguments must be a JSON object"));
    }
    match mode {
        "analyze" => Ok(serde_json::to_value(analyze_from_json(&args)?)?),
        "render" => render_from_json(&args),
        "version" => Ok(json!({
            "version": version(),
            "schema_version": schema_version(),
        })),
        _ => Err(DesignTokError::unknown_mode(mode)),
    }
}

// ============================================================================
// Strict parsing helpers
// ============================================================================

fn required<'a>(args: &'a Value, key: &str) -> Result<&'a Value, DesignTokError> {
    match args.get(key) {
        Some(Value::Null) | None => Err(DesignTokError::with_details(
            ErrorCode::InvalidSettings,
            format!("Missing required field '{key}'"),
            key,
        )),
        Some(value) => Ok(value),
    }
}

/// Deserialize `args[key]`, or the default when the key is missing or null.
fn optional<T>(args: &Value, key: &str) -> Result<Option<T>, DesignTokError>
where
    T: serde::de::DeserializeOwned,
{
    match args.get(key) {
        Some(Value::Null) | None => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|err| {
                DesignTokError::with_details(
                    ErrorCode::InvalidSettings,
                    format!("Invalid value for '{key}'"),
                    err.to_string(),
                )
            }),
    }
}

fn analyze_from_json(args: &Value) -> Result<ComponentAnalysis, DesignTokError> {
    let node = RawNode::from_json_value(required(args, "node")?.clone())?;
    let tokens_format: TokenFormat = optional(args, "tokens_format")?.unwrap_or_default();
    let tokens_value = required(args, "tokens")?;
    let tokens = match tokens_format {
        TokenFormat::Flat => TokenTable::from_file(serde_json::from_value(tokens_value.clone())?)?,
        TokenFormat::Dtcg => TokenTable::from_dtcg(tokens_value)?,
    };
    let variables = match args.get("variables") {
        Some(Value::Null) | None => VariableTable::new(),
        Some(value) => VariableTable::from_json_value(value.clone())?,
    };
    let settings: AnalyzeSettings = optional(args, "settings")?.unwrap_or_default();
    settings.validate()?;
    let screenshots: Vec<ScreenshotMeta> = optional(args, "screenshots")?.unwrap_or_default();

    let ctx = AnalysisContext {
        node: &node,
        tokens: &tokens,
        variables: &variables,
    };
    analyze(
        &ctx,
        AnalysisRequest {
            settings,
            file_key: optional(args, "file_key")?,
            screenshots,
            extracted_at: optional(args, "extracted_at")?,
        },
    )
}

fn render_from_json(args: &Value) -> Result<Value, DesignTokError> {
    let analysis: ComponentAnalysis = serde_json::from_value(required(args, "analysis")?.clone())?;
    check_schema_version(&analysis)?;
    let format: AnalysisFormat = optional(args, "format")?.unwrap_or(AnalysisFormat::Md);
    let settings: AnalyzeSettings = optional(args, "settings")?.unwrap_or_default();
    let content = render(&analysis, format, &settings.emit)?;
    Ok(json!({
        "format": format,
        "content": content,
    }))
}
