use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const UNKNOWN_VERSION: &str = "Unknown Version";
pub const UNTITLED_RESULT: &str = "Untitled Result";
pub const NO_DESCRIPTION: &str = "No description available";

/// A probe document with every placeholder already applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeDocument {
    pub probe_version: String,
    pub results: Vec<ProbeResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub title: String,
    pub description: String,
}

/// Wire shape. Unknown keys are ignored and every field may carry any JSON
/// type, so a wrongly typed field never fails the whole document.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    #[serde(default)]
    probe_version: Option<Value>,
    #[serde(default)]
    results: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawResult {
    #[serde(default)]
    title: Option<Value>,
    #[serde(default)]
    description: Option<Value>,
    #[serde(default)]
    details: Option<Value>,
}

impl ProbeDocument {
    /// Decode a JSON body. The top level must be an object; everything below
    /// it degrades to placeholders instead of failing.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_slice(body)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        // Derived struct impls also accept sequences; only objects are documents.
        if !value.is_object() {
            return Err(serde::de::Error::custom(format!(
                "expected a JSON object, found {}",
                kind(&value)
            )));
        }
        let raw: RawDocument = serde_json::from_value(value)?;

        let probe_version =
            text(raw.probe_version.as_ref()).unwrap_or_else(|| UNKNOWN_VERSION.into());

        let results = match raw.results {
            Some(Value::Array(entries)) => {
                entries.into_iter().map(ProbeResult::from_entry).collect()
            }
            _ => Vec::new(),
        };

        Ok(Self {
            probe_version,
            results,
        })
    }
}

impl ProbeResult {
    fn from_entry(entry: Value) -> Self {
        // Non-object entries still occupy a card.
        let raw: RawResult = match entry {
            Value::Object(_) => serde_json::from_value(entry).unwrap_or_default(),
            _ => RawResult::default(),
        };

        let title = text(raw.title.as_ref()).unwrap_or_else(|| UNTITLED_RESULT.into());
        let description = text(raw.description.as_ref())
            .or_else(|| text(raw.details.as_ref()))
            .unwrap_or_else(|| NO_DESCRIPTION.into());

        Self { title, description }
    }
}

/// Display text for a field, or `None` when it should fall back.
/// Empty strings, `false`, `null`, zero and containers count as absent.
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(number_text(n)),
        Value::Bool(true) => Some("true".into()),
        _ => None,
    }
}

/// Integral values print without a fraction, so `1e2` shows as `100`.
fn number_text(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    n.as_f64().map(|f| f.to_string()).unwrap_or_else(|| n.to_string())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// The literal shown when no `data` parameter is given.
pub fn sample_value() -> Value {
    serde_json::json!({
        "probeVersion": "v1.0.0",
        "results": [
            {
                "title": "Sample Independence Test",
                "description": "Example statistical independence analysis",
                "status": "completed",
                "details": "No actual data loaded - this is sample content"
            }
        ]
    })
}

pub fn sample_document() -> ProbeDocument {
    ProbeDocument {
        probe_version: "v1.0.0".into(),
        results: vec![ProbeResult {
            title: "Sample Independence Test".into(),
            description: "Example statistical independence analysis".into(),
        }],
    }
}
