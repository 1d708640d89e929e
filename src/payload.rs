//! Wire types for `GET /get_latest_signals`.
//!
//! The server passes its records through with little discipline: prices can
//! be numbers, numeric strings or null, and some text fields are missing on
//! older records. Every entry field is therefore optional and lenient, while
//! the two top-level keys are required.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopCoinEntry {
    #[serde(deserialize_with = "lenient_text")]
    pub symbol: String,
    #[serde(deserialize_with = "lenient_text")]
    pub timeframe: String,
    #[serde(deserialize_with = "lenient_number")]
    pub current_price: Option<f64>,
    #[serde(deserialize_with = "lenient_text")]
    pub signal: String,
    #[serde(deserialize_with = "lenient_number")]
    pub entry: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub tp: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub sl: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActiveSignalEntry {
    #[serde(deserialize_with = "lenient_text")]
    pub symbol: String,
    #[serde(deserialize_with = "lenient_text")]
    pub timeframe: String,
    #[serde(deserialize_with = "lenient_text")]
    pub signal: String,
    #[serde(deserialize_with = "lenient_number")]
    pub entry: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub tp: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub sl: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub current_price: Option<f64>,
    #[serde(deserialize_with = "lenient_text")]
    pub status: String,
    #[serde(deserialize_with = "lenient_text")]
    pub time: String,
    #[serde(deserialize_with = "lenient_text")]
    pub duration: String,
}

impl ActiveSignalEntry {
    /// Signals on leveraged markets carry "FUTURES" in their label.
    pub fn is_futures(&self) -> bool {
        self.signal.contains("FUTURES")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalsPayload {
    pub top_coins: Vec<TopCoinEntry>,
    pub active_signals: Vec<ActiveSignalEntry>,
}

impl SignalsPayload {
    pub fn from_json(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_from_value(&value))
}

/// Numbers and numeric strings become finite floats; anything else is absent.
pub fn number_from_value(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|v| v.is_finite())
}

/// Falsy scalars (`false`, `0`) become empty so they render as "N/A".
pub fn text_from_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if n.as_f64() == Some(0.0) => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) | Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}
