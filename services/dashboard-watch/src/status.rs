//! Wire types for the backend status endpoint

use serde::{Deserialize, Serialize};

/// `estado` value of a healthy status response
pub const STATUS_OK: &str = "ok";

/// Placeholder the backend sends when no temperature reading is available
pub const TEMPERATURE_PLACEHOLDER: &str = "--";

/// One poll cycle's status payload from `/estado_dashboard`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub estado: Option<String>,
    #[serde(default)]
    pub temperatura: Option<TemperatureValue>,
    #[serde(default)]
    pub alerta: Option<AlertInfo>,
    #[serde(default)]
    pub mensaje: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl StatusResponse {
    pub fn is_ok(&self) -> bool {
        self.estado.as_deref() == Some(STATUS_OK)
    }

    /// Best available explanation for a non-ok response
    pub fn failure_message(&self) -> String {
        self.mensaje
            .clone()
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| "unknown error".to_string())
    }

    /// The temperature reading, or `None` when absent or a placeholder
    pub fn temperature(&self) -> Option<String> {
        self.temperatura.as_ref().and_then(TemperatureValue::reading)
    }
}

/// Temperature as sent by the backend: a number or a string. Anything
/// else reads as no reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemperatureValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl TemperatureValue {
    pub fn reading(&self) -> Option<String> {
        match self {
            TemperatureValue::Number(value) if value.is_finite() => Some(value.to_string()),
            TemperatureValue::Number(_) => None,
            TemperatureValue::Text(text) => {
                let text = text.trim();
                if text.is_empty() || text == TEMPERATURE_PLACEHOLDER {
                    None
                } else {
                    Some(text.to_string())
                }
            }
            TemperatureValue::Other(_) => None,
        }
    }
}

/// Current alert state reported by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertInfo {
    #[serde(default)]
    pub hay_alerta: bool,
    #[serde(default)]
    pub mensaje: String,
    #[serde(default)]
    pub tipo: Option<String>,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub error: Option<AlertError>,
    #[serde(default)]
    pub fecha: Option<String>,
}

/// `error` field of an alert payload
///
/// The backend sends `"error": true` alongside a descriptive `mensaje`, but a
/// plain string is accepted as well. Any other value counts by truthiness:
/// zero, `NaN` and `null` are not errors, arrays and objects are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlertError {
    Flag(bool),
    Message(String),
    Other(serde_json::Value),
}

impl AlertError {
    pub fn is_set(&self) -> bool {
        match self {
            AlertError::Flag(flag) => *flag,
            AlertError::Message(message) => !message.is_empty(),
            AlertError::Other(serde_json::Value::Null) => false,
            AlertError::Other(serde_json::Value::Number(number)) => {
                number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan())
            }
            AlertError::Other(_) => true,
        }
    }
}

impl AlertInfo {
    /// The error text to display, if this payload reports an error
    pub fn error_text(&self) -> Option<String> {
        let error = self.error.as_ref().filter(|error| error.is_set())?;
        match error {
            AlertError::Message(message) => Some(message.clone()),
            _ if self.mensaje.is_empty() => Some("unknown error".to_string()),
            _ => Some(self.mensaje.clone()),
        }
    }
}
