//! Typed parameter values for action-method invocations
//!
//! A `ParamValue` is the closed set of value shapes a link can carry to an
//! action method. The serialized form always spells out the discriminant
//! (`{"type": "vector", "value": [4.0, 2.0]}`), and loading tolerates
//! string-encoded payloads for non-text types by converting them through
//! `parse_typed` keyed by the recovered type id.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Discriminant of a parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Number,
    Text,
    Vector,
    Enum,
}

impl ParamKind {
    pub fn name(&self) -> &'static str {
        match self {
            ParamKind::Number => "number",
            ParamKind::Text => "text",
            ParamKind::Vector => "vector",
            ParamKind::Enum => "enum",
        }
    }
}

/// A named value passed to an action method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawParam", into = "RawParam")]
pub enum ParamValue {
    Number(f64),
    Text(String),
    Vector([f32; 2]),
    EnumName(String),
}

/// Map of parameter name to value, in deterministic order for snapshots
pub type ParamMap = BTreeMap<String, ParamValue>;

impl ParamValue {
    pub fn vector(v: Vec2) -> Self {
        ParamValue::Vector([v.x, v.y])
    }

    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Number(_) => ParamKind::Number,
            ParamValue::Text(_) => ParamKind::Text,
            ParamValue::Vector(_) => ParamKind::Vector,
            ParamValue::EnumName(_) => ParamKind::Enum,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }

    /// Integral numbers only; a fractional payload is a type mismatch
    pub fn as_int(&self) -> Option<i64> {
        let n = self.as_number()?;
        if (n - n.round()).abs() < 1e-9 {
            Some(n.round() as i64)
        } else {
            None
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_vec2(&self) -> Option<Vec2> {
        match self {
            ParamValue::Vector([x, y]) => Some(Vec2::new(*x, *y)),
            _ => None,
        }
    }

    pub fn as_enum_name(&self) -> Option<&str> {
        match self {
            ParamValue::EnumName(s) => Some(s),
            _ => None,
        }
    }

    /// Convert a string-encoded payload back to a native value
    ///
    /// Vectors accept `"4,2"` and `"[4, 2]"`.
    pub fn parse_typed(kind: ParamKind, text: &str) -> Option<Self> {
        let text = text.trim();
        match kind {
            ParamKind::Number => text.parse::<f64>().ok().map(ParamValue::Number),
            ParamKind::Text => Some(ParamValue::Text(text.to_owned())),
            ParamKind::Enum => {
                if text.is_empty() {
                    None
                } else {
                    Some(ParamValue::EnumName(text.to_owned()))
                }
            }
            ParamKind::Vector => {
                let inner = text
                    .strip_prefix('[')
                    .and_then(|t| t.strip_suffix(']'))
                    .unwrap_or(text);
                let mut parts = inner.split(',');
                let x = parts.next()?.trim().parse::<f32>().ok()?;
                let y = parts.next()?.trim().parse::<f32>().ok()?;
                if parts.next().is_some() {
                    return None;
                }
                Some(ParamValue::Vector([x, y]))
            }
        }
    }
}

/// Wire form: explicit discriminant plus payload
#[derive(Serialize, Deserialize)]
struct RawParam {
    #[serde(rename = "type")]
    kind: ParamKind,
    value: serde_json::Value,
}

impl From<ParamValue> for RawParam {
    fn from(value: ParamValue) -> Self {
        let (kind, payload) = match value {
            ParamValue::Number(n) => (ParamKind::Number, serde_json::json!(n)),
            ParamValue::Text(s) => (ParamKind::Text, serde_json::json!(s)),
            ParamValue::Vector([x, y]) => (ParamKind::Vector, serde_json::json!([x, y])),
            ParamValue::EnumName(s) => (ParamKind::Enum, serde_json::json!(s)),
        };
        RawParam {
            kind,
            value: payload,
        }
    }
}

impl TryFrom<RawParam> for ParamValue {
    type Error = String;

    fn try_from(raw: RawParam) -> Result<Self, Self::Error> {
        // String payloads for non-text kinds round-trip through the
        // generic string conversion keyed by the declared kind.
        if let serde_json::Value::String(text) = &raw.value {
            return ParamValue::parse_typed(raw.kind, text)
                .ok_or_else(|| format!("cannot parse {:?} as {}", text, raw.kind.name()));
        }
        match (raw.kind, &raw.value) {
            (ParamKind::Number, serde_json::Value::Number(n)) => n
                .as_f64()
                .map(ParamValue::Number)
                .ok_or_else(|| "number payload out of range".to_owned()),
            (ParamKind::Vector, serde_json::Value::Array(items)) if items.len() == 2 => {
                let x = items[0].as_f64().ok_or("vector x must be a number")?;
                let y = items[1].as_f64().ok_or("vector y must be a number")?;
                Ok(ParamValue::Vector([x as f32, y as f32]))
            }
            (kind, payload) => Err(format!(
                "payload {payload} does not match declared type {}",
                kind.name()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_preserves_type_and_value() {
        let values = vec![
            ParamValue::Number(3.5),
            ParamValue::Text("spike_wall".to_owned()),
            ParamValue::Vector([4.0, -2.5]),
            ParamValue::EnumName("Wrap".to_owned()),
        ];
        for value in values {
            let json = serde_json::to_string(&value).unwrap();
            let back: ParamValue = serde_json::from_str(&json).unwrap();
            assert_eq!(back, value, "round-trip of {json}");
        }
    }

    #[test]
    fn test_serialized_form_carries_discriminant() {
        let json = serde_json::to_value(ParamValue::Vector([1.0, 2.0])).unwrap();
        assert_eq!(json["type"], "vector");
        assert_eq!(json["value"], serde_json::json!([1.0, 2.0]));
    }

    #[test]
    fn test_string_encoded_payloads_convert() {
        let number: ParamValue =
            serde_json::from_str(r#"{"type": "number", "value": "3.5"}"#).unwrap();
        assert_eq!(number, ParamValue::Number(3.5));

        let vector: ParamValue =
            serde_json::from_str(r#"{"type": "vector", "value": "4, 2"}"#).unwrap();
        assert_eq!(vector, ParamValue::Vector([4.0, 2.0]));

        let bracketed: ParamValue =
            serde_json::from_str(r#"{"type": "vector", "value": "[4, 2]"}"#).unwrap();
        assert_eq!(bracketed, ParamValue::Vector([4.0, 2.0]));
    }

    #[test]
    fn test_mismatched_payload_rejected() {
        assert!(serde_json::from_str::<ParamValue>(r#"{"type": "number", "value": [1, 2]}"#)
            .is_err());
        assert!(serde_json::from_str::<ParamValue>(r#"{"type": "vector", "value": "one,two"}"#)
            .is_err());
        assert!(
            serde_json::from_str::<ParamValue>(r#"{"type": "vector", "value": [1, 2, 3]}"#)
                .is_err()
        );
    }

    #[test]
    fn test_as_int_requires_integral() {
        assert_eq!(ParamValue::Number(5.0).as_int(), Some(5));
        assert_eq!(ParamValue::Number(-3.0).as_int(), Some(-3));
        assert_eq!(ParamValue::Number(2.5).as_int(), None);
        assert_eq!(ParamValue::Text("5".to_owned()).as_int(), None);
    }
}
