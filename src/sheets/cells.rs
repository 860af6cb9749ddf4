//! Lenient decoding of spreadsheet cell values.
//!
//! Blank cells come back as `""` rather than `null`, and columns the sheet
//! formats as numbers arrive as JSON numbers even when the field is text
//! (and the other way round).

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Accepts a string or a number and yields its text form.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

/// Maps `null` and blank strings to `T::default()`.
pub(crate) fn blank_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(T::default()),
        Value::String(s) if s.trim().is_empty() => Ok(T::default()),
        other => T::deserialize(other).map_err(de::Error::custom),
    }
}

/// Maps `null` and blank strings to `None`; numbers become text.
pub(crate) fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(de::Error::custom(format!("expected text cell, got {other}"))),
    }
}

/// Maps `null` and blank strings to `None`; parses numeric strings.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected integer cell, got {s:?}"))),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("integer cell out of range: {n}"))),
        other => Err(de::Error::custom(format!("expected integer cell, got {other}"))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Default, PartialEq, Deserialize)]
    #[serde(rename_all = "lowercase")]
    enum Flag {
        #[default]
        Off,
        On,
    }

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "blank_as_default")]
        flag: Flag,
        #[serde(default, deserialize_with = "blank_as_none")]
        note: Option<String>,
        #[serde(default, deserialize_with = "lenient_i64")]
        order: Option<i64>,
    }

    #[test]
    fn test_blank_cells_become_none() {
        let row: Row = serde_json::from_value(json!({ "note": "", "order": "" })).unwrap();
        assert!(row.note.is_none());
        assert!(row.order.is_none());
    }

    #[test]
    fn test_missing_cells_become_none() {
        let row: Row = serde_json::from_value(json!({})).unwrap();
        assert!(row.note.is_none());
        assert!(row.order.is_none());
    }

    #[test]
    fn test_blank_enum_cell_takes_default() {
        let row: Row = serde_json::from_value(json!({ "flag": "" })).unwrap();
        assert_eq!(row.flag, Flag::Off);
        let row: Row = serde_json::from_value(json!({ "flag": null })).unwrap();
        assert_eq!(row.flag, Flag::Off);
        let row: Row = serde_json::from_value(json!({ "flag": "on" })).unwrap();
        assert_eq!(row.flag, Flag::On);
    }

    #[test]
    fn test_unknown_enum_cell_is_rejected() {
        let result: Result<Row, _> = serde_json::from_value(json!({ "flag": "maybe" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_numeric_strings_parse() {
        let row: Row = serde_json::from_value(json!({ "note": 12, "order": " 3 " })).unwrap();
        assert_eq!(row.note.as_deref(), Some("12"));
        assert_eq!(row.order, Some(3));
    }

    #[test]
    fn test_float_order_rounds() {
        let row: Row = serde_json::from_value(json!({ "order": 2.0 })).unwrap();
        assert_eq!(row.order, Some(2));
    }

    #[test]
    fn test_garbage_order_is_rejected() {
        let result: Result<Row, _> = serde_json::from_value(json!({ "order": "first" }));
        assert!(result.is_err());
    }
}
