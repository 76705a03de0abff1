//! Lenient deserializers for backend payloads.
//!
//! The backend is inconsistent about scalar encodings: ids arrive as numbers
//! or strings, amounts as `"10.00"`, `10`, `null`, or `""`.

use chrono::{DateTime, NaiveDateTime, Utc};
use orderain_core::parse_amount;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept a string or a number and yield its string form.
pub fn id_string<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(T::from(s)),
        Value::Number(n) => Ok(T::from(n.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

/// Like [`id_string`] but `null` or a missing field yields `None`.
pub fn opt_id_string<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(T::from(s))),
        Value::Number(n) => Ok(Some(T::from(n.to_string()))),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

fn value_to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => parse_amount(s).ok(),
        Value::Number(n) => parse_amount(&n.to_string()).ok(),
        _ => None,
    }
}

/// Amount that degrades to zero when null, blank, or malformed.
pub fn decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_decimal(&value).unwrap_or(Decimal::ZERO))
}

/// Amount that is `None` when null, blank, or malformed.
pub fn opt_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_decimal(&value))
}

/// Timestamp as RFC 3339 or `YYYY-MM-DD HH:MM:SS` (UTC); `None` otherwise.
pub fn opt_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::String(raw) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    let parsed = DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        });
    Ok(parsed)
}

/// Treat an explicit `null` like a missing field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "id_string")]
        id: String,
        #[serde(default, deserialize_with = "decimal_or_zero")]
        amount: Decimal,
        #[serde(default, deserialize_with = "opt_decimal")]
        discount: Option<Decimal>,
        #[serde(default, deserialize_with = "null_as_default")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "opt_datetime")]
        at: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_numeric_id_becomes_string() {
        let s: Sample = serde_json::from_str(r#"{"id": 17}"#).unwrap();
        assert_eq!(s.id, "17");
    }

    #[test]
    fn test_amount_encodings() {
        let s: Sample = serde_json::from_str(r#"{"id": "a", "amount": "10.50"}"#).unwrap();
        assert_eq!(s.amount, Decimal::new(1050, 2));

        let s: Sample = serde_json::from_str(r#"{"id": "a", "amount": 7}"#).unwrap();
        assert_eq!(s.amount, Decimal::new(7, 0));

        let s: Sample = serde_json::from_str(r#"{"id": "a", "amount": null}"#).unwrap();
        assert_eq!(s.amount, Decimal::ZERO);

        let s: Sample = serde_json::from_str(r#"{"id": "a", "amount": ""}"#).unwrap();
        assert_eq!(s.amount, Decimal::ZERO);
    }

    #[test]
    fn test_optional_amount_and_null_list() {
        let s: Sample =
            serde_json::from_str(r#"{"id": "a", "discount": null, "tags": null}"#).unwrap();
        assert!(s.discount.is_none());
        assert!(s.tags.is_empty());

        let s: Sample = serde_json::from_str(r#"{"id": "a", "discount": "15"}"#).unwrap();
        assert_eq!(s.discount, Some(Decimal::new(15, 0)));
    }

    #[test]
    fn test_timestamp_formats() {
        let s: Sample =
            serde_json::from_str(r#"{"id": "a", "at": "2024-03-01T10:00:00.000000Z"}"#).unwrap();
        assert_eq!(s.at.unwrap().to_rfc3339(), "2024-03-01T10:00:00+00:00");

        let s: Sample = serde_json::from_str(r#"{"id": "a", "at": "2024-03-01 10:00:00"}"#).unwrap();
        assert!(s.at.is_some());

        let s: Sample = serde_json::from_str(r#"{"id": "a", "at": "yesterday"}"#).unwrap();
        assert!(s.at.is_none());
    }
}
