//! Value Codec
//!
//! Converts primitive field values to and from their textual wire form.
//! Absent attributes always decode to `None`; only text that is present but
//! unparsable is an error.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{DawError, Result};

/// Wire token for positive infinity
pub const POSITIVE_INFINITY: &str = "inf";

/// Wire token for negative infinity
pub const NEGATIVE_INFINITY: &str = "-inf";

/// Format a real number for the wire.
///
/// Finite values use the shortest text that parses back to the same `f64`.
pub fn format_real(value: f64) -> String {
    if value == f64::INFINITY {
        POSITIVE_INFINITY.to_string()
    } else if value == f64::NEG_INFINITY {
        NEGATIVE_INFINITY.to_string()
    } else {
        value.to_string()
    }
}

pub fn encode_real(value: Option<f64>) -> Option<String> {
    value.map(format_real)
}

/// Decode a real number attribute. Infinity tokens are checked first.
pub fn decode_real(field: &str, raw: Option<&str>) -> Result<Option<f64>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    match raw.trim() {
        "" => Ok(None),
        POSITIVE_INFINITY => Ok(Some(f64::INFINITY)),
        NEGATIVE_INFINITY => Ok(Some(f64::NEG_INFINITY)),
        text => text
            .parse::<f64>()
            .map(Some)
            .map_err(|e| DawError::malformed(field, raw, e)),
    }
}

pub fn encode_bool(value: Option<bool>) -> Option<String> {
    value.map(|v| if v { "true" } else { "false" }.to_string())
}

/// Decode a boolean attribute. Absent means unset, which is not `false`.
pub fn decode_bool(field: &str, raw: Option<&str>) -> Result<Option<bool>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    match raw.trim() {
        "" => Ok(None),
        "true" | "1" => Ok(Some(true)),
        "false" | "0" => Ok(Some(false)),
        _ => Err(DawError::malformed(field, raw, "expected 'true' or 'false'")),
    }
}

pub fn encode_int<T: Display>(value: Option<T>) -> Option<String> {
    value.map(|v| v.to_string())
}

pub fn decode_int<T>(field: &str, raw: Option<&str>) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    let Some(raw) = raw else {
        return Ok(None);
    };

    let text = raw.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<T>()
        .map(Some)
        .map_err(|e| DawError::malformed(field, raw, e))
}

/// A closed enumeration with a fixed token per variant.
pub trait WireEnum: Sized + Copy + 'static {
    /// Name used in error messages
    const TYPE_NAME: &'static str;

    /// Every variant, in declaration order
    const VARIANTS: &'static [Self];

    fn as_wire(self) -> &'static str;

    /// Exact, case-sensitive lookup
    fn from_wire(token: &str) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .copied()
            .find(|variant| variant.as_wire() == token)
    }
}

pub fn encode_enum<T: WireEnum>(value: Option<T>) -> Option<String> {
    value.map(|v| v.as_wire().to_string())
}

pub fn decode_enum<T: WireEnum>(field: &str, raw: Option<&str>) -> Result<Option<T>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    T::from_wire(raw).map(Some).ok_or_else(|| {
        DawError::malformed(field, raw, format!("not a known {} token", T::TYPE_NAME))
    })
}

/// Encode a comma separated enum list. An empty list has no attribute.
pub fn encode_enum_list<T: WireEnum>(values: &[T]) -> Option<String> {
    if values.is_empty() {
        return None;
    }
    Some(
        values
            .iter()
            .map(|v| v.as_wire())
            .collect::<Vec<_>>()
            .join(","),
    )
}

pub fn decode_enum_list<T: WireEnum>(field: &str, raw: Option<&str>) -> Result<Vec<T>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            T::from_wire(token).ok_or_else(|| {
                DawError::malformed(field, token, format!("not a known {} token", T::TYPE_NAME))
            })
        })
        .collect()
}

/// Encode a whitespace separated label list (enum parameter labels).
pub fn encode_labels(labels: &[String]) -> Option<String> {
    if labels.is_empty() {
        None
    } else {
        Some(labels.join(" "))
    }
}

pub fn decode_labels(raw: Option<&str>) -> Vec<String> {
    raw.map(|text| text.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

pub fn encode_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn decode_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DawError::malformed(field, raw, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentType, Unit};
    use approx::assert_relative_eq;
    use chrono::TimeZone;
    use test_case::test_case;

    // === Real Tests ===

    #[test]
    fn test_infinities_round_trip() {
        let pos = encode_real(Some(f64::INFINITY));
        let neg = encode_real(Some(f64::NEG_INFINITY));
        assert_eq!(pos.as_deref(), Some("inf"));
        assert_eq!(neg.as_deref(), Some("-inf"));

        assert_eq!(
            decode_real("value", pos.as_deref()).unwrap(),
            Some(f64::INFINITY)
        );
        assert_eq!(
            decode_real("value", neg.as_deref()).unwrap(),
            Some(f64::NEG_INFINITY)
        );
    }

    #[test]
    fn test_absent_real_is_none() {
        assert_eq!(encode_real(None), None);
        assert_eq!(decode_real("value", None).unwrap(), None);
        assert_eq!(decode_real("value", Some("")).unwrap(), None);
    }

    #[test_case(0.0 ; "zero")]
    #[test_case(-6.02 ; "negative decibels")]
    #[test_case(0.1 + 0.2 ; "inexact sum")]
    #[test_case(440.0 ; "whole hertz")]
    #[test_case(1e-9 ; "tiny")]
    fn test_finite_reals_are_exact(value: f64) {
        let text = format_real(value);
        let back = decode_real("value", Some(&text)).unwrap().unwrap();
        assert_eq!(back, value, "{} did not survive as '{}'", value, text);
    }

    #[test]
    fn test_real_with_whitespace() {
        let value = decode_real("value", Some(" 0.75 ")).unwrap().unwrap();
        assert_relative_eq!(value, 0.75);
    }

    #[test]
    fn test_malformed_real() {
        let err = decode_real("value", Some("loud")).unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_VALUE");
    }

    // === Bool Tests ===

    #[test_case(Some("true"), Some(true) ; "true literal")]
    #[test_case(Some("false"), Some(false) ; "false literal")]
    #[test_case(Some("1"), Some(true) ; "numeric true")]
    #[test_case(Some("0"), Some(false) ; "numeric false")]
    #[test_case(None, None ; "absent is unset")]
    fn test_decode_bool(raw: Option<&str>, expected: Option<bool>) {
        assert_eq!(decode_bool("solo", raw).unwrap(), expected);
    }

    #[test]
    fn test_bool_rejects_other_tokens() {
        assert!(decode_bool("solo", Some("yes")).is_err());
        assert!(decode_bool("solo", Some("TRUE")).is_err());
    }

    #[test]
    fn test_encode_bool() {
        assert_eq!(encode_bool(Some(true)).as_deref(), Some("true"));
        assert_eq!(encode_bool(Some(false)).as_deref(), Some("false"));
        assert_eq!(encode_bool(None), None);
    }

    // === Integer Tests ===

    #[test]
    fn test_decode_int() {
        assert_eq!(decode_int::<i32>("key", Some("60")).unwrap(), Some(60));
        assert_eq!(decode_int::<i32>("key", None).unwrap(), None);
        assert!(decode_int::<u32>("audioChannels", Some("-2")).is_err());
    }

    // === Enum Tests ===

    #[test]
    fn test_enum_exact_match() {
        assert_eq!(
            decode_enum::<Unit>("unit", Some("decibel")).unwrap(),
            Some(Unit::Decibel)
        );
        let err = decode_enum::<Unit>("unit", Some("Decibel")).unwrap_err();
        assert!(matches!(err, DawError::MalformedValue { .. }));
    }

    #[test]
    fn test_enum_list() {
        let types =
            decode_enum_list::<ContentType>("contentType", Some("audio,notes")).unwrap();
        assert_eq!(types, vec![ContentType::Audio, ContentType::Notes]);
        assert_eq!(encode_enum_list(&types).as_deref(), Some("audio,notes"));
        assert!(decode_enum_list::<ContentType>("contentType", None)
            .unwrap()
            .is_empty());
        assert!(decode_enum_list::<ContentType>("contentType", Some("audio,midi")).is_err());
    }

    #[test]
    fn test_labels() {
        let labels = decode_labels(Some("Sine Saw  Square"));
        assert_eq!(labels, vec!["Sine", "Saw", "Square"]);
        assert_eq!(encode_labels(&labels).as_deref(), Some("Sine Saw Square"));
        assert_eq!(encode_labels(&[]), None);
    }

    // === Timestamp Tests ===

    #[test]
    fn test_timestamp_round_trip() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 17, 45, 0).unwrap();
        let text = encode_timestamp(&ts);
        assert_eq!(text, "2024-03-09T17:45:00Z");
        assert_eq!(decode_timestamp("date", &text).unwrap(), ts);
    }

    #[test]
    fn test_timestamp_with_offset() {
        let ts = decode_timestamp("date", "2024-03-09T19:45:00+02:00").unwrap();
        assert_eq!(encode_timestamp(&ts), "2024-03-09T17:45:00Z");
        assert!(decode_timestamp("date", "yesterday").is_err());
    }
}
