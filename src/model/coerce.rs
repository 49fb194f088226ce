//! Value coercion from loosely typed JSON.
//!
//! Every coercion treats `null` and `""` as "not set" and returns `None`.
//! The live service sends most codes as strings and areas as numbers, but
//! callers building entities by hand may pass either.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Number, Value};

use super::ModelError;
use super::codes;

/// Raw text of a scalar value, `None` when empty.
fn scalar(field: &str, value: &Value) -> Result<Option<String>, ModelError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Array(_) | Value::Object(_) => {
            Err(ModelError::invalid(field, "expected a scalar value"))
        }
    }
}

pub(crate) fn text(field: &str, value: &Value) -> Result<Option<String>, ModelError> {
    scalar(field, value)
}

pub(crate) fn upper(field: &str, value: &Value) -> Result<Option<String>, ModelError> {
    Ok(scalar(field, value)?.map(|s| s.to_uppercase()))
}

/// Principal-city indicator: at most one character, upper-cased.
pub(crate) fn principal_city(field: &str, value: &Value) -> Result<Option<String>, ModelError> {
    match scalar(field, value)? {
        Some(s) if s.chars().count() > 1 => Err(ModelError::invalid(
            field,
            format!("expected a single character, got {s:?}"),
        )),
        other => Ok(other.map(|s| s.to_uppercase())),
    }
}

/// Legislative session year: exactly four ASCII digits.
pub(crate) fn session_year(field: &str, value: &Value) -> Result<Option<String>, ModelError> {
    match scalar(field, value)? {
        Some(s) if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) => Err(
            ModelError::invalid(field, format!("expected a four-digit year, got {s:?}")),
        ),
        other => Ok(other),
    }
}

/// Functional status: must be a known FUNCSTAT code.
pub(crate) fn funcstat(field: &str, value: &Value) -> Result<Option<String>, ModelError> {
    match upper(field, value)? {
        Some(code) if codes::funcstat_description(&code).is_none() => Err(ModelError::invalid(
            field,
            format!("{code:?} is not a recognized FUNCSTAT code"),
        )),
        other => Ok(other),
    }
}

/// LSAD code: upper-cased when it is a known code, kept verbatim otherwise.
pub(crate) fn lsad(field: &str, value: &Value) -> Result<Option<String>, ModelError> {
    Ok(scalar(field, value)?.map(|code| {
        let normalized = code.to_uppercase();
        if codes::lsad_label(&normalized).is_some() {
            normalized
        } else {
            code
        }
    }))
}

/// Tiger/Line side of street: `L` or `R`.
pub(crate) fn street_side(field: &str, value: &Value) -> Result<Option<String>, ModelError> {
    match upper(field, value)? {
        Some(side) if side != "L" && side != "R" => Err(ModelError::invalid(
            field,
            format!("expected L or R, got {side:?}"),
        )),
        other => Ok(other),
    }
}

pub(crate) fn decimal(field: &str, value: &Value) -> Result<Option<Decimal>, ModelError> {
    match scalar(field, value)? {
        Some(raw) => parse_decimal(field, raw.trim()).map(Some),
        None => Ok(None),
    }
}

/// Coordinate as written in geography payloads (`"+38.8366493"`,
/// `"-076.9193615"`): one leading `+` and then one leading `0` are dropped
/// before parsing.
pub(crate) fn coordinate(field: &str, value: &Value) -> Result<Option<Decimal>, ModelError> {
    let Some(raw) = scalar(field, value)? else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let trimmed = trimmed.strip_prefix('0').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.starts_with('.') {
        return parse_decimal(field, &format!("0{trimmed}")).map(Some);
    }
    parse_decimal(field, trimmed).map(Some)
}

fn parse_decimal(field: &str, raw: &str) -> Result<Decimal, ModelError> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|e| ModelError::invalid(field, format!("{raw:?} is not a number ({e})")))
}

pub(crate) fn integer(field: &str, value: &Value) -> Result<Option<i64>, ModelError> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .map(Some)
            .ok_or_else(|| ModelError::invalid(field, format!("{n} is not an integer"))),
        _ => match scalar(field, value)? {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| ModelError::invalid(field, format!("{raw:?} is not an integer"))),
            None => Ok(None),
        },
    }
}

/// Non-negative integer (areas, counts).
pub(crate) fn area(field: &str, value: &Value) -> Result<Option<u64>, ModelError> {
    let negative = || ModelError::invalid(field, "must be non-negative");
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                Ok(Some(v))
            } else if n.as_i64().is_some_and(|v| v < 0) || n.as_f64().is_some_and(|f| f < 0.0) {
                Err(negative())
            } else {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0)
                    .map(|f| Some(f as u64))
                    .ok_or_else(|| ModelError::invalid(field, format!("{n} is not an integer")))
            }
        }
        _ => match scalar(field, value)? {
            Some(raw) => {
                let raw = raw.trim();
                if raw.starts_with('-') {
                    return Err(negative());
                }
                raw.parse::<u64>()
                    .map(Some)
                    .map_err(|_| ModelError::invalid(field, format!("{raw:?} is not an integer")))
            }
            None => Ok(None),
        },
    }
}

pub(crate) fn flag(field: &str, value: &Value) -> Result<Option<bool>, ModelError> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(*b)),
        Value::Number(n) => Ok(Some(n.as_f64().is_some_and(|f| f != 0.0))),
        Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "" => Ok(None),
            "true" | "t" | "yes" | "1" => Ok(Some(true)),
            "false" | "f" | "no" | "0" => Ok(Some(false)),
            _ => Err(ModelError::invalid(field, format!("{s:?} is not a boolean"))),
        },
        _ => Err(ModelError::invalid(field, "expected a boolean")),
    }
}

/// Split a batch `"lon,lat"` column.
pub(crate) fn coordinate_pair(raw: &str) -> Option<(Value, Value)> {
    let (lon, lat) = raw.split_once(',')?;
    Some((
        Value::String(lon.trim().to_string()),
        Value::String(lat.trim().to_string()),
    ))
}

// ============================================================================
// Emitters
// ============================================================================

pub(crate) fn emit_text(value: &Option<String>) -> Value {
    value.clone().map(Value::String).unwrap_or(Value::Null)
}

pub(crate) fn emit_number<T: Copy + Into<Value>>(value: &Option<T>) -> Value {
    value.map(Into::into).unwrap_or(Value::Null)
}

/// JSON number when it reparses to the same value, string otherwise.
pub(crate) fn emit_decimal(value: &Option<Decimal>) -> Value {
    let Some(decimal) = *value else {
        return Value::Null;
    };
    decimal
        .to_f64()
        .and_then(Number::from_f64)
        .filter(|n| parse_decimal("", &n.to_string()).is_ok_and(|back| back == decimal))
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(decimal.to_string()))
}

/// Coordinate in geography wire form: explicit sign, eight decimals.
pub(crate) fn format_coordinate(value: Decimal) -> String {
    let sign = if value.is_sign_negative() { "" } else { "+" };
    format!("{sign}{value:.8}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_values_are_unset() {
        assert_eq!(text("NAME", &json!(null)).unwrap(), None);
        assert_eq!(text("NAME", &json!("")).unwrap(), None);
        assert_eq!(area("AREALAND", &json!("")).unwrap(), None);
        assert_eq!(coordinate("CENTLAT", &json!("")).unwrap(), None);
    }

    #[test]
    fn test_text_accepts_numbers() {
        assert_eq!(text("STATE", &json!(24)).unwrap(), Some("24".to_string()));
    }

    #[test]
    fn test_text_rejects_objects() {
        assert!(text("NAME", &json!({"a": 1})).is_err());
    }

    #[test]
    fn test_coordinate_strips_sign_and_leading_zero() {
        assert_eq!(
            coordinate("CENTLON", &json!("-076.9193615")).unwrap(),
            Some(Decimal::from_str("-076.9193615").unwrap())
        );
        assert_eq!(
            coordinate("CENTLAT", &json!("+38.8366493")).unwrap(),
            Some(Decimal::from_str("38.8366493").unwrap())
        );
        assert_eq!(
            coordinate("CENTLAT", &json!("+038.8366493")).unwrap(),
            Some(Decimal::from_str("38.8366493").unwrap())
        );
    }

    #[test]
    fn test_coordinate_below_one() {
        assert_eq!(
            coordinate("CENTLAT", &json!("+0.50000000")).unwrap(),
            Some(Decimal::from_str("0.5").unwrap())
        );
        assert_eq!(
            coordinate("CENTLAT", &json!("0.25")).unwrap(),
            Some(Decimal::from_str("0.25").unwrap())
        );
    }

    #[test]
    fn test_coordinate_rejects_garbage() {
        assert!(coordinate("CENTLAT", &json!("north")).is_err());
    }

    #[test]
    fn test_format_coordinate() {
        let lat = Decimal::from_str("38.8366493").unwrap();
        let lon = Decimal::from_str("-76.9193615").unwrap();
        assert_eq!(format_coordinate(lat), "+38.83664930");
        assert_eq!(format_coordinate(lon), "-76.91936150");
    }

    #[test]
    fn test_formatted_coordinate_reparses() {
        for raw in ["38.8366493", "-76.9193615", "0.5", "-0.125", "179.99999999"] {
            let value = Decimal::from_str(raw).unwrap();
            let emitted = format_coordinate(value);
            assert_eq!(coordinate("CENTLAT", &json!(emitted)).unwrap(), Some(value));
        }
    }

    #[test]
    fn test_area_rejects_negative() {
        assert!(area("AREALAND", &json!(-1)).is_err());
        assert!(area("AREALAND", &json!("-5")).is_err());
        assert_eq!(area("AREALAND", &json!(0)).unwrap(), Some(0));
        assert_eq!(area("AREALAND", &json!("1234")).unwrap(), Some(1234));
    }

    #[test]
    fn test_session_year() {
        assert_eq!(
            session_year("LSY", &json!("2018")).unwrap(),
            Some("2018".to_string())
        );
        assert!(session_year("LSY", &json!("18")).is_err());
        assert!(session_year("LSY", &json!("20a8")).is_err());
        assert_eq!(
            session_year("LSY", &json!(2020)).unwrap(),
            Some("2020".to_string())
        );
    }

    #[test]
    fn test_principal_city() {
        assert_eq!(
            principal_city("CBSAPCI", &json!("y")).unwrap(),
            Some("Y".to_string())
        );
        assert!(principal_city("CBSAPCI", &json!("YES")).is_err());
    }

    #[test]
    fn test_funcstat_is_strict() {
        assert_eq!(
            funcstat("FUNCSTAT", &json!("s")).unwrap(),
            Some("S".to_string())
        );
        assert!(funcstat("FUNCSTAT", &json!("Q")).is_err());
    }

    #[test]
    fn test_lsad_is_lenient() {
        assert_eq!(lsad("LSADC", &json!("z5")).unwrap(), Some("Z5".to_string()));
        assert_eq!(lsad("LSADC", &json!("qq")).unwrap(), Some("qq".to_string()));
    }

    #[test]
    fn test_street_side() {
        assert_eq!(
            street_side("side", &json!("l")).unwrap(),
            Some("L".to_string())
        );
        assert!(street_side("side", &json!("X")).is_err());
    }

    #[test]
    fn test_flag() {
        assert_eq!(flag("isDefault", &json!(true)).unwrap(), Some(true));
        assert_eq!(flag("isDefault", &json!("false")).unwrap(), Some(false));
        assert!(flag("isDefault", &json!("maybe")).is_err());
    }

    #[test]
    fn test_emit_decimal() {
        let value = Decimal::from_str("-76.92744").unwrap();
        assert_eq!(emit_decimal(&Some(value)), json!(-76.92744));
        assert_eq!(emit_decimal(&None), Value::Null);
    }

    #[test]
    fn test_emit_decimal_keeps_precision() {
        let value = Decimal::from_str("38.845985123456789012345").unwrap();
        let emitted = emit_decimal(&Some(value));
        assert_eq!(emitted, json!("38.845985123456789012345"));
        assert_eq!(decimal("y", &emitted).unwrap(), Some(value));
    }
}
