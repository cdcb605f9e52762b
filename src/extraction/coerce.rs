//! Field coercion for loosely-typed model output.
//!
//! Every conversion from a JSON value to a receipt field lives here, so the
//! record builder only decides which default to apply. Each function returns
//! `Ok(None)` for an absent or `null` value and an error for a value that is
//! present but unusable.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use thiserror::Error;

use crate::models::Money;

/// A value that was present but could not be converted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct CoercionError {
    /// The field being coerced.
    pub field: &'static str,
    /// What was wrong with the value.
    pub message: String,
}

impl CoercionError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Result of coercing one optional field.
pub type Coerced<T> = Result<Option<T>, CoercionError>;

/// Short description of a JSON value's type for diagnostics.
fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Coerces a monetary amount.
///
/// Numbers are converted from the decimal text `serde_json` renders for them.
/// `serde_json` stores non-integer numbers as `f64`, so anything beyond about
/// 15 significant digits has already been rounded by the time it arrives here;
/// receipt amounts are far below that. Strings keep every digit and may carry
/// whitespace, a leading `$` and thousands separators. An empty string counts
/// as absent. Amounts larger in magnitude than [`Money::MAX_AMOUNT`] are
/// rejected.
pub fn money(field: &'static str, value: Option<&Value>) -> Coerced<Money> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => parse_decimal(&n.to_string())
            .ok_or_else(|| CoercionError::new(field, format!("{} is not a valid amount", n)))?,
        Some(Value::String(s)) => {
            let cleaned = clean_amount(s);
            if cleaned.is_empty() {
                return Ok(None);
            }
            parse_decimal(&cleaned)
                .ok_or_else(|| CoercionError::new(field, format!("'{}' is not a valid amount", s)))?
        }
        Some(other) => {
            return Err(CoercionError::new(
                field,
                format!("expected an amount, found {}", kind(other)),
            ));
        }
    };

    let amount = Money::new(parsed);
    if !amount.is_within_range() {
        return Err(CoercionError::new(
            field,
            format!("{} is out of range", parsed),
        ));
    }
    Ok(Some(amount))
}

/// Strips whitespace, a currency sign and thousands separators.
fn clean_amount(raw: &str) -> String {
    let trimmed = raw.trim();
    let (sign, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => ("-", rest.trim_start()),
        None => ("", trimmed),
    };
    let rest = rest.strip_prefix('$').unwrap_or(rest).trim_start();
    let digits: String = rest.chars().filter(|c| *c != ',').collect();
    if digits.is_empty() {
        String::new()
    } else {
        format!("{}{}", sign, digits)
    }
}

/// Coerces an item quantity.
///
/// Fractional numbers truncate toward zero; negative values are rejected.
pub fn quantity(value: Option<&Value>) -> Coerced<u32> {
    const FIELD: &str = "quantity";
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => {
            if let Some(whole) = n.as_u64() {
                return u32::try_from(whole)
                    .map(Some)
                    .map_err(|_| CoercionError::new(FIELD, format!("{} is out of range", n)));
            }
            match n.as_f64() {
                Some(f) if f.is_finite() && f >= 0.0 && f <= f64::from(u32::MAX) => {
                    Ok(Some(f.trunc() as u32))
                }
                Some(f) if f < 0.0 => Err(CoercionError::new(
                    FIELD,
                    format!("{} cannot be negative", n),
                )),
                _ => Err(CoercionError::new(FIELD, format!("{} is out of range", n))),
            }
        }
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<u32>()
                .map(Some)
                .map_err(|_| CoercionError::new(FIELD, format!("'{}' is not a whole number", s)))
        }
        Some(other) => Err(CoercionError::new(
            FIELD,
            format!("expected a whole number, found {}", kind(other)),
        )),
    }
}

/// Coerces a free-text field. Blank strings count as absent.
pub fn text(field: &'static str, value: Option<&Value>) -> Coerced<String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(CoercionError::new(
            field,
            format!("expected text, found {}", kind(other)),
        )),
    }
}

/// Coerces a confidence score. Range checking is left to the caller.
pub fn score(value: Option<&Value>) -> Coerced<f64> {
    const FIELD: &str = "confidence_score";
    let parsed = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(other) => {
            return Err(CoercionError::new(
                FIELD,
                format!("expected a number, found {}", kind(other)),
            ));
        }
    };
    match parsed {
        Some(f) if f.is_finite() => Ok(Some(f)),
        _ => Err(CoercionError::new(FIELD, "not a finite number")),
    }
}

/// Coerces an ISO `YYYY-MM-DD` date.
pub fn date(value: Option<&Value>) -> Coerced<NaiveDate> {
    const FIELD: &str = "date";
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|e| CoercionError::new(FIELD, format!("'{}' is not an ISO date: {}", s, e))),
        Some(other) => Err(CoercionError::new(
            FIELD,
            format!("expected an ISO date string, found {}", kind(other)),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_money_from_number_is_exact() {
        let value = json!(0.1);
        assert_eq!(
            money("tax", Some(&value)).unwrap(),
            Some(Money::new(dec!(0.1)))
        );
    }

    #[test]
    fn test_money_from_formatted_string() {
        let value = json!(" $1,234.50 ");
        assert_eq!(
            money("total", Some(&value)).unwrap(),
            Some(Money::new(dec!(1234.50)))
        );
        let negative = json!("-$5.00");
        assert_eq!(
            money("tip", Some(&negative)).unwrap(),
            Some(Money::new(dec!(-5.00)))
        );
    }

    #[test]
    fn test_money_absent_null_and_blank() {
        assert_eq!(money("tax", None).unwrap(), None);
        assert_eq!(money("tax", Some(&Value::Null)).unwrap(), None);
        assert_eq!(money("tax", Some(&json!("  "))).unwrap(), None);
    }

    #[test]
    fn test_money_rejects_garbage() {
        let err = money("unit_price", Some(&json!("twelve"))).unwrap_err();
        assert_eq!(err.field, "unit_price");
        assert!(money("unit_price", Some(&json!(true))).is_err());
        assert!(money("unit_price", Some(&json!([1, 2]))).is_err());
    }

    #[test]
    fn test_money_rejects_out_of_range() {
        let err = money("total_price", Some(&json!("79000000000000000000000000000"))).unwrap_err();
        assert_eq!(err.field, "total_price");
        assert!(err.message.contains("out of range"));

        assert!(money("total", Some(&json!(-2e15))).is_err());
        assert_eq!(
            money("total", Some(&json!("1,000,000,000,000"))).unwrap(),
            Some(Money::MAX_AMOUNT)
        );
    }

    #[test]
    fn test_quantity_variants() {
        assert_eq!(quantity(Some(&json!(3))).unwrap(), Some(3));
        assert_eq!(quantity(Some(&json!(2.0))).unwrap(), Some(2));
        assert_eq!(quantity(Some(&json!(2.7))).unwrap(), Some(2));
        assert_eq!(quantity(Some(&json!(" 4 "))).unwrap(), Some(4));
        assert_eq!(quantity(Some(&json!(0))).unwrap(), Some(0));
        assert_eq!(quantity(None).unwrap(), None);
    }

    #[test]
    fn test_quantity_rejects_negative_and_text() {
        assert!(quantity(Some(&json!(-1))).is_err());
        assert!(quantity(Some(&json!(-1.5))).is_err());
        assert!(quantity(Some(&json!("two"))).is_err());
    }

    #[test]
    fn test_text_trims_and_blanks() {
        assert_eq!(
            text("name", Some(&json!("  Pad Thai "))).unwrap(),
            Some("Pad Thai".to_string())
        );
        assert_eq!(text("name", Some(&json!(""))).unwrap(), None);
        assert_eq!(text("name", Some(&json!(42))).unwrap(), Some("42".to_string()));
        assert!(text("name", Some(&json!({"a": 1}))).is_err());
    }

    #[test]
    fn test_score_variants() {
        assert_eq!(score(Some(&json!(0.92))).unwrap(), Some(0.92));
        assert_eq!(score(Some(&json!("0.8"))).unwrap(), Some(0.8));
        assert!(score(Some(&json!("high"))).is_err());
    }

    #[test]
    fn test_date_variants() {
        assert_eq!(
            date(Some(&json!("2026-02-28"))).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 28)
        );
        assert!(date(Some(&json!("28/02/2026"))).is_err());
        assert!(date(Some(&json!(20260228))).is_err());
        assert_eq!(date(None).unwrap(), None);
    }
}
