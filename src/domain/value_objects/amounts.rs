use rust_decimal::Decimal;
use serde_json::Value;
use thiserror::Error;

/// Fraction digits stored for every monetary column (`NUMERIC(12, 2)`).
pub const AMOUNT_SCALE: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is required")]
    Missing,
    #[error("invalid amount: {0}")]
    Malformed(String),
    #[error("amount must be greater than 0")]
    NotPositive,
    #[error("amount must not be negative")]
    Negative,
    #[error("amount must have at most 2 decimal places")]
    TooPrecise,
    #[error("amount must be less than 10000000000")]
    TooLarge,
}

/// Zero carrying the stored scale, so it serializes as `"0.00"`.
pub fn zero_amount() -> Decimal {
    Decimal::new(0, AMOUNT_SCALE)
}

/// Largest value that fits a `NUMERIC(12, 2)` column.
pub fn max_amount() -> Decimal {
    Decimal::new(999_999_999_999, AMOUNT_SCALE)
}

/// Plain decimal or scientific notation, as written on the wire.
struct AmountText<'a> {
    integer: &'a str,
    fraction: &'a str,
    exponent: i64,
}

impl<'a> AmountText<'a> {
    /// Accepts an optional sign, ASCII digits with at most one `.`, and an
    /// optional `e`/`E` exponent. Separators such as `_` are rejected.
    fn scan(text: &'a str) -> Option<Self> {
        let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
        let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
            Some((mantissa, exponent)) => (mantissa, Some(exponent)),
            None => (unsigned, None),
        };
        let (integer, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if integer.is_empty() && fraction.is_empty() {
            return None;
        }
        if !all_digits(integer) || !all_digits(fraction) {
            return None;
        }

        let exponent = match exponent {
            Some(raw) => {
                let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
                if digits.is_empty() || !all_digits(digits) {
                    return None;
                }
                raw.parse::<i64>().ok()?
            }
            None => 0,
        };

        Some(Self {
            integer,
            fraction,
            exponent,
        })
    }

    /// Fraction digits needed to hold the value exactly, ignoring trailing zeros.
    fn significant_scale(&self) -> i64 {
        let digits = format!("{}{}", self.integer, self.fraction);
        let trimmed = digits.trim_end_matches('0');
        if trimmed.trim_start_matches('0').is_empty() {
            return 0;
        }
        let trailing_zeros = (digits.len() - trimmed.len()) as i64;
        (self.fraction.len() as i64)
            .saturating_sub(self.exponent)
            .saturating_sub(trailing_zeros)
            .max(0)
    }
}

fn amount_text(raw: &Value) -> Result<String, AmountError> {
    let text = match raw {
        Value::Null => return Err(AmountError::Missing),
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.trim().to_string(),
        other => return Err(AmountError::Malformed(other.to_string())),
    };

    if text.is_empty() {
        return Err(AmountError::Missing);
    }
    Ok(text)
}

fn to_decimal(text: &str, scanned: &AmountText<'_>) -> Result<Decimal, AmountError> {
    let parsed = if text.contains(['e', 'E']) {
        Decimal::from_scientific(text)
    } else {
        Decimal::from_str_exact(text)
    };

    parsed.map_err(|_| {
        if scanned.significant_scale() <= i64::from(AMOUNT_SCALE) {
            AmountError::TooLarge
        } else {
            AmountError::TooPrecise
        }
    })
}

/// Parses and validates an amount submitted as a payment.
pub fn parse_payment_amount(raw: &Value) -> Result<Decimal, AmountError> {
    let amount = parse_amount(raw)?;
    if amount <= Decimal::ZERO {
        return Err(AmountError::NotPositive);
    }
    fit_to_scale(amount)
}

/// Parses and validates the total of a plan, which may be zero.
pub fn parse_total_amount(raw: &Value) -> Result<Decimal, AmountError> {
    let amount = parse_amount(raw)?;
    if amount < Decimal::ZERO {
        return Err(AmountError::Negative);
    }
    fit_to_scale(amount)
}

/// Parses a JSON amount, accepting numbers and numeric strings.
///
/// JSON numbers are read through their textual form so no binary float
/// rounding is introduced on the way in. Precision is judged on the
/// submitted digits before any conversion.
fn parse_amount(raw: &Value) -> Result<Decimal, AmountError> {
    let text = amount_text(raw)?;
    let Some(scanned) = AmountText::scan(&text) else {
        return Err(AmountError::Malformed(text));
    };
    if scanned.significant_scale() > i64::from(AMOUNT_SCALE) {
        return Err(AmountError::TooPrecise);
    }
    to_decimal(&text, &scanned)
}

fn fit_to_scale(amount: Decimal) -> Result<Decimal, AmountError> {
    if amount > max_amount() {
        return Err(AmountError::TooLarge);
    }

    let mut scaled = amount;
    scaled.rescale(AMOUNT_SCALE);
    Ok(scaled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        assert_eq!(parse_payment_amount(&json!(400)).unwrap(), dec!(400.00));
        assert_eq!(parse_payment_amount(&json!("250.5")).unwrap(), dec!(250.50));
        assert_eq!(parse_payment_amount(&json!(" 19.99 ")).unwrap(), dec!(19.99));
    }

    #[test]
    fn rejects_non_numeric_input() {
        assert_eq!(
            parse_payment_amount(&json!("abc")),
            Err(AmountError::Malformed("abc".to_string()))
        );
        assert!(matches!(
            parse_payment_amount(&json!(true)),
            Err(AmountError::Malformed(_))
        ));
        assert!(matches!(
            parse_payment_amount(&json!({"value": 1})),
            Err(AmountError::Malformed(_))
        ));
        assert_eq!(parse_payment_amount(&Value::Null), Err(AmountError::Missing));
        assert_eq!(parse_payment_amount(&json!("  ")), Err(AmountError::Missing));
    }

    #[test]
    fn rejects_zero_and_negative_payments() {
        assert_eq!(parse_payment_amount(&json!(-5)), Err(AmountError::NotPositive));
        assert_eq!(parse_payment_amount(&json!("0.00")), Err(AmountError::NotPositive));
    }

    #[test]
    fn rejects_sub_cent_precision_but_allows_trailing_zeros() {
        assert_eq!(parse_payment_amount(&json!("10.005")), Err(AmountError::TooPrecise));
        assert_eq!(parse_payment_amount(&json!("10.5000")).unwrap(), dec!(10.50));
    }

    #[test]
    fn precision_is_judged_on_the_submitted_digits() {
        assert_eq!(
            parse_payment_amount(&json!("400.0000000000000000000000000001")),
            Err(AmountError::TooPrecise)
        );
        assert_eq!(parse_payment_amount(&json!("1.5e-3")), Err(AmountError::TooPrecise));
        assert_eq!(parse_payment_amount(&json!("1.25e1")).unwrap(), dec!(12.50));
        assert_eq!(parse_payment_amount(&json!(2.5)).unwrap(), dec!(2.50));
    }

    #[test]
    fn rejects_separators_and_stray_characters() {
        for raw in ["4_00", "1,000", "12.3.4", "+", ".", "1e", "0x10", "12abc", "1e_2"] {
            assert_eq!(
                parse_payment_amount(&json!(raw)),
                Err(AmountError::Malformed(raw.to_string())),
                "{raw}"
            );
        }
    }

    #[test]
    fn rejects_amounts_beyond_column_capacity() {
        assert_eq!(
            parse_payment_amount(&json!("10000000000")),
            Err(AmountError::TooLarge)
        );
        assert_eq!(
            parse_payment_amount(&json!("9999999999.99")).unwrap(),
            max_amount()
        );
    }

    #[test]
    fn total_amount_may_be_zero_but_not_negative() {
        assert_eq!(parse_total_amount(&json!(0)).unwrap(), dec!(0.00));
        assert_eq!(parse_total_amount(&json!("-1")), Err(AmountError::Negative));
    }
}
