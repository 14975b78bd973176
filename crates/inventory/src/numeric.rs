//! Coercion of form-style numeric input into stored numbers.
//!
//! Stock and price arrive either as JSON numbers or as strings typed into a
//! form. Whatever the input type, the stored record always holds an `i64`
//! stock and an `f64` price.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Number;

use inventrobil_core::{DomainError, DomainResult};

/// Raw numeric field as submitted by a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(Number),
    Text(String),
}

impl NumericInput {
    /// Empty (or whitespace-only) text, i.e. "nothing entered".
    pub fn is_blank(&self) -> bool {
        matches!(self, NumericInput::Text(s) if s.trim().is_empty())
    }
}

impl Default for NumericInput {
    fn default() -> Self {
        NumericInput::Text(String::new())
    }
}

impl From<i64> for NumericInput {
    fn from(value: i64) -> Self {
        NumericInput::Number(Number::from(value))
    }
}

impl From<f64> for NumericInput {
    fn from(value: f64) -> Self {
        Number::from_f64(value)
            .map(NumericInput::Number)
            .unwrap_or_else(|| NumericInput::Text(value.to_string()))
    }
}

impl From<&str> for NumericInput {
    fn from(value: &str) -> Self {
        NumericInput::Text(value.to_string())
    }
}

impl From<String> for NumericInput {
    fn from(value: String) -> Self {
        NumericInput::Text(value)
    }
}

/// How malformed numeric input is treated.
///
/// - `Strict`: anything that is not a clean, non-negative number is a
///   validation error and nothing is mutated.
/// - `Lenient`: browser-style parsing. The leading numeric prefix is used
///   (`"12abc"` is 12, `"12.9"` is a stock of 12), unparseable input becomes
///   0 and negatives clamp to 0. Never yields NaN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericPolicy {
    #[default]
    Strict,
    Lenient,
}

impl NumericPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            NumericPolicy::Strict => "strict",
            NumericPolicy::Lenient => "lenient",
        }
    }

    /// Coerce a stock quantity to a non-negative integer.
    pub fn stock(&self, input: &NumericInput) -> DomainResult<i64> {
        match self {
            NumericPolicy::Strict => strict_stock(input),
            NumericPolicy::Lenient => Ok(lenient_stock(input)),
        }
    }

    /// Coerce a unit price to a non-negative, finite decimal.
    pub fn price(&self, input: &NumericInput) -> DomainResult<f64> {
        match self {
            NumericPolicy::Strict => strict_price(input),
            NumericPolicy::Lenient => Ok(lenient_price(input)),
        }
    }
}

impl core::fmt::Display for NumericPolicy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NumericPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(NumericPolicy::Strict),
            "lenient" => Ok(NumericPolicy::Lenient),
            other => Err(DomainError::validation(format!(
                "numeric policy must be one of: strict, lenient (got \"{other}\")"
            ))),
        }
    }
}

fn strict_stock(input: &NumericInput) -> DomainResult<i64> {
    let value = match input {
        NumericInput::Number(n) => match n.as_i64() {
            Some(v) => v,
            None => {
                let f = n.as_f64().unwrap_or(f64::NAN);
                if f.fract() != 0.0 || !f.is_finite() || f.abs() > i64::MAX as f64 {
                    return Err(DomainError::validation(format!(
                        "stock must be a whole number, got {n}"
                    )));
                }
                f as i64
            }
        },
        NumericInput::Text(s) => s.trim().parse::<i64>().map_err(|_| {
            DomainError::validation(format!("stock must be a whole number, got \"{s}\""))
        })?,
    };

    if value < 0 {
        return Err(DomainError::validation("stock cannot be negative"));
    }
    Ok(value)
}

fn strict_price(input: &NumericInput) -> DomainResult<f64> {
    let value = match input {
        NumericInput::Number(n) => n.as_f64(),
        NumericInput::Text(s) => s.trim().parse::<f64>().ok(),
    }
    .filter(|v| v.is_finite())
    .ok_or_else(|| match input {
        NumericInput::Number(n) => DomainError::validation(format!("price must be a number, got {n}")),
        NumericInput::Text(s) => DomainError::validation(format!("price must be a number, got \"{s}\"")),
    })?;

    if value < 0.0 {
        return Err(DomainError::validation("price cannot be negative"));
    }
    Ok(value)
}

fn lenient_stock(input: &NumericInput) -> i64 {
    let value = match input {
        NumericInput::Number(n) => match n.as_i64() {
            Some(v) => v,
            // Float-to-int `as` truncates toward zero and saturates; NaN becomes 0.
            None => n.as_f64().map(|f| f.trunc() as i64).unwrap_or(0),
        },
        NumericInput::Text(s) => leading_integer(s).unwrap_or(0),
    };
    value.max(0)
}

fn lenient_price(input: &NumericInput) -> f64 {
    let value = match input {
        NumericInput::Number(n) => n.as_f64().unwrap_or(0.0),
        NumericInput::Text(s) => leading_float(s).unwrap_or(0.0),
    };
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}

fn count_digits(bytes: &[u8], start: usize) -> usize {
    bytes
        .get(start..)
        .map(|rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
        .unwrap_or(0)
}

/// Integer prefix of `s` (after leading whitespace and an optional sign).
fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let sign_len = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits = count_digits(bytes, sign_len);
    if digits == 0 {
        return None;
    }
    s[..sign_len + digits].parse::<i64>().ok()
}

/// Decimal prefix of `s`: sign, digits, fraction and exponent, as far as they parse.
fn leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = count_digits(bytes, end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(bytes, end + 1);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(bytes, exp_end);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(json: &str) -> NumericInput {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn deserializes_numbers_and_strings() {
        assert_eq!(number("12"), NumericInput::from(12i64));
        assert_eq!(number("\"12\""), NumericInput::from("12"));
        assert!(number("\"  \"").is_blank());
        assert!(!number("0").is_blank());
    }

    #[test]
    fn strict_accepts_clean_input_of_either_type() {
        let p = NumericPolicy::Strict;
        assert_eq!(p.stock(&"12".into()).unwrap(), 12);
        assert_eq!(p.stock(&number("12.0")).unwrap(), 12);
        assert_eq!(p.stock(&0i64.into()).unwrap(), 0);
        assert_eq!(p.price(&"2.5".into()).unwrap(), 2.5);
        assert_eq!(p.price(&number("10")).unwrap(), 10.0);
    }

    #[test]
    fn strict_rejects_malformed_and_negative_input() {
        let p = NumericPolicy::Strict;
        assert!(matches!(p.stock(&"12abc".into()), Err(DomainError::Validation(_))));
        assert!(matches!(p.stock(&number("1.5")), Err(DomainError::Validation(_))));
        assert!(matches!(p.stock(&(-3i64).into()), Err(DomainError::Validation(_))));
        assert!(matches!(p.price(&"".into()), Err(DomainError::Validation(_))));
        assert!(matches!(p.price(&"NaN".into()), Err(DomainError::Validation(_))));
        assert!(matches!(p.price(&"-1".into()), Err(DomainError::Validation(_))));
    }

    #[test]
    fn lenient_uses_the_numeric_prefix() {
        let p = NumericPolicy::Lenient;
        assert_eq!(p.stock(&"12abc".into()).unwrap(), 12);
        assert_eq!(p.stock(&" 12.9".into()).unwrap(), 12);
        assert_eq!(p.stock(&number("7.8")).unwrap(), 7);
        assert_eq!(p.price(&"2.5kg".into()).unwrap(), 2.5);
        assert_eq!(p.price(&"1e2".into()).unwrap(), 100.0);
    }

    #[test]
    fn lenient_never_stores_garbage() {
        let p = NumericPolicy::Lenient;
        assert_eq!(p.stock(&"abc".into()).unwrap(), 0);
        assert_eq!(p.stock(&"-4".into()).unwrap(), 0);
        assert_eq!(p.price(&"".into()).unwrap(), 0.0);
        assert_eq!(p.price(&"NaN".into()).unwrap(), 0.0);
        assert_eq!(p.price(&(-2.0f64).into()).unwrap(), 0.0);
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("Lenient".parse::<NumericPolicy>().unwrap(), NumericPolicy::Lenient);
        assert_eq!(" strict ".parse::<NumericPolicy>().unwrap(), NumericPolicy::Strict);
        assert!("loose".parse::<NumericPolicy>().is_err());
        assert_eq!(NumericPolicy::default(), NumericPolicy::Strict);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn lenient_text_is_never_negative_or_nan(raw in ".{0,16}") {
                let p = NumericPolicy::Lenient;
                let input = NumericInput::from(raw);
                prop_assert!(p.stock(&input).unwrap() >= 0);
                let price = p.price(&input).unwrap();
                prop_assert!(price.is_finite() && price >= 0.0);
            }

            #[test]
            fn strict_accepts_any_non_negative_integer_text(n in 0i64..1_000_000) {
                let input = NumericInput::from(n.to_string());
                prop_assert_eq!(NumericPolicy::Strict.stock(&input).unwrap(), n);
            }
        }
    }
}
