use serde::{Deserialize, Serialize};

/// Thousands separators accepted in numeric-like text cells (ASCII comma and
/// the Arabic thousands separator).
const THOUSANDS_SEPARATORS: [char; 2] = [',', '\u{066C}'];

/// A rate cell exactly as it appeared in the source table.
///
/// Spreadsheets mix real numbers with text such as `"1,250"`; both are kept
/// verbatim and only coerced when a query needs the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(serde_json::Number),
    Text(String),
}

impl Amount {
    /// Build a numeric amount, storing integral values as integers so the
    /// artifact reads `1500` rather than `1500.0`.
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
            return Self::Number(serde_json::Number::from(value as i64));
        }
        match serde_json::Number::from_f64(value) {
            Some(number) => Self::Number(number),
            None => Self::Text(value.to_string()),
        }
    }

    /// Numeric value of the cell.
    ///
    /// Text is parsed after removing thousands separators and surrounding
    /// whitespace. Returns `None` for anything that is not a finite number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(number) => number.as_f64().filter(|v| v.is_finite()),
            Self::Text(text) => {
                let cleaned: String = text
                    .trim()
                    .chars()
                    .filter(|c| !THOUSANDS_SEPARATORS.contains(c))
                    .collect();
                cleaned
                    .parse::<f64>()
                    .ok()
                    .or_else(|| leading_number(&cleaned))
                    .filter(|v| v.is_finite())
            }
        }
    }
}

/// Numeric prefix of `text`, so `"1500 ریال"` reads as 1500. `None` when the
/// text does not start with a digit (after an optional sign).
fn leading_number(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let integer_end = digits_from(end);
    let mut has_digits = integer_end > end;
    end = integer_end;

    if bytes.get(end) == Some(&b'.') {
        let fraction_end = digits_from(end + 1);
        if fraction_end > end + 1 || has_digits {
            has_digits |= fraction_end > end + 1;
            end = fraction_end;
        }
    }
    if !has_digits {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exponent_end = digits_from(end + 1 + sign);
        if exponent_end > end + 1 + sign {
            end = exponent_end;
        }
    }

    text[..end].parse().ok()
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self::Number(serde_json::Number::from(value))
    }
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Amount {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}
