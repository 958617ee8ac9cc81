//! Amount formatting for quote responses.

/// Name of the local currency appended to local amounts.
pub const LOCAL_CURRENCY_NAME: &str = "تومان";

/// Rendered in place of an amount that is not a number.
pub const UNSPECIFIED: &str = "نامشخص";

/// Stored local rates are in thousands of the base currency.
const LOCAL_UNIT_MULTIPLIER: f64 = 1000.0;

/// `2.5` → `"2,500 تومان"`; NaN → [`UNSPECIFIED`].
pub fn format_local_currency(amount: f64) -> String {
    let scaled = (amount * LOCAL_UNIT_MULTIPLIER).round();
    if !scaled.is_finite() {
        return UNSPECIFIED.to_string();
    }
    format!("{} {}", group_digits(scaled, 0), LOCAL_CURRENCY_NAME)
}

/// `1234.5` → `"$1,234.50"`; NaN → [`UNSPECIFIED`].
pub fn format_international_currency(amount: f64) -> String {
    let cents = (amount * 100.0).round() / 100.0;
    if !cents.is_finite() {
        return UNSPECIFIED.to_string();
    }
    let sign = if cents < 0.0 { "-" } else { "" };
    format!("{}${}", sign, group_digits(cents.abs(), 2))
}

/// Fixed-point rendering with `,` between thousands groups.
fn group_digits(value: f64, decimals: usize) -> String {
    let rendered = format!("{:.*}", decimals, value.abs());
    let (integer, fraction) = match rendered.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (rendered.as_str(), None),
    };

    let mut grouped = String::with_capacity(rendered.len() + integer.len() / 3 + 1);
    if value < 0.0 && rendered.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        grouped.push('-');
    }
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}
