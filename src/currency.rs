//! Locale-independent money formatting.
//!
//! Amounts are rounded half away from zero to two decimal places and grouped with `,` every three
//! integer digits. `USD` is the only code rendered with a symbol prefix; every other code, `EUR`
//! included, is appended after the digits in upper case.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits shown for every amount.
pub const DISPLAY_SCALE: u32 = 2;

/// Currency used when a scenario does not name one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Rounds `amount` to the display scale using the crate-wide rounding rule.
pub fn round_for_display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats `amount` for display in the currency identified by `code`.
///
/// A blank `code` is treated as [`DEFAULT_CURRENCY`].
///
/// ```
/// use invoice_fixture::currency::format_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_amount(Decimal::new(12345, 1), "USD"), "$1,234.50");
/// assert_eq!(format_amount(Decimal::from(500), "EUR"), "500.00 EUR");
/// assert_eq!(format_amount(Decimal::from(42), "gbp"), "42.00 GBP");
/// ```
pub fn format_amount(amount: Decimal, code: &str) -> String {
    let code = match code.trim() {
        "" => DEFAULT_CURRENCY.to_owned(),
        code => code.to_ascii_uppercase(),
    };
    let rounded = round_for_display(amount);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = grouped_digits(rounded.abs());

    let body = match code.as_str() {
        "USD" => format!("${}", digits),
        _ => format!("{} {}", digits, code),
    };

    if negative {
        format!("-{}", body)
    } else {
        body
    }
}

fn grouped_digits(amount: Decimal) -> String {
    let mut scaled = amount;
    scaled.rescale(DISPLAY_SCALE);
    let plain = scaled.to_string();
    let (integer, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3 + 4);
    for (idx, ch) in integer.chars().enumerate() {
        if idx > 0 && (integer.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped.push('.');
    grouped.push_str(fraction);
    grouped
}
