//! Price formatting using decimal arithmetic.
//!
//! Two display forms exist on the storefront:
//!
//! - [`format_currency`] - locale formatting for en-US (`$1,234.50`), used by
//!   anything that wants a "proper" money string.
//! - [`format_fixed_price`] - a dollar sign in front of the amount rounded to
//!   two decimals (`$1234.50`), which is what cart totals and search rows show.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Round half away from zero to cents and group thousands: `"1,234.50"`.
fn display_dollars(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    group_thousands(&format!("{rounded:.2}"))
}

/// Format a number as US-dollar currency using en-US rules.
///
/// The number is taken at its shortest round-trip decimal representation,
/// so `1.005` formats as `$1.01`.
///
/// ```
/// use shopfront_core::format_currency;
///
/// assert_eq!(format_currency(1234.5), "$1,234.50");
/// assert_eq!(format_currency(-5.0), "-$5.00");
/// ```
#[must_use]
pub fn format_currency(amount: f64) -> String {
    if amount.is_nan() {
        return "$NaN".to_string();
    }
    if amount.is_infinite() {
        return if amount < 0.0 { "-$∞" } else { "$∞" }.to_string();
    }

    // f64's Display is the shortest representation that round-trips.
    let sign = if amount.is_sign_negative() { "-" } else { "" };
    let magnitude = amount.abs();
    Decimal::from_str(&magnitude.to_string()).map_or_else(
        // Beyond Decimal's range cents are meaningless; keep the grouping.
        |_| format!("{sign}${}", group_thousands(&format!("{magnitude:.2}"))),
        |decimal| format!("{sign}${}", display_dollars(decimal)),
    )
}

/// `"$"` followed by the amount rounded to exactly two decimals, no grouping.
///
/// Rounding works on the exact binary value, so `1.005` (really
/// `1.00499999...`) becomes `$1.00`. Negative amounts keep their sign after
/// the dollar sign (`$-5.00`), even when they round to zero (`$-0.00`).
///
/// ```
/// use shopfront_core::format_fixed_price;
///
/// assert_eq!(format_fixed_price(42.5), "$42.50");
/// assert_eq!(format_fixed_price(1234.5), "$1234.50");
/// ```
#[must_use]
pub fn format_fixed_price(amount: f64) -> String {
    format!("${}", to_fixed_2(amount))
}

fn to_fixed_2(amount: f64) -> String {
    if amount.is_nan() {
        return "NaN".to_string();
    }
    if amount.is_infinite() {
        return if amount < 0.0 { "-Infinity" } else { "Infinity" }.to_string();
    }

    // The sign comes from the unrounded value, so -0.001 gives "-0.00" while
    // -0.0 gives "0.00".
    let sign = if amount < 0.0 { "-" } else { "" };
    let magnitude = amount.abs();
    let digits = Decimal::from_f64_retain(magnitude).map_or_else(
        || format!("{magnitude:.2}"),
        |decimal| {
            let rounded = decimal.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            format!("{rounded:.2}")
        },
    );
    format!("{sign}{digits}")
}

/// Insert `,` separators into the integer part of an unsigned `"1234.50"`.
fn group_thousands(unsigned: &str) -> String {
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if frac_part.is_empty() {
        grouped
    } else {
        format!("{grouped}.{frac_part}")
    }
}
