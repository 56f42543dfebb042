//! Rounding and display helpers shared by the price calculations.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to a whole number using half-up rounding.
///
/// Values at exactly .5 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use estimator_core::calculations::common::round_whole;
///
/// assert_eq!(round_whole(dec!(82.4)), dec!(82));
/// assert_eq!(round_whole(dec!(82.5)), dec!(83));
/// assert_eq!(round_whole(dec!(-82.5)), dec!(-83));
/// ```
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount as a currency-prefixed whole number, e.g. `$95`.
///
/// ```
/// use rust_decimal_macros::dec;
/// use estimator_core::calculations::common::format_currency;
///
/// assert_eq!(format_currency(dec!(95.0), "$"), "$95");
/// assert_eq!(format_currency(dec!(1250.5), "€"), "€1251");
/// ```
pub fn format_currency(
    value: Decimal,
    symbol: &str,
) -> String {
    format!("{symbol}{}", round_whole(value).normalize())
}
