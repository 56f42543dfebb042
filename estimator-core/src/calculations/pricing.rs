//! Price computation for a completed set of wizard answers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::WizardState;

/// Combines the three catalog values into a total.
///
/// ```
/// use rust_decimal_macros::dec;
/// use estimator_core::calculations::compute_total;
///
/// assert_eq!(compute_total(dec!(50), dec!(1.5), dec!(20)), dec!(95));
/// ```
pub fn compute_total(
    base_price: Decimal,
    multiplier: Decimal,
    location_fee: Decimal,
) -> Decimal {
    base_price * multiplier + location_fee
}

/// The inputs and outcome of one price computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub base_price: Decimal,
    pub multiplier: Decimal,
    pub location_fee: Decimal,
    pub total: Decimal,
}

impl PriceQuote {
    pub fn new(
        base_price: Decimal,
        multiplier: Decimal,
        location_fee: Decimal,
    ) -> Self {
        Self {
            base_price,
            multiplier,
            location_fee,
            total: compute_total(base_price, multiplier, location_fee),
        }
    }

    /// Quotes a state once all three answers are present.
    pub fn from_state(state: &WizardState) -> Option<Self> {
        Some(Self::new(
            state.base_price()?,
            state.multiplier()?,
            state.location_fee()?,
        ))
    }

    /// `base_price * multiplier`, before the location fee.
    pub fn subtotal(&self) -> Decimal {
        self.base_price * self.multiplier
    }
}
