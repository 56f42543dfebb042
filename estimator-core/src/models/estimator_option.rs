use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A service or quantity choice.
///
/// For services `value` is the base price, for quantity tiers it is the
/// multiplier applied to that price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatorOption {
    pub id: String,
    pub label: String,
    pub value: Decimal,
}
