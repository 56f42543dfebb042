use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationFee {
    pub id: String,
    pub label: String,
    pub fee: Decimal,
}
