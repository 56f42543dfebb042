//! Price calculation for the estimator.
//!
//! [`pricing`] holds the total computation, [`common`] the rounding and
//! display rules applied to it.

pub mod common;
pub mod pricing;

pub use common::{format_currency, round_whole};
pub use pricing::{PriceQuote, compute_total};
