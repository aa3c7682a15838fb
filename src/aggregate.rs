#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::Display;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of decimal places every reported average is rounded to.
const AVERAGE_SCALE: u32 = 2;

/// Outcome of aggregating a set of grade scores.
///
/// "No data yet" is a first-class result, not an error, and is never coerced
/// to zero: a legitimate `0.00` average over real grades stays `0.00`, while
/// an empty grade set is always `NoData`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateResult {
    /// No grades were available to aggregate.
    NoData,
    /// Arithmetic mean rounded half-up to two decimal places.
    Average(Decimal),
}

impl AggregateResult {
    /// Returns the average as an option, `None` for [`AggregateResult::NoData`].
    pub fn value(self) -> Option<Decimal> {
        match self {
            AggregateResult::NoData => None,
            AggregateResult::Average(v) => Some(v),
        }
    }

    /// True when no grades contributed to this result.
    pub fn is_no_data(self) -> bool {
        matches!(self, AggregateResult::NoData)
    }
}

impl Display for AggregateResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregateResult::NoData => write!(f, "N/A"),
            AggregateResult::Average(v) => write!(f, "{v:.2}"),
        }
    }
}

impl Serialize for AggregateResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // NoData serializes as an explicit null; averages keep rust_decimal's
        // string representation so no precision is lost in transit.
        match self {
            AggregateResult::NoData => serializer.serialize_none(),
            AggregateResult::Average(v) => Serialize::serialize(v, serializer),
        }
    }
}

impl<'de> Deserialize<'de> for AggregateResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<Decimal>::deserialize(deserializer)?
            .map_or(AggregateResult::NoData, AggregateResult::Average))
    }
}

/// Rounds a raw mean to the reporting scale using half-up rounding.
fn round_average(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(AVERAGE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Computes the arithmetic mean of already-validated grade scores.
///
/// An empty input yields [`AggregateResult::NoData`], never `0.00`. Scores are
/// expected to lie in `[0.00, 5.00]`; range enforcement happens at the record
/// boundary, not here.
pub fn average(scores: &[Decimal]) -> AggregateResult {
    if scores.is_empty() {
        return AggregateResult::NoData;
    }

    let sum: Decimal = scores.iter().sum();
    let count = Decimal::from(scores.len() as u64);
    AggregateResult::Average(round_average(sum / count))
}

/// Computes the credit-weighted overall average over per-subject results.
///
/// Entries whose average is [`AggregateResult::NoData`] are excluded from both
/// numerator and denominator rather than counted as zero, so an ungraded
/// subject does not dilute the overall average. Returns
/// [`AggregateResult::NoData`] when no entry contributes.
pub fn weighted_average(entries: &[(AggregateResult, u8)]) -> AggregateResult {
    let mut weighted_sum = Decimal::ZERO;
    let mut total_credits = Decimal::ZERO;

    for (result, credits) in entries {
        if let AggregateResult::Average(value) = result {
            let credits = Decimal::from(*credits);
            weighted_sum += value * credits;
            total_credits += credits;
        }
    }

    if total_credits.is_zero() {
        AggregateResult::NoData
    } else {
        AggregateResult::Average(round_average(weighted_sum / total_credits))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn empty_input_is_no_data_not_zero() {
        assert_eq!(average(&[]), AggregateResult::NoData);
        assert!(average(&[]).is_no_data());
    }

    #[test]
    fn mean_rounds_half_up_at_two_places() {
        assert_eq!(average(&[dec!(4.0), dec!(4.5), dec!(5.0)]).value(), Some(dec!(4.5)));
        assert_eq!(average(&[dec!(4.25), dec!(4.50)]).value(), Some(dec!(4.38)));
        // midpoint boundary: 4.125 rounds up, not to even
        assert_eq!(average(&[dec!(4.125)]).value(), Some(dec!(4.13)));
    }

    #[test]
    fn zero_average_is_distinct_from_no_data() {
        let zeros = average(&[dec!(0.0), dec!(0.0)]);
        assert_eq!(zeros.value(), Some(dec!(0.00)));
        assert!(!zeros.is_no_data());
    }

    #[test]
    fn weighted_average_skips_no_data_entries_entirely() {
        let entries = [
            (AggregateResult::Average(dec!(4.0)), 3),
            (AggregateResult::NoData, 4),
            (AggregateResult::Average(dec!(5.0)), 2),
        ];
        assert_eq!(weighted_average(&entries).value(), Some(dec!(4.4)));
    }

    #[test]
    fn weighted_average_of_nothing_is_no_data() {
        assert_eq!(weighted_average(&[]), AggregateResult::NoData);
        assert_eq!(weighted_average(&[(AggregateResult::NoData, 3)]), AggregateResult::NoData);
    }

    #[test]
    fn display_uses_na_token_for_missing_averages() {
        assert_eq!(AggregateResult::NoData.to_string(), "N/A");
        assert_eq!(AggregateResult::Average(dec!(4.5)).to_string(), "4.50");
    }
}
