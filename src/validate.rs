#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use rust_decimal::Decimal;

use crate::records::{Grade, Subject};

/// Lowest admissible grade score.
pub const MIN_SCORE: Decimal = Decimal::from_parts(0, 0, 0, false, 2);
/// Highest admissible grade score.
pub const MAX_SCORE: Decimal = Decimal::from_parts(500, 0, 0, false, 2);
/// Admissible credit-weight range for a subject.
pub const CREDIT_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

/// A record rejected at the store boundary.
///
/// These are caller precondition violations: the aggregation pipeline assumes
/// scores and credit weights are already in range and does not re-validate.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Grade score outside `[0.00, 5.00]`.
    #[error("Grade score {score} is outside the admissible range 0.00..=5.00.")]
    ScoreOutOfRange {
        /// The offending score.
        score: Decimal,
    },
    /// Subject credit weight outside `1..=10`.
    #[error("Subject `{code}` has credit weight {credits}; expected 1..=10.")]
    CreditsOutOfRange {
        /// Institutional code of the offending subject.
        code:    String,
        /// The offending credit weight.
        credits: u8,
    },
    /// Grade period label is blank.
    #[error("Grade period label must not be blank.")]
    BlankPeriod,
}

/// Checks that a raw score lies in the admissible range.
pub fn validate_score(score: Decimal) -> Result<(), ValidationError> {
    if score < MIN_SCORE || score > MAX_SCORE {
        return Err(ValidationError::ScoreOutOfRange { score });
    }
    Ok(())
}

/// Checks a grade record before it enters the store.
pub fn validate_grade(grade: &Grade) -> Result<(), ValidationError> {
    validate_score(grade.score)?;
    if grade.period.trim().is_empty() {
        return Err(ValidationError::BlankPeriod);
    }
    Ok(())
}

/// Checks a subject record before it enters the store.
pub fn validate_subject(subject: &Subject) -> Result<(), ValidationError> {
    if !CREDIT_RANGE.contains(&subject.credits) {
        return Err(ValidationError::CreditsOutOfRange {
            code:    subject.code.clone(),
            credits: subject.credits,
        });
    }
    Ok(())
}
