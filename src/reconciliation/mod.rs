//! Validation and correction of extracted receipts.
//!
//! [`validate_record`] detects accounting inconsistencies with the detection
//! tolerance; [`correct_record`] repairs them to the tighter reconciliation
//! tolerance.

mod corrector;
mod validator;

pub use corrector::{DEFAULT_RECONCILIATION_TOLERANCE, correct_record};
pub use validator::{ValidationOutcome, ValidationRules, validate_record};
