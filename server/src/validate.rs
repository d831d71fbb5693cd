use crate::errors::{Error, Result};
use crate::model::NewReading;

/// Validates an incoming reading before it touches the store.
///
/// Presence values are not restricted to an enumeration; the contract is
/// only that both text fields are non-blank and both magnitudes are finite.
pub fn validate(reading: &NewReading) -> Result<()> {
    if reading.human_presence.trim().is_empty() {
        return Err(Error::Validation(
            "humanPresence must be a non-empty string".to_string(),
        ));
    }

    if reading.motion.trim().is_empty() {
        return Err(Error::Validation(
            "motion must be a non-empty string".to_string(),
        ));
    }

    if !reading.move_range.is_finite() {
        return Err(Error::Validation(format!(
            "moveRange {} is not a finite number",
            reading.move_range
        )));
    }

    if !reading.avg_move_range.is_finite() {
        return Err(Error::Validation(format!(
            "avgMoveRange {} is not a finite number",
            reading.avg_move_range
        )));
    }

    Ok(())
}
