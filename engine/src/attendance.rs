//! Daily attendance ledger: one punch-in and any number of punch-outs per
//! user per day.

use chrono::NaiveDate;
use shared_types::{
    DailyAttendance, GeoLocationData, GeoVerification, PunchRecord, PunchType, WorkflowError,
};

use crate::geo;

/// Everything needed to record one punch
#[derive(Debug, Clone)]
pub struct PunchInput {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub punch_type: PunchType,
    pub location: GeoLocationData,
    /// Result of checking `location` against the user's territories
    pub verification: GeoVerification,
    pub recorded_at: i64,
    /// Refuse punch-ins that fall outside every geofence
    pub strict: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PunchOutcome {
    pub attendance: DailyAttendance,
    pub warning: Option<String>,
}

/// Records a punch against the day's attendance.
///
/// `current` is the stored record for the same user and day, if any. The
/// returned record is always marked as not yet synced to the expense sheet.
pub fn punch(
    current: Option<&DailyAttendance>,
    input: PunchInput,
) -> Result<PunchOutcome, WorkflowError> {
    if let Some(record) = current {
        if record.user_id != input.user_id || record.date != input.date {
            return Err(WorkflowError::InvalidInput(format!(
                "attendance {} does not belong to {} on {}",
                record.id, input.user_id, input.date
            )));
        }
    }

    if !input.verification.accuracy_accepted {
        tracing::debug!(
            "Refused {} punch for {}: accuracy {}m",
            input.punch_type,
            input.user_id,
            input.location.accuracy
        );
        return Err(WorkflowError::InvalidInput(geo::status_message(
            &input.verification,
            input.location.accuracy,
        )));
    }

    let warning = if input.verification.is_match() {
        None
    } else {
        Some(geo::status_message(
            &input.verification,
            input.location.accuracy,
        ))
    };

    if input.strict && input.punch_type == PunchType::In && warning.is_some() {
        tracing::debug!("Refused IN punch for {} outside geofence", input.user_id);
        return Err(WorkflowError::Forbidden(
            "punch-in is only allowed inside an assigned territory".to_string(),
        ));
    }

    let mut attendance = match current {
        Some(record) => record.clone(),
        None => DailyAttendance::empty(&input.user_id, input.date),
    };

    if input.punch_type == PunchType::Out && attendance.punch_in.is_none() {
        return Err(WorkflowError::InvalidState(format!(
            "no punch-in recorded for {} on {}",
            input.user_id, input.date
        )));
    }

    let record = PunchRecord {
        id: input.id,
        punch_type: input.punch_type,
        timestamp: input.recorded_at,
        location: input.location,
        verified_territory_id: input.verification.matched_territory_id,
        verified_territory_name: input.verification.matched_territory_name,
        notes: warning.clone(),
    };

    match input.punch_type {
        PunchType::In => attendance.punch_in = Some(record),
        PunchType::Out => attendance.punch_outs.push(record),
    }
    attendance.is_synced_to_sheets = false;

    Ok(PunchOutcome {
        attendance,
        warning,
    })
}
