use diesel::prelude::*;

use crate::{
    audit::{self, TARGET_FEEDBACK},
    database::{assert, last_id},
    errors::{BookingError, BookingResult},
    models::{
        appointments::AppointmentStatus,
        audit_logs::AuditAction,
        feedback::{Feedback, NewFeedback, RATING_MAX, RATING_MIN},
    },
};

pub fn validate_rating(rating: i32) -> BookingResult<()> {
    if rating < RATING_MIN || rating > RATING_MAX {
        return Err(BookingError::validation(format!(
            "rating must be between {} and {}, got {}",
            RATING_MIN, RATING_MAX, rating
        )));
    }
    Ok(())
}

/// One rating per completed appointment, written by its patient.
pub fn leave_feedback(
    conn: &MysqlConnection,
    appointment_id: u64,
    patient_id: u64,
    rating: i32,
    comments: Option<&str>,
) -> BookingResult<u64> {
    use crate::schema::feedback;

    validate_rating(rating)?;

    conn.transaction(|| {
        let appo = assert::lock_appointment(conn, appointment_id)?;
        if appo.patient_id != patient_id {
            return Err(BookingError::validation(format!(
                "user {} is not the patient of appointment {}",
                patient_id, appointment_id
            )));
        }
        let status = appo.status()?;
        if status != AppointmentStatus::Completed {
            return Err(BookingError::validation(format!(
                "appointment {} is {}, feedback needs a completed appointment",
                appointment_id, status
            )));
        }

        let res = feedback::table
            .filter(feedback::appointment_id.eq(appointment_id))
            .count()
            .get_result::<i64>(conn)?;
        if res > 0 {
            return Err(BookingError::validation(format!(
                "appointment {} already has feedback",
                appointment_id
            )));
        }

        let data = NewFeedback {
            appointment_id,
            rating,
            comments: comments.map(str::to_string),
        };
        diesel::insert_into(feedback::table)
            .values(&data)
            .execute(conn)?;
        let id = last_id(conn)?;

        audit::record(
            conn,
            Some(patient_id),
            AuditAction::Create,
            TARGET_FEEDBACK,
            Some(id),
            None,
        )?;
        Ok(id)
    })
}

pub fn get_feedback(conn: &MysqlConnection, appointment_id: u64) -> BookingResult<Option<Feedback>> {
    use crate::schema::feedback;

    let res = feedback::table
        .filter(feedback::appointment_id.eq(appointment_id))
        .get_result::<Feedback>(conn)
        .optional()?;
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds_are_inclusive() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
    }

    #[test]
    fn rating_outside_range_is_rejected() {
        for rating in [0, 6, -1].iter() {
            match validate_rating(*rating) {
                Err(BookingError::Validation(msg)) => {
                    assert!(msg.contains(&rating.to_string()))
                }
                other => panic!("unexpected {:?}", other),
            }
        }
    }
}
