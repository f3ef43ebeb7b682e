use chrono::{NaiveDate, NaiveTime};
use diesel::prelude::*;

use crate::{
    audit::{self, TARGET_RECURRING},
    database::{assert, last_id},
    errors::{BookingError, BookingResult},
    models::{
        audit_logs::AuditAction,
        recurring_appointments::{Frequency, NewRecurringAppointment, RecurringAppointment},
        users::Role,
    },
};

/// A repeating appointment pattern. It records intent only and never
/// claims slots.
pub struct RecurringPlan {
    pub patient_id: u64,
    pub doctor_id: u64,
    pub specialization_id: Option<u64>,
    pub frequency: Frequency,
    pub preferred_time: NaiveTime,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

fn validate_plan(plan: &RecurringPlan) -> BookingResult<()> {
    match plan.end_date {
        Some(end_date) if end_date < plan.start_date => Err(BookingError::validation(format!(
            "recurrence ends ({}) before it starts ({})",
            end_date, plan.start_date
        ))),
        _ => Ok(()),
    }
}

pub fn create_recurring(conn: &MysqlConnection, plan: RecurringPlan) -> BookingResult<u64> {
    use crate::schema::recurring_appointments;

    validate_plan(&plan)?;

    conn.transaction(|| {
        assert::assert_role(conn, plan.patient_id, Role::Patient)?;
        assert::assert_role(conn, plan.doctor_id, Role::Doctor)?;
        if let Some(specialization_id) = plan.specialization_id {
            assert::assert_specialization(conn, specialization_id)?;
        }

        let data = NewRecurringAppointment {
            patient_id: plan.patient_id,
            doctor_id: plan.doctor_id,
            specialization_id: plan.specialization_id,
            frequency: plan.frequency.as_str().to_string(),
            preferred_time: plan.preferred_time,
            start_date: plan.start_date,
            end_date: plan.end_date,
        };
        diesel::insert_into(recurring_appointments::table)
            .values(&data)
            .execute(conn)?;
        let id = last_id(conn)?;

        audit::record(
            conn,
            Some(plan.patient_id),
            AuditAction::Create,
            TARGET_RECURRING,
            Some(id),
            Some(plan.frequency.as_str()),
        )?;
        Ok(id)
    })
}

pub fn list_for_patient(
    conn: &MysqlConnection,
    patient_id: u64,
) -> BookingResult<Vec<RecurringAppointment>> {
    use crate::schema::recurring_appointments;

    let res = recurring_appointments::table
        .filter(recurring_appointments::patient_id.eq(patient_id))
        .order(recurring_appointments::start_date.asc())
        .get_results::<RecurringAppointment>(conn)?;
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(start: (i32, u32, u32), end: Option<(i32, u32, u32)>) -> RecurringPlan {
        let date = |(y, m, d): (i32, u32, u32)| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        RecurringPlan {
            patient_id: 1,
            doctor_id: 2,
            specialization_id: None,
            frequency: Frequency::Weekly,
            preferred_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            start_date: date(start),
            end_date: end.map(date),
        }
    }

    #[test]
    fn open_ended_and_same_day_plans_are_valid() {
        assert!(validate_plan(&plan((2024, 1, 1), None)).is_ok());
        assert!(validate_plan(&plan((2024, 1, 1), Some((2024, 1, 1)))).is_ok());
    }

    #[test]
    fn end_before_start_is_rejected() {
        assert!(matches!(
            validate_plan(&plan((2024, 2, 1), Some((2024, 1, 31)))),
            Err(BookingError::Validation(_))
        ));
    }
}
