use chrono::NaiveDate;
use diesel::prelude::*;

use crate::{
    audit::{self, TARGET_WAITLIST},
    database::{assert, last_id},
    errors::BookingResult,
    models::{
        audit_logs::AuditAction,
        users::Role,
        waitlist::{NewWaitlistEntry, WaitlistEntry, WaitlistStatus},
    },
};

pub fn join_waitlist(
    conn: &MysqlConnection,
    patient_id: u64,
    doctor_id: Option<u64>,
    specialization_id: Option<u64>,
    preferred_date: Option<NaiveDate>,
) -> BookingResult<u64> {
    use crate::schema::waitlist;

    conn.transaction(|| {
        assert::assert_role(conn, patient_id, Role::Patient)?;
        if let Some(doctor_id) = doctor_id {
            assert::assert_role(conn, doctor_id, Role::Doctor)?;
        }
        if let Some(specialization_id) = specialization_id {
            assert::assert_specialization(conn, specialization_id)?;
        }

        let data = NewWaitlistEntry {
            patient_id,
            doctor_id,
            specialization_id,
            preferred_date,
            status: WaitlistStatus::Waiting.as_str().to_string(),
        };
        diesel::insert_into(waitlist::table)
            .values(&data)
            .execute(conn)?;
        let id = last_id(conn)?;

        audit::record(
            conn,
            Some(patient_id),
            AuditAction::Create,
            TARGET_WAITLIST,
            Some(id),
            None,
        )?;
        Ok(id)
    })
}

/// Entries in `status`, oldest first.
pub fn list_waitlist(
    conn: &MysqlConnection,
    doctor_id: Option<u64>,
    specialization_id: Option<u64>,
    status: WaitlistStatus,
) -> BookingResult<Vec<WaitlistEntry>> {
    use crate::schema::waitlist;

    let mut query = waitlist::table
        .filter(waitlist::status.eq(status.as_str()))
        .into_boxed();
    if let Some(doctor_id) = doctor_id {
        query = query.filter(waitlist::doctor_id.eq(doctor_id));
    }
    if let Some(specialization_id) = specialization_id {
        query = query.filter(waitlist::specialization_id.eq(specialization_id));
    }

    let res = query
        .order(waitlist::id.asc())
        .get_results::<WaitlistEntry>(conn)?;
    Ok(res)
}
