use chrono::NaiveDateTime;
use diesel::prelude::*;
use tracing::info;

use crate::{
    audit::{self, TARGET_AVAILABILITY},
    database::{assert, last_id},
    errors::{BookingError, BookingResult},
    ledger,
    models::{
        audit_logs::AuditAction,
        availability::{Availability, NewAvailability},
        users::Role,
    },
};

/// Publishes a bookable interval for a doctor. Intervals of one doctor never
/// overlap.
pub fn add_availability(
    conn: &MysqlConnection,
    doctor_id: u64,
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
) -> BookingResult<u64> {
    use crate::schema::availability;

    if start_time >= end_time {
        return Err(BookingError::validation(format!(
            "slot must start before it ends ({} >= {})",
            start_time, end_time
        )));
    }

    conn.transaction(|| {
        // held until commit so a concurrent overlapping insert waits and
        // then sees this row
        assert::lock_role(conn, doctor_id, Role::Doctor)?;

        let res = availability::table
            .filter(availability::doctor_id.eq(doctor_id))
            .filter(availability::start_time.lt(end_time))
            .filter(availability::end_time.gt(start_time))
            .count()
            .get_result::<i64>(conn)?;
        if res > 0 {
            return Err(BookingError::validation(
                "time interval conflicts with existing availability",
            ));
        }

        let data = NewAvailability {
            doctor_id,
            start_time,
            end_time,
        };
        diesel::insert_into(availability::table)
            .values(&data)
            .execute(conn)?;
        let id = last_id(conn)?;

        audit::record(
            conn,
            Some(doctor_id),
            AuditAction::Create,
            TARGET_AVAILABILITY,
            Some(id),
            None,
        )?;
        Ok(id)
    })
}

/// Removes an unbooked slot. A slot an appointment ever claimed stays.
pub fn delete_availability(
    conn: &MysqlConnection,
    slot_id: u64,
    actor: Option<u64>,
) -> BookingResult<()> {
    use crate::schema::availability;

    conn.transaction(|| {
        match ledger::lock_unclaimed(conn, slot_id) {
            Ok(_) => {}
            Err(BookingError::SlotConflict { holder, .. }) => {
                return Err(BookingError::ReferentialIntegrity(format!(
                    "availability slot {} is referenced by appointment {}",
                    slot_id, holder
                )));
            }
            Err(err) => return Err(err),
        }

        diesel::delete(availability::table.find(slot_id)).execute(conn)?;
        audit::record(
            conn,
            actor,
            AuditAction::Delete,
            TARGET_AVAILABILITY,
            Some(slot_id),
            None,
        )?;

        info!(slot_id, "availability deleted");
        Ok(())
    })
}

/// Unclaimed slots inside `[from, to]`, earliest first.
pub fn list_open_slots(
    conn: &MysqlConnection,
    doctor_id: Option<u64>,
    from: NaiveDateTime,
    to: NaiveDateTime,
    first_index: i64,
    limit: i64,
) -> BookingResult<Vec<Availability>> {
    use crate::schema::{appointments, availability};

    let mut query = availability::table
        .filter(availability::id.ne_all(appointments::table.select(appointments::availability_id)))
        .filter(availability::start_time.ge(from))
        .filter(availability::end_time.le(to))
        .into_boxed();
    if let Some(doctor_id) = doctor_id {
        query = query.filter(availability::doctor_id.eq(doctor_id));
    }

    let slots = query
        .order(availability::start_time.asc())
        .offset(first_index)
        .limit(limit)
        .get_results::<Availability>(conn)?;
    Ok(slots)
}
