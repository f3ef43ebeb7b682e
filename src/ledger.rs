//! Slot ledger: which appointment holds an availability slot.
//!
//! Booked state is derived from the `appointments.availability_id` unique
//! column. Claiming always locks the slot row first, so two transactions
//! racing for one slot are serialized and the loser sees the winner's row.

use diesel::{
    prelude::*,
    result::{DatabaseErrorKind, Error as DieselError},
};
use tracing::{debug, info};

use crate::{
    errors::{BookingError, BookingResult},
    models::availability::Availability,
};

/// Appointment currently bound to `slot_id`, if any.
///
/// A plain read. Under the slot row lock it sees every claim committed
/// before the lock was granted, and it takes no gap lock on the unique
/// index.
pub fn holder(conn: &MysqlConnection, slot_id: u64) -> BookingResult<Option<u64>> {
    use crate::schema::appointments;

    let id = appointments::table
        .filter(appointments::availability_id.eq(slot_id))
        .select(appointments::id)
        .get_result::<u64>(conn)
        .optional()?;
    Ok(id)
}

pub fn is_claimed(conn: &MysqlConnection, slot_id: u64) -> BookingResult<bool> {
    use crate::schema::appointments;

    let res = appointments::table
        .filter(appointments::availability_id.eq(slot_id))
        .count()
        .get_result::<i64>(conn)?;
    Ok(res > 0)
}

/// Locks the slot row and fails unless no appointment references it.
pub fn lock_unclaimed(conn: &MysqlConnection, slot_id: u64) -> BookingResult<Availability> {
    use crate::schema::availability;

    let slot = availability::table
        .find(slot_id)
        .for_update()
        .get_result::<Availability>(conn)
        .optional()?
        .ok_or(BookingError::SlotNotFound(slot_id))?;

    if let Some(holder) = holder(conn, slot_id)? {
        info!(slot_id, holder, "slot already claimed");
        return Err(BookingError::SlotConflict { slot_id, holder });
    }
    Ok(slot)
}

/// Binds an existing appointment to `slot_id`.
pub fn claim(
    conn: &MysqlConnection,
    slot_id: u64,
    appointment_id: u64,
) -> BookingResult<Availability> {
    use crate::schema::appointments;

    let slot = lock_unclaimed(conn, slot_id)?;
    diesel::update(appointments::table.find(appointment_id))
        .set(appointments::availability_id.eq(slot_id))
        .execute(conn)
        .map_err(|err| conflict_or(conn, err, slot_id))?;

    debug!(slot_id, appointment_id, "slot claimed");
    Ok(slot)
}

/// Reports a unique violation on `availability_id` as a slot conflict.
pub fn conflict_or(conn: &MysqlConnection, err: DieselError, slot_id: u64) -> BookingError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            let holder = holder(conn, slot_id).ok().flatten().unwrap_or_default();
            BookingError::SlotConflict { slot_id, holder }
        }
        err => err.into(),
    }
}
