use diesel::prelude::*;

use crate::{
    errors::{BookingError, BookingResult},
    models::{
        appointments::Appointment,
        availability::Availability,
        users::{Role, User},
    },
};

pub fn fetch_user(conn: &MysqlConnection, id: u64) -> BookingResult<User> {
    use crate::schema::users;

    users::table
        .find(id)
        .get_result::<User>(conn)
        .optional()?
        .ok_or(BookingError::UserNotFound(id))
}

fn check_role(user: User, role: Role) -> BookingResult<User> {
    if !user.is(role) {
        return Err(BookingError::validation(format!(
            "user {} is a {}, not a {}",
            user.id, user.role, role
        )));
    }
    if !user.is_active() {
        return Err(BookingError::validation(format!(
            "user {} is {}",
            user.id, user.status
        )));
    }
    Ok(user)
}

/// The user must exist, hold `role` and be active.
pub fn assert_role(conn: &MysqlConnection, id: u64, role: Role) -> BookingResult<User> {
    check_role(fetch_user(conn, id)?, role)
}

/// [`assert_role`] that keeps the user row locked until the transaction
/// ends. Writers that check-then-insert per user serialize on it.
pub fn lock_role(conn: &MysqlConnection, id: u64, role: Role) -> BookingResult<User> {
    use crate::schema::users;

    let user = users::table
        .find(id)
        .for_update()
        .get_result::<User>(conn)
        .optional()?
        .ok_or(BookingError::UserNotFound(id))?;
    check_role(user, role)
}

pub fn assert_user(conn: &MysqlConnection, id: u64) -> BookingResult<()> {
    use crate::schema::users;

    let res = users::table
        .filter(users::id.eq(id))
        .count()
        .get_result::<i64>(conn)?;
    if res == 0 {
        return Err(BookingError::UserNotFound(id));
    }
    Ok(())
}

pub fn assert_specialization(conn: &MysqlConnection, id: u64) -> BookingResult<()> {
    use crate::schema::specializations;

    let res = specializations::table
        .filter(specializations::id.eq(id))
        .count()
        .get_result::<i64>(conn)?;
    if res == 0 {
        return Err(BookingError::validation(format!(
            "specialization {} not found",
            id
        )));
    }
    Ok(())
}

pub fn fetch_slot(conn: &MysqlConnection, id: u64) -> BookingResult<Availability> {
    use crate::schema::availability;

    availability::table
        .find(id)
        .get_result::<Availability>(conn)
        .optional()?
        .ok_or(BookingError::SlotNotFound(id))
}

pub fn fetch_appointment(conn: &MysqlConnection, id: u64) -> BookingResult<Appointment> {
    use crate::schema::appointments;

    appointments::table
        .find(id)
        .get_result::<Appointment>(conn)
        .optional()?
        .ok_or(BookingError::AppointmentNotFound(id))
}

/// Takes the row lock on an appointment for the rest of the transaction.
pub fn lock_appointment(conn: &MysqlConnection, id: u64) -> BookingResult<Appointment> {
    use crate::schema::appointments;

    appointments::table
        .find(id)
        .for_update()
        .get_result::<Appointment>(conn)
        .optional()?
        .ok_or(BookingError::AppointmentNotFound(id))
}
