use diesel::prelude::*;

use crate::{
    audit::{self, TARGET_SPECIALIZATIONS},
    database::{assert, last_id},
    errors::{BookingError, BookingResult},
    models::{
        audit_logs::AuditAction,
        specializations::{DoctorSpecialization, NewSpecialization, Specialization},
        users::Role,
    },
};

pub fn create_specialization(
    conn: &MysqlConnection,
    name: &str,
    description: Option<&str>,
) -> BookingResult<u64> {
    use crate::schema::specializations;

    let name = name.trim();
    if name.is_empty() {
        return Err(BookingError::validation("specialization name must not be empty"));
    }

    conn.transaction(|| {
        let res = specializations::table
            .filter(specializations::name.eq(name))
            .count()
            .get_result::<i64>(conn)?;
        if res > 0 {
            return Err(BookingError::validation(format!(
                "specialization '{}' already exists",
                name
            )));
        }

        let data = NewSpecialization {
            name: name.to_string(),
            description: description.map(str::to_string),
        };
        diesel::insert_into(specializations::table)
            .values(&data)
            .execute(conn)?;
        let id = last_id(conn)?;
        audit::record(
            conn,
            None,
            AuditAction::Create,
            TARGET_SPECIALIZATIONS,
            Some(id),
            Some(name),
        )?;
        Ok(id)
    })
}

/// Doctor links cascade away, recurring plans and waitlist entries keep
/// their row with the specialization nulled.
pub fn delete_specialization(
    conn: &MysqlConnection,
    id: u64,
    actor: Option<u64>,
) -> BookingResult<()> {
    use crate::schema::specializations;

    conn.transaction(|| {
        assert::assert_specialization(conn, id)?;
        diesel::delete(specializations::table.find(id)).execute(conn)?;
        audit::record(
            conn,
            actor,
            AuditAction::Delete,
            TARGET_SPECIALIZATIONS,
            Some(id),
            None,
        )?;
        Ok(())
    })
}

pub fn assign_specialization(
    conn: &MysqlConnection,
    doctor_id: u64,
    specialization_id: u64,
) -> BookingResult<()> {
    use crate::schema::doctor_specializations;

    conn.transaction(|| {
        assert::assert_role(conn, doctor_id, Role::Doctor)?;
        assert::assert_specialization(conn, specialization_id)?;

        let res = doctor_specializations::table
            .find((doctor_id, specialization_id))
            .count()
            .get_result::<i64>(conn)?;
        if res > 0 {
            return Err(BookingError::validation(format!(
                "doctor {} already has specialization {}",
                doctor_id, specialization_id
            )));
        }

        diesel::insert_into(doctor_specializations::table)
            .values(&DoctorSpecialization {
                doctor_id,
                specialization_id,
            })
            .execute(conn)?;
        audit::record(
            conn,
            Some(doctor_id),
            AuditAction::Create,
            "doctor_specializations",
            Some(specialization_id),
            None,
        )?;
        Ok(())
    })
}

pub fn list_for_doctor(conn: &MysqlConnection, doctor_id: u64) -> BookingResult<Vec<Specialization>> {
    use crate::schema::{doctor_specializations, specializations};

    let res = specializations::table
        .inner_join(doctor_specializations::table)
        .filter(doctor_specializations::doctor_id.eq(doctor_id))
        .select(specializations::all_columns)
        .order(specializations::name.asc())
        .get_results::<Specialization>(conn)?;
    Ok(res)
}
