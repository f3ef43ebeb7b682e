use diesel::prelude::*;
use tracing::info;

use crate::{
    audit::{self, TARGET_USERS},
    database::{assert, last_id},
    errors::{BookingError, BookingResult},
    models::{
        audit_logs::AuditAction,
        users::{NewUser, Role, User, UserStatus},
    },
};

pub struct UserProfile {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
}

fn validate_profile(profile: &UserProfile) -> BookingResult<()> {
    if profile.full_name.trim().is_empty() {
        return Err(BookingError::validation("full name must not be empty"));
    }
    let email = profile.email.as_str();
    let well_formed = match email.find('@') {
        Some(at) => at > 0 && at + 1 < email.len() && !email.contains(char::is_whitespace),
        None => false,
    };
    if !well_formed {
        return Err(BookingError::validation(format!(
            "'{}' is not an email address",
            email
        )));
    }
    Ok(())
}

pub fn create_user(conn: &MysqlConnection, profile: UserProfile) -> BookingResult<u64> {
    use crate::schema::users;

    validate_profile(&profile)?;

    conn.transaction(|| {
        let res = users::table
            .filter(users::email.eq(&profile.email))
            .count()
            .get_result::<i64>(conn)?;
        if res > 0 {
            return Err(BookingError::validation(format!(
                "email {} is already registered",
                profile.email
            )));
        }

        let data = NewUser {
            full_name: profile.full_name,
            email: profile.email,
            phone: profile.phone,
            role: profile.role.as_str().to_string(),
            status: UserStatus::Active.as_str().to_string(),
        };
        diesel::insert_into(users::table)
            .values(&data)
            .execute(conn)?;
        let id = last_id(conn)?;

        audit::record(
            conn,
            None,
            AuditAction::Create,
            TARGET_USERS,
            Some(id),
            Some(&format!("{} {}", data.role, data.email)),
        )?;
        Ok(id)
    })
}

pub fn get_user(conn: &MysqlConnection, id: u64) -> BookingResult<User> {
    assert::fetch_user(conn, id)
}

pub fn set_user_status(
    conn: &MysqlConnection,
    id: u64,
    status: UserStatus,
    actor: Option<u64>,
) -> BookingResult<()> {
    use crate::schema::users;

    conn.transaction(|| {
        assert::assert_user(conn, id)?;
        diesel::update(users::table.find(id))
            .set(users::status.eq(status.as_str()))
            .execute(conn)?;
        audit::record(
            conn,
            actor,
            AuditAction::Update,
            TARGET_USERS,
            Some(id),
            Some(&format!("status -> {}", status)),
        )?;
        Ok(())
    })
}

/// Deletes a user that no appointment or recurring plan references.
///
/// Availability, specializations, notifications and waitlist rows go with
/// the user; audit entries stay with their actor nulled.
pub fn delete_user(conn: &MysqlConnection, id: u64, actor: Option<u64>) -> BookingResult<()> {
    use crate::schema::{appointments, recurring_appointments, users};

    conn.transaction(|| {
        users::table
            .find(id)
            .for_update()
            .get_result::<User>(conn)
            .optional()?
            .ok_or(BookingError::UserNotFound(id))?;

        let appos = appointments::table
            .filter(
                appointments::patient_id
                    .eq(id)
                    .or(appointments::doctor_id.eq(id)),
            )
            .count()
            .get_result::<i64>(conn)?;
        if appos > 0 {
            return Err(BookingError::ReferentialIntegrity(format!(
                "user {} is referenced by {} appointment(s)",
                id, appos
            )));
        }

        let plans = recurring_appointments::table
            .filter(
                recurring_appointments::patient_id
                    .eq(id)
                    .or(recurring_appointments::doctor_id.eq(id)),
            )
            .count()
            .get_result::<i64>(conn)?;
        if plans > 0 {
            return Err(BookingError::ReferentialIntegrity(format!(
                "user {} is referenced by {} recurring appointment(s)",
                id, plans
            )));
        }

        // written first so a self-deletion still leaves a (nulled) trace
        audit::record(conn, actor, AuditAction::Delete, TARGET_USERS, Some(id), None)?;
        diesel::delete(users::table.find(id)).execute(conn)?;

        info!(user_id = id, "user deleted");
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str, email: &str) -> UserProfile {
        UserProfile {
            full_name: name.to_string(),
            email: email.to_string(),
            phone: None,
            role: Role::Patient,
        }
    }

    #[test]
    fn accepts_plain_addresses() {
        assert!(validate_profile(&profile("Ada", "ada@example.org")).is_ok());
    }

    #[test]
    fn rejects_malformed_profiles() {
        for (name, email) in [
            ("", "ada@example.org"),
            ("Ada", "ada.example.org"),
            ("Ada", "@example.org"),
            ("Ada", "ada@"),
            ("Ada", "ada @example.org"),
        ]
        .iter()
        {
            assert!(
                matches!(
                    validate_profile(&profile(name, email)),
                    Err(BookingError::Validation(_))
                ),
                "{:?} / {:?}",
                name,
                email
            );
        }
    }
}
