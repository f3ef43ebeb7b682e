//! Append-only audit trail. Rows are written inside the caller's
//! transaction and never updated or deleted from here.

use diesel::prelude::*;
use tracing::debug;

use crate::{
    database::last_id,
    errors::BookingResult,
    models::audit_logs::{AuditAction, AuditLog, NewAuditLog},
};

pub const TARGET_USERS: &str = "users";
pub const TARGET_SPECIALIZATIONS: &str = "specializations";
pub const TARGET_AVAILABILITY: &str = "availability";
pub const TARGET_APPOINTMENTS: &str = "appointments";
pub const TARGET_CONSULTATIONS: &str = "consultations";
pub const TARGET_FEEDBACK: &str = "feedback";
pub const TARGET_RECURRING: &str = "recurring_appointments";
pub const TARGET_WAITLIST: &str = "waitlist";

/// `actor` is `None` for system actions.
pub fn record(
    conn: &MysqlConnection,
    actor: Option<u64>,
    action: AuditAction,
    target_table: &str,
    target_id: Option<u64>,
    detail: Option<&str>,
) -> BookingResult<u64> {
    use crate::schema::audit_logs;

    let data = NewAuditLog {
        user_id: actor,
        action: action.as_str().to_string(),
        target_table: target_table.to_string(),
        target_id,
        detail: detail.map(str::to_string),
    };
    diesel::insert_into(audit_logs::table)
        .values(&data)
        .execute(conn)?;
    let id = last_id(conn)?;

    debug!(
        audit_id = id,
        action = action.as_str(),
        target_table,
        ?target_id,
        ?actor,
        "audit entry appended"
    );
    Ok(id)
}

pub fn list_for_target(
    conn: &MysqlConnection,
    target_table: &str,
    target_id: u64,
) -> BookingResult<Vec<AuditLog>> {
    use crate::schema::audit_logs;

    let logs = audit_logs::table
        .filter(audit_logs::target_table.eq(target_table))
        .filter(audit_logs::target_id.eq(target_id))
        .order(audit_logs::id.asc())
        .get_results::<AuditLog>(conn)?;
    Ok(logs)
}

pub fn list_by_user(
    conn: &MysqlConnection,
    user_id: u64,
    first_index: i64,
    limit: i64,
) -> BookingResult<Vec<AuditLog>> {
    use crate::schema::audit_logs;

    let logs = audit_logs::table
        .filter(audit_logs::user_id.eq(user_id))
        .order(audit_logs::id.desc())
        .offset(first_index)
        .limit(limit)
        .get_results::<AuditLog>(conn)?;
    Ok(logs)
}
