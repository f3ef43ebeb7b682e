use crate::schema::audit_logs;
use chrono::NaiveDateTime;

string_enum! {
    pub enum AuditAction ("audit action") {
        Create => "create",
        Update => "update",
        Delete => "delete",
        Cancel => "cancel",
        Reschedule => "reschedule",
    }
}

#[derive(Queryable, Debug, Clone)]
pub struct AuditLog {
    pub id: u64,
    pub user_id: Option<u64>,
    pub action: String,
    pub target_table: String,
    pub target_id: Option<u64>,
    pub detail: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "audit_logs"]
pub struct NewAuditLog {
    pub user_id: Option<u64>,
    pub action: String,
    pub target_table: String,
    pub target_id: Option<u64>,
    pub detail: Option<String>,
}
