use serde::Serialize;

#[derive(Default, Serialize)]
pub struct AuditItem {
    pub id: u64,
    pub user_id: Option<u64>,
    pub action: String,
    pub target_table: String,
    pub target_id: Option<u64>,
    pub detail: String,
    pub time: String,
}

#[derive(Default, Serialize)]
pub struct AuditTrailResponse {
    pub success: bool,
    pub err: String,
    pub logs: Vec<AuditItem>,
}

#[derive(Default, Serialize)]
pub struct WaitlistItem {
    pub id: u64,
    pub patient_id: u64,
    pub doctor_id: Option<u64>,
    pub specialization_id: Option<u64>,
    pub preferred_date: String,
    pub time: String,
}

#[derive(Default, Serialize)]
pub struct SearchWaitlistResponse {
    pub success: bool,
    pub err: String,
    pub entries: Vec<WaitlistItem>,
}

crate::impl_err_response! {
    AuditTrailResponse,
    SearchWaitlistResponse,
}
