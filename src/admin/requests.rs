use serde::Deserialize;

#[derive(Deserialize)]
pub struct AddUserRequest {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
}

#[derive(Deserialize)]
pub struct DeleteUserRequest {
    pub user_id: u64,
    pub acting_user_id: Option<u64>,
}

#[derive(Deserialize)]
pub struct SetUserStatusRequest {
    pub user_id: u64,
    pub status: String,
    pub acting_user_id: Option<u64>,
}

#[derive(Deserialize)]
pub struct AddSpecializationRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct DeleteSpecializationRequest {
    pub specialization_id: u64,
    pub acting_user_id: Option<u64>,
}

#[derive(Deserialize)]
pub struct AssignSpecializationRequest {
    pub doctor_id: u64,
    pub specialization_id: u64,
}

#[derive(Deserialize)]
pub struct SendNotificationRequest {
    pub user_id: u64,
    pub appointment_id: Option<u64>,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    pub message: Option<String>,
}

#[derive(Deserialize)]
pub struct AuditTrailRequest {
    pub target_table: Option<String>,
    pub target_id: Option<u64>,
    pub user_id: Option<u64>,
    pub first_index: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct SearchWaitlistRequest {
    pub doctor_id: Option<u64>,
    pub specialization_id: Option<u64>,
    pub status: Option<String>,
}
