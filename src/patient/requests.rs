use serde::Deserialize;

#[derive(Deserialize)]
pub struct AppointRequest {
    pub patient_id: u64,
    pub doctor_id: u64,
    pub availability_id: u64,
    pub link_prefix: Option<String>,
    pub expires_at: Option<String>,
    pub log_detail: Option<String>,
}

#[derive(Deserialize)]
pub struct RescheduleAppointRequest {
    pub appointment_id: u64,
    pub availability_id: u64,
    pub acting_user_id: Option<u64>,
    pub log_detail: Option<String>,
}

#[derive(Deserialize)]
pub struct CancelAppointRequest {
    pub appointment_id: u64,
    pub acting_user_id: Option<u64>,
    pub log_detail: Option<String>,
}

#[derive(Deserialize)]
pub struct ViewAppointRequest {
    pub appointment_id: u64,
}

#[derive(Deserialize)]
pub struct OpenSlotsRequest {
    pub doctor_id: Option<u64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub first_index: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct LeaveFeedbackRequest {
    pub appointment_id: u64,
    pub patient_id: u64,
    pub rating: i32,
    pub comments: Option<String>,
}

#[derive(Deserialize)]
pub struct JoinWaitlistRequest {
    pub patient_id: u64,
    pub doctor_id: Option<u64>,
    pub specialization_id: Option<u64>,
    pub preferred_date: Option<String>,
}

#[derive(Deserialize)]
pub struct AddRecurringRequest {
    pub patient_id: u64,
    pub doctor_id: u64,
    pub specialization_id: Option<u64>,
    pub frequency: String,
    pub preferred_time: String,
    pub start_date: String,
    pub end_date: Option<String>,
}
