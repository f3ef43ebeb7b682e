use serde::Serialize;

#[derive(Default, Serialize)]
pub struct ViewAppointResponse {
    pub success: bool,
    pub err: String,
    pub appointment_id: u64,
    pub patient_id: u64,
    pub doctor_id: u64,
    pub availability_id: u64,
    pub status: String,
    pub link: String,
    pub link_expires_at: String,
}

#[derive(Default, Serialize)]
pub struct OpenSlotItem {
    pub availability_id: u64,
    pub doctor_id: u64,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Default, Serialize)]
pub struct OpenSlotsResponse {
    pub success: bool,
    pub err: String,
    pub slots: Vec<OpenSlotItem>,
}

crate::impl_err_response! {
    ViewAppointResponse,
    OpenSlotsResponse,
}
