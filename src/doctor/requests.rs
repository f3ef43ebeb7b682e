use serde::Deserialize;

#[derive(Deserialize)]
pub struct AddTimeRequest {
    pub doctor_id: u64,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Deserialize)]
pub struct DeleteTimeRequest {
    pub doctor_id: u64,
    pub availability_id: u64,
}

#[derive(Deserialize)]
pub struct SearchTimeRequest {
    pub doctor_id: u64,
    pub date: Option<String>,
}

#[derive(Deserialize)]
pub struct RecordConsultationRequest {
    pub doctor_id: u64,
    pub appointment_id: u64,
    pub notes: String,
    pub prescription: Option<String>,
    pub outcome: Option<String>,
}
