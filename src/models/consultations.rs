use crate::schema::consultations;
use chrono::NaiveDateTime;

#[derive(Queryable, Debug, Clone)]
pub struct Consultation {
    pub id: u64,
    pub appointment_id: u64,
    pub notes: String,
    pub prescription: Option<String>,
    pub outcome: Option<String>,
    pub recorded_by: Option<u64>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "consultations"]
pub struct NewConsultation {
    pub appointment_id: u64,
    pub notes: String,
    pub prescription: Option<String>,
    pub outcome: Option<String>,
    pub recorded_by: Option<u64>,
}
