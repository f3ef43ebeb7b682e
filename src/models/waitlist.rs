use crate::schema::waitlist;
use chrono::{NaiveDate, NaiveDateTime};

string_enum! {
    pub enum WaitlistStatus ("waitlist status") {
        Waiting => "waiting",
        Notified => "notified",
        Closed => "closed",
    }
}

#[derive(Queryable, Debug, Clone)]
pub struct WaitlistEntry {
    pub id: u64,
    pub patient_id: u64,
    pub doctor_id: Option<u64>,
    pub specialization_id: Option<u64>,
    pub preferred_date: Option<NaiveDate>,
    pub status: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "waitlist"]
pub struct NewWaitlistEntry {
    pub patient_id: u64,
    pub doctor_id: Option<u64>,
    pub specialization_id: Option<u64>,
    pub preferred_date: Option<NaiveDate>,
    pub status: String,
}
