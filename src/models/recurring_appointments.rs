use crate::schema::recurring_appointments;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

string_enum! {
    pub enum Frequency ("frequency") {
        Weekly => "weekly",
        Biweekly => "biweekly",
        Monthly => "monthly",
    }
}

#[derive(Queryable, Debug, Clone)]
pub struct RecurringAppointment {
    pub id: u64,
    pub patient_id: u64,
    pub doctor_id: u64,
    pub specialization_id: Option<u64>,
    pub frequency: String,
    pub preferred_time: NaiveTime,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "recurring_appointments"]
pub struct NewRecurringAppointment {
    pub patient_id: u64,
    pub doctor_id: u64,
    pub specialization_id: Option<u64>,
    pub frequency: String,
    pub preferred_time: NaiveTime,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}
