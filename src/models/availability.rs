use crate::schema::availability;
use chrono::NaiveDateTime;

#[derive(Queryable, Debug, Clone)]
pub struct Availability {
    pub id: u64,
    pub doctor_id: u64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "availability"]
pub struct NewAvailability {
    pub doctor_id: u64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}
