use crate::schema::feedback;
use chrono::NaiveDateTime;

pub const RATING_MIN: i32 = 1;
pub const RATING_MAX: i32 = 5;

#[derive(Queryable, Debug, Clone)]
pub struct Feedback {
    pub id: u64,
    pub appointment_id: u64,
    pub rating: i32,
    pub comments: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "feedback"]
pub struct NewFeedback {
    pub appointment_id: u64,
    pub rating: i32,
    pub comments: Option<String>,
}
