use crate::{errors::BookingResult, schema::appointments};
use chrono::NaiveDateTime;

string_enum! {
    /// Lifecycle of an appointment. `Completed` and `Cancelled` are terminal.
    pub enum AppointmentStatus ("appointment status") {
        Scheduled => "scheduled",
        Completed => "completed",
        Cancelled => "cancelled",
        Rescheduled => "rescheduled",
    }
}

impl AppointmentStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, AppointmentStatus::Completed | AppointmentStatus::Cancelled)
    }

    pub fn can_transition_to(self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;

        match (self, next) {
            (Scheduled, Rescheduled) | (Rescheduled, Rescheduled) => true,
            (Scheduled, Cancelled) | (Rescheduled, Cancelled) => true,
            (Scheduled, Completed) | (Rescheduled, Completed) => true,
            _ => false,
        }
    }
}

#[derive(Queryable, Debug, Clone)]
pub struct Appointment {
    pub id: u64,
    pub patient_id: u64,
    pub doctor_id: u64,
    pub availability_id: u64,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Appointment {
    pub fn status(&self) -> BookingResult<AppointmentStatus> {
        self.status.parse()
    }
}

#[derive(Insertable)]
#[table_name = "appointments"]
pub struct NewAppointment {
    pub patient_id: u64,
    pub doctor_id: u64,
    pub availability_id: u64,
    pub status: String,
}
