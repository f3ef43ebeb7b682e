use crate::schema::notifications;
use chrono::NaiveDateTime;

string_enum! {
    pub enum NotificationKind ("notification type") {
        BookingConfirm => "booking_confirm",
        Reminder => "reminder",
        RescheduleConfirm => "reschedule_confirm",
        Cancellation => "cancellation",
    }
}

string_enum! {
    pub enum NotificationStatus ("notification status") {
        Pending => "pending",
        Sent => "sent",
        Failed => "failed",
    }
}

#[derive(Queryable, Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub user_id: u64,
    pub appointment_id: Option<u64>,
    pub kind: String,
    pub status: String,
    pub message: String,
    pub created_at: NaiveDateTime,
    pub sent_at: Option<NaiveDateTime>,
}

#[derive(Insertable)]
#[table_name = "notifications"]
pub struct NewNotification {
    pub user_id: u64,
    pub appointment_id: Option<u64>,
    pub kind: String,
    pub status: String,
    pub message: String,
}
