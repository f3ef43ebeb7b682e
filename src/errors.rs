use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

use crate::models::appointments::AppointmentStatus;

/// Failure kinds surfaced by the booking core.
///
/// Every variant carries the ids involved so the presentation layer can
/// build its own message.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("availability slot {slot_id} is already taken by appointment {holder}, pick another slot")]
    SlotConflict { slot_id: u64, holder: u64 },

    #[error("availability slot {0} not found")]
    SlotNotFound(u64),

    #[error("appointment {0} not found")]
    AppointmentNotFound(u64),

    #[error("user {0} not found")]
    UserNotFound(u64),

    #[error("appointment {appointment_id} is {current} and cannot become {requested}")]
    InvalidStateTransition {
        appointment_id: u64,
        current: AppointmentStatus,
        requested: AppointmentStatus,
    },

    #[error("referential integrity: {0}")]
    ReferentialIntegrity(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("timed out waiting for a row lock, retry the operation")]
    LockTimeout,

    #[error("database error: {0}")]
    Database(#[source] DieselError),
}

impl BookingError {
    pub fn validation<S: ToString>(msg: S) -> Self {
        BookingError::Validation(msg.to_string())
    }

    /// Only lock contention is worth retrying unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BookingError::LockTimeout)
    }
}

// MySQL 1205 (lock wait timeout) and 1213 (deadlock victim) arrive as
// unclassified database errors, so they are recognised by message.
const LOCK_WAIT_MSG: &str = "Lock wait timeout exceeded";
const DEADLOCK_MSG: &str = "Deadlock found";

impl From<DieselError> for BookingError {
    fn from(err: DieselError) -> Self {
        match &err {
            DieselError::DatabaseError(kind, info) => {
                let msg = info.message();
                if msg.contains(LOCK_WAIT_MSG) || msg.contains(DEADLOCK_MSG) {
                    BookingError::LockTimeout
                } else if let DatabaseErrorKind::ForeignKeyViolation = kind {
                    BookingError::ReferentialIntegrity(msg.to_string())
                } else if let DatabaseErrorKind::UniqueViolation = kind {
                    BookingError::Validation(msg.to_string())
                } else {
                    BookingError::Database(err)
                }
            }
            _ => BookingError::Database(err),
        }
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
