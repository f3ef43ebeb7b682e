//! Booking operations.
//!
//! Each operation is one diesel transaction: the appointment row (and the
//! target slot row when one is claimed) is locked with `FOR UPDATE` for the
//! whole unit, and any `Err` rolls every write of the operation back.
//! Locks are always taken appointment first, slot second.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use tracing::{info, warn};

use crate::{
    audit::{self, TARGET_APPOINTMENTS, TARGET_CONSULTATIONS},
    config::DEFAULT_LINK_PREFIX,
    database::{assert, last_id},
    dispatch,
    errors::{BookingError, BookingResult},
    ledger,
    models::{
        appointments::{Appointment, AppointmentStatus, NewAppointment},
        audit_logs::AuditAction,
        availability::Availability,
        consultations::{Consultation, NewConsultation},
        notifications::{Notification, NotificationKind, NotificationStatus},
        users::Role,
        virtual_links::{NewVirtualLink, VirtualLink},
    },
    utils::{generate_link_url, link_prefix_of},
};

pub struct BookRequest {
    pub patient_id: u64,
    pub doctor_id: u64,
    pub availability_id: u64,
    pub link_prefix: String,
    /// Defaults to the end of the booked slot.
    pub expires_at: Option<NaiveDateTime>,
    pub log_detail: Option<String>,
}

pub struct ConsultationRecord {
    pub appointment_id: u64,
    pub notes: String,
    pub prescription: Option<String>,
    pub outcome: Option<String>,
    pub recorded_by: Option<u64>,
}

fn ensure_transition(appo: &Appointment, next: AppointmentStatus) -> BookingResult<AppointmentStatus> {
    let current = appo.status()?;
    if !current.can_transition_to(next) {
        warn!(
            appointment_id = appo.id,
            current = current.as_str(),
            requested = next.as_str(),
            "rejected status transition"
        );
        return Err(BookingError::InvalidStateTransition {
            appointment_id: appo.id,
            current,
            requested: next,
        });
    }
    Ok(current)
}

fn set_status(conn: &MysqlConnection, appointment_id: u64, status: AppointmentStatus) -> BookingResult<()> {
    use crate::schema::appointments;

    diesel::update(appointments::table.find(appointment_id))
        .set(appointments::status.eq(status.as_str()))
        .execute(conn)?;
    Ok(())
}

/// Books `availability_id` for a patient and returns the new appointment id.
///
/// A [`BookingError::SlotConflict`] means the slot is gone for good; callers
/// should list open slots again rather than retry.
pub fn book_appointment(conn: &MysqlConnection, req: &BookRequest) -> BookingResult<u64> {
    use crate::schema::{appointments, virtual_links};

    conn.transaction(|| {
        assert::assert_role(conn, req.patient_id, Role::Patient)?;
        assert::assert_role(conn, req.doctor_id, Role::Doctor)?;

        let slot = ledger::lock_unclaimed(conn, req.availability_id)?;
        if slot.doctor_id != req.doctor_id {
            return Err(BookingError::validation(format!(
                "availability slot {} belongs to doctor {}, not {}",
                slot.id, slot.doctor_id, req.doctor_id
            )));
        }

        let data = NewAppointment {
            patient_id: req.patient_id,
            doctor_id: req.doctor_id,
            availability_id: slot.id,
            status: AppointmentStatus::Scheduled.as_str().to_string(),
        };
        diesel::insert_into(appointments::table)
            .values(&data)
            .execute(conn)
            .map_err(|err| ledger::conflict_or(conn, err, slot.id))?;
        let appointment_id = last_id(conn)?;

        let link = NewVirtualLink {
            appointment_id,
            url: generate_link_url(&req.link_prefix, appointment_id),
            expires_at: req.expires_at.unwrap_or(slot.end_time),
        };
        diesel::insert_into(virtual_links::table)
            .values(&link)
            .execute(conn)?;

        audit::record(
            conn,
            Some(req.patient_id),
            AuditAction::Create,
            TARGET_APPOINTMENTS,
            Some(appointment_id),
            req.log_detail.as_deref(),
        )?;
        dispatch::enqueue(
            conn,
            req.patient_id,
            Some(appointment_id),
            NotificationKind::BookingConfirm,
            format!(
                "Appointment {} booked for {}, join at {}",
                appointment_id, slot.start_time, link.url
            ),
        )?;

        info!(
            appointment_id,
            slot_id = slot.id,
            patient_id = req.patient_id,
            "appointment booked"
        );
        Ok(appointment_id)
    })
}

/// Points the virtual link of an appointment at a fresh url that expires at
/// the end of `slot`. The row is updated in place.
fn regenerate_link(conn: &MysqlConnection, appointment_id: u64, slot: &Availability) -> BookingResult<String> {
    use crate::schema::virtual_links;

    let current = virtual_links::table
        .filter(virtual_links::appointment_id.eq(appointment_id))
        .for_update()
        .get_result::<VirtualLink>(conn)
        .optional()?;

    match current {
        Some(link) => {
            let prefix = link_prefix_of(&link.url).unwrap_or(DEFAULT_LINK_PREFIX);
            let url = generate_link_url(prefix, appointment_id);
            diesel::update(virtual_links::table.find(link.id))
                .set((
                    virtual_links::url.eq(&url),
                    virtual_links::expires_at.eq(slot.end_time),
                ))
                .execute(conn)?;
            Ok(url)
        }
        None => {
            let link = NewVirtualLink {
                appointment_id,
                url: generate_link_url(DEFAULT_LINK_PREFIX, appointment_id),
                expires_at: slot.end_time,
            };
            diesel::insert_into(virtual_links::table)
                .values(&link)
                .execute(conn)?;
            Ok(link.url)
        }
    }
}

/// Moves an open appointment to another unclaimed slot of the same doctor.
///
/// The slot it leaves is no longer referenced and becomes bookable again.
pub fn reschedule_appointment(
    conn: &MysqlConnection,
    appointment_id: u64,
    new_availability_id: u64,
    acting_user_id: Option<u64>,
    log_detail: Option<&str>,
) -> BookingResult<()> {
    conn.transaction(|| {
        let appo = assert::lock_appointment(conn, appointment_id)?;
        ensure_transition(&appo, AppointmentStatus::Rescheduled)?;

        if appo.availability_id == new_availability_id {
            return Err(BookingError::validation(format!(
                "appointment {} already holds availability slot {}",
                appointment_id, new_availability_id
            )));
        }
        let target = assert::fetch_slot(conn, new_availability_id)?;
        if target.doctor_id != appo.doctor_id {
            return Err(BookingError::validation(format!(
                "availability slot {} belongs to doctor {}, appointment {} is with doctor {}",
                target.id, target.doctor_id, appointment_id, appo.doctor_id
            )));
        }

        let slot = ledger::claim(conn, new_availability_id, appointment_id)?;
        set_status(conn, appointment_id, AppointmentStatus::Rescheduled)?;
        let url = regenerate_link(conn, appointment_id, &slot)?;

        let detail = match log_detail {
            Some(detail) => detail.to_string(),
            None => format!("slot {} -> {}", appo.availability_id, slot.id),
        };
        audit::record(
            conn,
            acting_user_id,
            AuditAction::Reschedule,
            TARGET_APPOINTMENTS,
            Some(appointment_id),
            Some(&detail),
        )?;
        dispatch::enqueue(
            conn,
            appo.patient_id,
            Some(appointment_id),
            NotificationKind::RescheduleConfirm,
            format!(
                "Appointment {} moved to {}, join at {}",
                appointment_id, slot.start_time, url
            ),
        )?;

        info!(
            appointment_id,
            from_slot = appo.availability_id,
            to_slot = slot.id,
            "appointment rescheduled"
        );
        Ok(())
    })
}

/// Cancels an open appointment. The slot stays bound to it.
pub fn cancel_appointment(
    conn: &MysqlConnection,
    appointment_id: u64,
    acting_user_id: Option<u64>,
    log_detail: Option<&str>,
) -> BookingResult<()> {
    conn.transaction(|| {
        let appo = assert::lock_appointment(conn, appointment_id)?;
        ensure_transition(&appo, AppointmentStatus::Cancelled)?;

        set_status(conn, appointment_id, AppointmentStatus::Cancelled)?;
        audit::record(
            conn,
            acting_user_id,
            AuditAction::Cancel,
            TARGET_APPOINTMENTS,
            Some(appointment_id),
            log_detail,
        )?;
        dispatch::enqueue(
            conn,
            appo.patient_id,
            Some(appointment_id),
            NotificationKind::Cancellation,
            format!("Appointment {} has been cancelled", appointment_id),
        )?;

        info!(appointment_id, "appointment cancelled");
        Ok(())
    })
}

/// Stores the consultation notes and completes the appointment.
/// Cancelled or already completed appointments are rejected.
pub fn record_consultation(conn: &MysqlConnection, record: &ConsultationRecord) -> BookingResult<u64> {
    use crate::schema::consultations;

    if record.notes.trim().is_empty() {
        return Err(BookingError::validation("consultation notes must not be empty"));
    }

    conn.transaction(|| {
        let appo = assert::lock_appointment(conn, record.appointment_id)?;
        ensure_transition(&appo, AppointmentStatus::Completed)?;

        let data = NewConsultation {
            appointment_id: appo.id,
            notes: record.notes.clone(),
            prescription: record.prescription.clone(),
            outcome: record.outcome.clone(),
            recorded_by: record.recorded_by,
        };
        diesel::insert_into(consultations::table)
            .values(&data)
            .execute(conn)?;
        let consultation_id = last_id(conn)?;

        set_status(conn, appo.id, AppointmentStatus::Completed)?;
        audit::record(
            conn,
            record.recorded_by,
            AuditAction::Create,
            TARGET_CONSULTATIONS,
            Some(consultation_id),
            Some(&format!("appointment {}", appo.id)),
        )?;

        info!(appointment_id = appo.id, consultation_id, "consultation recorded");
        Ok(consultation_id)
    })
}

/// Writes a notification row. `kind` and `status` are validated against
/// their closed sets before anything is touched.
pub fn send_notification(
    conn: &MysqlConnection,
    user_id: u64,
    appointment_id: Option<u64>,
    kind: &str,
    status: &str,
    message: Option<&str>,
) -> BookingResult<u64> {
    let kind = kind.parse::<NotificationKind>()?;
    let status = status.parse::<NotificationStatus>()?;

    conn.transaction(|| {
        assert::assert_user(conn, user_id)?;
        if let Some(appointment_id) = appointment_id {
            assert::fetch_appointment(conn, appointment_id)?;
        }
        let message = match message {
            Some(message) => message.to_string(),
            None => default_message(kind, appointment_id),
        };
        dispatch::insert(conn, user_id, appointment_id, kind, status, message)
    })
}

fn default_message(kind: NotificationKind, appointment_id: Option<u64>) -> String {
    let subject = match appointment_id {
        Some(id) => format!("appointment {}", id),
        None => "your appointment".to_string(),
    };
    match kind {
        NotificationKind::BookingConfirm => format!("Booking confirmed for {}", subject),
        NotificationKind::Reminder => format!("Reminder: {} is coming up", subject),
        NotificationKind::RescheduleConfirm => format!("{} has been rescheduled", subject),
        NotificationKind::Cancellation => format!("{} has been cancelled", subject),
    }
}

pub fn get_appointment(conn: &MysqlConnection, appointment_id: u64) -> BookingResult<Appointment> {
    assert::fetch_appointment(conn, appointment_id)
}

pub fn virtual_links_of(conn: &MysqlConnection, appointment_id: u64) -> BookingResult<Vec<VirtualLink>> {
    use crate::schema::virtual_links;

    let res = virtual_links::table
        .filter(virtual_links::appointment_id.eq(appointment_id))
        .get_results::<VirtualLink>(conn)?;
    Ok(res)
}

pub fn consultation_of(conn: &MysqlConnection, appointment_id: u64) -> BookingResult<Option<Consultation>> {
    use crate::schema::consultations;

    let res = consultations::table
        .filter(consultations::appointment_id.eq(appointment_id))
        .get_result::<Consultation>(conn)
        .optional()?;
    Ok(res)
}

pub fn notifications_of(conn: &MysqlConnection, appointment_id: u64) -> BookingResult<Vec<Notification>> {
    use crate::schema::notifications;

    let res = notifications::table
        .filter(notifications::appointment_id.eq(appointment_id))
        .order(notifications::id.asc())
        .get_results::<Notification>(conn)?;
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn appointment(status: AppointmentStatus) -> Appointment {
        let t = NaiveDate::from_ymd_opt(2024, 5, 2)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        Appointment {
            id: 11,
            patient_id: 3,
            doctor_id: 1,
            availability_id: 1,
            status: status.as_str().to_string(),
            created_at: t,
            updated_at: t,
        }
    }

    #[test]
    fn completed_appointment_cannot_be_cancelled() {
        match ensure_transition(&appointment(AppointmentStatus::Completed), AppointmentStatus::Cancelled) {
            Err(BookingError::InvalidStateTransition {
                appointment_id,
                current,
                requested,
            }) => {
                assert_eq!(appointment_id, 11);
                assert_eq!(current, AppointmentStatus::Completed);
                assert_eq!(requested, AppointmentStatus::Cancelled);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rescheduled_appointment_can_move_again() {
        let current = ensure_transition(
            &appointment(AppointmentStatus::Rescheduled),
            AppointmentStatus::Rescheduled,
        )
        .unwrap();
        assert_eq!(current, AppointmentStatus::Rescheduled);
    }

    #[test]
    fn corrupt_status_column_is_a_validation_error() {
        let mut appo = appointment(AppointmentStatus::Scheduled);
        appo.status = "pending".to_string();
        assert!(matches!(
            ensure_transition(&appo, AppointmentStatus::Cancelled),
            Err(BookingError::Validation(_))
        ));
    }

    #[test]
    fn default_messages_mention_the_appointment() {
        assert_eq!(
            default_message(NotificationKind::Cancellation, Some(4)),
            "appointment 4 has been cancelled"
        );
        assert_eq!(
            default_message(NotificationKind::Reminder, None),
            "Reminder: your appointment is coming up"
        );
    }
}
