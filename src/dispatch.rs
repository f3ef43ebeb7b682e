//! Notification rows and the seam to whatever delivers them.
//!
//! The booking core only ever writes `pending` rows. A [`Dispatcher`]
//! picks them up and each row ends as `sent` or `failed`. Claiming uses
//! `SKIP LOCKED`, which needs MySQL 8.0.

use chrono::Utc;
use diesel::prelude::*;
use tracing::{info, warn};

use crate::{
    database::last_id,
    errors::BookingResult,
    models::notifications::{NewNotification, Notification, NotificationKind, NotificationStatus},
};

/// Delivers one notification over some channel (email, SMS, push).
pub trait Dispatcher {
    fn deliver(&self, notification: &Notification) -> anyhow::Result<()>;
}

/// Writes notifications to the log instead of sending them.
pub struct LogDispatcher;

impl Dispatcher for LogDispatcher {
    fn deliver(&self, notification: &Notification) -> anyhow::Result<()> {
        info!(
            notification_id = notification.id,
            user_id = notification.user_id,
            kind = notification.kind.as_str(),
            "{}",
            notification.message
        );
        Ok(())
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub sent: usize,
    pub failed: usize,
}

pub fn insert(
    conn: &MysqlConnection,
    user_id: u64,
    appointment_id: Option<u64>,
    kind: NotificationKind,
    status: NotificationStatus,
    message: String,
) -> BookingResult<u64> {
    use crate::schema::notifications;

    let data = NewNotification {
        user_id,
        appointment_id,
        kind: kind.as_str().to_string(),
        status: status.as_str().to_string(),
        message,
    };
    diesel::insert_into(notifications::table)
        .values(&data)
        .execute(conn)?;
    let id = last_id(conn)?;
    Ok(id)
}

pub fn enqueue(
    conn: &MysqlConnection,
    user_id: u64,
    appointment_id: Option<u64>,
    kind: NotificationKind,
    message: String,
) -> BookingResult<u64> {
    insert(
        conn,
        user_id,
        appointment_id,
        kind,
        NotificationStatus::Pending,
        message,
    )
}

pub fn pending(conn: &MysqlConnection, limit: i64) -> BookingResult<Vec<Notification>> {
    use crate::schema::notifications;

    let res = notifications::table
        .filter(notifications::status.eq(NotificationStatus::Pending.as_str()))
        .order(notifications::id.asc())
        .limit(limit)
        .get_results::<Notification>(conn)?;
    Ok(res)
}

/// Settles a pending row. Returns `false` when another dispatcher got there
/// first.
pub fn mark(
    conn: &MysqlConnection,
    notification_id: u64,
    status: NotificationStatus,
) -> BookingResult<bool> {
    use crate::schema::notifications;

    let sent_at = match status {
        NotificationStatus::Sent => Some(Utc::now().naive_utc()),
        _ => None,
    };
    let res = diesel::update(
        notifications::table
            .filter(notifications::id.eq(notification_id))
            .filter(notifications::status.eq(NotificationStatus::Pending.as_str())),
    )
    .set((
        notifications::status.eq(status.as_str()),
        notifications::sent_at.eq(sent_at),
    ))
    .execute(conn)?;
    Ok(res == 1)
}

/// Locks up to `limit` pending rows for the rest of the transaction.
/// Rows another dispatcher already holds are skipped, not waited on.
pub fn claim_pending(conn: &MysqlConnection, limit: i64) -> BookingResult<Vec<Notification>> {
    use crate::schema::notifications;

    let res = notifications::table
        .filter(notifications::status.eq(NotificationStatus::Pending.as_str()))
        .order(notifications::id.asc())
        .limit(limit)
        .for_update()
        .skip_locked()
        .get_results::<Notification>(conn)?;
    Ok(res)
}

/// Delivers a batch of pending notifications and settles each row.
///
/// The batch is claimed before any delivery, so concurrent dispatchers
/// (one per server instance) never send the same row twice.
pub fn dispatch_pending<D: Dispatcher + ?Sized>(
    conn: &MysqlConnection,
    dispatcher: &D,
    limit: i64,
) -> BookingResult<DispatchReport> {
    conn.transaction(|| {
        let mut report = DispatchReport::default();

        for notification in claim_pending(conn, limit)? {
            let status = match dispatcher.deliver(&notification) {
                Ok(()) => NotificationStatus::Sent,
                Err(err) => {
                    warn!(notification_id = notification.id, "delivery failed: {:#}", err);
                    NotificationStatus::Failed
                }
            };
            if mark(conn, notification.id, status)? {
                match status {
                    NotificationStatus::Sent => report.sent += 1,
                    _ => report.failed += 1,
                }
            }
        }
        Ok(report)
    })
}
