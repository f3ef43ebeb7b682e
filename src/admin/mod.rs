mod requests;
mod responses;

use crate::{
    audit, booking, database,
    models::{
        users::{Role, UserStatus},
        waitlist::WaitlistStatus,
    },
    protocol::{IdResponse, SimpleResponse},
    store::{
        specializations,
        users::{self, UserProfile},
        waitlist,
    },
    DbPool,
};
use actix_web::{post, web, HttpResponse, Responder};
use anyhow::bail;

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(add_user)
        .service(delete_user)
        .service(set_user_status)
        .service(add_specialization)
        .service(delete_specialization)
        .service(assign_specialization)
        .service(send_notification)
        .service(audit_trail)
        .service(search_waitlist);
}

crate::post_funcs! {
    (add_user, "/add_user", AddUserRequest, IdResponse),
    (delete_user, "/delete_user", DeleteUserRequest, SimpleResponse),
    (set_user_status, "/set_user_status", SetUserStatusRequest, SimpleResponse),
    (add_specialization, "/add_specialization", AddSpecializationRequest, IdResponse),
    (delete_specialization, "/delete_specialization", DeleteSpecializationRequest, SimpleResponse),
    (assign_specialization, "/assign_specialization", AssignSpecializationRequest, SimpleResponse),
    (send_notification, "/send_notification", SendNotificationRequest, IdResponse),
    (audit_trail, "/audit_trail", AuditTrailRequest, AuditTrailResponse),
    (search_waitlist, "/search_waitlist", SearchWaitlistRequest, SearchWaitlistResponse),
}

async fn add_user_impl(
    pool: web::Data<DbPool>,
    info: web::Json<AddUserRequest>,
) -> anyhow::Result<IdResponse> {
    let info = info.into_inner();
    let profile = UserProfile {
        full_name: info.full_name,
        email: info.email,
        phone: info.phone,
        role: info.role.parse::<Role>()?,
    };

    let id = database::run(&pool, move |conn| users::create_user(conn, profile)).await?;

    Ok(IdResponse::ok(id))
}

async fn delete_user_impl(
    pool: web::Data<DbPool>,
    info: web::Json<DeleteUserRequest>,
) -> anyhow::Result<SimpleResponse> {
    let info = info.into_inner();
    database::run(&pool, move |conn| {
        users::delete_user(conn, info.user_id, info.acting_user_id)
    })
    .await?;

    Ok(SimpleResponse::ok())
}

async fn set_user_status_impl(
    pool: web::Data<DbPool>,
    info: web::Json<SetUserStatusRequest>,
) -> anyhow::Result<SimpleResponse> {
    let info = info.into_inner();
    let status = info.status.parse::<UserStatus>()?;
    database::run(&pool, move |conn| {
        users::set_user_status(conn, info.user_id, status, info.acting_user_id)
    })
    .await?;

    Ok(SimpleResponse::ok())
}

async fn add_specialization_impl(
    pool: web::Data<DbPool>,
    info: web::Json<AddSpecializationRequest>,
) -> anyhow::Result<IdResponse> {
    let info = info.into_inner();
    let id = database::run(&pool, move |conn| {
        specializations::create_specialization(conn, &info.name, info.description.as_deref())
    })
    .await?;

    Ok(IdResponse::ok(id))
}

async fn delete_specialization_impl(
    pool: web::Data<DbPool>,
    info: web::Json<DeleteSpecializationRequest>,
) -> anyhow::Result<SimpleResponse> {
    let info = info.into_inner();
    database::run(&pool, move |conn| {
        specializations::delete_specialization(conn, info.specialization_id, info.acting_user_id)
    })
    .await?;

    Ok(SimpleResponse::ok())
}

async fn assign_specialization_impl(
    pool: web::Data<DbPool>,
    info: web::Json<AssignSpecializationRequest>,
) -> anyhow::Result<SimpleResponse> {
    let info = info.into_inner();
    database::run(&pool, move |conn| {
        specializations::assign_specialization(conn, info.doctor_id, info.specialization_id)
    })
    .await?;

    Ok(SimpleResponse::ok())
}

async fn send_notification_impl(
    pool: web::Data<DbPool>,
    info: web::Json<SendNotificationRequest>,
) -> anyhow::Result<IdResponse> {
    let info = info.into_inner();
    let id = database::run(&pool, move |conn| {
        booking::send_notification(
            conn,
            info.user_id,
            info.appointment_id,
            &info.kind,
            &info.status,
            info.message.as_deref(),
        )
    })
    .await?;

    Ok(IdResponse::ok(id))
}

async fn audit_trail_impl(
    pool: web::Data<DbPool>,
    info: web::Json<AuditTrailRequest>,
) -> anyhow::Result<AuditTrailResponse> {
    let info = info.into_inner();
    let first_index = info.first_index.unwrap_or(0).max(0);
    let limit = info.limit.unwrap_or(30).max(0);

    let logs = match (info.target_table, info.target_id, info.user_id) {
        (Some(target_table), Some(target_id), _) => {
            database::run(&pool, move |conn| {
                audit::list_for_target(conn, &target_table, target_id)
            })
            .await?
        }
        (None, None, Some(user_id)) => {
            database::run(&pool, move |conn| {
                audit::list_by_user(conn, user_id, first_index, limit)
            })
            .await?
        }
        _ => bail!("Give either 'target_table' with 'target_id', or 'user_id'"),
    };

    let logs = logs
        .into_iter()
        .map(|data| AuditItem {
            id: data.id,
            user_id: data.user_id,
            action: data.action,
            target_table: data.target_table,
            target_id: data.target_id,
            detail: data.detail.unwrap_or_default(),
            time: crate::utils::format_time_str(&data.created_at),
        })
        .collect();

    Ok(AuditTrailResponse {
        success: true,
        err: "".to_string(),
        logs,
    })
}

async fn search_waitlist_impl(
    pool: web::Data<DbPool>,
    info: web::Json<SearchWaitlistRequest>,
) -> anyhow::Result<SearchWaitlistResponse> {
    let info = info.into_inner();
    let status = match info.status {
        Some(ref status) => status.parse::<WaitlistStatus>()?,
        None => WaitlistStatus::Waiting,
    };

    let entries = database::run(&pool, move |conn| {
        waitlist::list_waitlist(conn, info.doctor_id, info.specialization_id, status)
    })
    .await?;

    let entries = entries
        .into_iter()
        .map(|data| WaitlistItem {
            id: data.id,
            patient_id: data.patient_id,
            doctor_id: data.doctor_id,
            specialization_id: data.specialization_id,
            preferred_date: data
                .preferred_date
                .map(|date| date.to_string())
                .unwrap_or_default(),
            time: crate::utils::format_time_str(&data.created_at),
        })
        .collect();

    Ok(SearchWaitlistResponse {
        success: true,
        err: "".to_string(),
        entries,
    })
}
