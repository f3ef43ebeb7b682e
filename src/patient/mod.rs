mod requests;
mod responses;

use crate::{
    booking::{self, BookRequest},
    database,
    models::recurring_appointments::Frequency,
    protocol::{IdResponse, SimpleResponse},
    store::{
        availability,
        feedback,
        recurring::{self, RecurringPlan},
        waitlist,
    },
    DbPool,
};
use actix_web::{post, web, HttpResponse, Responder};

use self::{requests::*, responses::*};

/// Url prefix for virtual links when a booking request names none.
pub struct LinkPrefix(pub String);

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(appoint)
        .service(reschedule_appoint)
        .service(cancel_appoint)
        .service(view_appoint)
        .service(open_slots)
        .service(leave_feedback)
        .service(join_waitlist)
        .service(add_recurring);
}

crate::post_funcs! {
    (reschedule_appoint, "/reschedule_appoint", RescheduleAppointRequest, SimpleResponse),
    (cancel_appoint, "/cancel_appoint", CancelAppointRequest, SimpleResponse),
    (view_appoint, "/view_appoint", ViewAppointRequest, ViewAppointResponse),
    (open_slots, "/open_slots", OpenSlotsRequest, OpenSlotsResponse),
    (leave_feedback, "/leave_feedback", LeaveFeedbackRequest, IdResponse),
    (join_waitlist, "/join_waitlist", JoinWaitlistRequest, IdResponse),
    (add_recurring, "/add_recurring", AddRecurringRequest, IdResponse),
}

#[post("/appoint")]
async fn appoint(
    pool: web::Data<DbPool>,
    prefix: web::Data<LinkPrefix>,
    info: web::Json<AppointRequest>,
) -> impl Responder {
    let response = match appoint_impl(pool, prefix, info).await {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(op = "appoint", "{:#}", err);
            IdResponse::err(err.to_string())
        }
    };
    HttpResponse::Ok().json(response)
}

async fn appoint_impl(
    pool: web::Data<DbPool>,
    prefix: web::Data<LinkPrefix>,
    info: web::Json<AppointRequest>,
) -> anyhow::Result<IdResponse> {
    let info = info.into_inner();
    let expires_at = info
        .expires_at
        .map(crate::utils::parse_time_str)
        .transpose()?;

    let req = BookRequest {
        patient_id: info.patient_id,
        doctor_id: info.doctor_id,
        availability_id: info.availability_id,
        link_prefix: info.link_prefix.unwrap_or_else(|| prefix.0.clone()),
        expires_at,
        log_detail: info.log_detail,
    };
    let id = database::run(&pool, move |conn| booking::book_appointment(conn, &req)).await?;

    Ok(IdResponse::ok(id))
}

async fn reschedule_appoint_impl(
    pool: web::Data<DbPool>,
    info: web::Json<RescheduleAppointRequest>,
) -> anyhow::Result<SimpleResponse> {
    let info = info.into_inner();
    database::run(&pool, move |conn| {
        booking::reschedule_appointment(
            conn,
            info.appointment_id,
            info.availability_id,
            info.acting_user_id,
            info.log_detail.as_deref(),
        )
    })
    .await?;

    Ok(SimpleResponse::ok())
}

async fn cancel_appoint_impl(
    pool: web::Data<DbPool>,
    info: web::Json<CancelAppointRequest>,
) -> anyhow::Result<SimpleResponse> {
    let info = info.into_inner();
    database::run(&pool, move |conn| {
        booking::cancel_appointment(
            conn,
            info.appointment_id,
            info.acting_user_id,
            info.log_detail.as_deref(),
        )
    })
    .await?;

    Ok(SimpleResponse::ok())
}

async fn view_appoint_impl(
    pool: web::Data<DbPool>,
    info: web::Json<ViewAppointRequest>,
) -> anyhow::Result<ViewAppointResponse> {
    let appointment_id = info.into_inner().appointment_id;
    let (appo, links) = database::run(&pool, move |conn| {
        let appo = booking::get_appointment(conn, appointment_id)?;
        let links = booking::virtual_links_of(conn, appointment_id)?;
        Ok((appo, links))
    })
    .await?;

    let (link, link_expires_at) = links
        .into_iter()
        .next()
        .map(|link| (link.url, crate::utils::format_time_str(&link.expires_at)))
        .unwrap_or_default();

    Ok(ViewAppointResponse {
        success: true,
        err: "".to_string(),
        appointment_id: appo.id,
        patient_id: appo.patient_id,
        doctor_id: appo.doctor_id,
        availability_id: appo.availability_id,
        status: appo.status,
        link,
        link_expires_at,
    })
}

async fn open_slots_impl(
    pool: web::Data<DbPool>,
    info: web::Json<OpenSlotsRequest>,
) -> anyhow::Result<OpenSlotsResponse> {
    let info = info.into_inner();
    let (start_time, end_time) =
        crate::utils::parse_time_pair_str_opt(info.start_time, info.end_time)?;
    let first_index = info.first_index.unwrap_or(0).max(0);
    let limit = info.limit.unwrap_or(30).max(0);
    let doctor_id = info.doctor_id;

    let slots = database::run(&pool, move |conn| {
        availability::list_open_slots(conn, doctor_id, start_time, end_time, first_index, limit)
    })
    .await?;

    let slots = slots
        .into_iter()
        .map(|slot| OpenSlotItem {
            availability_id: slot.id,
            doctor_id: slot.doctor_id,
            start_time: crate::utils::format_time_str(&slot.start_time),
            end_time: crate::utils::format_time_str(&slot.end_time),
        })
        .collect();

    Ok(OpenSlotsResponse {
        success: true,
        err: "".to_string(),
        slots,
    })
}

async fn leave_feedback_impl(
    pool: web::Data<DbPool>,
    info: web::Json<LeaveFeedbackRequest>,
) -> anyhow::Result<IdResponse> {
    let info = info.into_inner();
    let id = database::run(&pool, move |conn| {
        feedback::leave_feedback(
            conn,
            info.appointment_id,
            info.patient_id,
            info.rating,
            info.comments.as_deref(),
        )
    })
    .await?;

    Ok(IdResponse::ok(id))
}

async fn join_waitlist_impl(
    pool: web::Data<DbPool>,
    info: web::Json<JoinWaitlistRequest>,
) -> anyhow::Result<IdResponse> {
    let info = info.into_inner();
    let preferred_date = info
        .preferred_date
        .as_ref()
        .map(crate::utils::parse_date_str)
        .transpose()?;

    let id = database::run(&pool, move |conn| {
        waitlist::join_waitlist(
            conn,
            info.patient_id,
            info.doctor_id,
            info.specialization_id,
            preferred_date,
        )
    })
    .await?;

    Ok(IdResponse::ok(id))
}

async fn add_recurring_impl(
    pool: web::Data<DbPool>,
    info: web::Json<AddRecurringRequest>,
) -> anyhow::Result<IdResponse> {
    let info = info.into_inner();
    let plan = RecurringPlan {
        patient_id: info.patient_id,
        doctor_id: info.doctor_id,
        specialization_id: info.specialization_id,
        frequency: info.frequency.parse::<Frequency>()?,
        preferred_time: crate::utils::parse_clock_str(&info.preferred_time)?,
        start_date: crate::utils::parse_date_str(&info.start_date)?,
        end_date: info
            .end_date
            .map(crate::utils::parse_date_str)
            .transpose()?,
    };

    let id = database::run(&pool, move |conn| recurring::create_recurring(conn, plan)).await?;

    Ok(IdResponse::ok(id))
}
