mod requests;
mod responses;

use crate::{
    booking::{self, ConsultationRecord},
    database::{self, assert},
    errors::BookingError,
    protocol::{IdResponse, SimpleResponse},
    store::availability,
    DbPool,
};
use actix_web::{post, web, HttpResponse, Responder};
use anyhow::Context;

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(add_time)
        .service(delete_time)
        .service(search_time)
        .service(record_consultation);
}

crate::post_funcs! {
    (add_time, "/add_time", AddTimeRequest, IdResponse),
    (delete_time, "/delete_time", DeleteTimeRequest, SimpleResponse),
    (search_time, "/search_time", SearchTimeRequest, SearchTimeResponse),
    (record_consultation, "/record_consultation", RecordConsultationRequest, IdResponse),
}

async fn add_time_impl(
    pool: web::Data<DbPool>,
    info: web::Json<AddTimeRequest>,
) -> anyhow::Result<IdResponse> {
    let info = info.into_inner();
    let (start_time, end_time) = crate::utils::parse_time_pair_str(&info.start_time, &info.end_time)?;

    let doctor_id = info.doctor_id;
    let id = database::run(&pool, move |conn| {
        availability::add_availability(conn, doctor_id, start_time, end_time)
    })
    .await?;

    Ok(IdResponse::ok(id))
}

async fn delete_time_impl(
    pool: web::Data<DbPool>,
    info: web::Json<DeleteTimeRequest>,
) -> anyhow::Result<SimpleResponse> {
    let info = info.into_inner();
    database::run(&pool, move |conn| {
        let slot = assert::fetch_slot(conn, info.availability_id)?;
        if slot.doctor_id != info.doctor_id {
            return Err(BookingError::validation(format!(
                "availability slot {} does not belong to doctor {}",
                slot.id, info.doctor_id
            )));
        }
        availability::delete_availability(conn, slot.id, Some(info.doctor_id))
    })
    .await?;

    Ok(SimpleResponse::ok())
}

async fn search_time_impl(
    pool: web::Data<DbPool>,
    info: web::Json<SearchTimeRequest>,
) -> anyhow::Result<SearchTimeResponse> {
    let info = info.into_inner();
    let (start_time, end_time) = match info.date {
        Some(date) => {
            let day = crate::utils::parse_date_str(date)?;
            let start_time = day.and_hms_opt(0, 0, 0).context("Wrong date format")?;
            let end_time = day.and_hms_opt(23, 59, 59).context("Wrong date format")?;
            (start_time, end_time)
        }
        None => crate::utils::parse_time_pair_str_opt::<String, String>(None, None)?,
    };

    let doctor_id = info.doctor_id;
    let slots = database::run(&pool, move |conn| {
        availability::list_open_slots(conn, Some(doctor_id), start_time, end_time, 0, 100)
    })
    .await?;

    let times = slots
        .into_iter()
        .map(|slot| SearchTimeItem {
            availability_id: slot.id,
            start_time: crate::utils::format_time_str(&slot.start_time),
            end_time: crate::utils::format_time_str(&slot.end_time),
        })
        .collect();

    Ok(SearchTimeResponse {
        success: true,
        err: "".to_string(),
        times,
    })
}

async fn record_consultation_impl(
    pool: web::Data<DbPool>,
    info: web::Json<RecordConsultationRequest>,
) -> anyhow::Result<IdResponse> {
    let info = info.into_inner();
    let doctor_id = info.doctor_id;
    let record = ConsultationRecord {
        appointment_id: info.appointment_id,
        notes: info.notes,
        prescription: info.prescription,
        outcome: info.outcome,
        recorded_by: Some(doctor_id),
    };

    let id = database::run(&pool, move |conn| {
        let appo = booking::get_appointment(conn, record.appointment_id)?;
        if appo.doctor_id != doctor_id {
            return Err(BookingError::validation(format!(
                "doctor {} does not hold appointment {}",
                doctor_id, appo.id
            )));
        }
        booking::record_consultation(conn, &record)
    })
    .await?;

    Ok(IdResponse::ok(id))
}
