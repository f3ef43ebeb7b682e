mod common;

use actix_web::{http::StatusCode, test, web, App};
use diesel::{r2d2::ConnectionManager, MysqlConnection};
use serde_json::{json, Value};

use telehealth_booking::{
    admin,
    config::Config,
    database::build_pool,
    doctor,
    patient::{self, LinkPrefix},
    DbPool,
};

use common::{clinic, test_db, LINK_PREFIX};

// never connects unless a handler reaches the database
fn lazy_pool() -> DbPool {
    r2d2::Pool::builder()
        .max_size(1)
        .min_idle(Some(0))
        .build_unchecked(ConnectionManager::<MysqlConnection>::new(
            "mysql://nobody@127.0.0.1:1/none",
        ))
}

macro_rules! app {
    ($pool:expr) => {
        test::init_service(
            App::new()
                .data($pool)
                .data(LinkPrefix(LINK_PREFIX.to_string()))
                .service(web::scope("/patient").configure(patient::config))
                .service(web::scope("/doctor").configure(doctor::config))
                .service(web::scope("/admin").configure(admin::config)),
        )
        .await
    };
}

macro_rules! post {
    ($app:expr, $uri:expr, $body:expr $(,)?) => {{
        let req = test::TestRequest::post().uri($uri).set_json(&$body).to_request();
        let resp: Value = test::read_response_json(&mut $app, req).await;
        resp
    }};
}

#[actix_rt::test]
async fn unknown_role_is_rejected_before_storage() {
    let mut app = app!(lazy_pool());
    let resp = post!(
        app,
        "/admin/add_user",
        json!({ "full_name": "Nick Riviera", "email": "nick@clinic.test", "role": "nurse" }),
    );
    assert_eq!(
        resp,
        json!({ "success": false, "err": "validation failed: unknown role 'nurse'", "id": 0 })
    );
}

#[actix_rt::test]
async fn reversed_interval_is_rejected() {
    let mut app = app!(lazy_pool());
    let resp = post!(
        app,
        "/doctor/add_time",
        json!({
            "doctor_id": 1,
            "start_time": "2030-01-01T10:00:00Z",
            "end_time": "2030-01-01T09:00:00Z",
        }),
    );
    assert_eq!(resp["success"], false);
    assert_eq!(resp["err"], "Invalid time interval");
}

#[actix_rt::test]
async fn malformed_fields_name_the_problem() {
    let mut app = app!(lazy_pool());

    let resp = post!(
        app,
        "/patient/appoint",
        json!({ "patient_id": 3, "doctor_id": 1, "availability_id": 1, "expires_at": "tomorrow" }),
    );
    assert_eq!(resp["err"], "Unknown time format");

    let resp = post!(
        app,
        "/patient/add_recurring",
        json!({
            "patient_id": 3,
            "doctor_id": 1,
            "frequency": "daily",
            "preferred_time": "09:00",
            "start_date": "2030-01-07",
        }),
    );
    assert_eq!(resp["err"], "validation failed: unknown frequency 'daily'");

    let resp = post!(
        app,
        "/admin/set_user_status",
        json!({ "user_id": 3, "status": "banned" }),
    );
    assert_eq!(resp["err"], "validation failed: unknown user status 'banned'");

    let resp = post!(app, "/admin/audit_trail", json!({}));
    assert_eq!(resp["success"], false);
    assert_eq!(
        resp["err"],
        "Give either 'target_table' with 'target_id', or 'user_id'"
    );
}

#[actix_rt::test]
async fn missing_fields_are_a_bad_request() {
    let mut app = app!(lazy_pool());
    let req = test::TestRequest::post()
        .uri("/patient/cancel_appoint")
        .set_json(&json!({ "acting_user_id": 3 }))
        .to_request();
    let resp = test::call_service(&mut app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn booking_round_trip() {
    let db = match test_db() {
        Some(db) => db,
        None => return,
    };
    let c = clinic(&db.conn);
    let config = Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some(db.url.clone()),
        "POOL_MAX_SIZE" => Some("2".to_string()),
        _ => None,
    })
    .unwrap();
    let mut app = app!(build_pool(&config).unwrap());

    let booked = post!(
        app,
        "/patient/appoint",
        json!({ "patient_id": c.patient, "doctor_id": c.doctor, "availability_id": c.slots[0] }),
    );
    assert_eq!(booked, json!({ "success": true, "err": "", "id": 1 }));

    let again = post!(
        app,
        "/patient/appoint",
        json!({ "patient_id": c.other_patient, "doctor_id": c.doctor, "availability_id": c.slots[0] }),
    );
    assert_eq!(again["success"], false);
    assert_eq!(
        again["err"],
        format!(
            "availability slot {} is already taken by appointment 1, pick another slot",
            c.slots[0]
        )
    );

    let view = post!(app, "/patient/view_appoint", json!({ "appointment_id": 1 }));
    assert_eq!(view["status"], "scheduled");
    assert_eq!(view["availability_id"], c.slots[0]);
    assert!(view["link"].as_str().unwrap().starts_with(LINK_PREFIX));

    let open = post!(app, "/patient/open_slots", json!({ "doctor_id": c.doctor }));
    let ids: Vec<u64> = open["slots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|slot| slot["availability_id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![c.slots[1]]);

    let consult = post!(
        app,
        "/doctor/record_consultation",
        json!({ "doctor_id": c.other_doctor, "appointment_id": 1, "notes": "n/a" }),
    );
    assert_eq!(consult["success"], false);

    let cancelled = post!(app, "/patient/cancel_appoint", json!({ "appointment_id": 1 }));
    assert_eq!(cancelled, json!({ "success": true, "err": "" }));
    let twice = post!(app, "/patient/cancel_appoint", json!({ "appointment_id": 1 }));
    assert_eq!(
        twice["err"],
        "appointment 1 is cancelled and cannot become cancelled"
    );
}
