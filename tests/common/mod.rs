#![allow(dead_code)]

use std::sync::{Mutex, MutexGuard};

use chrono::{NaiveDate, NaiveDateTime};
use diesel::{connection::SimpleConnection, MysqlConnection};

use telehealth_booking::{
    booking::{self, BookRequest},
    database,
    errors::BookingResult,
    models::users::Role,
    store::{
        availability,
        users::{self, UserProfile},
    },
};

const SCHEMA_UP: &str =
    include_str!("../../migrations/2021-05-01-000000_create_booking_schema/up.sql");
const SCHEMA_DOWN: &str =
    include_str!("../../migrations/2021-05-01-000000_create_booking_schema/down.sql");

pub const LOCK_WAIT_SECS: u64 = 5;
pub const LINK_PREFIX: &str = "https://meet.test/session";

// every test rebuilds the same database, so they take turns
static DB_LOCK: Mutex<()> = Mutex::new(());

pub struct TestDb {
    pub conn: MysqlConnection,
    pub url: String,
    _guard: MutexGuard<'static, ()>,
}

/// Fresh schema on `TEST_DATABASE_URL`, or `None` when it is not set.
pub fn test_db() -> Option<TestDb> {
    dotenv::dotenv().ok();
    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("TEST_DATABASE_URL not set, skipping");
            return None;
        }
    };

    let guard = DB_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let conn = database::establish(&url, LOCK_WAIT_SECS).expect("connect to TEST_DATABASE_URL");
    conn.batch_execute(SCHEMA_DOWN).expect("drop schema");
    conn.batch_execute(SCHEMA_UP).expect("create schema");

    Some(TestDb {
        conn,
        url,
        _guard: guard,
    })
}

pub fn connect(url: &str, lock_wait_secs: u64) -> MysqlConnection {
    database::establish(url, lock_wait_secs).expect("second connection")
}

pub fn user(conn: &MysqlConnection, name: &str, role: Role) -> u64 {
    users::create_user(
        conn,
        UserProfile {
            full_name: name.to_string(),
            email: format!("{}@clinic.test", name.to_lowercase().replace(' ', ".")),
            phone: None,
            role,
        },
    )
    .unwrap()
}

/// 2030-01-01 plus `hour` hours.
pub fn at(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2030, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + chrono::Duration::hours(hour as i64)
}

pub fn slot(conn: &MysqlConnection, doctor_id: u64, hour: u32) -> u64 {
    availability::add_availability(conn, doctor_id, at(hour), at(hour + 1)).unwrap()
}

pub fn book(conn: &MysqlConnection, patient_id: u64, doctor_id: u64, slot_id: u64) -> BookingResult<u64> {
    booking::book_appointment(
        conn,
        &BookRequest {
            patient_id,
            doctor_id,
            availability_id: slot_id,
            link_prefix: LINK_PREFIX.to_string(),
            expires_at: None,
            log_detail: Some("booked in test".to_string()),
        },
    )
}

/// Users 1 and 2 are doctors, 3 and 4 patients. Slot 1 and 2 belong to
/// doctor 1, slot 3 to doctor 2.
pub struct Clinic {
    pub doctor: u64,
    pub other_doctor: u64,
    pub patient: u64,
    pub other_patient: u64,
    pub slots: [u64; 3],
}

pub fn clinic(conn: &MysqlConnection) -> Clinic {
    let doctor = user(conn, "Meredith Grey", Role::Doctor);
    let other_doctor = user(conn, "Derek Shepherd", Role::Doctor);
    let patient = user(conn, "Ada Lovelace", Role::Patient);
    let other_patient = user(conn, "Alan Turing", Role::Patient);
    let slots = [
        slot(conn, doctor, 9),
        slot(conn, doctor, 10),
        slot(conn, other_doctor, 9),
    ];
    Clinic {
        doctor,
        other_doctor,
        patient,
        other_patient,
        slots,
    }
}
