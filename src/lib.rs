#[macro_use]
extern crate diesel;

pub mod audit;
pub mod booking;
pub mod config;
pub mod database;
pub mod dispatch;
pub mod errors;
pub mod ledger;
pub mod models;
pub mod protocol;
pub mod schema;
pub mod store;
pub mod utils;

pub mod admin;
pub mod doctor;
pub mod patient;

use diesel::{r2d2::ConnectionManager, MysqlConnection};

pub type DbPool = r2d2::Pool<ConnectionManager<MysqlConnection>>;
