use std::{thread, time::Duration};

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use telehealth_booking::{
    admin,
    config::Config,
    database::build_pool,
    dispatch::{self, LogDispatcher},
    doctor, patient, DbPool,
};

const DISPATCH_BATCH: i64 = 100;

fn spawn_dispatcher(pool: DbPool, every: Duration) {
    thread::spawn(move || loop {
        match pool.get() {
            Ok(conn) => match dispatch::dispatch_pending(&conn, &LogDispatcher, DISPATCH_BATCH) {
                Ok(report) if report.sent + report.failed > 0 => {
                    info!(sent = report.sent, failed = report.failed, "notifications dispatched")
                }
                Ok(_) => {}
                Err(err) => error!("notification dispatch failed: {}", err),
            },
            Err(err) => error!("notification dispatch has no connection: {}", err),
        }
        thread::sleep(every);
    });
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let pool = build_pool(&config)?;

    if config.notify_poll_secs > 0 {
        spawn_dispatcher(pool.clone(), Duration::from_secs(config.notify_poll_secs));
    }

    let link_prefix = config.link_prefix.clone();
    info!(bind = config.bind.as_str(), "starting telehealth booking server");

    HttpServer::new(move || {
        App::new()
            .data(pool.clone())
            .data(patient::LinkPrefix(link_prefix.clone()))
            // patient
            .service(
                web::scope("/patient")
                    .configure(patient::config),
            )
            // doctor
            .service(
                web::scope("/doctor")
                    .configure(doctor::config),
            )
            // administrator
            .service(
                web::scope("/admin")
                    .configure(admin::config),
            )
    })
    .bind(&config.bind)
    .with_context(|| format!("Failed to bind {}", config.bind))?
    .run()
    .await
    .context("Server error")
}
