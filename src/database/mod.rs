pub mod assert;

use crate::{config::Config, errors::BookingError, DbPool};
use actix_web::{error::BlockingError, web};
use anyhow::{anyhow, Context};
use diesel::{
    connection::SimpleConnection, r2d2::ConnectionManager, Connection, MysqlConnection,
    QueryResult,
};
use r2d2::{CustomizeConnection, PooledConnection};
use tracing::debug;

no_arg_sql_function!(
    last_insert_id,
    diesel::sql_types::Unsigned<diesel::sql_types::Bigint>
);

/// Id generated by the most recent insert on this connection.
pub fn last_id(conn: &MysqlConnection) -> QueryResult<u64> {
    use diesel::RunQueryDsl;

    diesel::select(last_insert_id).get_result::<u64>(conn)
}

/// Bounds row-lock waits and pins the isolation level for one session.
///
/// READ COMMITTED keeps InnoDB from taking gap locks, so claims on
/// different slots never block each other. Every check-then-write runs
/// under an explicit row lock instead.
pub fn configure_session(conn: &MysqlConnection, lock_wait_timeout_secs: u64) -> QueryResult<()> {
    conn.batch_execute(&format!(
        "SET SESSION innodb_lock_wait_timeout = {}; \
         SET SESSION TRANSACTION ISOLATION LEVEL READ COMMITTED",
        lock_wait_timeout_secs
    ))
}

#[derive(Debug)]
struct SessionSetup {
    lock_wait_timeout_secs: u64,
}

impl CustomizeConnection<MysqlConnection, diesel::r2d2::Error> for SessionSetup {
    fn on_acquire(&self, conn: &mut MysqlConnection) -> Result<(), diesel::r2d2::Error> {
        configure_session(conn, self.lock_wait_timeout_secs).map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn build_pool(config: &Config) -> anyhow::Result<DbPool> {
    let manager = ConnectionManager::<MysqlConnection>::new(config.database_url.as_str());
    let pool = r2d2::Pool::builder()
        .max_size(config.pool_max_size)
        .connection_customizer(Box::new(SessionSetup {
            lock_wait_timeout_secs: config.lock_wait_timeout_secs,
        }))
        .build(manager)
        .context("Failed to create pool")?;
    debug!(max_size = config.pool_max_size, "connection pool ready");
    Ok(pool)
}

pub fn establish(url: &str, lock_wait_timeout_secs: u64) -> anyhow::Result<MysqlConnection> {
    let conn = MysqlConnection::establish(url).context("DB connection")?;
    configure_session(&conn, lock_wait_timeout_secs).context("DB session setup")?;
    Ok(conn)
}

pub fn get_db_conn(
    pool: &web::Data<DbPool>,
) -> anyhow::Result<PooledConnection<ConnectionManager<MysqlConnection>>> {
    pool.get().context("DB connection")
}

/// Runs a blocking database operation on the actix blocking pool.
pub async fn run<F, T>(pool: &web::Data<DbPool>, f: F) -> anyhow::Result<T>
where
    F: FnOnce(&MysqlConnection) -> Result<T, BookingError> + Send + 'static,
    T: Send + 'static,
{
    let conn = get_db_conn(pool)?;
    web::block(move || f(&conn)).await.map_err(|err| match err {
        BlockingError::Error(err) => err.into(),
        BlockingError::Canceled => anyhow!("Operation canceled"),
    })
}
