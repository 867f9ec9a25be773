use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgArguments, PgConnectOptions, PgConnection};
use sqlx::query::Query;
use sqlx::{Connection, Postgres};
use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::{Row, Value};
use crate::utils::constants::{
    MICROS_FORMAT, POSTGIS_PASSWORD_VAR, POSTGIS_USER_VAR, SECONDS_FORMAT, UTC_MICROS_FORMAT,
};
use crate::writers::Sink;

/// Where to connect; credentials come from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub database_name: String,
}

impl DatabaseSettings {
    /// Connection options with user and password read from
    /// `POSTGIS_USER` and `POSTGIS_PASSWORD`
    pub fn connect_options(&self) -> Result<PgConnectOptions> {
        let user = credential(POSTGIS_USER_VAR)?;
        let password = credential(POSTGIS_PASSWORD_VAR)?;

        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database_name)
            .username(&user)
            .password(&password))
    }
}

fn credential(var: &str) -> Result<String> {
    std::env::var(var).map_err(|_| ProcessingError::MissingCredential(var.to_string()))
}

/// Sink writing rows to a PostGIS database over a single connection.
pub struct PostgisWriter {
    connection: PgConnection,
}

impl PostgisWriter {
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self> {
        let options = settings.connect_options()?;
        let connection = PgConnection::connect_with(&options).await?;
        debug!(
            "Connected to {}:{}/{}",
            settings.host, settings.port, settings.database_name
        );
        Ok(Self { connection })
    }

    /// Close the connection gracefully. Dropping the writer also closes it.
    pub async fn close(self) -> Result<()> {
        self.connection.close().await?;
        Ok(())
    }
}

#[async_trait]
impl Sink for PostgisWriter {
    async fn store(&mut self, statement: &str, rows: &[Row]) -> Result<usize> {
        let mut transaction = self.connection.begin().await?;

        for row in rows {
            let query = row
                .values()
                .iter()
                .fold(sqlx::query(statement), bind_value);
            query.execute(&mut *transaction).await?;
        }

        transaction.commit().await?;
        Ok(rows.len())
    }
}

/// Parameter as sent to Postgres.
///
/// Parameters travel in binary form with an explicit type and the server will
/// not cast a `text` parameter into a timestamp column, so timestamp text is
/// sent as a timestamp. Postgres has no unsigned types; unsigned values widen
/// to the next signed width.
#[derive(Debug, Clone, PartialEq)]
enum Param {
    SmallInt(i16),
    Integer(i32),
    BigInt(i64),
    Real(f32),
    Double(f64),
    Timestamp(NaiveDateTime),
    Timestamptz(DateTime<Utc>),
    Interval(chrono::Duration),
    Text(String),
}

impl Param {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Float32(v) => Param::Real(*v),
            Value::Float64(v) => Param::Double(*v),
            Value::Int16(v) => Param::SmallInt(*v),
            Value::Int32(v) => Param::Integer(*v),
            Value::Int64(v) => Param::BigInt(*v),
            Value::UInt8(v) => Param::SmallInt(i16::from(*v)),
            Value::UInt16(v) => Param::Integer(i32::from(*v)),
            Value::UInt32(v) => Param::BigInt(i64::from(*v)),
            Value::Timestamp(v) => Param::Timestamp(*v),
            Value::TimeDelta(v) => Param::Interval(chrono::Duration::nanoseconds(*v)),
            Value::Text(v) => timestamp_param(v).unwrap_or_else(|| Param::Text(v.clone())),
        }
    }
}

/// Timestamp text with a `+00:00` suffix is an absolute instant; without one
/// it is a wall-clock time the server interprets like an untyped literal.
fn timestamp_param(text: &str) -> Option<Param> {
    if let Ok(instant) = NaiveDateTime::parse_from_str(text, UTC_MICROS_FORMAT) {
        return Some(Param::Timestamptz(instant.and_utc()));
    }
    [MICROS_FORMAT, SECONDS_FORMAT]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(Param::Timestamp)
}

fn bind_value<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: &Value,
) -> Query<'q, Postgres, PgArguments> {
    match Param::from_value(value) {
        Param::SmallInt(v) => query.bind(v),
        Param::Integer(v) => query.bind(v),
        Param::BigInt(v) => query.bind(v),
        Param::Real(v) => query.bind(v),
        Param::Double(v) => query.bind(v),
        Param::Timestamp(v) => query.bind(v),
        Param::Timestamptz(v) => query.bind(v),
        Param::Interval(v) => query.bind(v),
        Param::Text(v) => query.bind(v),
    }
}
