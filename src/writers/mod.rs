pub mod memory_writer;
pub mod postgis_writer;

pub use memory_writer::MemoryWriter;
pub use postgis_writer::{DatabaseSettings, PostgisWriter};

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Row;

/// Destination for materialized rows.
///
/// `store` executes `statement` once per row, binding the row's values as
/// positional parameters in order, and commits once after the last row.
/// Returns the number of rows written.
#[async_trait]
pub trait Sink: Send {
    async fn store(&mut self, statement: &str, rows: &[Row]) -> Result<usize>;
}
