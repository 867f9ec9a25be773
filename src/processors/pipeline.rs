use std::fmt;
use tracing::{debug, info, warn};

use crate::error::{ProcessingError, Result};
use crate::models::{DataSource, FieldSpec};
use crate::processors::conversions::ConversionRegistry;
use crate::processors::extractor::FieldExtractor;
use crate::processors::row_builder::{RowBatch, RowBuilder};
use crate::processors::spatial_filter::SpatialFilter;
use crate::utils::constants::{LATITUDE_FIELD, LONGITUDE_FIELD};
use crate::utils::placeholders::{count_format_placeholders, count_placeholders, to_positional};
use crate::writers::Sink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Extracting,
    Building,
    Flushing,
    Done,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Extracting => "extracting",
            PipelineStage::Building => "building",
            PipelineStage::Flushing => "flushing",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreSummary {
    pub stored: usize,
    pub received: usize,
}

impl fmt::Display for StoreSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stored {} of {} observations.", self.stored, self.received)
    }
}

/// Scene-to-database pipeline for one product list.
///
/// The pipeline is immutable once built and can be shared between concurrent
/// runs; every run brings its own data source and sink.
#[derive(Debug, Clone)]
pub struct Pipeline {
    fields: FieldSpec,
    statement: String,
    filter: SpatialFilter,
    registry: ConversionRegistry,
}

impl Pipeline {
    /// Build a pipeline, checking the statement and conversion names up front.
    pub fn new(fields: FieldSpec, statement: &str, filter: SpatialFilter) -> Result<Self> {
        Self::with_registry(fields, statement, filter, ConversionRegistry::new())
    }

    pub fn with_registry(
        fields: FieldSpec,
        statement: &str,
        filter: SpatialFilter,
        registry: ConversionRegistry,
    ) -> Result<Self> {
        for required in [LONGITUDE_FIELD, LATITUDE_FIELD] {
            if !fields.contains(required) {
                return Err(ProcessingError::Config(format!(
                    "Field '{}' must be configured",
                    required
                )));
            }
        }

        for field in fields.iter() {
            for conversion in &field.conversions {
                registry.lookup(conversion)?;
            }
        }

        let statement = match (count_format_placeholders(statement), count_placeholders(statement)) {
            (0, _) => statement.to_string(),
            (_, 0) => to_positional(statement),
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Insert statement mixes %s and $n placeholders: {}",
                    statement
                )))
            }
        };
        let placeholders = count_placeholders(&statement);
        if placeholders != fields.len() {
            return Err(ProcessingError::Config(format!(
                "Insert statement has {} placeholders but {} fields are configured",
                placeholders,
                fields.len()
            )));
        }

        Ok(Self {
            fields,
            statement,
            filter,
            registry,
        })
    }

    /// Insert statement with `$n` placeholders.
    pub fn statement(&self) -> &str {
        &self.statement
    }

    pub fn fields(&self) -> &FieldSpec {
        &self.fields
    }

    pub fn filter(&self) -> &SpatialFilter {
        &self.filter
    }

    /// Extract, convert and filter. No rows leave this call on failure.
    pub fn prepare<S: DataSource + ?Sized>(&self, source: &S) -> Result<RowBatch> {
        self.enter(PipelineStage::Extracting);
        let extracted = FieldExtractor::new(&self.registry)
            .extract(source, &self.fields)
            .inspect_err(|e| self.fail(e))?;

        self.enter(PipelineStage::Building);
        let batch = RowBuilder::new(&self.filter)
            .build(&extracted)
            .inspect_err(|e| self.fail(e))?;

        debug!("Built {} of {} rows", batch.stored(), batch.received);
        Ok(batch)
    }

    /// Hand a prepared batch to `sink` and report the counts.
    pub async fn flush<K: Sink + ?Sized>(&self, batch: RowBatch, sink: &mut K) -> Result<StoreSummary> {
        self.enter(PipelineStage::Flushing);
        if batch.is_empty() {
            warn!("No observations to store ({} received)", batch.received);
        }

        let stored = sink
            .store(&self.statement, &batch.rows)
            .await
            .inspect_err(|e| self.fail(e))?;

        let summary = StoreSummary {
            stored,
            received: batch.received,
        };
        self.enter(PipelineStage::Done);
        info!("{}", summary);
        Ok(summary)
    }

    /// Prepare and flush in one go.
    pub async fn run<S, K>(&self, source: &S, sink: &mut K) -> Result<StoreSummary>
    where
        S: DataSource + ?Sized,
        K: Sink + ?Sized,
    {
        let batch = self.prepare(source)?;
        self.flush(batch, sink).await
    }

    fn enter(&self, stage: PipelineStage) {
        debug!("Pipeline stage: {}", stage);
    }

    fn fail(&self, error: &ProcessingError) {
        debug!("Pipeline stage: {} ({})", PipelineStage::Failed, error);
    }
}
