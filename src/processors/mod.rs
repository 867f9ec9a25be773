pub mod conversions;
pub mod extractor;
pub mod pipeline;
pub mod row_builder;
pub mod spatial_filter;

pub use conversions::{Conversion, ConversionRegistry};
pub use extractor::FieldExtractor;
pub use pipeline::{Pipeline, PipelineStage, StoreSummary};
pub use row_builder::{RowBatch, RowBuilder};
pub use spatial_filter::SpatialFilter;
