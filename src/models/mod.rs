pub mod array;
pub mod field;
pub mod region;
pub mod row;
pub mod scene;

pub use array::{Array, Value};
pub use field::{ExtractedFields, FieldConversions, FieldSpec, FieldValue};
pub use region::{BoundingBox, GeographicRegion};
pub use row::Row;
pub use scene::{DataSource, Scene};
