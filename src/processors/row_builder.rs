use crate::error::{ProcessingError, Result};
use crate::models::{Array, ExtractedFields, FieldValue, Row, Value};
use crate::processors::spatial_filter::SpatialFilter;
use crate::utils::constants::{LATITUDE_FIELD, LONGITUDE_FIELD};

/// Rows built from one scene, in observation order.
#[derive(Debug, Clone, PartialEq)]
pub struct RowBatch {
    pub rows: Vec<Row>,
    pub received: usize,
}

impl RowBatch {
    pub fn stored(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// How one field supplies its value for observation `i`.
enum Column<'a> {
    PerPoint(&'a Array),
    Broadcast(Value),
}

impl Column<'_> {
    fn value(&self, index: usize) -> Option<Value> {
        match self {
            Column::PerPoint(array) => array.get(index),
            Column::Broadcast(value) => Some(value.clone()),
        }
    }

    fn coordinate(&self, index: usize) -> Option<f64> {
        match self {
            Column::PerPoint(array) => array.coordinate(index),
            Column::Broadcast(value) => value.as_f64(),
        }
    }
}

/// Materializes rows from extracted fields, broadcasting scalars and
/// dropping points outside the spatial filter.
pub struct RowBuilder<'a> {
    filter: &'a SpatialFilter,
}

impl<'a> RowBuilder<'a> {
    pub fn new(filter: &'a SpatialFilter) -> Self {
        Self { filter }
    }

    /// Build the rows of every retained observation
    ///
    /// All fields are checked before the first row is built, so a malformed
    /// field never yields a partial batch.
    pub fn build(&self, fields: &ExtractedFields) -> Result<RowBatch> {
        let received = Self::observation_count(fields)?;

        let columns = fields
            .iter()
            .map(|(name, value)| Self::column(name, value, received))
            .collect::<Result<Vec<_>>>()?;

        let longitude = Self::coordinate_column(fields, LONGITUDE_FIELD, received)?;
        let latitude = Self::coordinate_column(fields, LATITUDE_FIELD, received)?;

        let mut rows = Vec::with_capacity(received);
        for i in 0..received {
            let (lon, lat) = match (longitude.coordinate(i), latitude.coordinate(i)) {
                (Some(lon), Some(lat)) => (lon, lat),
                _ => {
                    return Err(ProcessingError::MalformedInput(format!(
                        "Coordinates of observation {} are not numeric",
                        i
                    )))
                }
            };

            if !self.filter.contains(lon, lat) {
                continue;
            }

            let values = columns
                .iter()
                .map(|column| column.value(i))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| {
                    ProcessingError::MalformedInput(format!("Observation {} is out of range", i))
                })?;
            rows.push(Row::new(values));
        }

        Ok(RowBatch { rows, received })
    }

    fn observation_count(fields: &ExtractedFields) -> Result<usize> {
        match fields.get(LONGITUDE_FIELD) {
            Some(FieldValue::Vector(array)) => Ok(array.len()),
            Some(FieldValue::Scalar(_)) => Err(ProcessingError::MalformedInput(format!(
                "Field '{}' must be a per-point vector",
                LONGITUDE_FIELD
            ))),
            None => Err(ProcessingError::MalformedInput(format!(
                "Field '{}' is required to count observations",
                LONGITUDE_FIELD
            ))),
        }
    }

    fn column<'f>(name: &str, value: &'f FieldValue, count: usize) -> Result<Column<'f>> {
        match value {
            FieldValue::Scalar(value) => Ok(Column::Broadcast(value.clone())),
            FieldValue::Vector(array) if array.len() >= count => Ok(Column::PerPoint(array)),
            FieldValue::Vector(array) => array.get(0).map(Column::Broadcast).ok_or_else(|| {
                ProcessingError::MalformedInput(format!(
                    "Field '{}' is empty but {} observations were received",
                    name, count
                ))
            }),
        }
    }

    fn coordinate_column<'f>(
        fields: &'f ExtractedFields,
        name: &str,
        count: usize,
    ) -> Result<Column<'f>> {
        let value = fields.get(name).ok_or_else(|| {
            ProcessingError::MalformedInput(format!("Field '{}' is required for filtering", name))
        })?;
        Self::column(name, value, count)
    }
}
