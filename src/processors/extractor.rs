use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::{DataSource, ExtractedFields, FieldSpec, FieldValue, Value};
use crate::processors::conversions::ConversionRegistry;
use crate::utils::constants::SCENE_TIME_ALIASES;

/// Resolves configured field names against a data source and converts them.
pub struct FieldExtractor<'a> {
    registry: &'a ConversionRegistry,
}

impl<'a> FieldExtractor<'a> {
    pub fn new(registry: &'a ConversionRegistry) -> Self {
        Self { registry }
    }

    /// Extract and convert every field of `spec`, in configuration order
    pub fn extract<S: DataSource + ?Sized>(&self, source: &S, spec: &FieldSpec) -> Result<ExtractedFields> {
        let mut fields = ExtractedFields::new();

        for field in spec.iter() {
            let raw = Self::resolve(source, &field.name)?;
            let converted = self
                .registry
                .apply_chain(&field.name, &field.conversions, raw)?;
            fields.push(field.name.clone(), converted);
        }

        Ok(fields)
    }

    /// Per-point datasets win over scene-time aliases.
    fn resolve<S: DataSource + ?Sized>(source: &S, name: &str) -> Result<FieldValue> {
        if let Some(array) = source.dataset(name) {
            debug!("Resolved {} as {} values of {}", name, array.len(), array.dtype());
            return Ok(FieldValue::Vector(array.clone()));
        }

        if SCENE_TIME_ALIASES.contains(&name) {
            debug!("Resolved {} as scene start time", name);
            return Ok(FieldValue::Scalar(Value::Timestamp(source.start_time())));
        }

        Err(ProcessingError::UnknownField {
            field: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Array, Scene};
    use chrono::NaiveDate;

    fn scene() -> Scene {
        let start = NaiveDate::from_ymd_opt(2025, 6, 5)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        Scene::new(start)
            .with_dataset("longitude", Array::Float32(vec![25.0, 10.0]))
            .with_dataset("cloud_type", Array::UInt8(vec![1, 2]))
    }

    #[test]
    fn test_vector_and_scalar_resolution() {
        let registry = ConversionRegistry::new();
        let spec = FieldSpec::new()
            .with_field("nominal_time", &["datetime_to_str"])
            .with_field("cloud_type", &[])
            .with_field("longitude", &[]);

        let fields = FieldExtractor::new(&registry).extract(&scene(), &spec).unwrap();

        let names: Vec<&str> = fields.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["nominal_time", "cloud_type", "longitude"]);
        assert_eq!(
            fields.get("nominal_time"),
            Some(&FieldValue::Vector(Array::Text(vec!["2025-06-05 10:00:00".to_string()])))
        );
        assert_eq!(
            fields.get("cloud_type"),
            Some(&FieldValue::Vector(Array::UInt8(vec![1, 2])))
        );
    }

    #[test]
    fn test_start_time_alias_is_scalar() {
        let registry = ConversionRegistry::new();
        let spec = FieldSpec::new().with_field("start_time", &[]);

        let fields = FieldExtractor::new(&registry).extract(&scene(), &spec).unwrap();
        assert!(matches!(
            fields.get("start_time"),
            Some(FieldValue::Scalar(Value::Timestamp(_)))
        ));
    }

    #[test]
    fn test_dataset_shadows_time_alias() {
        let registry = ConversionRegistry::new();
        let scene = scene().with_dataset("start_time", Array::Int64(vec![7, 8]));
        let spec = FieldSpec::new().with_field("start_time", &[]);

        let fields = FieldExtractor::new(&registry).extract(&scene, &spec).unwrap();
        assert_eq!(
            fields.get("start_time"),
            Some(&FieldValue::Vector(Array::Int64(vec![7, 8])))
        );
    }

    #[test]
    fn test_unknown_field() {
        let registry = ConversionRegistry::new();
        let spec = FieldSpec::new()
            .with_field("longitude", &[])
            .with_field("wind_speed", &[]);

        let err = FieldExtractor::new(&registry)
            .extract(&scene(), &spec)
            .unwrap_err();

        assert!(matches!(err, ProcessingError::UnknownField { field } if field == "wind_speed"));
    }
}
