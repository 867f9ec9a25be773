use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

use crate::models::array::{Array, Value};

/// Resolved value of one configured field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// One value per observation.
    Vector(Array),
    /// One value shared by every observation of the run.
    Scalar(Value),
}

impl FieldValue {
    pub fn dtype(&self) -> String {
        match self {
            FieldValue::Vector(array) => format!("array[{}]", array.dtype()),
            FieldValue::Scalar(value) => value.dtype().to_string(),
        }
    }
}

/// The conversions configured for a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldConversions {
    pub name: String,
    pub conversions: Vec<String>,
}

/// Ordered mapping of field name to conversion chain.
///
/// Key order is the column order of every emitted row, so the mapping is kept
/// as a vector and deserialized without going through a hash map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSpec {
    fields: Vec<FieldConversions>,
}

impl FieldSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, replacing the conversions of an existing one in place.
    pub fn with_field(mut self, name: &str, conversions: &[&str]) -> Self {
        self.insert(
            name.to_string(),
            conversions.iter().map(|c| c.to_string()).collect(),
        );
        self
    }

    pub fn insert(&mut self, name: String, conversions: Vec<String>) {
        if let Some(existing) = self.fields.iter_mut().find(|f| f.name == name) {
            existing.conversions = conversions;
        } else {
            self.fields.push(FieldConversions { name, conversions });
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldConversions> {
        self.fields.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }
}

impl<'de> Deserialize<'de> for FieldSpec {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FieldSpecVisitor;

        impl<'de> Visitor<'de> for FieldSpecVisitor {
            type Value = FieldSpec;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a mapping of field names to lists of conversions")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<FieldSpec, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut spec = FieldSpec::new();
                while let Some((name, conversions)) =
                    map.next_entry::<String, Option<Vec<String>>>()?
                {
                    // `field:` with no value means no conversions
                    spec.insert(name, conversions.unwrap_or_default());
                }
                Ok(spec)
            }
        }

        deserializer.deserialize_map(FieldSpecVisitor)
    }
}

/// Converted field values in configuration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedFields {
    entries: Vec<(String, FieldValue)>,
}

impl ExtractedFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: String, value: FieldValue) {
        self.entries.push((name, value));
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}
