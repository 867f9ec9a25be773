use std::collections::HashMap;
use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::{Array, FieldValue, Value};
use crate::utils::constants::{
    DATETIME64_TO_STR, DATETIME_TO_STR, DIVIDE_BY_MILLION, TO_FLOAT32, TO_FLOAT64, TO_INT16,
    TO_INT32, TO_UINT16,
};
use crate::utils::timestamps::{format_naive, format_utc_micros};

/// A pure field transform. `None` means the input type is not supported.
pub type Conversion = fn(&FieldValue) -> Option<FieldValue>;

/// Closed table of named conversions.
#[derive(Debug, Clone)]
pub struct ConversionRegistry {
    conversions: HashMap<String, Conversion>,
}

impl ConversionRegistry {
    /// Registry with every built-in conversion.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(TO_INT16, to_int16);
        registry.register(TO_UINT16, to_uint16);
        registry.register(TO_INT32, to_int32);
        registry.register(TO_FLOAT32, to_float32);
        registry.register(TO_FLOAT64, to_float64);
        registry.register(DIVIDE_BY_MILLION, divide_by_million);
        registry.register(DATETIME64_TO_STR, datetime64_to_str);
        registry.register(DATETIME_TO_STR, datetime_to_str);
        registry
    }

    pub fn empty() -> Self {
        Self {
            conversions: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: &str, conversion: Conversion) {
        self.conversions.insert(name.to_string(), conversion);
    }

    pub fn lookup(&self, name: &str) -> Result<Conversion> {
        self.conversions
            .get(name)
            .copied()
            .ok_or_else(|| ProcessingError::UnknownConversion {
                conversion: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.conversions.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.conversions.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Apply `chain` to the value of `field`, each output feeding the next step.
    pub fn apply_chain(&self, field: &str, chain: &[String], value: FieldValue) -> Result<FieldValue> {
        let mut current = value;
        for name in chain {
            let conversion = self.lookup(name)?;
            current = conversion(&current).ok_or_else(|| ProcessingError::ConversionType {
                conversion: name.clone(),
                field: field.to_string(),
                found: current.dtype(),
            })?;
            debug!("Applied {} to {} -> {}", name, field, current.dtype());
        }
        Ok(current)
    }
}

impl Default for ConversionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Integer view of numeric data: floats truncate toward zero, deltas give nanoseconds.
fn integer_lanes(array: &Array) -> Option<Vec<i64>> {
    Some(match array {
        Array::Float32(v) => v.iter().map(|&x| x as i64).collect(),
        Array::Float64(v) => v.iter().map(|&x| x as i64).collect(),
        Array::Int16(v) => v.iter().map(|&x| x as i64).collect(),
        Array::Int32(v) => v.iter().map(|&x| x as i64).collect(),
        Array::Int64(v) => v.clone(),
        Array::UInt8(v) => v.iter().map(|&x| x as i64).collect(),
        Array::UInt16(v) => v.iter().map(|&x| x as i64).collect(),
        Array::UInt32(v) => v.iter().map(|&x| x as i64).collect(),
        Array::TimeDelta(v) => v.clone(),
        Array::Timestamp(_) | Array::Text(_) => return None,
    })
}

fn integer_lane(value: &Value) -> Option<i64> {
    Some(match *value {
        Value::Float32(x) => x as i64,
        Value::Float64(x) => x as i64,
        Value::Int16(x) => x as i64,
        Value::Int32(x) => x as i64,
        Value::Int64(x) => x,
        Value::UInt8(x) => x as i64,
        Value::UInt16(x) => x as i64,
        Value::UInt32(x) => x as i64,
        Value::TimeDelta(x) => x,
        Value::Timestamp(_) | Value::Text(_) => return None,
    })
}

fn float_lanes(array: &Array) -> Option<Vec<f64>> {
    Some(match array {
        Array::Float32(v) => v.iter().map(|&x| x as f64).collect(),
        Array::Float64(v) => v.clone(),
        Array::TimeDelta(v) => v.iter().map(|&x| x as f64).collect(),
        other => integer_lanes(other)?.into_iter().map(|x| x as f64).collect(),
    })
}

fn float_lane(value: &Value) -> Option<f64> {
    match *value {
        Value::TimeDelta(x) => Some(x as f64),
        ref other => other.as_f64(),
    }
}

fn to_int16(value: &FieldValue) -> Option<FieldValue> {
    Some(match value {
        FieldValue::Vector(a) => {
            FieldValue::Vector(Array::Int16(integer_lanes(a)?.into_iter().map(|x| x as i16).collect()))
        }
        FieldValue::Scalar(v) => FieldValue::Scalar(Value::Int16(integer_lane(v)? as i16)),
    })
}

fn to_uint16(value: &FieldValue) -> Option<FieldValue> {
    Some(match value {
        FieldValue::Vector(a) => {
            FieldValue::Vector(Array::UInt16(integer_lanes(a)?.into_iter().map(|x| x as u16).collect()))
        }
        FieldValue::Scalar(v) => FieldValue::Scalar(Value::UInt16(integer_lane(v)? as u16)),
    })
}

fn to_int32(value: &FieldValue) -> Option<FieldValue> {
    Some(match value {
        FieldValue::Vector(a) => {
            FieldValue::Vector(Array::Int32(integer_lanes(a)?.into_iter().map(|x| x as i32).collect()))
        }
        FieldValue::Scalar(v) => FieldValue::Scalar(Value::Int32(integer_lane(v)? as i32)),
    })
}

fn to_float32(value: &FieldValue) -> Option<FieldValue> {
    Some(match value {
        FieldValue::Vector(a) => {
            FieldValue::Vector(Array::Float32(float_lanes(a)?.into_iter().map(|x| x as f32).collect()))
        }
        FieldValue::Scalar(v) => FieldValue::Scalar(Value::Float32(float_lane(v)? as f32)),
    })
}

fn to_float64(value: &FieldValue) -> Option<FieldValue> {
    Some(match value {
        FieldValue::Vector(a) => FieldValue::Vector(Array::Float64(float_lanes(a)?)),
        FieldValue::Scalar(v) => FieldValue::Scalar(Value::Float64(float_lane(v)?)),
    })
}

fn divide_by_million(value: &FieldValue) -> Option<FieldValue> {
    const MILLION: f64 = 1e6;

    Some(match value {
        FieldValue::Vector(Array::Float32(v)) => {
            FieldValue::Vector(Array::Float32(v.iter().map(|&x| x / MILLION as f32).collect()))
        }
        FieldValue::Vector(Array::TimeDelta(v)) => FieldValue::Vector(Array::TimeDelta(
            v.iter().map(|&x| (x as f64 / MILLION) as i64).collect(),
        )),
        FieldValue::Vector(a) => FieldValue::Vector(Array::Float64(
            float_lanes(a)?.into_iter().map(|x| x / MILLION).collect(),
        )),
        FieldValue::Scalar(Value::Float32(x)) => FieldValue::Scalar(Value::Float32(x / MILLION as f32)),
        FieldValue::Scalar(Value::TimeDelta(x)) => {
            FieldValue::Scalar(Value::TimeDelta((*x as f64 / MILLION) as i64))
        }
        FieldValue::Scalar(v) => FieldValue::Scalar(Value::Float64(v.as_f64()? / MILLION)),
    })
}

fn datetime64_to_str(value: &FieldValue) -> Option<FieldValue> {
    match value {
        FieldValue::Vector(Array::Timestamp(times)) => Some(FieldValue::Vector(Array::Text(
            times.iter().map(|&t| format_utc_micros(t)).collect(),
        ))),
        _ => None,
    }
}

/// Scalars are wrapped into a one-element list, which the row builder broadcasts.
fn datetime_to_str(value: &FieldValue) -> Option<FieldValue> {
    let texts = match value {
        FieldValue::Scalar(Value::Timestamp(t)) => vec![format_naive(*t)],
        FieldValue::Scalar(Value::Text(s)) => vec![s.clone()],
        FieldValue::Vector(Array::Timestamp(times)) => times.iter().map(|&t| format_naive(t)).collect(),
        FieldValue::Vector(Array::Text(texts)) => texts.clone(),
        _ => return None,
    };
    Some(FieldValue::Vector(Array::Text(texts)))
}
