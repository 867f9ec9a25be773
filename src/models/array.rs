use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A typed per-point dataset, tagged with its numpy-style dtype name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dtype", content = "values")]
pub enum Array {
    #[serde(rename = "float32")]
    Float32(Vec<f32>),
    #[serde(rename = "float64")]
    Float64(Vec<f64>),
    #[serde(rename = "int16")]
    Int16(Vec<i16>),
    #[serde(rename = "int32")]
    Int32(Vec<i32>),
    #[serde(rename = "int64")]
    Int64(Vec<i64>),
    #[serde(rename = "uint8")]
    UInt8(Vec<u8>),
    #[serde(rename = "uint16")]
    UInt16(Vec<u16>),
    #[serde(rename = "uint32")]
    UInt32(Vec<u32>),
    /// Naive instants with nanosecond precision, interpreted as UTC.
    #[serde(rename = "datetime64[ns]")]
    Timestamp(Vec<NaiveDateTime>),
    /// Time deltas in nanoseconds.
    #[serde(rename = "timedelta64[ns]")]
    TimeDelta(Vec<i64>),
    #[serde(rename = "str")]
    Text(Vec<String>),
}

/// A single element of an [`Array`], or a scene-level scalar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Float32(f32),
    Float64(f64),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    Timestamp(NaiveDateTime),
    TimeDelta(i64),
    Text(String),
}

impl Array {
    pub fn len(&self) -> usize {
        match self {
            Array::Float32(v) => v.len(),
            Array::Float64(v) => v.len(),
            Array::Int16(v) => v.len(),
            Array::Int32(v) => v.len(),
            Array::Int64(v) => v.len(),
            Array::UInt8(v) => v.len(),
            Array::UInt16(v) => v.len(),
            Array::UInt32(v) => v.len(),
            Array::Timestamp(v) => v.len(),
            Array::TimeDelta(v) => v.len(),
            Array::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> &'static str {
        match self {
            Array::Float32(_) => "float32",
            Array::Float64(_) => "float64",
            Array::Int16(_) => "int16",
            Array::Int32(_) => "int32",
            Array::Int64(_) => "int64",
            Array::UInt8(_) => "uint8",
            Array::UInt16(_) => "uint16",
            Array::UInt32(_) => "uint32",
            Array::Timestamp(_) => "datetime64[ns]",
            Array::TimeDelta(_) => "timedelta64[ns]",
            Array::Text(_) => "str",
        }
    }

    /// Element at `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<Value> {
        match self {
            Array::Float32(v) => v.get(index).copied().map(Value::Float32),
            Array::Float64(v) => v.get(index).copied().map(Value::Float64),
            Array::Int16(v) => v.get(index).copied().map(Value::Int16),
            Array::Int32(v) => v.get(index).copied().map(Value::Int32),
            Array::Int64(v) => v.get(index).copied().map(Value::Int64),
            Array::UInt8(v) => v.get(index).copied().map(Value::UInt8),
            Array::UInt16(v) => v.get(index).copied().map(Value::UInt16),
            Array::UInt32(v) => v.get(index).copied().map(Value::UInt32),
            Array::Timestamp(v) => v.get(index).copied().map(Value::Timestamp),
            Array::TimeDelta(v) => v.get(index).copied().map(Value::TimeDelta),
            Array::Text(v) => v.get(index).cloned().map(Value::Text),
        }
    }

    /// Numeric element at `index` widened to f64, for coordinate lookups.
    pub fn coordinate(&self, index: usize) -> Option<f64> {
        self.get(index).and_then(|value| value.as_f64())
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(
            self,
            Array::Timestamp(_) | Array::TimeDelta(_) | Array::Text(_)
        )
    }
}

impl Value {
    pub fn dtype(&self) -> &'static str {
        match self {
            Value::Float32(_) => "float32",
            Value::Float64(_) => "float64",
            Value::Int16(_) => "int16",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::UInt8(_) => "uint8",
            Value::UInt16(_) => "uint16",
            Value::UInt32(_) => "uint32",
            Value::Timestamp(_) => "datetime",
            Value::TimeDelta(_) => "timedelta64[ns]",
            Value::Text(_) => "str",
        }
    }

    /// Plain numbers only; instants, deltas and text yield `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Float32(v) => Some(v as f64),
            Value::Float64(v) => Some(v),
            Value::Int16(v) => Some(v as f64),
            Value::Int32(v) => Some(v as f64),
            Value::Int64(v) => Some(v as f64),
            Value::UInt8(v) => Some(v as f64),
            Value::UInt16(v) => Some(v as f64),
            Value::UInt32(v) => Some(v as f64),
            Value::Timestamp(_) | Value::TimeDelta(_) | Value::Text(_) => None,
        }
    }
}
