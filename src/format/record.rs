//! Field-level access to element records.
//!
//! [`RecordReader`] turns each field of a JSON object into a typed value or a
//! [`DecodeError`] naming that field, and remembers which keys the schema
//! consumed so the rest can be kept verbatim. [`RecordWriter`] is its inverse.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::format::error::DecodeError;

pub(crate) struct RecordReader<'a> {
    fields: &'a Map<String, Value>,
    consumed: Vec<&'static str>,
}

impl<'a> RecordReader<'a> {
    pub(crate) fn new(fields: &'a Map<String, Value>) -> Self {
        Self {
            fields,
            consumed: Vec::new(),
        }
    }

    /// Whether the key is present at all (even as `null`).
    pub(crate) fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Mark a key as consumed and return its raw value.
    pub(crate) fn take(&mut self, field: &'static str) -> Option<&'a Value> {
        self.consumed.push(field);
        self.fields.get(field)
    }

    /// A field that must be present and non-null.
    pub(crate) fn required<T: DeserializeOwned>(
        &mut self,
        field: &'static str,
        expected: &'static str,
    ) -> Result<T, DecodeError> {
        match self.take(field) {
            None => Err(DecodeError::missing_field(field)),
            Some(value) => parse(field, value, expected),
        }
    }

    /// A field that may be absent or `null`.
    pub(crate) fn optional<T: DeserializeOwned>(
        &mut self,
        field: &'static str,
        expected: &'static str,
    ) -> Result<Option<T>, DecodeError> {
        match self.take(field) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => parse(field, value, expected).map(Some),
        }
    }

    /// A required integer. Whole floating point numbers are accepted, since
    /// some writers emit every number as a double.
    pub(crate) fn required_integer(&mut self, field: &'static str) -> Result<i64, DecodeError> {
        match self.take(field) {
            None => Err(DecodeError::missing_field(field)),
            Some(value) => integer(field, value),
        }
    }

    /// An optional integer, see [`RecordReader::required_integer`].
    pub(crate) fn optional_integer(
        &mut self,
        field: &'static str,
    ) -> Result<Option<i64>, DecodeError> {
        match self.take(field) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => integer(field, value).map(Some),
        }
    }

    /// An optional JSON object kept as-is.
    pub(crate) fn optional_object(
        &mut self,
        field: &'static str,
    ) -> Result<Option<Map<String, Value>>, DecodeError> {
        match self.take(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map.clone())),
            Some(_) => Err(DecodeError::malformed(field, "object")),
        }
    }

    /// Every key not consumed so far.
    pub(crate) fn remaining(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .filter(|(key, _)| !self.consumed.iter().any(|c| *c == key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

fn parse<T: DeserializeOwned>(
    field: &str,
    value: &Value,
    expected: &'static str,
) -> Result<T, DecodeError> {
    <T as Deserialize<'_>>::deserialize(value).map_err(|_| DecodeError::malformed(field, expected))
}

fn integer(field: &str, value: &Value) -> Result<i64, DecodeError> {
    if let Some(int) = value.as_i64() {
        return Ok(int);
    }
    match value.as_f64() {
        Some(float) if float.fract() == 0.0 && float.abs() < 9.0e15 => Ok(float as i64),
        _ => Err(DecodeError::malformed(field, "integer")),
    }
}

pub(crate) struct RecordWriter {
    fields: Map<String, Value>,
    reserved: Vec<&'static str>,
}

impl RecordWriter {
    pub(crate) fn new() -> Self {
        Self {
            fields: Map::new(),
            reserved: Vec::new(),
        }
    }

    pub(crate) fn put(&mut self, field: &'static str, value: impl Into<Value>) {
        self.reserved.push(field);
        self.fields.insert(field.to_string(), value.into());
    }

    /// Write the value if present; absent values are omitted, never `null`.
    pub(crate) fn put_opt<T: Into<Value>>(&mut self, field: &'static str, value: Option<T>) {
        self.reserved.push(field);
        if let Some(value) = value {
            self.fields.insert(field.to_string(), value.into());
        }
    }

    /// Reserve a field without writing it, so extra keys cannot reintroduce it.
    pub(crate) fn skip(&mut self, field: &'static str) {
        self.reserved.push(field);
    }

    /// Append unrecognized keys that do not collide with schema fields.
    pub(crate) fn finish(mut self, extra: &Map<String, Value>) -> Value {
        for (key, value) in extra {
            if self.reserved.iter().any(|r| *r == key.as_str()) || self.fields.contains_key(key) {
                continue;
            }
            self.fields.insert(key.clone(), value.clone());
        }
        Value::Object(self.fields)
    }
}
