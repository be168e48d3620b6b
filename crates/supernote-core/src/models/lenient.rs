//! Field deserializers for request bodies that cast scalars the way a
//! document store would.
//!
//! Form-encoded bodies carry every value as a string and collapse a
//! single-element list into a plain value, so the note inputs accept:
//! - text from strings, numbers, and booleans
//! - tag lists from a sequence or a single scalar
//! - flags from booleans, `0`/`1`, and `"true"`/`"false"`/`"1"`/`"0"`/`"yes"`/`"no"`
//!
//! `null` is `None` for all of them.

use serde::de::{Error, Unexpected};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Option::<Value>::deserialize(deserializer)?
        .map(scalar_text)
        .transpose()
}

pub fn text_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(scalar_text)
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(value) => scalar_text(value).map(|item| Some(vec![item])),
    }
}

pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    let Some(value) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match value {
        Value::Bool(flag) => Ok(Some(flag)),
        Value::Number(number) => match number.as_i64() {
            Some(1) => Ok(Some(true)),
            Some(0) => Ok(Some(false)),
            _ => Err(Error::invalid_value(Unexpected::Other("number"), &"a boolean")),
        },
        Value::String(text) => match text.as_str() {
            "true" | "1" | "yes" => Ok(Some(true)),
            "false" | "0" | "no" => Ok(Some(false)),
            _ => Err(Error::invalid_value(Unexpected::Str(&text), &"a boolean")),
        },
        other => Err(Error::invalid_type(unexpected(&other), &"a boolean")),
    }
}

fn scalar_text<E: Error>(value: Value) -> Result<String, E> {
    match value {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(E::invalid_type(unexpected(&other), &"a string")),
    }
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Null => Unexpected::Unit,
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
        Value::Bool(flag) => Unexpected::Bool(*flag),
        Value::Number(_) => Unexpected::Other("number"),
        Value::String(text) => Unexpected::Str(text),
    }
}
