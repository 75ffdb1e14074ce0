use aws_sdk_dynamodbstreams::{primitives, types};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Owned mirror of the SDK attribute value. Serializes in the DynamoDB tagged
/// form (`{"S": "..."}`) and decodes to plain JSON via [`into_plain`].
///
/// [`into_plain`]: AttributeValue::into_plain
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "UPPERCASE")]
pub enum AttributeValue {
    B(String),
    Bool(bool),
    Bs(Vec<String>),
    L(Vec<AttributeValue>),
    M(HashMap<String, AttributeValue>),
    N(String),
    Ns(Vec<String>),
    Null(bool),
    S(String),
    Ss(Vec<String>),
    Unknown,
}

impl AttributeValue {
    /// Decode into a plain JSON value, dropping the type tags: strings stay
    /// strings, numbers become JSON numbers (or stay strings when they do not
    /// parse), maps become objects. This is how extracted keys are emitted.
    pub fn into_plain(self) -> Value {
        match self {
            Self::B(v) | Self::S(v) => Value::String(v),
            Self::Bool(v) => Value::Bool(v),
            Self::Bs(vs) | Self::Ss(vs) => vs.into_iter().map(Value::String).collect(),
            Self::L(vs) => vs.into_iter().map(Self::into_plain).collect(),
            Self::M(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, value.into_plain()))
                    .collect(),
            ),
            Self::N(v) => plain_number(v),
            Self::Ns(vs) => vs.into_iter().map(plain_number).collect(),
            Self::Null(_) | Self::Unknown => Value::Null,
        }
    }
}

impl From<types::AttributeValue> for AttributeValue {
    fn from(value: types::AttributeValue) -> AttributeValue {
        match value {
            types::AttributeValue::B(v) => AttributeValue::B(into_str(v)),
            types::AttributeValue::Bool(v) => AttributeValue::Bool(v),
            types::AttributeValue::Bs(v) => {
                AttributeValue::Bs(v.into_iter().map(into_str).collect())
            }
            types::AttributeValue::L(v) => {
                AttributeValue::L(v.into_iter().map(AttributeValue::from).collect())
            }
            types::AttributeValue::M(v) => AttributeValue::M(into_item(v)),
            types::AttributeValue::N(v) => AttributeValue::N(v),
            types::AttributeValue::Ns(v) => AttributeValue::Ns(v),
            types::AttributeValue::Null(v) => AttributeValue::Null(v),
            types::AttributeValue::S(v) => AttributeValue::S(v),
            types::AttributeValue::Ss(v) => AttributeValue::Ss(v),
            _ => AttributeValue::Unknown,
        }
    }
}

pub(crate) fn into_item(
    value: HashMap<String, types::AttributeValue>,
) -> HashMap<String, AttributeValue> {
    value
        .into_iter()
        .map(|(key, val)| (key, AttributeValue::from(val)))
        .collect()
}

fn into_str(blob: primitives::Blob) -> String {
    String::from_utf8_lossy(&blob.into_inner()).into_owned()
}

fn plain_number(value: String) -> Value {
    match value.parse::<serde_json::Number>() {
        Ok(number) => Value::Number(number),
        Err(_) => Value::String(value),
    }
}
