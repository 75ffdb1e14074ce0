use super::attribute_value::{into_item, AttributeValue};

use aws_sdk_dynamodbstreams::{primitives, types};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Owned mirror of one stream record. Ownership transfers to the consumer on
/// emission; the subscriber retains no copy.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    event_id: Option<String>,
    event_name: Option<OperationType>,
    event_source: Option<String>,
    aws_region: Option<String>,
    dynamodb: Option<StreamRecord>,
}

impl Record {
    /// The record's primary key decoded to a plain JSON object, or `None` when
    /// the record carries no key attributes (a valid, non-error case).
    pub fn key(&self) -> Option<Value> {
        self.dynamodb
            .as_ref()
            .and_then(|stream_record| stream_record.keys.as_ref())
            .map(|keys| {
                Value::Object(
                    keys.iter()
                        .map(|(name, value)| (name.clone(), value.clone().into_plain()))
                        .collect(),
                )
            })
    }
}

impl From<types::Record> for Record {
    fn from(value: types::Record) -> Record {
        Record {
            event_id: value.event_id,
            event_name: value.event_name.map(OperationType::from),
            event_source: value.event_source,
            aws_region: value.aws_region,
            dynamodb: value.dynamodb.map(StreamRecord::from),
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "UPPERCASE")]
enum OperationType {
    Insert,
    Modify,
    Remove,
    Unknown,
}

impl From<types::OperationType> for OperationType {
    fn from(value: types::OperationType) -> OperationType {
        match value {
            types::OperationType::Insert => OperationType::Insert,
            types::OperationType::Modify => OperationType::Modify,
            types::OperationType::Remove => OperationType::Remove,
            _ => OperationType::Unknown,
        }
    }
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "PascalCase")]
struct StreamRecord {
    approximate_creation_date_time: Option<DateTime<Utc>>,
    keys: Option<HashMap<String, AttributeValue>>,
    new_image: Option<HashMap<String, AttributeValue>>,
    old_image: Option<HashMap<String, AttributeValue>>,
    sequence_number: Option<String>,
    size_bytes: Option<i64>,
}

impl From<types::StreamRecord> for StreamRecord {
    fn from(value: types::StreamRecord) -> StreamRecord {
        StreamRecord {
            approximate_creation_date_time: value.approximate_creation_date_time.map(into_chrono),
            keys: value.keys.map(into_item),
            new_image: value.new_image.map(into_item),
            old_image: value.old_image.map(into_item),
            sequence_number: value.sequence_number,
            size_bytes: value.size_bytes,
        }
    }
}

fn into_chrono(datetime: primitives::DateTime) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(datetime.secs(), datetime.subsec_nanos())
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
impl Record {
    pub fn stub<T: Into<String>>(event_id: T) -> Self {
        Self {
            event_id: Some(event_id.into()),
            event_name: None,
            event_source: None,
            aws_region: None,
            dynamodb: None,
        }
    }

    pub fn with_key<T: Into<String>>(event_id: T, name: &str, value: &str) -> Self {
        let mut keys: HashMap<String, AttributeValue> = HashMap::new();
        keys.insert(name.into(), AttributeValue::S(value.into()));

        Self {
            dynamodb: Some(StreamRecord {
                approximate_creation_date_time: None,
                keys: Some(keys),
                new_image: None,
                old_image: None,
                sequence_number: None,
                size_bytes: None,
            }),
            ..Self::stub(event_id)
        }
    }

    pub fn event_id(&self) -> Option<&str> {
        self.event_id.as_deref()
    }
}
