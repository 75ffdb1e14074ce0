use super::Record;

use serde::Serialize;
use serde_json::Value;

/// One emitted notification: the record paired with its extracted key.
#[derive(Debug, Serialize, Clone)]
pub struct Entry {
    pub record: Record,
    pub key: Option<Value>,
}

impl From<Record> for Entry {
    fn from(record: Record) -> Self {
        let key = record.key();
        Self { record, key }
    }
}
