mod dynamodb;
#[cfg(test)]
mod mock;

use crate::types::Record;

use anyhow::Result;
use async_trait::async_trait;

pub use dynamodb::{DynamodbClient, DynamodbClientBuilder};
#[cfg(test)]
pub use mock::MockClient;

/// One shard as reported by a DescribeStream page. A shard is open while the
/// service has not recorded an ending sequence number for it.
#[derive(Debug, Clone)]
pub struct ShardSummary {
    id: String,
    ending_sequence_number: Option<String>,
}

impl ShardSummary {
    pub fn new<T: Into<String>>(id: T, ending_sequence_number: Option<String>) -> Self {
        Self {
            id: id.into(),
            ending_sequence_number,
        }
    }

    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    pub fn into_id(self) -> String {
        self.id
    }

    pub fn is_open(&self) -> bool {
        self.ending_sequence_number.is_none()
    }
}

#[derive(Debug)]
pub struct GetShardsOutput {
    pub shards: Vec<ShardSummary>,
    pub last_shard_id: Option<String>,
}

#[derive(Debug)]
pub struct GetIteratorOutput {
    pub iterator: Option<String>,
}

#[derive(Debug)]
pub struct GetRecordsOutput {
    pub records: Vec<Record>,
    pub next_iterator: Option<String>,
}

#[async_trait]
pub trait Client: Send + Sync {
    /// Fetch one page of the stream's shard list.
    async fn get_shards(
        &self,
        stream_arn: &str,
        exclusive_start_shard_id: Option<String>,
    ) -> Result<GetShardsOutput>;

    /// Fetch a LATEST iterator for the shard.
    async fn get_iterator(&self, stream_arn: &str, shard_id: &str) -> Result<GetIteratorOutput>;

    /// Read available records from the iterator.
    async fn get_records(&self, iterator: &str) -> Result<GetRecordsOutput>;

    /// Look up the table's latest stream arn from its metadata.
    async fn get_table_stream_arn(&self, table: &str) -> Result<Option<String>>;

    /// Look up a stream arn by listing the streams of the table.
    async fn list_stream_arn(&self, table: &str) -> Result<Option<String>>;
}
