use super::{Client, GetIteratorOutput, GetRecordsOutput, GetShardsOutput, ShardSummary};
use crate::types::Record;

use anyhow::Result;
use async_trait::async_trait;
use aws_sdk_dynamodb::{
    config::{Builder as DbConfigBuilder, Region},
    Client as DbClient,
};
use aws_sdk_dynamodbstreams::{
    config::Builder as StreamConfigBuilder,
    error::SdkError,
    operation::{get_records::GetRecordsError, get_shard_iterator::GetShardIteratorError},
    types::ShardIteratorType,
    Client as StreamClient,
};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct DynamodbClient {
    db_client: DbClient,
    stream_client: StreamClient,
}

impl DynamodbClient {
    pub fn builder() -> DynamodbClientBuilder {
        DynamodbClientBuilder::new()
    }
}

#[derive(Debug, Default)]
pub struct DynamodbClientBuilder {
    region: Option<String>,
    endpoint_url: Option<String>,
}

impl DynamodbClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn region(self, region: Option<String>) -> Self {
        Self { region, ..self }
    }

    pub fn endpoint_url(self, endpoint_url: Option<String>) -> Self {
        Self {
            endpoint_url,
            ..self
        }
    }

    pub async fn build(self) -> DynamodbClient {
        let config = aws_config::load_from_env().await;
        let mut db_builder = DbConfigBuilder::from(&config);
        let mut stream_builder = StreamConfigBuilder::from(&config);

        if let Some(region) = self.region {
            db_builder = db_builder.region(Region::new(region.clone()));
            stream_builder = stream_builder.region(Region::new(region));
        }

        if let Some(url) = self.endpoint_url {
            db_builder = db_builder.endpoint_url(&url);
            stream_builder = stream_builder.endpoint_url(&url);
        }

        DynamodbClient {
            db_client: DbClient::from_conf(db_builder.build()),
            stream_client: StreamClient::from_conf(stream_builder.build()),
        }
    }
}

#[async_trait]
impl Client for DynamodbClient {
    async fn get_shards(
        &self,
        stream_arn: &str,
        exclusive_start_shard_id: Option<String>,
    ) -> Result<GetShardsOutput> {
        debug!(
            stream_arn,
            ?exclusive_start_shard_id,
            "DescribeStream (start)"
        );

        self.stream_client
            .describe_stream()
            .stream_arn(stream_arn)
            .set_exclusive_start_shard_id(exclusive_start_shard_id)
            .send()
            .await
            .map_err(anyhow::Error::from)
            .and_then(|output| {
                output
                    .stream_description
                    .ok_or(anyhow::anyhow!("Stream Description is None"))
            })
            .map(|description| {
                let shards = description
                    .shards
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|shard| {
                        let ending = shard
                            .sequence_number_range
                            .and_then(|range| range.ending_sequence_number);
                        shard.shard_id.map(|id| ShardSummary::new(id, ending))
                    })
                    .collect::<Vec<ShardSummary>>();

                GetShardsOutput {
                    shards,
                    last_shard_id: description.last_evaluated_shard_id,
                }
            })
    }

    async fn get_iterator(&self, stream_arn: &str, shard_id: &str) -> Result<GetIteratorOutput> {
        debug!(stream_arn, shard_id, "GetShardIterator (start)");

        self.stream_client
            .get_shard_iterator()
            .stream_arn(stream_arn)
            .shard_id(shard_id)
            .shard_iterator_type(ShardIteratorType::Latest)
            .send()
            .await
            .map(|output| GetIteratorOutput {
                iterator: output.shard_iterator,
            })
            .or_else(from_get_iterator_err)
    }

    async fn get_records(&self, iterator: &str) -> Result<GetRecordsOutput> {
        self.stream_client
            .get_records()
            .shard_iterator(iterator)
            .send()
            .await
            .map(|output| {
                let records = output
                    .records
                    .unwrap_or_default()
                    .into_iter()
                    .map(Record::from)
                    .collect::<Vec<Record>>();

                GetRecordsOutput {
                    records,
                    next_iterator: output.next_shard_iterator,
                }
            })
            .or_else(from_get_records_err)
    }

    async fn get_table_stream_arn(&self, table: &str) -> Result<Option<String>> {
        self.db_client
            .describe_table()
            .table_name(table)
            .send()
            .await
            .map(|output| output.table.and_then(|t| t.latest_stream_arn))
            .map_err(anyhow::Error::from)
    }

    async fn list_stream_arn(&self, table: &str) -> Result<Option<String>> {
        self.stream_client
            .list_streams()
            .table_name(table)
            .send()
            .await
            .map(|output| {
                output
                    .streams
                    .unwrap_or_default()
                    .into_iter()
                    .find_map(|stream| stream.stream_arn)
            })
            .map_err(anyhow::Error::from)
    }
}

fn from_get_iterator_err(err: SdkError<GetShardIteratorError>) -> Result<GetIteratorOutput> {
    use GetShardIteratorError::*;

    match err {
        SdkError::ServiceError(e) => {
            let e = e.into_err();
            match e {
                // Treat the shard as closed if the response is either
                // ResourceNotFound or TrimmedDataAccess.
                ResourceNotFoundException(_) | TrimmedDataAccessException(_) => {
                    warn!("GetShardIterator operation failed due to {e}");
                    warn!("{:#?}", e);
                    Ok(GetIteratorOutput { iterator: None })
                }
                _ => Err(anyhow::Error::from(e)),
            }
        }
        _ => Err(anyhow::Error::from(err)),
    }
}

fn from_get_records_err(err: SdkError<GetRecordsError>) -> Result<GetRecordsOutput> {
    use GetRecordsError::*;

    match err {
        SdkError::ServiceError(e) => {
            let e = e.into_err();
            match e {
                // Treat the shard as closed if the response is one of
                // ExpiredIterator, LimitExceeded, ResourceNotFound and
                // TrimmedDataAccess.
                ExpiredIteratorException(_)
                | LimitExceededException(_)
                | ResourceNotFoundException(_)
                | TrimmedDataAccessException(_) => {
                    warn!("GetRecords operation failed due to {e}");
                    warn!("{:#?}", e);
                    Ok(GetRecordsOutput {
                        records: vec![],
                        next_iterator: None,
                    })
                }
                _ => Err(anyhow::Error::from(e)),
            }
        }
        _ => Err(anyhow::Error::from(err)),
    }
}
