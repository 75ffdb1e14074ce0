use super::{Client, GetIteratorOutput, GetRecordsOutput, GetShardsOutput, ShardSummary};
use crate::types::Record;

use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Scripted stand-in for the AWS clients. Pages are served in push order,
/// record batches are keyed by iterator token and consumed once, which matches
/// the read-once-and-replace iterator contract.
#[derive(Debug, Default)]
pub struct MockClient {
    pages: Mutex<VecDeque<PageResponse>>,
    iterators: Mutex<HashMap<String, IteratorResponse>>,
    batches: Mutex<HashMap<String, BatchResponse>>,
    table_arn: Mutex<Lookup>,
    listed_arn: Mutex<Lookup>,
    page_calls: AtomicUsize,
    discovery_calls: AtomicUsize,
    record_calls: AtomicUsize,
}

#[derive(Debug)]
enum PageResponse {
    Page {
        shards: Vec<ShardSummary>,
        last_shard_id: Option<String>,
    },
    Fail(String),
}

#[derive(Debug)]
enum IteratorResponse {
    Token(String),
    Fail(String),
}

#[derive(Debug)]
enum BatchResponse {
    Batch {
        records: Vec<Record>,
        next_iterator: Option<String>,
    },
    Fail(String),
}

#[derive(Debug, Default)]
enum Lookup {
    Found(String),
    #[default]
    Missing,
    Fail(String),
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_page(&self, shards: Vec<(&str, bool)>, last_shard_id: Option<&str>) {
        let shards = shards
            .into_iter()
            .map(|(id, open)| {
                let ending = (!open).then(|| "00000000000000000000000001".to_string());
                ShardSummary::new(id, ending)
            })
            .collect();

        self.pages.lock().unwrap().push_back(PageResponse::Page {
            shards,
            last_shard_id: last_shard_id.map(String::from),
        });
    }

    pub fn push_page_failure(&self, message: &str) {
        self.pages
            .lock()
            .unwrap()
            .push_back(PageResponse::Fail(message.into()));
    }

    pub fn set_iterator(&self, shard_id: &str, token: &str) {
        self.iterators
            .lock()
            .unwrap()
            .insert(shard_id.into(), IteratorResponse::Token(token.into()));
    }

    pub fn fail_iterator(&self, shard_id: &str, message: &str) {
        self.iterators
            .lock()
            .unwrap()
            .insert(shard_id.into(), IteratorResponse::Fail(message.into()));
    }

    pub fn push_batch(&self, iterator: &str, records: Vec<Record>, next_iterator: Option<&str>) {
        self.batches.lock().unwrap().insert(
            iterator.into(),
            BatchResponse::Batch {
                records,
                next_iterator: next_iterator.map(String::from),
            },
        );
    }

    pub fn fail_batch(&self, iterator: &str, message: &str) {
        self.batches
            .lock()
            .unwrap()
            .insert(iterator.into(), BatchResponse::Fail(message.into()));
    }

    pub fn set_table_arn(&self, arn: &str) {
        *self.table_arn.lock().unwrap() = Lookup::Found(arn.into());
    }

    pub fn fail_table_lookup(&self, message: &str) {
        *self.table_arn.lock().unwrap() = Lookup::Fail(message.into());
    }

    pub fn set_listed_arn(&self, arn: &str) {
        *self.listed_arn.lock().unwrap() = Lookup::Found(arn.into());
    }

    pub fn fail_listing(&self, message: &str) {
        *self.listed_arn.lock().unwrap() = Lookup::Fail(message.into());
    }

    /// Total DescribeStream calls, one per page.
    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    /// Full discovery passes, counted by first-page calls.
    pub fn discovery_calls(&self) -> usize {
        self.discovery_calls.load(Ordering::SeqCst)
    }

    pub fn record_calls(&self) -> usize {
        self.record_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Client for MockClient {
    async fn get_shards(
        &self,
        _stream_arn: &str,
        exclusive_start_shard_id: Option<String>,
    ) -> Result<GetShardsOutput> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        if exclusive_start_shard_id.is_none() {
            self.discovery_calls.fetch_add(1, Ordering::SeqCst);
        }

        match self.pages.lock().unwrap().pop_front() {
            Some(PageResponse::Page {
                shards,
                last_shard_id,
            }) => Ok(GetShardsOutput {
                shards,
                last_shard_id,
            }),
            Some(PageResponse::Fail(message)) => Err(anyhow::anyhow!(message)),
            None => Ok(GetShardsOutput {
                shards: vec![],
                last_shard_id: None,
            }),
        }
    }

    async fn get_iterator(&self, _stream_arn: &str, shard_id: &str) -> Result<GetIteratorOutput> {
        match self.iterators.lock().unwrap().get(shard_id) {
            Some(IteratorResponse::Token(token)) => Ok(GetIteratorOutput {
                iterator: Some(token.clone()),
            }),
            Some(IteratorResponse::Fail(message)) => Err(anyhow::anyhow!(message.clone())),
            None => Ok(GetIteratorOutput { iterator: None }),
        }
    }

    async fn get_records(&self, iterator: &str) -> Result<GetRecordsOutput> {
        self.record_calls.fetch_add(1, Ordering::SeqCst);

        match self.batches.lock().unwrap().remove(iterator) {
            Some(BatchResponse::Batch {
                records,
                next_iterator,
            }) => Ok(GetRecordsOutput {
                records,
                next_iterator,
            }),
            Some(BatchResponse::Fail(message)) => Err(anyhow::anyhow!(message)),
            None => Ok(GetRecordsOutput {
                records: vec![],
                next_iterator: None,
            }),
        }
    }

    async fn get_table_stream_arn(&self, _table: &str) -> Result<Option<String>> {
        match &*self.table_arn.lock().unwrap() {
            Lookup::Found(arn) => Ok(Some(arn.clone())),
            Lookup::Missing => Ok(None),
            Lookup::Fail(message) => Err(anyhow::anyhow!(message.clone())),
        }
    }

    async fn list_stream_arn(&self, _table: &str) -> Result<Option<String>> {
        match &*self.listed_arn.lock().unwrap() {
            Lookup::Found(arn) => Ok(Some(arn.clone())),
            Lookup::Missing => Ok(None),
            Lookup::Fail(message) => Err(anyhow::anyhow!(message.clone())),
        }
    }
}
