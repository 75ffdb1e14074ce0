use super::{Event, Subscriber, SubscriberHandle, Target, DEFAULT_INTERVAL};
use crate::client::{Client, DynamodbClient};
use crate::error::Error;
use crate::types::Entry;

use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Duration;

#[derive(Default)]
pub struct SubscriberBuilder {
    client: Option<Arc<dyn Client>>,
    stream_arn: Option<String>,
    table: Option<String>,
    interval: Option<Duration>,
    region: Option<String>,
    endpoint_url: Option<String>,
}

impl SubscriberBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stream_arn<T: Into<String>>(self, stream_arn: T) -> Self {
        Self {
            stream_arn: Some(stream_arn.into()),
            ..self
        }
    }

    pub fn table<T: Into<String>>(self, table: T) -> Self {
        Self {
            table: Some(table.into()),
            ..self
        }
    }

    /// Polling interval, 10 seconds unless set.
    pub fn interval(self, interval: Duration) -> Self {
        Self {
            interval: Some(interval),
            ..self
        }
    }

    pub fn region<T: Into<String>>(self, region: T) -> Self {
        Self {
            region: Some(region.into()),
            ..self
        }
    }

    pub fn endpoint_url<T: Into<String>>(self, endpoint_url: T) -> Self {
        Self {
            endpoint_url: Some(endpoint_url.into()),
            ..self
        }
    }

    /// Replace the AWS client, mainly for tests.
    pub fn client(self, client: Arc<dyn Client>) -> Self {
        Self {
            client: Some(client),
            ..self
        }
    }

    /// Build the subscriber and its consumer half.
    ///
    /// # Panics
    ///
    /// Panics unless exactly one of `stream_arn` and `table` is set.
    pub async fn build(self) -> (Subscriber, SubscriberHandle) {
        let target = match (self.stream_arn, self.table) {
            (Some(stream_arn), None) => Target::StreamArn(stream_arn),
            (None, Some(table)) => Target::Table(table),
            (Some(_), Some(_)) => panic!("`stream_arn` and `table` are mutually exclusive"),
            (None, None) => panic!("either `stream_arn` or `table` is required"),
        };

        let client = match self.client {
            Some(client) => client,
            None => Arc::new(
                DynamodbClient::builder()
                    .region(self.region)
                    .endpoint_url(self.endpoint_url)
                    .build()
                    .await,
            ),
        };

        let (tx_event, rx_event) = oneshot::channel::<Event>();
        let (tx_entries, rx_entries) = mpsc::unbounded_channel::<Entry>();
        let (tx_errors, rx_errors) = mpsc::unbounded_channel::<Error>();

        let subscriber = Subscriber {
            client,
            target,
            interval: self.interval.unwrap_or(DEFAULT_INTERVAL),
            tx_entries,
            tx_errors,
            rx_event,
        };

        let handle = SubscriberHandle {
            tx_event: Some(tx_event),
            rx_entries,
            rx_errors,
        };

        (subscriber, handle)
    }
}
