pub mod client;
mod config;
mod error;
mod subscriber;
pub mod types;

pub use client::{Client, DynamodbClient, DynamodbClientBuilder};
pub use config::Config;
pub use error::Error;
pub use subscriber::{Notification, Subscriber, SubscriberBuilder, SubscriberHandle};
pub use types::{Entry, Record, Shard, Shards};

pub const ENV_DYNAMODB_ENDPOINT_URL: &str = "DYNAMODB_ENDPOINT_URL";
pub const ENV_STREAM_ARN: &str = "SUBSCRIBER_STREAM_ARN";
pub const ENV_TABLE: &str = "SUBSCRIBER_TABLE";
pub const ENV_INTERVAL_SECS: &str = "SUBSCRIBER_INTERVAL_SECS";
