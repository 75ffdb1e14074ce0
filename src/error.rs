use thiserror::Error;

/// Failures surfaced on the subscriber's error channel, one taxonomy entry per
/// stage that can fail.
#[derive(Debug, Error)]
pub enum Error {
    /// No stream arn could be obtained for the table, from either the table
    /// metadata or the stream listing. Fatal to start-up.
    #[error("cannot retrieve the stream arn of `{table}`: {source}")]
    Resolution {
        table: String,
        #[source]
        source: anyhow::Error,
    },

    /// A full discovery pass failed, either a DescribeStream page or a shard
    /// iterator fetch. No partial directory is ever installed.
    #[error("failed to discover open shards: {0}")]
    Discovery(#[source] anyhow::Error),

    /// A single shard's record read failed. Fatal to the cycle, not to the
    /// subscriber; the next tick retries with the directory as it stands.
    #[error("failed to read records from shard `{shard_id}`: {source}")]
    Read {
        shard_id: String,
        #[source]
        source: anyhow::Error,
    },
}
