mod builder;

use crate::client::{Client, GetShardsOutput, ShardSummary};
use crate::error::Error;
use crate::types::{Entry, Shard, Shards};

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::{
    mpsc,
    oneshot::{self, error::TryRecvError},
};
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

pub use builder::SubscriberBuilder;

pub(crate) const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug)]
enum Event {
    Stop,
}

#[derive(Debug, Clone)]
enum Target {
    StreamArn(String),
    Table(String),
}

/// Polls every open shard of a stream on a fixed interval and republishes each
/// record, paired with its extracted key, to the consumer half.
pub struct Subscriber {
    client: Arc<dyn Client>,
    target: Target,
    interval: Duration,
    tx_entries: mpsc::UnboundedSender<Entry>,
    tx_errors: mpsc::UnboundedSender<Error>,
    rx_event: oneshot::Receiver<Event>,
}

/// One notification from the merged view of the two output channels.
#[derive(Debug)]
pub enum Notification {
    Record(Entry),
    Error(Error),
}

/// The consumer half: record and error channels plus the stop signal. Dropping
/// the handle stops the subscriber.
pub struct SubscriberHandle {
    tx_event: Option<oneshot::Sender<Event>>,
    rx_entries: mpsc::UnboundedReceiver<Entry>,
    rx_errors: mpsc::UnboundedReceiver<Error>,
}

impl SubscriberHandle {
    pub async fn recv(&mut self) -> Option<Entry> {
        self.rx_entries.recv().await
    }

    pub fn try_recv(&mut self) -> Option<Entry> {
        self.rx_entries.try_recv().ok()
    }

    pub async fn recv_error(&mut self) -> Option<Error> {
        self.rx_errors.recv().await
    }

    pub fn try_recv_error(&mut self) -> Option<Error> {
        self.rx_errors.try_recv().ok()
    }

    /// Wait on both channels at once. Returns `None` only when both are
    /// closed and drained.
    pub async fn next(&mut self) -> Option<Notification> {
        tokio::select! {
            Some(entry) = self.rx_entries.recv() => Some(Notification::Record(entry)),
            Some(err) = self.rx_errors.recv() => Some(Notification::Error(err)),
            else => None,
        }
    }

    /// Cancel future cycles. A cycle already in flight finishes.
    pub fn stop(&mut self) {
        if let Some(tx) = self.tx_event.take() {
            let _ = tx.send(Event::Stop);
        }
    }
}

impl Drop for SubscriberHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

type ReadResult = std::result::Result<Shard, (Shard, Error)>;

impl Subscriber {
    pub fn builder() -> SubscriberBuilder {
        SubscriberBuilder::new()
    }

    /// Resolve the stream arn if needed, run the initial discovery and start
    /// polling. Failures are reported on the error channel, not returned;
    /// start-up failures end the task before polling begins.
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    fn client(&self) -> Arc<dyn Client> {
        Arc::clone(&self.client)
    }

    fn fail(&self, err: Error) {
        if self.tx_errors.send(err).is_err() {
            warn!("The error receiver is gone.");
        }
    }

    async fn run(mut self) {
        let stream_arn = match self.resolve().await {
            Ok(arn) => arn,
            Err(err) => return self.fail(err),
        };

        let mut shards = match discover_open_shards(self.client(), &stream_arn).await {
            Ok(shards) => shards,
            Err(err) => return self.fail(Error::Discovery(err)),
        };

        info!(
            "Initial discovery found {} open shards. Start polling.",
            shards.len()
        );

        let mut tick = time::interval(self.interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of a tokio interval completes immediately.
        tick.tick().await;

        loop {
            tick.tick().await;

            match self.rx_event.try_recv() {
                Ok(Event::Stop) => {
                    info!("Received a stop event. Stop polling.");
                    return;
                }
                Err(TryRecvError::Closed) => {
                    info!("The consumer half is gone. Stop polling.");
                    return;
                }
                Err(TryRecvError::Empty) => {}
            }

            shards = self.run_cycle(&stream_arn, shards).await;
        }
    }

    /// One scheduled cycle: read every shard, then self-heal a stale directory
    /// with a single rediscovery and one more read pass before returning. The
    /// cycle settles exactly once whatever the outcome.
    ///
    /// On a read failure the first error is surfaced and the cycle ends there;
    /// iterators already advanced for sibling shards stay advanced. This is an
    /// accepted at-least-once tradeoff: the failed shard is re-read from its
    /// old iterator on the next tick while its siblings move on.
    async fn run_cycle(&self, stream_arn: &str, shards: Shards) -> Shards {
        let (shards, failure) = self.poll(shards).await;

        if let Some(err) = failure {
            self.fail(err);
            return shards;
        }

        if !shards.is_stale() {
            return shards;
        }

        debug!("Some or all shards are closed. Retrieving the list of shards.");

        let fresh = match discover_open_shards(self.client(), stream_arn).await {
            Ok(fresh) => fresh,
            Err(err) => {
                self.fail(Error::Discovery(err));
                // Keep the stale directory; the next tick retries rediscovery.
                return shards;
            }
        };

        let (shards, failure) = self.poll(fresh).await;
        if let Some(err) = failure {
            self.fail(err);
        }
        shards
    }

    /// Read every shard once, concurrently. Returns the directory with its
    /// iterators advanced and the first read failure, if any. A failed shard
    /// keeps its previous iterator.
    async fn poll(&self, shards: Shards) -> (Shards, Option<Error>) {
        if shards.is_empty() {
            return (shards, None);
        }

        let (tx, mut rx) = mpsc::channel::<ReadResult>(shards.len());

        for shard in shards {
            let client = self.client();
            let entries = self.tx_entries.clone();
            let tx = tx.clone();

            tokio::spawn(async move {
                let result = read_shard(client, shard, entries).await;
                if tx.send(result).await.is_err() {
                    warn!("Failed to send back a shard read result.");
                }
            });
        }

        drop(tx);

        let mut next: Vec<Shard> = vec![];
        let mut failure: Option<Error> = None;

        while let Some(result) = rx.recv().await {
            match result {
                Ok(shard) => next.push(shard),
                Err((shard, err)) => {
                    next.push(shard);
                    if failure.is_none() {
                        failure = Some(err);
                    }
                }
            }
        }

        (Shards::from(next), failure)
    }

    /// Resolve the target to a stream arn. Table targets try the table
    /// metadata first, best-effort, then the stream listing; only the second
    /// lookup failing (or yielding nothing) is fatal.
    async fn resolve(&self) -> std::result::Result<String, Error> {
        let table = match &self.target {
            Target::StreamArn(arn) => return Ok(arn.clone()),
            Target::Table(table) => table,
        };

        match self.client.get_table_stream_arn(table).await {
            Ok(Some(arn)) => return Ok(arn),
            Ok(None) => {}
            Err(err) => {
                warn!("DescribeTable lookup for `{table}` failed: {err}");
            }
        }

        match self.client.list_stream_arn(table).await {
            Ok(Some(arn)) => Ok(arn),
            Ok(None) => Err(Error::Resolution {
                table: table.clone(),
                source: anyhow::anyhow!("no stream is attached to the table"),
            }),
            Err(source) => Err(Error::Resolution {
                table: table.clone(),
                source,
            }),
        }
    }
}

/// Read one shard's available records, emitting each entry as it is obtained,
/// and advance the iterator to the reported next one (possibly absent). A
/// shard whose iterator is already gone is passed through untouched; it is
/// rebuilt by the next rediscovery.
async fn read_shard(
    client: Arc<dyn Client>,
    mut shard: Shard,
    entries: mpsc::UnboundedSender<Entry>,
) -> ReadResult {
    let iterator = match shard.iterator() {
        Some(iterator) => iterator.to_owned(),
        None => return Ok(shard),
    };

    let output = match client.get_records(&iterator).await {
        Ok(output) => output,
        Err(source) => {
            let err = Error::Read {
                shard_id: shard.id().to_owned(),
                source,
            };
            return Err((shard, err));
        }
    };

    debug!(
        shard_id = shard.id(),
        records = output.records.len(),
        has_next_iterator = output.next_iterator.is_some(),
        "GetRecords (end)"
    );

    for record in output.records {
        if entries.send(Entry::from(record)).is_err() {
            // The consumer is gone; the polling loop notices at the next tick.
            break;
        }
    }

    shard.set_iterator(output.next_iterator);
    Ok(shard)
}

/// Walk the whole paginated shard list, keep the shards without an ending
/// sequence number and attach a LATEST iterator to each. Subscribers observe
/// writes from the moment of discovery forward, never historical backlog.
/// Fails as a whole on any page or iterator failure; no partial directory is
/// ever returned.
async fn discover_open_shards(client: Arc<dyn Client>, stream_arn: &str) -> Result<Shards> {
    let GetShardsOutput {
        shards,
        mut last_shard_id,
    } = client.get_shards(stream_arn, None).await?;

    let mut open: Vec<ShardSummary> = shards.into_iter().filter(|s| s.is_open()).collect();

    while last_shard_id.is_some() {
        let output = client.get_shards(stream_arn, last_shard_id.take()).await?;
        open.extend(output.shards.into_iter().filter(|s| s.is_open()));
        last_shard_id = output.last_shard_id;
    }

    debug!(open_shards = open.len(), "DescribeStream walk (end)");

    let mut directory = Shards::new();

    for summary in open {
        let output = client.get_iterator(stream_arn, summary.id()).await?;
        directory.push(Shard::new(summary.into_id(), output.iterator));
    }

    Ok(directory)
}
