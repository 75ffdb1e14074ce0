use dynamo_subscriber::{Config, Notification, Subscriber};
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::new();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let config = Config::new();

    let mut builder = Subscriber::builder().interval(config.interval());
    builder = match (config.stream_arn(), config.table()) {
        (Some(stream_arn), None) => builder.stream_arn(stream_arn),
        (None, Some(table)) => builder.table(table),
        _ => {
            error!("set exactly one of SUBSCRIBER_STREAM_ARN and SUBSCRIBER_TABLE");
            return;
        }
    };
    if let Some(url) = config.endpoint_url() {
        builder = builder.endpoint_url(url);
    }

    let (subscriber, mut handle) = builder.build().await;
    let job = subscriber.start();

    while let Some(notification) = handle.next().await {
        match notification {
            Notification::Record(entry) => match serde_json::to_string(&entry) {
                Ok(json) => info!("{json}"),
                Err(err) => error!("{:#?}", err),
            },
            Notification::Error(err) => error!("{err}"),
        }
    }

    let _ = job.await;
}
