use aws_sdk_dynamodb::{config::Builder as ConfigBuilder, types::AttributeValue, Client};
use dynamo_subscriber::{ENV_DYNAMODB_ENDPOINT_URL, ENV_TABLE};
use std::env;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;
use ulid::Ulid;

const PK: &str = "Id";

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::new();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let table = env::var(ENV_TABLE).unwrap_or("People".into());
    let mut builder = ConfigBuilder::from(&aws_config::load_from_env().await);
    if let Ok(url) = env::var(ENV_DYNAMODB_ENDPOINT_URL) {
        builder = builder.endpoint_url(url);
    }
    let client = Client::from_conf(builder.build());

    let id = Ulid::new().to_string();

    match client
        .put_item()
        .table_name(&table)
        .item(PK, AttributeValue::S(id.clone()))
        .send()
        .await
    {
        Ok(_) => {
            info!("Put item `{id}` into `{table}`");
        }
        Err(err) => {
            error!("{:#?}", err);
        }
    }
}
