use aws_sdk_dynamodb::{
    config::Builder as ConfigBuilder,
    types::{
        AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType,
        StreamSpecification, StreamViewType,
    },
    Client,
};
use dynamo_subscriber::{ENV_DYNAMODB_ENDPOINT_URL, ENV_TABLE};
use std::env;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

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

    match client
        .create_table()
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(PK)
                .attribute_type(ScalarAttributeType::S)
                .build()
                .unwrap(),
        )
        .table_name(&table)
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name(PK)
                .key_type(KeyType::Hash)
                .build()
                .unwrap(),
        )
        .billing_mode(BillingMode::PayPerRequest)
        .stream_specification(
            StreamSpecification::builder()
                .stream_enabled(true)
                .stream_view_type(StreamViewType::NewImage)
                .build()
                .unwrap(),
        )
        .send()
        .await
    {
        Ok(output) => {
            if let Some(description) = output.table_description {
                info!(
                    "Created `{table}` with stream: {}",
                    description.latest_stream_arn.unwrap_or_default()
                );
            }
        }
        Err(err) => {
            error!("{:#?}", err);
        }
    }
}
