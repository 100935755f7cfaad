use aws_config::BehaviorVersion;
use clock::SystemClock;
use cloudwatch::CloudWatchPublisher;
use config::Config;
use lambda_runtime::{service_fn, LambdaEvent};
use reporter::MetricReporter;
use serde_json::Value;
use tracing::error;

mod clock;
mod cloudwatch;
mod config;
mod error;
mod event;
mod reporter;

type Reporter = MetricReporter<SystemClock, CloudWatchPublisher>;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .with_ansi(false)
        .without_time()
        .init();
}

async fn build_reporter(config: Config) -> Reporter {
    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let cloudwatch_client = aws_sdk_cloudwatch::Client::new(&aws_config);
    MetricReporter::new(
        SystemClock,
        CloudWatchPublisher::new(cloudwatch_client),
        config.zone,
    )
}

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    init_logging();
    let config = Config::from_env()?;
    let reporter = build_reporter(config).await;
    let reporter = &reporter;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        lambda_handler(reporter, event).await
    }))
    .await?;
    Ok(())
}

async fn lambda_handler(
    reporter: &Reporter,
    event: LambdaEvent<Value>,
) -> Result<(), lambda_runtime::Error> {
    match reporter.handle(&event.payload).await {
        Ok(_) => Ok(()),
        Err(err) => {
            error!(request_id = %event.context.request_id, "Error: {:?}", err);
            Err(err.into())
        }
    }
}
