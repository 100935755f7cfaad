use async_trait::async_trait;
use aws_sdk_cloudwatch::{
    primitives::DateTime as SmithyDateTime,
    types::{MetricDatum, StandardUnit},
};
use chrono::{DateTime, Utc};

use crate::error::PublishError;

pub const UNIT_SECONDS: &str = "Seconds";

/// One time-of-day observation, built and sent once per invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricSample {
    pub namespace: String,
    pub metric_name: String,
    pub timestamp: DateTime<Utc>,
    pub value: u32,
    pub unit: &'static str,
}

#[async_trait]
pub trait MetricPublisher: Send + Sync {
    async fn publish(&self, sample: &MetricSample) -> Result<(), PublishError>;
}

pub struct CloudWatchPublisher {
    cloudwatch_client: aws_sdk_cloudwatch::Client,
}

impl CloudWatchPublisher {
    pub fn new(cloudwatch_client: aws_sdk_cloudwatch::Client) -> Self {
        CloudWatchPublisher { cloudwatch_client }
    }
}

pub fn format_metric_datum(sample: &MetricSample) -> MetricDatum {
    MetricDatum::builder()
        .metric_name(&sample.metric_name)
        .timestamp(SmithyDateTime::from_millis(sample.timestamp.timestamp_millis()))
        .value(f64::from(sample.value))
        .unit(StandardUnit::from(sample.unit))
        .build()
}

#[async_trait]
impl MetricPublisher for CloudWatchPublisher {
    async fn publish(&self, sample: &MetricSample) -> Result<(), PublishError> {
        self.cloudwatch_client
            .put_metric_data()
            .namespace(&sample.namespace)
            .metric_data(format_metric_datum(sample))
            .send()
            .await
            .map_err(|err| PublishError {
                namespace: sample.namespace.clone(),
                metric_name: sample.metric_name.clone(),
                source: err.into(),
            })?;
        Ok(())
    }
}
