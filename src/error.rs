use thiserror::Error;

pub type OpaqueError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of the CloudWatch call. The SDK error is kept as the source.
#[derive(Debug, Error)]
#[error("failed to publish metric {metric_name} to namespace {namespace}")]
pub struct PublishError {
    pub namespace: String,
    pub metric_name: String,
    #[source]
    pub source: OpaqueError,
}

#[derive(Debug, Error)]
pub enum ReporterError {
    #[error("event is missing required field {0}")]
    MissingField(&'static str),
    #[error("event field {field} must be a string, found {found}")]
    InvalidField { field: &'static str, found: String },
    #[error(transparent)]
    Publish(#[from] PublishError),
    #[error("invalid configuration: {0}")]
    Config(String),
}
