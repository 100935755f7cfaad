use std::borrow::Cow;

use aws_lambda_events::eventbridge::EventBridgeEvent;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ReporterError;

pub const NAMESPACE_KEY: &str = "MetricNamespace";
pub const METRIC_NAME_KEY: &str = "MetricName";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetricEvent {
    pub namespace: String,
    pub metric_name: String,
}

fn get_string_from_json_map(
    map: &Map<String, Value>,
    key: &'static str,
) -> Result<String, ReporterError> {
    match map.get(key) {
        None | Some(Value::Null) => Err(ReporterError::MissingField(key)),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(other) => Err(ReporterError::InvalidField {
            field: key,
            found: other.to_string(),
        }),
    }
}

// schedule rules with constant input deliver the fields at the top level,
// anything routed through an EventBridge envelope carries them in `detail`
fn unwrap_envelope(payload: &Value) -> Cow<'_, Value> {
    if payload.get("detail-type").is_none() {
        return Cow::Borrowed(payload);
    }
    match EventBridgeEvent::<Value>::deserialize(payload) {
        Ok(envelope) => Cow::Owned(envelope.detail),
        Err(err) => {
            debug!("Payload has detail-type but is not an EventBridge event: {}", err);
            Cow::Borrowed(payload)
        }
    }
}

impl MetricEvent {
    pub fn from_payload(payload: &Value) -> Result<Self, ReporterError> {
        let fields = unwrap_envelope(payload);
        let empty = Map::new();
        let map = fields.as_object().unwrap_or(&empty);
        let namespace = get_string_from_json_map(map, NAMESPACE_KEY)?;
        let metric_name = get_string_from_json_map(map, METRIC_NAME_KEY)?;
        Ok(MetricEvent {
            namespace,
            metric_name,
        })
    }
}
