use serde_json::Value;
use tracing::{debug, info};

use crate::{
    clock::{Clock, ReportingZone},
    cloudwatch::{MetricPublisher, MetricSample, UNIT_SECONDS},
    error::ReporterError,
    event::MetricEvent,
};

/// Publishes the current time of day, in seconds, under the metric named by each event.
pub struct MetricReporter<C, P> {
    clock: C,
    publisher: P,
    zone: ReportingZone,
}

impl<C: Clock, P: MetricPublisher> MetricReporter<C, P> {
    pub fn new(clock: C, publisher: P, zone: ReportingZone) -> Self {
        MetricReporter {
            clock,
            publisher,
            zone,
        }
    }

    fn sample(&self, event: MetricEvent) -> MetricSample {
        let timestamp = self.clock.now();
        let value = self.zone.seconds_since_midnight(&timestamp);
        MetricSample {
            namespace: event.namespace,
            metric_name: event.metric_name,
            timestamp,
            value,
            unit: UNIT_SECONDS,
        }
    }

    pub async fn handle(&self, payload: &Value) -> Result<MetricSample, ReporterError> {
        let event = MetricEvent::from_payload(payload)?;
        let sample = self.sample(event);
        debug!(
            "Publishing {}/{} = {} {} at {}",
            sample.namespace, sample.metric_name, sample.value, sample.unit, sample.timestamp
        );
        self.publisher.publish(&sample).await?;
        info!(
            namespace = %sample.namespace,
            metric_name = %sample.metric_name,
            value = sample.value,
            "Published time of day"
        );
        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
    use chrono_tz::Tz;
    use serde_json::json;

    use super::*;
    use crate::{clock::FixedClock, error::PublishError};

    #[derive(Default)]
    struct RecordingPublisher {
        published: Mutex<Vec<MetricSample>>,
        fail: bool,
    }

    #[async_trait]
    impl MetricPublisher for RecordingPublisher {
        async fn publish(&self, sample: &MetricSample) -> Result<(), PublishError> {
            self.published.lock().unwrap().push(sample.clone());
            if self.fail {
                return Err(PublishError {
                    namespace: sample.namespace.clone(),
                    metric_name: sample.metric_name.clone(),
                    source: "service unavailable".into(),
                });
            }
            Ok(())
        }
    }

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2024, 2, 14)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
            .and_utc()
    }

    fn utc() -> ReportingZone {
        ReportingZone::Fixed(FixedOffset::east_opt(0).unwrap())
    }

    fn heartbeat() -> Value {
        json!({"MetricNamespace": "App", "MetricName": "Heartbeat"})
    }

    #[tokio::test]
    async fn test_handle_publishes_time_of_day() {
        let reporter = MetricReporter::new(
            FixedClock(at(14, 5, 9)),
            RecordingPublisher::default(),
            utc(),
        );
        let sample = reporter.handle(&heartbeat()).await.unwrap();
        let expected = MetricSample {
            namespace: "App".to_string(),
            metric_name: "Heartbeat".to_string(),
            timestamp: at(14, 5, 9),
            value: 50709,
            unit: "Seconds",
        };
        assert_eq!(sample, expected);
        assert_eq!(*reporter.publisher.published.lock().unwrap(), vec![expected]);
    }

    #[tokio::test]
    async fn test_handle_day_boundaries() {
        for (t, value) in [(at(0, 0, 0), 0), (at(23, 59, 59), 86399)] {
            let reporter = MetricReporter::new(FixedClock(t), RecordingPublisher::default(), utc());
            let sample = reporter.handle(&heartbeat()).await.unwrap();
            assert_eq!(sample.value, value);
        }
    }

    #[tokio::test]
    async fn test_handle_applies_utc_offset() {
        let reporter = MetricReporter::new(
            FixedClock(at(23, 30, 0)),
            RecordingPublisher::default(),
            ReportingZone::Fixed(FixedOffset::east_opt(9 * 3600).unwrap()),
        );
        let sample = reporter.handle(&heartbeat()).await.unwrap();
        assert_eq!(sample.value, 8 * 3600 + 30 * 60);
        assert_eq!(sample.timestamp, at(23, 30, 0));
    }

    #[tokio::test]
    async fn test_handle_named_zone_across_daylight_saving() {
        let summer = NaiveDate::from_ymd_opt(2024, 7, 1)
            .unwrap()
            .and_hms_opt(16, 0, 0)
            .unwrap()
            .and_utc();
        let winter = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(16, 0, 0)
            .unwrap()
            .and_utc();
        for (t, value) in [(summer, 12 * 3600), (winter, 11 * 3600)] {
            let reporter = MetricReporter::new(
                FixedClock(t),
                RecordingPublisher::default(),
                ReportingZone::Named(Tz::America__New_York),
            );
            let sample = reporter.handle(&heartbeat()).await.unwrap();
            assert_eq!(sample.value, value);
            assert_eq!(sample.timestamp, t);
        }
    }

    #[tokio::test]
    async fn test_handle_missing_namespace_does_not_publish() {
        let reporter = MetricReporter::new(
            FixedClock(at(14, 5, 9)),
            RecordingPublisher::default(),
            utc(),
        );
        let err = reporter
            .handle(&json!({"MetricName": "Heartbeat"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ReporterError::MissingField("MetricNamespace")));
        assert!(reporter.publisher.published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_handle_publish_failure_is_not_retried() {
        let reporter = MetricReporter::new(
            FixedClock(at(14, 5, 9)),
            RecordingPublisher {
                fail: true,
                ..Default::default()
            },
            utc(),
        );
        let err = reporter.handle(&heartbeat()).await.unwrap_err();
        match err {
            ReporterError::Publish(err) => {
                assert_eq!(err.namespace, "App");
                assert_eq!(err.metric_name, "Heartbeat");
                assert_eq!(err.source.to_string(), "service unavailable");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(reporter.publisher.published.lock().unwrap().len(), 1);
    }
}
