use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, TextEncoder};

static PUSHES_RECEIVED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        Opts::new(
            "notification_client_pushes_received_total",
            "Total notification pushes accepted from the stream",
        ),
        &["kind"],
    )
    .expect("failed to create notification_client_pushes_received_total");
    prometheus::default_registry()
        .register(Box::new(counter.clone()))
        .expect("failed to register notification_client_pushes_received_total");
    counter
});

static RECONNECTS_SCHEDULED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    let counter = IntCounter::new(
        "notification_client_reconnects_scheduled_total",
        "Total reconnection attempts scheduled after stream loss",
    )
    .expect("failed to create notification_client_reconnects_scheduled_total");
    prometheus::default_registry()
        .register(Box::new(counter.clone()))
        .expect("failed to register notification_client_reconnects_scheduled_total");
    counter
});

static HEARTBEATS_SENT_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    let counter = IntCounter::new(
        "notification_client_heartbeats_sent_total",
        "Total keep-alive pings sent over the stream",
    )
    .expect("failed to create notification_client_heartbeats_sent_total");
    prometheus::default_registry()
        .register(Box::new(counter.clone()))
        .expect("failed to register notification_client_heartbeats_sent_total");
    counter
});

static API_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        Opts::new(
            "notification_client_api_requests_total",
            "Total REST notification API requests by operation and outcome",
        ),
        &["operation", "outcome"],
    )
    .expect("failed to create notification_client_api_requests_total");
    prometheus::default_registry()
        .register(Box::new(counter.clone()))
        .expect("failed to register notification_client_api_requests_total");
    counter
});

pub fn observe_push(kind: &str) {
    PUSHES_RECEIVED_TOTAL.with_label_values(&[kind]).inc();
}

pub fn observe_reconnect_scheduled() {
    RECONNECTS_SCHEDULED_TOTAL.inc();
}

pub fn observe_heartbeat() {
    HEARTBEATS_SENT_TOTAL.inc();
}

pub fn observe_api_request(operation: &str, outcome: &str) {
    API_REQUESTS_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();
}

/// Renders all registered metrics in the Prometheus text format.
pub fn export_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return err.to_string();
    }

    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observed_counters_show_up_in_export() {
        observe_push("new_message");
        observe_api_request("list", "ok");
        observe_heartbeat();

        let exported = export_metrics();
        assert!(exported.contains("notification_client_pushes_received_total"));
        assert!(exported.contains("notification_client_api_requests_total"));
        assert!(exported.contains("notification_client_heartbeats_sent_total"));
    }
}
