use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub status_updates_total: IntCounterVec,
    pub rider_assignments_total: IntCounterVec,
    pub active_queue_size: IntGauge,
    pub projection_skipped_total: IntCounter,
    pub alert_pulses_total: IntCounterVec,
    pub dashboard_sessions: IntGauge,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let status_updates_total = IntCounterVec::new(
            Opts::new("status_updates_total", "Order status updates by outcome"),
            &["outcome"],
        )
        .expect("valid status_updates_total metric");

        let rider_assignments_total = IntCounterVec::new(
            Opts::new("rider_assignments_total", "Rider assignments by outcome"),
            &["outcome"],
        )
        .expect("valid rider_assignments_total metric");

        let active_queue_size =
            IntGauge::new("active_queue_size", "Orders in the active queue at last projection")
                .expect("valid active_queue_size metric");

        let projection_skipped_total = IntCounter::new(
            "projection_skipped_total",
            "Active orders left out of a projection because enrichment failed",
        )
        .expect("valid projection_skipped_total metric");

        let alert_pulses_total = IntCounterVec::new(
            Opts::new("alert_pulses_total", "Alert pulses emitted to dashboards by level"),
            &["level"],
        )
        .expect("valid alert_pulses_total metric");

        let dashboard_sessions =
            IntGauge::new("dashboard_sessions", "Currently connected dashboard sessions")
                .expect("valid dashboard_sessions metric");

        registry
            .register(Box::new(status_updates_total.clone()))
            .expect("register status_updates_total");
        registry
            .register(Box::new(rider_assignments_total.clone()))
            .expect("register rider_assignments_total");
        registry
            .register(Box::new(active_queue_size.clone()))
            .expect("register active_queue_size");
        registry
            .register(Box::new(projection_skipped_total.clone()))
            .expect("register projection_skipped_total");
        registry
            .register(Box::new(alert_pulses_total.clone()))
            .expect("register alert_pulses_total");
        registry
            .register(Box::new(dashboard_sessions.clone()))
            .expect("register dashboard_sessions");

        Self {
            registry,
            status_updates_total,
            rider_assignments_total,
            active_queue_size,
            projection_skipped_total,
            alert_pulses_total,
            dashboard_sessions,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}
