use crate::utils::logger::AUDIT_TARGET;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
pub struct Metrics {
    pub browses_total: AtomicU64,
    pub writes_total: AtomicU64,
    pub rejected_total: AtomicU64,
}

#[derive(Default)]
pub struct Telemetry {
    pub metrics: Metrics,
    // Tests capture audit lines in memory
    audit_sink: RwLock<Option<Arc<RwLock<Vec<String>>>>>,
}

pub(crate) static TELEMETRY: std::sync::LazyLock<Telemetry> =
    std::sync::LazyLock::new(Telemetry::default);

pub fn set_audit_sink_for_tests(sink: Arc<RwLock<Vec<String>>>) {
    *TELEMETRY.audit_sink.write() = Some(sink);
}

pub fn clear_audit_sink() {
    *TELEMETRY.audit_sink.write() = None;
}

/// Record one mutation: bumps `writes_total` and emits a JSON audit line.
pub fn log_audit(op: &str, type_name: &str, affected: u64) {
    TELEMETRY.metrics.writes_total.fetch_add(1, Ordering::Relaxed);
    let line = serde_json::json!({
        "op": op, "type": type_name, "affected": affected
    })
    .to_string();
    log::info!(target: AUDIT_TARGET, "{line}");
    let sink = TELEMETRY.audit_sink.read().clone();
    if let Some(sink) = sink {
        sink.write().push(line);
    }
}

pub fn record_browse() {
    TELEMETRY.metrics.browses_total.fetch_add(1, Ordering::Relaxed);
}

/// A request refused with an error (cursor pagination, key arity).
pub fn record_rejected() {
    TELEMETRY.metrics.rejected_total.fetch_add(1, Ordering::Relaxed);
}

#[must_use]
pub fn metrics_text() -> String {
    // OpenMetrics/Prometheus exposition format (no types/HELP)
    let m = &TELEMETRY.metrics;
    format!(
        "memstore_browses_total {}\n\
         memstore_writes_total {}\n\
         memstore_rejected_total {}\n",
        m.browses_total.load(Ordering::Relaxed),
        m.writes_total.load(Ordering::Relaxed),
        m.rejected_total.load(Ordering::Relaxed),
    )
}
