use std::sync::OnceLock;

use metrics::{counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder once per process and register all
/// application metrics. Returns a `PrometheusHandle` whose `render()` method
/// produces the text/plain Prometheus scrape payload.
pub fn init_metrics() -> PrometheusHandle {
    HANDLE
        .get_or_init(|| {
            let recorder = PrometheusBuilder::new().build_recorder();
            let handle = recorder.handle();
            if metrics::set_global_recorder(recorder).is_err() {
                tracing::warn!("A metrics recorder is already installed; /metrics will be empty");
            }

            // Pre-register counters so they appear even before the first increment.
            counter!("bets_placed_total").absolute(0);
            counter!("bets_settled_total", "outcome" => "won").absolute(0);
            counter!("bets_settled_total", "outcome" => "lost").absolute(0);
            counter!("transactions_requested_total", "kind" => "deposit").absolute(0);
            counter!("transactions_requested_total", "kind" => "withdrawal").absolute(0);
            counter!("transactions_resolved_total", "status" => "approved").absolute(0);
            counter!("transactions_resolved_total", "status" => "rejected").absolute(0);

            describe_histogram!("bet_stake", "Stake of each placed bet");

            handle
        })
        .clone()
}
