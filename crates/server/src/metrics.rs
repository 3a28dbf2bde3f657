use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static MUTATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "site_mutations_total",
        "Content mutations by kind and outcome",
        &["kind", "outcome"]
    )
    .expect("register mutations_total")
});

pub static PAGE_CACHE_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "site_page_cache_total",
        "Page cache lookups by result",
        &["result"]
    )
    .expect("register page_cache_total")
});

pub fn record_mutation(kind: &str, outcome: &str) {
    MUTATIONS_TOTAL.with_label_values(&[kind, outcome]).inc();
}

pub fn record_cache(result: &str) {
    PAGE_CACHE_TOTAL.with_label_values(&[result]).inc();
}

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
