use once_cell::sync::Lazy;
use prometheus::{
    register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder,
};

// Prometheus metrics (default registry)
pub static ID_COLLISIONS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "mentorship_id_collisions_total",
        "Generated identifiers rejected because they already existed"
    )
    .expect("register id_collisions_total")
});

pub static ID_EXHAUSTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "mentorship_id_exhausted_total",
        "Identifier generations that ran out of attempts"
    )
    .expect("register id_exhausted_total")
});

pub static API_ERRORS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "mentorship_api_errors_total",
        "Error responses by kind",
        &["kind"]
    )
    .expect("register api_errors_total")
});

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_encoded_output() {
        ID_COLLISIONS_TOTAL.inc();
        API_ERRORS_TOTAL.with_label_values(&["not_found"]).inc();
        let (status, body) = encode_metrics();
        assert_eq!(status, axum::http::StatusCode::OK);
        assert!(body.contains("mentorship_id_collisions_total"));
        assert!(body.contains("mentorship_api_errors_total"));
    }
}
