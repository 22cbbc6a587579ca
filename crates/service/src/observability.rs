use once_cell::sync::Lazy;
use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};

// Prometheus metrics (default registry)
pub static USERS_REGISTERED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "order_backend_users_registered_total",
        "Users created by registration"
    )
    .expect("register users_registered_total")
});

pub static USERS_UPDATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "order_backend_users_updated_total",
        "Re-registrations merged into an existing user"
    )
    .expect("register users_updated_total")
});

pub static ORDERS_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "order_backend_orders_created_total",
        "Orders persisted"
    )
    .expect("register orders_created_total")
});

pub static STORE_READ_FALLBACK_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "order_backend_store_read_fallback_total",
        "Collection reads that degraded to an empty collection"
    )
    .expect("register store_read_fallback_total")
});

pub static STORE_RECORDS_RETAINED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "order_backend_store_records_retained_total",
        "Stored records kept as raw JSON because they did not match the record type"
    )
    .expect("register store_records_retained_total")
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
