//! Prometheus metrics for birthcare-service.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, register_int_counter, CounterVec, HistogramVec,
    IntCounter, TextEncoder,
};

/// Bill counter by lifecycle event (created, issued, paid, cancelled).
pub static BILLS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "birthcare_bills_total",
        "Total number of bill lifecycle events",
        &["event"]
    )
    .expect("Failed to register bills_total")
});

/// Payment counter by method.
pub static PAYMENTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "birthcare_payments_total",
        "Total number of recorded payments by method",
        &["method"]
    )
    .expect("Failed to register payments_total")
});

/// Payment amount counter by currency.
pub static PAYMENT_AMOUNT_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "birthcare_payment_amount_total",
        "Total payment amount by currency",
        &["currency"]
    )
    .expect("Failed to register payment_amount_total")
});

/// Application review counter by outcome (approved, rejected, resubmitted).
pub static APPLICATION_REVIEWS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "birthcare_application_reviews_total",
        "Total number of application review decisions",
        &["outcome"]
    )
    .expect("Failed to register application_reviews_total")
});

/// Requests refused by the subscription gate.
pub static GATE_DENIALS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "birthcare_subscription_gate_denials_total",
        "Requests refused because the owner has no active subscription"
    )
    .expect("Failed to register gate_denials_total")
});

/// Subscriptions flipped to expired by the sweep job.
pub static SUBSCRIPTIONS_EXPIRED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "birthcare_subscriptions_expired_total",
        "Subscriptions marked expired by the sweep job"
    )
    .expect("Failed to register subscriptions_expired_total")
});

/// Room charges appended by the accrual job.
pub static ACCRUED_CHARGES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "birthcare_accrued_room_charges_total",
        "Room-charge line items appended by the accrual job"
    )
    .expect("Failed to register accrued_room_charges_total")
});

/// Database query duration histogram.
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "birthcare_db_query_duration_seconds",
        "Database query duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("Failed to register db_query_duration")
});

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&BILLS_TOTAL);
    Lazy::force(&PAYMENTS_TOTAL);
    Lazy::force(&PAYMENT_AMOUNT_TOTAL);
    Lazy::force(&APPLICATION_REVIEWS_TOTAL);
    Lazy::force(&GATE_DENIALS_TOTAL);
    Lazy::force(&SUBSCRIPTIONS_EXPIRED_TOTAL);
    Lazy::force(&ACCRUED_CHARGES_TOTAL);
    Lazy::force(&DB_QUERY_DURATION);
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}
