use crate::error::{Error, Result};
use lazy_static::lazy_static;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder,
};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // Record metrics
    pub static ref RECORDS_ADDED: IntCounter = IntCounter::new(
        "records_added_total",
        "Total number of point records added"
    ).unwrap();

    pub static ref RECORDS_REJECTED: IntCounter = IntCounter::new(
        "records_rejected_total",
        "Total number of point records rejected"
    ).unwrap();

    pub static ref RECORDS_PRUNED: IntCounter = IntCounter::new(
        "records_pruned_total",
        "Total number of exhausted records pruned after a spend"
    ).unwrap();

    pub static ref OUTSTANDING_RECORDS: IntGauge = IntGauge::new(
        "outstanding_records",
        "Number of live records in the ledger"
    ).unwrap();

    // Spend metrics
    pub static ref SPENDS_EXECUTED: IntCounter = IntCounter::new(
        "spends_executed_total",
        "Total number of successful spends"
    ).unwrap();

    pub static ref SPENDS_REJECTED: IntCounter = IntCounter::new(
        "spends_rejected_total",
        "Total number of rejected spends"
    ).unwrap();

    pub static ref POINTS_SPENT: IntCounter = IntCounter::new(
        "points_spent_total",
        "Total points redeemed"
    ).unwrap();

    // Latency metrics
    pub static ref SPEND_LATENCY: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "spend_latency_seconds",
            "Spend allocation latency"
        ).buckets(vec![0.00001, 0.0001, 0.001, 0.01, 0.1])
    ).unwrap();
}

pub fn register_metrics() -> Result<()> {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(RECORDS_ADDED.clone()),
        Box::new(RECORDS_REJECTED.clone()),
        Box::new(RECORDS_PRUNED.clone()),
        Box::new(OUTSTANDING_RECORDS.clone()),
        Box::new(SPENDS_EXECUTED.clone()),
        Box::new(SPENDS_REJECTED.clone()),
        Box::new(POINTS_SPENT.clone()),
        Box::new(SPEND_LATENCY.clone()),
    ];

    for collector in collectors {
        REGISTRY
            .register(collector)
            .map_err(|e| Error::TelemetryError(e.to_string()))?;
    }

    Ok(())
}

/// Render the registry in the Prometheus text format.
pub fn gather_text() -> Result<String> {
    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&REGISTRY.gather(), &mut buffer)
        .map_err(|e| Error::TelemetryError(e.to_string()))?;

    String::from_utf8(buffer).map_err(|e| Error::TelemetryError(e.to_string()))
}
