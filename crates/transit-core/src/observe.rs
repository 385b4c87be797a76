//! Optional metrics instrumentation for the transit projection.
//!
//! When the `observe` feature is enabled, dispatch and consumer activity emit
//! counters and histograms via the [`metrics`] crate. A downstream
//! application must install a metrics recorder to collect the data.
//!
//! When the feature is **not** enabled every function in this module is a
//! zero-cost no-op.

/// Record an event that mutated (or was accepted by) the projection.
///
/// - `transit.dispatch.applied_total` – counter with `category` label
#[inline]
pub fn record_applied(category: &'static str) {
    #[cfg(feature = "observe")]
    {
        metrics::counter!("transit.dispatch.applied_total", "category" => category).increment(1);
    }
    #[cfg(not(feature = "observe"))]
    {
        let _ = category;
    }
}

/// Record a data-quality drop.
///
/// - `transit.dispatch.dropped_total` – counter with `reason` label
#[inline]
pub fn record_dropped(reason: &'static str) {
    #[cfg(feature = "observe")]
    {
        metrics::counter!("transit.dispatch.dropped_total", "reason" => reason).increment(1);
    }
    #[cfg(not(feature = "observe"))]
    {
        let _ = reason;
    }
}

/// Record a programmer error surfaced by the dispatcher.
///
/// Kept apart from drops so operators can tell bad input from a bug.
///
/// - `transit.dispatch.programmer_errors_total` – counter
#[inline]
pub fn record_programmer_error() {
    #[cfg(feature = "observe")]
    {
        metrics::counter!("transit.dispatch.programmer_errors_total").increment(1);
    }
}

/// Record one consumer drain (counter + duration + messages handled).
///
/// - `transit.consumer.drains_total` – counter
/// - `transit.consumer.drain_duration_seconds` – histogram
/// - `transit.consumer.messages_total` – counter
#[inline]
pub fn record_drain(duration: std::time::Duration, messages: u64) {
    #[cfg(feature = "observe")]
    {
        metrics::counter!("transit.consumer.drains_total").increment(1);
        metrics::histogram!("transit.consumer.drain_duration_seconds")
            .record(duration.as_secs_f64());
        metrics::counter!("transit.consumer.messages_total").increment(messages);
    }
    #[cfg(not(feature = "observe"))]
    {
        let _ = (duration, messages);
    }
}
