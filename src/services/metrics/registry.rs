use prometheus::{
    CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Central metrics registry for the booking platform
pub struct MetricsRegistry {
    registry: Registry,

    // HTTP Metrics
    pub http_requests_total: CounterVec,
    pub http_request_duration_seconds: HistogramVec,

    // Booking Metrics
    pub bookings_created_total: CounterVec,
    pub bookings_cancelled_total: CounterVec,
    pub booking_capacity_rejections_total: CounterVec,

    // Password-reset Metrics
    pub password_reset_requested_total: CounterVec,
    pub password_reset_verify_total: CounterVec,
}

impl MetricsRegistry {
    pub fn new() -> Result<Arc<Self>, Box<dyn std::error::Error>> {
        let registry = Registry::new();

        // HTTP Metrics
        let http_requests_total = CounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests").namespace("travelbooking"),
            &["method", "endpoint", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new("http_request_duration_seconds", "HTTP request duration")
                .namespace("travelbooking")
                .buckets(vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
            &["method", "endpoint"],
        )?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        // Booking Metrics
        let bookings_created_total = CounterVec::new(
            Opts::new("bookings_created_total", "Total bookings created")
                .namespace("travelbooking"),
            &["booking_type"],
        )?;
        registry.register(Box::new(bookings_created_total.clone()))?;

        let bookings_cancelled_total = CounterVec::new(
            Opts::new("bookings_cancelled_total", "Total bookings cancelled")
                .namespace("travelbooking"),
            &["booking_type"],
        )?;
        registry.register(Box::new(bookings_cancelled_total.clone()))?;

        let booking_capacity_rejections_total = CounterVec::new(
            Opts::new(
                "booking_capacity_rejections_total",
                "Bookings rejected for insufficient availability",
            )
            .namespace("travelbooking"),
            &["booking_type"],
        )?;
        registry.register(Box::new(booking_capacity_rejections_total.clone()))?;

        // Password-reset Metrics
        let password_reset_requested_total = CounterVec::new(
            Opts::new(
                "password_reset_requested_total",
                "Password-reset OTP requests",
            )
            .namespace("travelbooking"),
            &["outcome"],
        )?;
        registry.register(Box::new(password_reset_requested_total.clone()))?;

        let password_reset_verify_total = CounterVec::new(
            Opts::new("password_reset_verify_total", "OTP verification attempts")
                .namespace("travelbooking"),
            &["outcome"],
        )?;
        registry.register(Box::new(password_reset_verify_total.clone()))?;

        Ok(Arc::new(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            bookings_created_total,
            bookings_cancelled_total,
            booking_capacity_rejections_total,
            password_reset_requested_total,
            password_reset_verify_total,
        }))
    }

    /// Export metrics in Prometheus text format
    pub fn export(&self) -> Result<String, Box<dyn std::error::Error>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Get the underlying registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
