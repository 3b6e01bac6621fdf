pub mod alerts;
pub mod publisher;

// Re-export key types for convenience
pub use alerts::{AlertNotification, AlertSink, ChannelAlertSink, NoopAlertSink, TracingAlertSink};
pub use publisher::AdaptationPublisher;
