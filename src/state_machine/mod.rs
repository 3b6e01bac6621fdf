// State machine module for component health and system operating mode
//
// Both machines are derived rather than driven by explicit events: component status follows
// the consecutive failure count, and the operating mode follows the aggregated statuses.

pub mod states;

// Re-export main types for convenient access
pub use states::{HealthStatus, OperationMode, SchedulerState};
