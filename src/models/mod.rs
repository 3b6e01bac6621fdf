pub mod adaptation_event;
pub mod component;
pub mod report;
pub mod snapshot;

// Re-export core models for easy access
pub use adaptation_event::{AdaptationEvent, StatusChange};
pub use component::{Component, ComponentHealth};
pub use report::{ComponentReport, SystemReport};
pub use snapshot::SystemSnapshot;
