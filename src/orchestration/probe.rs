//! # Health Probes
//!
//! The seam between the sentinel core and the host application. A probe answers one
//! question, "is this component healthy right now?", and may fail while answering.
//! The core never knows how a probe is implemented.

use async_trait::async_trait;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::error::{panic_message, ProbeError};

/// Health check supplied by the host application for one component
///
/// `Ok(true)` is a success; `Ok(false)` and `Err(_)` are both failures.
#[async_trait]
pub trait HealthProbe: Send + Sync + fmt::Debug {
    async fn check(&self) -> Result<bool, ProbeError>;
}

/// Adapts a synchronous closure returning `bool` into a [`HealthProbe`]
///
/// The closure runs on tokio's blocking pool, so it may block on I/O without stalling the
/// runtime and stays subject to the executor's timeout.
pub struct FnProbe<F> {
    label: String,
    func: Arc<F>,
}

impl<F> FnProbe<F>
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    pub fn new(label: impl Into<String>, func: F) -> Self {
        Self {
            label: label.into(),
            func: Arc::new(func),
        }
    }
}

impl<F> fmt::Debug for FnProbe<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProbe").field("label", &self.label).finish()
    }
}

#[async_trait]
impl<F> HealthProbe for FnProbe<F>
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    async fn check(&self) -> Result<bool, ProbeError> {
        let func = Arc::clone(&self.func);
        tokio::task::spawn_blocking(move || (*func)())
            .await
            .map_err(|join_error| {
                if join_error.is_panic() {
                    ProbeError::Panicked(panic_message(join_error.into_panic()))
                } else {
                    ProbeError::failed(format!("probe {} was cancelled", self.label))
                }
            })
    }
}

/// Adapts an async closure into a [`HealthProbe`]
pub struct AsyncFnProbe {
    label: String,
    func: Box<dyn Fn() -> BoxFuture<'static, Result<bool, ProbeError>> + Send + Sync>,
}

impl AsyncFnProbe {
    pub fn new<F, Fut>(label: impl Into<String>, func: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool, ProbeError>> + Send + 'static,
    {
        Self {
            label: label.into(),
            func: Box::new(move || Box::pin(func())),
        }
    }
}

impl fmt::Debug for AsyncFnProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncFnProbe")
            .field("label", &self.label)
            .finish()
    }
}

#[async_trait]
impl HealthProbe for AsyncFnProbe {
    async fn check(&self) -> Result<bool, ProbeError> {
        (self.func)().await
    }
}
