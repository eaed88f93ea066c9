// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The subscriber handler trait (spec §4.1). Handlers may be synchronous or
//! suspend; synchronous handlers wrap naturally since `handle` is already
//! async (the runtime yields at the `.await` regardless of whether the body
//! ever suspends).

use async_trait::async_trait;
use mtx_core::Event;
use std::sync::Arc;

/// Boxed error type for handler failures: bus subscriber errors are
/// arbitrary and, per spec §4.1, are logged and discarded rather than
/// propagated through a typed error taxonomy.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, event: &Event) -> Result<(), HandlerError>;
}

/// Adapts a plain closure into a [`Handler`].
pub struct FnHandler<F>(F);

impl<F> FnHandler<F> {
    pub fn new(f: F) -> Arc<Self> {
        Arc::new(Self(f))
    }
}

#[async_trait]
impl<F, Fut> Handler for FnHandler<F>
where
    F: Fn(Event) -> Fut + Send + Sync,
    Fut: std::future::Future<Output = Result<(), HandlerError>> + Send,
{
    async fn handle(&self, event: &Event) -> Result<(), HandlerError> {
        (self.0)(event.clone()).await
    }
}
