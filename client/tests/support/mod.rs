//! Shared helpers for the behavioural test suites.

use std::sync::Arc;

use tokio::runtime::Runtime;

/// Shareable handle to a current-thread Tokio runtime for sync step bodies.
#[derive(Clone)]
pub struct RuntimeHandle(pub Arc<Runtime>);

impl RuntimeHandle {
    /// Build a fresh runtime.
    ///
    /// # Panics
    ///
    /// Panics when the runtime cannot be created.
    pub fn current_thread() -> Self {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("create runtime");
        Self(Arc::new(runtime))
    }

    /// Drive `future` to completion.
    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.0.block_on(future)
    }
}
