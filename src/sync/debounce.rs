//! Trailing-edge debounce: only the last task scheduled inside the window runs.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::runtime::{self, MaybeSend};

#[derive(Default)]
pub struct Debouncer {
    pending: Mutex<Option<CancellationToken>>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms `task` to run after `delay`, cancelling whatever was armed before.
    pub fn schedule<F, Fut>(&self, delay: Duration, task: F)
    where
        F: FnOnce() -> Fut + MaybeSend + 'static,
        Fut: Future<Output = ()> + MaybeSend + 'static,
    {
        let token = CancellationToken::new();
        if let Some(previous) = self.lock().replace(token.clone()) {
            previous.cancel();
        }

        runtime::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = runtime::sleep(delay) => task().await,
            }
        });
    }

    /// Drops the pending task, if any.
    pub fn cancel(&self) {
        if let Some(token) = self.lock().take() {
            token.cancel();
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<CancellationToken>> {
        self.pending.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
