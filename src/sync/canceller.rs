//! Newest-request-wins cancellation.
//!
//! Every request takes a [`RequestTicket`]. Taking a ticket cancels the one
//! before it, and a response is only applied while its ticket is still the
//! current one, so a slow reply can never overwrite a faster, newer one.

use std::future::Future;
use std::sync::Mutex;

use tokio_util::sync::CancellationToken;

use super::SyncError;
use crate::api::ApiError;

#[derive(Debug, Clone)]
pub struct RequestTicket {
    generation: u64,
    token: CancellationToken,
}

impl RequestTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Default)]
struct Current {
    generation: u64,
    token: Option<CancellationToken>,
}

#[derive(Default)]
pub struct RequestCanceller {
    current: Mutex<Current>,
}

impl RequestCanceller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels the in-flight request (if any) and hands out a fresh ticket.
    pub fn begin(&self) -> RequestTicket {
        let mut current = self.lock();
        if let Some(previous) = current.token.take() {
            previous.cancel();
        }
        current.generation += 1;
        let token = CancellationToken::new();
        current.token = Some(token.clone());
        RequestTicket {
            generation: current.generation,
            token,
        }
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        let current = self.lock();
        current.generation == ticket.generation && !ticket.token.is_cancelled()
    }

    /// Runs `request` until it finishes or `ticket` is superseded.
    pub async fn run<T, Fut>(&self, ticket: &RequestTicket, request: Fut) -> Result<T, SyncError>
    where
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let outcome = tokio::select! {
            biased;
            _ = ticket.token.cancelled() => return Err(SyncError::Cancelled),
            outcome = request => outcome,
        };

        if !self.is_current(ticket) {
            return Err(SyncError::Cancelled);
        }
        outcome.map_err(SyncError::from)
    }

    /// Cancels whatever is in flight without starting anything new.
    pub fn cancel_all(&self) {
        let mut current = self.lock();
        if let Some(token) = current.token.take() {
            token.cancel();
        }
        current.generation += 1;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Current> {
        self.current.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_begin_cancels_previous_ticket() {
        let canceller = RequestCanceller::new();
        let first = canceller.begin();
        let second = canceller.begin();

        assert!(!canceller.is_current(&first));
        assert!(canceller.is_current(&second));
        assert!(second.generation() > first.generation());
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_request_reports_cancelled() {
        let canceller = std::sync::Arc::new(RequestCanceller::new());
        let slow = canceller.begin();

        let c = canceller.clone();
        let slow_task = tokio::spawn(async move {
            c.run(&slow, async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, ApiError>("stale")
            })
            .await
        });
        tokio::task::yield_now().await;

        let fresh = canceller.begin();
        let fresh_result = canceller
            .run(&fresh, async { Ok::<_, ApiError>("fresh") })
            .await;

        assert_eq!(fresh_result, Ok("fresh"));
        assert_eq!(slow_task.await.unwrap(), Err(SyncError::Cancelled));
    }

    #[tokio::test]
    async fn test_real_failures_pass_through() {
        let canceller = RequestCanceller::new();
        let ticket = canceller.begin();
        let result: Result<(), _> = canceller
            .run(&ticket, async { Err(ApiError::NotFound("/leads/".into())) })
            .await;

        assert_eq!(result, Err(SyncError::Api(ApiError::NotFound("/leads/".into()))));
    }

    #[tokio::test]
    async fn test_cancel_all_invalidates_current_ticket() {
        let canceller = RequestCanceller::new();
        let ticket = canceller.begin();
        canceller.cancel_all();

        assert!(!canceller.is_current(&ticket));
        let result = canceller.run(&ticket, async { Ok::<_, ApiError>(1) }).await;
        assert_eq!(result, Err(SyncError::Cancelled));
    }
}
