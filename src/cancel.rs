use anyhow::Context as _;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Notify, Semaphore};
use tokio::task::JoinHandle;

/// How a scenario ended
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The terminal value (or error) was delivered to the view
    Completed,
    /// The subscription was disposed before the terminal delivery
    Canceled,
}

/// A cloneable, one-shot cancellation flag
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    canceled: AtomicBool,
    notify: Notify,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the token. Calling this more than once does nothing
    pub fn cancel(&self) {
        if !self.inner.canceled.swap(true, Ordering::SeqCst) {
            self.inner.notify.notify_waiters();
        }
    }

    pub fn is_canceled(&self) -> bool {
        self.inner.canceled.load(Ordering::SeqCst)
    }

    /// Resolves once the token is canceled
    pub async fn canceled(&self) {
        loop {
            // register before checking so a concurrent cancel isn't missed
            let notified = self.inner.notify.notified();
            if self.is_canceled() {
                return;
            }
            notified.await;
        }
    }
}

/// Explicit request-n backpressure for a [`Flowable`](crate::Flowable)
///
/// The driver takes one grant per delivered item, so the observer has to
/// `request` again before the next item is pulled.
#[derive(Debug, Clone)]
pub struct Demand {
    grants: Arc<Semaphore>,
}

impl Demand {
    pub fn new(initial: usize) -> Self {
        Self {
            grants: Arc::new(Semaphore::new(initial)),
        }
    }

    /// Allow `n` more deliveries
    pub fn request(&self, n: usize) {
        log::trace!("request({})", n);
        self.grants.add_permits(n);
    }

    /// Number of deliveries that may happen without another request
    pub fn outstanding(&self) -> usize {
        self.grants.available_permits()
    }

    /// Wait for, and consume, a single grant
    pub(crate) async fn take(&self) -> anyhow::Result<()> {
        self.grants
            .acquire()
            .await
            .context("demand was closed")?
            .forget();
        Ok(())
    }
}

/// Handle to a running scenario
///
/// Dropping the subscription disposes it, so the scenario is released on
/// every exit path.
#[derive(Debug)]
pub struct Subscription {
    token: CancelToken,
    handle: Option<JoinHandle<Outcome>>,
}

impl Subscription {
    pub(crate) fn new(token: CancelToken, handle: JoinHandle<Outcome>) -> Self {
        Self {
            token,
            handle: Some(handle),
        }
    }

    /// Suppress any further delivery for this scenario
    pub fn dispose(&self) {
        if !self.token.is_canceled() {
            log::debug!("disposing subscription");
        }
        self.token.cancel()
    }

    pub fn is_disposed(&self) -> bool {
        self.token.is_canceled()
    }

    /// A clone of the token driving this subscription
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Wait for the scenario to finish
    pub async fn join(mut self) -> anyhow::Result<Outcome> {
        let handle = self
            .handle
            .take()
            .context("subscription was already joined")?;
        let outcome = handle.await.context("scenario task failed")?;
        // the scenario is over, release it
        self.token.cancel();
        Ok(outcome)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose()
    }
}
