use crate::{ServiceError, User};

use futures::prelude::*;
use tokio::time::Duration;

/// A lazily started computation that yields exactly one value or one failure
pub type Single<T> = future::BoxFuture<'static, crate::Result<T>>;

/// A lazily started computation that yields success or failure with no payload
pub type Completable = Single<()>;

/// Delays used by the service for its fixed-outcome computations
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ServiceDelays {
    pub failure: Duration,
    pub completion: Duration,
}

impl Default for ServiceDelays {
    fn default() -> Self {
        Self {
            failure: Duration::from_secs(5),
            completion: Duration::from_secs(5),
        }
    }
}

/// Canned asynchronous 'api' calls
///
/// Every computation is lazy: the delay only starts once the returned future
/// is first polled.
#[derive(Debug, Copy, Clone, Default)]
pub struct AsyncService {
    delays: ServiceDelays,
}

impl AsyncService {
    pub fn new(delays: ServiceDelays) -> Self {
        Self { delays }
    }

    pub fn delays(&self) -> ServiceDelays {
        self.delays
    }

    /// Succeeds with `user` after `delay`
    pub fn single(&self, user: User, delay: Duration) -> Single<User> {
        async move {
            log::trace!("single: {} in {:.2?}", user, delay);
            tokio::time::sleep(delay).await;
            log::trace!("single: resolved {}", user);
            Ok(user)
        }
        .boxed()
    }

    /// Fails with [`ServiceError::Value`] after the failure delay
    pub fn single_error(&self) -> Single<User> {
        let delay = self.delays.failure;
        async move {
            log::trace!("single_error: failing in {:.2?}", delay);
            tokio::time::sleep(delay).await;
            Err(ServiceError::Value)
        }
        .boxed()
    }

    /// Completes after the completion delay
    pub fn completable(&self) -> Completable {
        let delay = self.delays.completion;
        async move {
            log::trace!("completable: completing in {:.2?}", delay);
            tokio::time::sleep(delay).await;
            Ok(())
        }
        .boxed()
    }

    /// Fails with [`ServiceError::Completion`] after the completion delay
    pub fn completable_error(&self) -> Completable {
        let delay = self.delays.completion;
        async move {
            log::trace!("completable_error: failing in {:.2?}", delay);
            tokio::time::sleep(delay).await;
            Err(ServiceError::Completion)
        }
        .boxed()
    }
}
