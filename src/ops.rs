//! Composition primitives over [`Single`] computations
use crate::Single;

use futures::prelude::*;
use futures::stream::FuturesUnordered;

/// A stream of single-value outcomes
pub type Flowable<T> = stream::BoxStream<'static, crate::Result<T>>;

/// Run both computations concurrently and pair up their values
///
/// The pair keeps the argument order regardless of which side finishes
/// first. The first failure resolves the zip and the other side is dropped.
pub fn zip<A, B>(first: Single<A>, second: Single<B>) -> Single<(A, B)>
where
    A: Send + 'static,
    B: Send + 'static,
{
    future::try_join(first, second).boxed()
}

/// Run the sources one after another
///
/// A source is only polled once the previous item has been pulled from the
/// stream. The first failure is yielded and then ends the stream, the
/// sources after it are never started.
pub fn concat<T>(sources: Vec<Single<T>>) -> Flowable<T>
where
    T: Send + 'static,
{
    stream::unfold(Some(sources.into_iter()), |remaining| async move {
        let mut remaining = match remaining {
            Some(remaining) => remaining,
            None => return None,
        };
        let item = match remaining.next() {
            Some(source) => source.await,
            None => return None,
        };
        // a failure drops whatever is left
        let remaining = if item.is_ok() { Some(remaining) } else { None };
        Some((item, remaining))
    })
    .boxed()
}

/// Run the sources concurrently, yielding each outcome as it completes
///
/// Failures are yielded like any other item and do not end the stream.
pub fn merge<T>(sources: Vec<Single<T>>) -> Flowable<T>
where
    T: Send + 'static,
{
    sources
        .into_iter()
        .collect::<FuturesUnordered<_>>()
        .boxed()
}

/// Postpone building a computation until it is first polled
pub fn defer<T, F>(factory: F) -> Single<T>
where
    T: Send + 'static,
    F: FnOnce() -> Single<T> + Send + 'static,
{
    async move {
        log::trace!("defer: building deferred computation");
        factory().await
    }
    .boxed()
}

/// Feed the value of `source` into `next`, yielding the outcome of the second
/// computation
///
/// `next` is never called when `source` fails.
pub fn flat_map<A, B, F>(source: Single<A>, next: F) -> Single<B>
where
    A: Send + 'static,
    B: Send + 'static,
    F: FnOnce(A) -> Single<B> + Send + 'static,
{
    source.and_then(next).boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AsyncService, ServiceError, User};

    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::time::{Duration, Instant};

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[tokio::test]
    async fn zip_keeps_positional_order() {
        tokio::time::pause();
        let service = AsyncService::default();

        // the second one finishes first
        let (first, second) = zip(
            service.single(User::new(1, "Alice"), secs(5)),
            service.single(User::new(2, "Bob"), secs(1)),
        )
        .await
        .unwrap();

        assert_eq!(first.name, "Alice");
        assert_eq!(second.name, "Bob");
    }

    #[tokio::test]
    async fn zip_runs_concurrently() {
        tokio::time::pause();
        let service = AsyncService::default();

        let start = Instant::now();
        zip(
            service.single(User::new(1, "Alice"), secs(5)),
            service.single(User::new(2, "Bob"), secs(5)),
        )
        .await
        .unwrap();

        let elapsed = start.elapsed();
        assert!(elapsed >= secs(5), "{:.2?}", elapsed);
        assert!(elapsed < secs(6), "{:.2?}", elapsed);
    }

    #[tokio::test]
    async fn zip_fails_fast() {
        tokio::time::pause();
        let service = AsyncService::default();

        let start = Instant::now();
        let err = zip(
            service.single(User::new(1, "Alice"), secs(60)),
            service.single_error(),
        )
        .await
        .unwrap_err();

        assert_eq!(err, ServiceError::Value);
        assert!(start.elapsed() < secs(60), "{:.2?}", start.elapsed());
    }

    #[tokio::test]
    async fn concat_is_sequential() {
        tokio::time::pause();
        let service = AsyncService::default();

        let start = Instant::now();
        let mut flow = concat(vec![
            service.single(User::new(1, "Alice"), secs(5)),
            service.single(User::new(2, "Bob"), secs(1)),
        ]);

        assert_eq!(flow.next().await.unwrap().unwrap().name, "Alice");
        assert!(start.elapsed() >= secs(5));

        assert_eq!(flow.next().await.unwrap().unwrap().name, "Bob");
        assert!(start.elapsed() >= secs(6));

        assert!(flow.next().await.is_none());
    }

    #[tokio::test]
    async fn concat_waits_for_the_pull() {
        tokio::time::pause();
        let service = AsyncService::default();

        let mut flow = concat(vec![
            service.single(User::new(1, "Alice"), secs(1)),
            service.single(User::new(2, "Bob"), secs(1)),
        ]);
        flow.next().await.unwrap().unwrap();

        // nothing pulls the second item while we sit here
        tokio::time::sleep(secs(10)).await;

        let start = Instant::now();
        flow.next().await.unwrap().unwrap();
        assert!(start.elapsed() >= secs(1), "{:.2?}", start.elapsed());
    }

    #[tokio::test]
    async fn concat_stops_at_first_failure() {
        tokio::time::pause();
        let service = AsyncService::default();
        let built = Arc::new(AtomicBool::new(false));

        let start = Instant::now();
        let items = concat(vec![
            service.single(User::new(1, "Alice"), secs(1)),
            service.single_error(),
            defer({
                let built = Arc::clone(&built);
                move || {
                    built.store(true, Ordering::SeqCst);
                    service.single(User::new(2, "Bob"), secs(60))
                }
            }),
        ])
        .collect::<Vec<_>>()
        .await;

        assert_eq!(
            items,
            vec![Ok(User::new(1, "Alice")), Err(ServiceError::Value)]
        );
        assert!(!built.load(Ordering::SeqCst));

        let elapsed = start.elapsed();
        assert!(elapsed >= secs(6) && elapsed < secs(7), "{:.2?}", elapsed);
    }

    #[tokio::test]
    async fn concat_ends_right_after_the_failure_is_pulled() {
        tokio::time::pause();
        let service = AsyncService::default();

        let mut flow = concat(vec![
            service.single_error(),
            service.single(User::new(2, "Bob"), secs(60)),
        ]);
        assert_eq!(flow.next().await, Some(Err(ServiceError::Value)));

        let start = Instant::now();
        assert!(flow.next().await.is_none());
        assert!(start.elapsed() < secs(1), "{:.2?}", start.elapsed());
    }

    #[tokio::test]
    async fn merge_yields_in_completion_order() {
        tokio::time::pause();
        let service = AsyncService::default();

        let start = Instant::now();
        let mut flow = merge(vec![
            service.single(User::new(2, "Bob"), secs(5)),
            service.single(User::new(1, "Alice"), secs(3)),
        ]);

        assert_eq!(flow.next().await.unwrap().unwrap().name, "Alice");
        assert!(start.elapsed() >= secs(3));
        assert_eq!(flow.next().await.unwrap().unwrap().name, "Bob");

        let elapsed = start.elapsed();
        assert!(elapsed >= secs(5) && elapsed < secs(6), "{:.2?}", elapsed);
        assert!(flow.next().await.is_none());
    }

    #[tokio::test]
    async fn merge_keeps_going_after_failure() {
        tokio::time::pause();
        let service = AsyncService::default();

        let items = merge(vec![
            service.single(User::new(1, "Alice"), secs(10)),
            service.single_error(),
        ])
        .collect::<Vec<_>>()
        .await;

        assert_eq!(
            items,
            vec![Err(ServiceError::Value), Ok(User::new(1, "Alice"))]
        );
    }

    #[tokio::test]
    async fn defer_is_lazy() {
        tokio::time::pause();
        let service = AsyncService::default();
        let built = Arc::new(AtomicBool::new(false));

        let deferred = defer({
            let built = Arc::clone(&built);
            move || {
                built.store(true, Ordering::SeqCst);
                service.single(User::new(2, "Bob"), secs(1))
            }
        });

        tokio::time::sleep(secs(3)).await;
        assert!(!built.load(Ordering::SeqCst));

        assert_eq!(deferred.await.unwrap().name, "Bob");
        assert!(built.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn flat_map_feeds_the_first_value() {
        tokio::time::pause();
        let service = AsyncService::default();
        let bob = User::new(2, "Bob");

        let start = Instant::now();
        let user = flat_map(
            service.single(User::new(1, "Alice"), secs(5)),
            move |alice| service.single(alice.combine(&bob), secs(5)),
        )
        .await
        .unwrap();

        assert_eq!(user, User::new(3, "AliceBob"));
        assert!(start.elapsed() >= secs(10));
    }

    #[tokio::test]
    async fn flat_map_skips_on_failure() {
        tokio::time::pause();
        let service = AsyncService::default();
        let called = Arc::new(AtomicBool::new(false));

        let err = flat_map(service.single_error(), {
            let called = Arc::clone(&called);
            move |user| {
                called.store(true, Ordering::SeqCst);
                service.single(user, secs(1))
            }
        })
        .await
        .unwrap_err();

        assert_eq!(err, ServiceError::Value);
        assert!(!called.load(Ordering::SeqCst));
    }
}
