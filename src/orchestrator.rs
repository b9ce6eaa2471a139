use crate::ops::{self, Flowable};
use crate::{AsyncService, CancelToken, Demand, MainThread, Outcome, Single, Subscription};
use crate::{TextView, User};

use futures::prelude::*;
use tokio::runtime::Handle;
use tokio::time::Duration;

/// The composition patterns the orchestrator knows how to run
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Scenario {
    /// A single computation, rendering its value or error
    Subscribe,
    /// Two computations joined into a pair
    Zip,
    /// Two computations run back to back
    Concat,
    /// Two computations run side by side, rendered as they arrive
    Merge,
    /// Back to back, with the second computation built only when needed
    Defer,
    /// The first value becomes the input of the second computation
    FlatMap,
    /// A single computation that always fails
    SingleError,
    /// A completion-only computation
    Complete,
    /// A completion-only computation that always fails
    CompleteError,
}

impl Scenario {
    pub const ALL: &'static [Self] = &[
        Self::Subscribe,
        Self::Zip,
        Self::Concat,
        Self::Merge,
        Self::Defer,
        Self::FlatMap,
        Self::SingleError,
        Self::Complete,
        Self::CompleteError,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Subscribe => "subscribe",
            Self::Zip => "zip",
            Self::Concat => "concat",
            Self::Merge => "merge",
            Self::Defer => "defer",
            Self::FlatMap => "flat-map",
            Self::SingleError => "single-error",
            Self::Complete => "complete",
            Self::CompleteError => "complete-error",
        }
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self::FlatMap
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Scenario {
    type Err = anyhow::Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|scenario| scenario.name().eq_ignore_ascii_case(input))
            .ok_or_else(|| anyhow::anyhow!("unknown scenario: '{}'", input))
    }
}

/// The users and delays the scenarios are built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixtures {
    pub first: User,
    pub second: User,
    /// Delay used for every value computation, except as noted
    pub value_delay: Duration,
    /// Delay of the first computation in the merge scenario
    pub merge_first_delay: Duration,
}

impl Default for Fixtures {
    fn default() -> Self {
        Self {
            first: User::new(1, "Alice"),
            second: User::new(2, "Bob"),
            value_delay: Duration::from_secs(5),
            merge_first_delay: Duration::from_secs(3),
        }
    }
}

/// Wires service computations to the foreground view
///
/// Computations run on the background runtime, rendering happens on the
/// [`MainThread`]. Every scenario hands back its own [`Subscription`].
pub struct Orchestrator {
    service: AsyncService,
    fixtures: Fixtures,
    background: Handle,
    main: MainThread,
}

impl Orchestrator {
    pub fn new(
        service: AsyncService,
        fixtures: Fixtures,
        background: Handle,
        main: MainThread,
    ) -> Self {
        Self {
            service,
            fixtures,
            background,
            main,
        }
    }

    pub fn run(&self, scenario: Scenario) -> Subscription {
        log::info!("running scenario: {}", scenario);
        match scenario {
            Scenario::Subscribe => self.subscribe(),
            Scenario::Zip => self.zip(),
            Scenario::Concat => self.concat(),
            Scenario::Merge => self.merge(),
            Scenario::Defer => self.defer(),
            Scenario::FlatMap => self.flat_map(),
            Scenario::SingleError => self.single_error(),
            Scenario::Complete => self.complete(),
            Scenario::CompleteError => self.complete_error(),
        }
    }

    pub fn subscribe(&self) -> Subscription {
        let source = self.first();
        self.observe(Scenario::Subscribe, source, name_or_message)
    }

    pub fn zip(&self) -> Subscription {
        let source = ops::zip(self.first(), self.second());
        self.observe(Scenario::Zip, source, |result| match result {
            Ok((first, second)) => format!("{}{}", first.name, second.name),
            Err(err) => err.to_string(),
        })
    }

    pub fn concat(&self) -> Subscription {
        let flow = ops::concat(vec![self.first(), self.second()]);
        self.observe_flow(Scenario::Concat, flow, render_and_request)
    }

    pub fn merge(&self) -> Subscription {
        let Fixtures {
            first,
            merge_first_delay,
            ..
        } = &self.fixtures;

        let first = self.service.single(first.clone(), *merge_first_delay);
        let flow = ops::merge(vec![first, self.second()]);
        self.observe_flow(Scenario::Merge, flow, render_and_request)
    }

    pub fn defer(&self) -> Subscription {
        let service = self.service;
        let Fixtures {
            second,
            value_delay,
            ..
        } = self.fixtures.clone();

        let second = ops::defer(move || {
            log::debug!("building the deferred computation for {}", second);
            service.single(second, value_delay)
        });
        let flow = ops::concat(vec![self.first(), second]);
        self.observe_flow(Scenario::Defer, flow, render_and_request)
    }

    pub fn flat_map(&self) -> Subscription {
        let service = self.service;
        let Fixtures {
            second,
            value_delay,
            ..
        } = self.fixtures.clone();

        let source = ops::flat_map(self.first(), move |first| {
            service.single(first.combine(&second), value_delay)
        });
        self.observe(Scenario::FlatMap, source, name_or_message)
    }

    pub fn single_error(&self) -> Subscription {
        let source = self.service.single_error();
        self.observe(Scenario::SingleError, source, name_or_message)
    }

    pub fn complete(&self) -> Subscription {
        let source = self.service.completable();
        self.observe(Scenario::Complete, source, completion_or_message)
    }

    pub fn complete_error(&self) -> Subscription {
        let source = self.service.completable_error();
        self.observe(Scenario::CompleteError, source, completion_or_message)
    }

    fn first(&self) -> Single<User> {
        let Fixtures {
            first, value_delay, ..
        } = &self.fixtures;
        self.service.single(first.clone(), *value_delay)
    }

    fn second(&self) -> Single<User> {
        let Fixtures {
            second,
            value_delay,
            ..
        } = &self.fixtures;
        self.service.single(second.clone(), *value_delay)
    }

    /// Run `source` in the background and render its outcome on the main thread
    fn observe<T, F>(&self, scenario: Scenario, source: Single<T>, render: F) -> Subscription
    where
        T: Send + 'static,
        F: FnOnce(crate::Result<T>) -> String + Send + 'static,
    {
        let token = CancelToken::new();
        let main = self.main.clone();

        let handle = self.background.spawn({
            let token = token.clone();
            async move {
                log::debug!("{}: subscribed", scenario);
                let result = tokio::select! {
                    biased;
                    _ = token.canceled() => {
                        log::debug!("{}: canceled before completion", scenario);
                        return Outcome::Canceled;
                    }
                    result = source => result,
                };

                let guard = token.clone();
                let delivered = main
                    .call(move |view: &mut dyn TextView| {
                        if guard.is_canceled() {
                            return false;
                        }
                        view.set_text(&render(result));
                        true
                    })
                    .await;

                match delivered {
                    Some(true) => {
                        log::info!("{}: completed", scenario);
                        Outcome::Completed
                    }
                    _ => {
                        log::debug!("{}: canceled before delivery", scenario);
                        Outcome::Canceled
                    }
                }
            }
        });

        Subscription::new(token, handle)
    }

    /// Drive `flow` in the background, rendering each item on the main thread
    ///
    /// An item is only pulled once the renderer has requested it through the
    /// [`Demand`]. The first item is requested up front.
    fn observe_flow<T, F>(
        &self,
        scenario: Scenario,
        flow: Flowable<T>,
        render: F,
    ) -> Subscription
    where
        T: Send + 'static,
        F: FnMut(&mut dyn TextView, crate::Result<T>, &Demand) + Send + 'static,
    {
        let token = CancelToken::new();
        let main = self.main.clone();

        let handle = self.background.spawn({
            let token = token.clone();
            async move {
                log::debug!("{}: subscribed", scenario);
                let demand = Demand::new(1);
                let mut flow = flow;
                let mut render = render;

                loop {
                    let next = tokio::select! {
                        biased;
                        _ = token.canceled() => {
                            log::debug!("{}: canceled", scenario);
                            return Outcome::Canceled;
                        }
                        next = pull(&demand, &mut flow) => next,
                    };

                    let item = match next {
                        Ok(Some(item)) => item,
                        Ok(None) => {
                            log::info!("{}: completed", scenario);
                            return Outcome::Completed;
                        }
                        Err(err) => {
                            log::error!("{}: {}", scenario, err);
                            return Outcome::Canceled;
                        }
                    };

                    let guard = token.clone();
                    let requests = demand.clone();
                    let delivered = main
                        .call(move |view: &mut dyn TextView| {
                            if guard.is_canceled() {
                                return None;
                            }
                            let mut render = render;
                            render(view, item, &requests);
                            Some(render)
                        })
                        .await
                        .flatten();

                    render = match delivered {
                        Some(render) => render,
                        None => {
                            log::debug!("{}: canceled before delivery", scenario);
                            return Outcome::Canceled;
                        }
                    };
                }
            }
        });

        Subscription::new(token, handle)
    }
}

async fn pull<T>(
    demand: &Demand,
    flow: &mut Flowable<T>,
) -> anyhow::Result<Option<crate::Result<T>>> {
    demand.take().await?;
    Ok(flow.next().await)
}

fn name_or_message(result: crate::Result<User>) -> String {
    match result {
        Ok(user) => user.name,
        Err(err) => err.to_string(),
    }
}

fn completion_or_message(result: crate::Result<()>) -> String {
    match result {
        Ok(()) => "Complete".to_string(),
        Err(err) => err.to_string(),
    }
}

fn render_and_request(view: &mut dyn TextView, result: crate::Result<User>, demand: &Demand) {
    view.set_text(&name_or_message(result));
    demand.request(1);
}
