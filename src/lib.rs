//! Composition patterns for single-value and completion-only computations
//!
//! An [`AsyncService`] hands out delayed [`Single`] and [`Completable`]
//! computations, the [`ops`] combine them, and the [`Orchestrator`] runs each
//! pattern on a background runtime while rendering on a single foreground
//! [`Looper`].

pub mod args;

mod cancel;
pub use cancel::{CancelToken, Demand, Outcome, Subscription};

mod config;
pub use config::{Config, Delays};

mod directories;
pub use directories::Directories;

mod error;
pub use error::{Result, ServiceError};

pub mod ops;
pub use ops::Flowable;

mod orchestrator;
pub use orchestrator::{Fixtures, Orchestrator, Scenario};

mod scheduler;
pub use scheduler::{ConsoleView, Looper, MainThread, TextView};

mod service;
pub use service::{AsyncService, Completable, ServiceDelays, Single};

mod user;
pub use user::User;
