/// Failure produced by the [`AsyncService`](crate::AsyncService)
///
/// Both kinds render as the same fixed message. They are terminal and are
/// never retried, the observer displays the message instead of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// A single-value computation failed
    #[error("ERROR")]
    Value,
    /// A completion-only computation failed
    #[error("ERROR")]
    Completion,
}

/// Result type for every service computation
pub type Result<T> = std::result::Result<T, ServiceError>;
