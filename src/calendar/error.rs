use thiserror::Error;

/// Errors raised synchronously by the calendar core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl CalendarError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

pub type CalendarResult<T> = Result<T, CalendarError>;
