use crate::ports::EventChannel;

pub type CommandResult<T> = Result<T, BackendError>;

/// Failure reported by the backend collaborator for a command or a
/// subscription request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("backend unreachable: {0}")]
    Transport(String),
    #[error("{command} failed: {message}")]
    Rejected {
        command: &'static str,
        message: String,
    },
    #[error("could not subscribe to {channel}: {message}")]
    Subscription {
        channel: EventChannel,
        message: String,
    },
    #[error("{command} was cancelled")]
    Cancelled { command: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    Transport,
    Rejected,
    Subscription,
    Cancelled,
}

impl BackendError {
    pub fn rejected(command: &'static str, message: impl Into<String>) -> Self {
        Self::Rejected {
            command,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> BackendErrorKind {
        match self {
            BackendError::Transport(_) => BackendErrorKind::Transport,
            BackendError::Rejected { .. } => BackendErrorKind::Rejected,
            BackendError::Subscription { .. } => BackendErrorKind::Subscription,
            BackendError::Cancelled { .. } => BackendErrorKind::Cancelled,
        }
    }
}
