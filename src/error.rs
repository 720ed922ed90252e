//! Errors that can be reported to the user of this crate

use std::fmt::{Display, Formatter};

use thiserror::Error;

/// The remote call that failed, used to tell the user what went wrong
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Load,
    Create,
    Update,
    Delete,
    Login,
    Register,
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Load => write!(f, "load tasks"),
            Action::Create => write!(f, "create task"),
            Action::Update => write!(f, "update task"),
            Action::Delete => write!(f, "delete task"),
            Action::Login => write!(f, "log in"),
            Action::Register => write!(f, "register"),
        }
    }
}

/// Every failure is terminal for the attempt that produced it. Nothing is retried automatically.
#[derive(Error, Debug)]
pub enum TaskError {
    /// Bad local input. This never reaches the network
    #[error("Invalid input: {0}")]
    Validation(String),

    /// There is no session token, or the server refused it. The user should log in again
    #[error("Authentication required")]
    AuthRequired,

    /// The HTTP call failed, or the server answered with a non-success status
    #[error("Failed to {action}: {reason}")]
    Network { action: Action, reason: String },

    /// The server answered a login or a registration with `success: false`
    #[error("The server rejected these credentials")]
    LoginRejected,

    /// Another request is already in flight for this task
    #[error("This task is busy")]
    Busy,

    /// This task has been deleted, and cannot be used anymore
    #[error("This task has been deleted")]
    Removed,

    /// The session store could not be read or written
    #[error("Session storage error: {0}")]
    Storage(String),
}

impl TaskError {
    pub fn validation<S: ToString>(reason: S) -> Self {
        TaskError::Validation(reason.to_string())
    }

    pub fn network<S: ToString>(action: Action, reason: S) -> Self {
        TaskError::Network { action, reason: reason.to_string() }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, TaskError::Validation(_))
    }

    pub fn is_auth_required(&self) -> bool {
        matches!(self, TaskError::AuthRequired)
    }

    pub fn is_network(&self) -> bool {
        matches!(self, TaskError::Network{..})
    }
}

impl From<std::io::Error> for TaskError {
    fn from(err: std::io::Error) -> Self {
        TaskError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for TaskError {
    fn from(err: serde_json::Error) -> Self {
        TaskError::Storage(err.to_string())
    }
}

pub type TaskResult<T> = Result<T, TaskError>;
