//! The seams of this crate: the remote task API, and the storage of the session token

use async_trait::async_trait;

use crate::error::TaskResult;
use crate::task::{Task, TaskId, TaskPayload};

/// An opaque credential sent on each authenticated request
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new<S: ToString>(token: S) -> Self {
        Self(token.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Tokens are secrets, do not log them
impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BearerToken(***)")
    }
}


/// Email and password, as typed by the user
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new<E: ToString, P: ToString>(email: E, password: P) -> Self {
        Self { email: email.to_string(), password: password.to_string() }
    }
}


/// A remote collection of tasks.
///
/// The token is always given by the caller, implementors never fetch it by themselves.
#[async_trait]
pub trait TaskApi {
    /// Returns every task of the current user, in the order the server chose
    async fn list_tasks(&self, token: &BearerToken) -> TaskResult<Vec<Task>>;

    /// Create a task. The server assigns its identifier
    async fn create_task(&self, token: &BearerToken, payload: &TaskPayload) -> TaskResult<()>;

    /// Overwrite every field of a task
    async fn update_task(&self, token: &BearerToken, id: &TaskId, payload: &TaskPayload) -> TaskResult<()>;

    /// Remove a task.
    /// The current fields are sent along, because the server expects them in the request body
    async fn delete_task(&self, token: &BearerToken, id: &TaskId, payload: &TaskPayload) -> TaskResult<()>;
}

/// A server that hands out session tokens
#[async_trait]
pub trait AuthApi {
    async fn login(&self, credentials: &Credentials) -> TaskResult<BearerToken>;
    async fn register(&self, credentials: &Credentials) -> TaskResult<BearerToken>;
}

/// Persists a single bearer token under a fixed key
pub trait SessionStore {
    fn get_token(&self) -> TaskResult<Option<BearerToken>>;
    fn set_token(&self, token: &BearerToken) -> TaskResult<()>;
    fn clear_token(&self) -> TaskResult<()>;
}
