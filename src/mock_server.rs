//! An in-memory stand-in for the remote task API.
//!
//! It records every request it receives, and its failures can be scripted with a [`MockBehaviour`]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::error::{Action, TaskError, TaskResult};
use crate::mock_behaviour::MockBehaviour;
use crate::task::{Task, TaskId, TaskPayload};
use crate::traits::{AuthApi, BearerToken, Credentials, TaskApi};

/// A request received by a [`MockServer`]
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    pub action: Action,
    pub id: Option<TaskId>,
    pub payload: Option<TaskPayload>,
}

#[derive(Default)]
struct ServerState {
    tasks: Vec<Task>,
    users: HashMap<String, String>,
    tokens: HashSet<String>,
    requests: Vec<Request>,
    behaviour: MockBehaviour,
    paused: Option<Arc<Notify>>,
}

/// A mocked server. Every task belongs to the same user
#[derive(Default)]
pub struct MockServer {
    state: Mutex<ServerState>,
}

impl MockServer {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, ServerState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Hand out a token this server will accept, as if a user had just logged in
    pub fn issue_token(&self) -> BearerToken {
        let token = uuid::Uuid::new_v4().to_hyphenated().to_string();
        self.state().tokens.insert(token.clone());
        BearerToken::new(token)
    }

    /// Forget every token, as if every session had expired
    pub fn expire_sessions(&self) {
        self.state().tokens.clear();
    }

    pub fn add_user<E: ToString, P: ToString>(&self, email: E, password: P) {
        self.state().users.insert(email.to_string(), password.to_string());
    }

    /// Store a task directly, without this counting as a request
    pub fn insert_task(&self, task: Task) {
        self.state().tasks.push(task);
    }

    /// Change a task directly, as another device would do
    pub fn modify_task(&self, id: &TaskId, payload: &TaskPayload) {
        if let Some(task) = self.state().tasks.iter_mut().find(|t| t.id() == id) {
            task.apply(payload);
        }
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.state().tasks.clone()
    }

    pub fn task(&self, id: &TaskId) -> Option<Task> {
        self.state().tasks.iter().find(|t| t.id() == id).cloned()
    }

    pub fn set_behaviour(&self, behaviour: MockBehaviour) {
        self.state().behaviour = behaviour;
    }

    /// Every request received so far, oldest first
    pub fn requests(&self) -> Vec<Request> {
        self.state().requests.clone()
    }

    /// How many requests of this kind have been received so far
    pub fn count(&self, action: Action) -> usize {
        self.state().requests.iter().filter(|r| r.action == action).count()
    }

    /// How many requests have been received so far, whatever their kind
    pub fn total_requests(&self) -> usize {
        self.state().requests.len()
    }

    /// The next request will not be answered until the returned `Notify` is notified
    pub fn pause_next_request(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.state().paused = Some(notify.clone());
        notify
    }

    /// Record the request, wait if the server was paused, and check the token
    async fn receive(&self, token: Option<&BearerToken>, request: Request) -> TaskResult<()> {
        let paused = {
            let mut state = self.state();
            log::debug!("Mock server: received a {} request", request.action);
            state.requests.push(request);
            state.paused.take()
        };
        if let Some(notify) = paused {
            notify.notified().await;
        }

        if let Some(token) = token {
            if self.state().tokens.contains(token.as_str()) == false {
                return Err(TaskError::AuthRequired);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl TaskApi for MockServer {
    async fn list_tasks(&self, token: &BearerToken) -> TaskResult<Vec<Task>> {
        self.receive(Some(token), Request { action: Action::Load, id: None, payload: None }).await?;

        let mut state = self.state();
        state.behaviour.can_list_tasks()?;
        Ok(state.tasks.clone())
    }

    async fn create_task(&self, token: &BearerToken, payload: &TaskPayload) -> TaskResult<()> {
        self.receive(Some(token), Request { action: Action::Create, id: None, payload: Some(payload.clone()) }).await?;

        let mut state = self.state();
        state.behaviour.can_create_task()?;
        state.tasks.push(payload.clone().into_task(TaskId::random()));
        Ok(())
    }

    async fn update_task(&self, token: &BearerToken, id: &TaskId, payload: &TaskPayload) -> TaskResult<()> {
        self.receive(Some(token), Request { action: Action::Update, id: Some(id.clone()), payload: Some(payload.clone()) }).await?;

        let mut state = self.state();
        state.behaviour.can_update_task()?;
        match state.tasks.iter_mut().find(|t| t.id() == id) {
            None => Err(TaskError::network(Action::Update, "Unexpected HTTP status code 404")),
            Some(task) => {
                task.apply(payload);
                Ok(())
            },
        }
    }

    async fn delete_task(&self, token: &BearerToken, id: &TaskId, payload: &TaskPayload) -> TaskResult<()> {
        self.receive(Some(token), Request { action: Action::Delete, id: Some(id.clone()), payload: Some(payload.clone()) }).await?;

        let mut state = self.state();
        state.behaviour.can_delete_task()?;
        let n_before = state.tasks.len();
        state.tasks.retain(|t| t.id() != id);
        if state.tasks.len() == n_before {
            return Err(TaskError::network(Action::Delete, "Unexpected HTTP status code 404"));
        }
        Ok(())
    }
}

#[async_trait]
impl AuthApi for MockServer {
    async fn login(&self, credentials: &Credentials) -> TaskResult<BearerToken> {
        self.receive(None, Request { action: Action::Login, id: None, payload: None }).await?;

        self.state().behaviour.can_login(Action::Login)?;
        let known = self.state().users.get(&credentials.email) == Some(&credentials.password);
        match known {
            true => Ok(self.issue_token()),
            false => Err(TaskError::LoginRejected),
        }
    }

    async fn register(&self, credentials: &Credentials) -> TaskResult<BearerToken> {
        self.receive(None, Request { action: Action::Register, id: None, payload: None }).await?;

        self.state().behaviour.can_login(Action::Register)?;
        if self.state().users.contains_key(&credentials.email) {
            return Err(TaskError::LoginRejected);
        }
        self.add_user(&credentials.email, &credentials.password);
        Ok(self.issue_token())
    }
}
