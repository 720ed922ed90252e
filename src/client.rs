//! This module provides a client to connect to the remote task API

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Action, TaskError, TaskResult};
use crate::resource::{Endpoints, Resource};
use crate::task::{Task, TaskId, TaskPayload};
use crate::traits::{AuthApi, BearerToken, Credentials, TaskApi};


#[derive(Deserialize)]
struct TaskListResponse {
    data: Vec<Task>,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    success: bool,
    token: Option<String>,
}


/// A task source that fetches its data from the remote HTTP API
#[derive(Clone, Debug)]
pub struct Client {
    resource: Resource,
    http: reqwest::Client,
}

impl Client {
    /// Create a client. This does not start a connection
    pub fn new<S: AsRef<str>>(url: S) -> TaskResult<Self> {
        Self::with_endpoints(url, Endpoints::default())
    }

    /// Create a client for a server that does not use the default endpoint paths
    pub fn with_endpoints<S: AsRef<str>>(url: S, endpoints: Endpoints) -> TaskResult<Self> {
        let url = Url::parse(url.as_ref())
            .map_err(|err| TaskError::validation(format!("invalid API URL {}: {}", url.as_ref(), err)))?;

        Ok(Self {
            resource: Resource::new(url, endpoints),
            http: reqwest::Client::new(),
        })
    }

    /// Create a client for the API URL currently set in the [`config`](crate::config)
    pub fn from_config() -> TaskResult<Self> {
        Self::with_endpoints(crate::config::api_url(), Endpoints::fake_form())
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    async fn send_authenticated(&self, request: RequestBuilder, token: &BearerToken, action: Action) -> TaskResult<Response> {
        let response = request
            .bearer_auth(token.as_str())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| TaskError::network(action, err))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                log::warn!("The server refused the session token ({:?})", response.status());
                Err(TaskError::AuthRequired)
            },
            status if status.is_success() == false => {
                Err(TaskError::network(action, format!("Unexpected HTTP status code {:?}", status)))
            },
            _ => Ok(response),
        }
    }

    async fn authenticate(&self, credentials: &Credentials, action: Action) -> TaskResult<BearerToken> {
        let url = self.resource.login_url(action)?;
        let body = LoginBody { email: &credentials.email, password: &credentials.password };

        let response = self.http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|err| TaskError::network(action, err))?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            log::info!("The server rejected a {} ({:?})", action, status);
            return Err(TaskError::LoginRejected);
        }
        if status.is_success() == false {
            return Err(TaskError::network(action, format!("Unexpected HTTP status code {:?}", status)));
        }

        let reply: LoginResponse = response.json().await
            .map_err(|err| TaskError::network(action, err))?;
        match (reply.success, reply.token) {
            (true, Some(token)) => Ok(BearerToken::new(token)),
            _ => Err(TaskError::LoginRejected),
        }
    }
}

#[async_trait]
impl TaskApi for Client {
    async fn list_tasks(&self, token: &BearerToken) -> TaskResult<Vec<Task>> {
        let url = self.resource.tasks_url(Action::Load)?;
        let response = self.send_authenticated(self.http.get(url), token, Action::Load).await?;

        let list: TaskListResponse = response.json().await
            .map_err(|err| TaskError::network(Action::Load, err))?;
        log::debug!("Fetched {} tasks", list.data.len());
        Ok(list.data)
    }

    async fn create_task(&self, token: &BearerToken, payload: &TaskPayload) -> TaskResult<()> {
        let url = self.resource.tasks_url(Action::Create)?;
        self.send_authenticated(self.http.post(url).json(payload), token, Action::Create).await?;
        log::debug!("Created task {:?}", payload.title);
        Ok(())
    }

    async fn update_task(&self, token: &BearerToken, id: &TaskId, payload: &TaskPayload) -> TaskResult<()> {
        let url = self.resource.task_url(id, Action::Update)?;
        self.send_authenticated(self.http.patch(url).json(payload), token, Action::Update).await?;
        log::debug!("Updated task {}", id);
        Ok(())
    }

    async fn delete_task(&self, token: &BearerToken, id: &TaskId, payload: &TaskPayload) -> TaskResult<()> {
        let url = self.resource.task_url(id, Action::Delete)?;
        self.send_authenticated(self.http.delete(url).json(payload), token, Action::Delete).await?;
        log::debug!("Deleted task {}", id);
        Ok(())
    }
}

#[async_trait]
impl AuthApi for Client {
    async fn login(&self, credentials: &Credentials) -> TaskResult<BearerToken> {
        self.authenticate(credentials, Action::Login).await
    }

    async fn register(&self, credentials: &Credentials) -> TaskResult<BearerToken> {
        self.authenticate(credentials, Action::Register).await
    }
}
