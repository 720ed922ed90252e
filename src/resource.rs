use url::Url;

use crate::error::{Action, TaskError, TaskResult};
use crate::task::TaskId;

/// Paths of the API endpoints, relative to the base URL
#[derive(Clone, Debug, PartialEq)]
pub struct Endpoints {
    pub login: String,
    pub register: String,
    pub tasks: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            login: "login".to_string(),
            register: "register".to_string(),
            tasks: "todo".to_string(),
        }
    }
}

impl Endpoints {
    /// The paths used by the deployed `fake-form` service, that nests authentication under the task collection
    pub fn fake_form() -> Self {
        Self {
            login: "todo/login".to_string(),
            register: "todo/register".to_string(),
            tasks: "todo".to_string(),
        }
    }
}


/// Just a wrapper around a base URL and the endpoint paths
#[derive(Clone, Debug)]
pub struct Resource {
    url: Url,
    endpoints: Endpoints,
}

impl Resource {
    pub fn new(url: Url, endpoints: Endpoints) -> Self {
        Self { url: with_trailing_slash(url), endpoints }
    }

    pub fn url(&self) -> &Url { &self.url }
    pub fn endpoints(&self) -> &Endpoints { &self.endpoints }

    pub fn login_url(&self, action: Action) -> TaskResult<Url> {
        let path = match action {
            Action::Register => &self.endpoints.register,
            _ => &self.endpoints.login,
        };
        self.join(path, action)
    }

    /// The URL of the whole task collection
    pub fn tasks_url(&self, action: Action) -> TaskResult<Url> {
        self.join(&self.endpoints.tasks, action)
    }

    /// The URL of a single task
    pub fn task_url(&self, id: &TaskId, action: Action) -> TaskResult<Url> {
        let path = format!("{}/{}", self.endpoints.tasks.trim_end_matches('/'), id.as_str());
        self.join(&path, action)
    }

    fn join(&self, path: &str, action: Action) -> TaskResult<Url> {
        self.url
            .join(path.trim_start_matches('/'))
            .map_err(|err| TaskError::network(action, format!("invalid URL for {}: {}", path, err)))
    }
}

/// `Url::join` replaces the last path segment unless the base ends with a `/`
fn with_trailing_slash(mut url: Url) -> Url {
    if url.path().ends_with('/') == false {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let res = Resource::new("https://my.serv.er/api".parse().unwrap(), Endpoints::default());
        assert_eq!(res.tasks_url(Action::Load).unwrap().as_str(), "https://my.serv.er/api/todo");
        assert_eq!(res.task_url(&TaskId::from("7"), Action::Delete).unwrap().as_str(), "https://my.serv.er/api/todo/7");
        assert_eq!(res.login_url(Action::Login).unwrap().as_str(), "https://my.serv.er/api/login");
        assert_eq!(res.login_url(Action::Register).unwrap().as_str(), "https://my.serv.er/api/register");

        let res = Resource::new("https://my.serv.er/api/".parse().unwrap(), Endpoints::fake_form());
        assert_eq!(res.login_url(Action::Login).unwrap().as_str(), "https://my.serv.er/api/todo/login");
    }
}
