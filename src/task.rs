//! To-do tasks, as stored by the server

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::config::CONTENT_NOT_APPLICABLE;
use crate::date::EndDate;

/// The server-assigned identifier of a task.
///
/// This is opaque, and never changes across updates.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId {
    content: String,
}

impl TaskId {
    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Generate a random TaskId, the way a server would
    pub fn random() -> Self {
        let random = uuid::Uuid::new_v4().to_simple().to_string();
        Self { content: random }
    }
}
impl From<String> for TaskId {
    fn from(content: String) -> Self {
        Self { content }
    }
}
impl From<&str> for TaskId {
    fn from(content: &str) -> Self {
        Self { content: content.to_string() }
    }
}
impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}


fn default_content() -> String {
    CONTENT_NOT_APPLICABLE.to_string()
}

/// A to-do task
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// The identifier, assigned by the server
    #[serde(rename = "_id", alias = "id")]
    id: TaskId,
    /// The display name of the task
    title: String,
    /// Free-form text. [`CONTENT_NOT_APPLICABLE`] when there is none
    #[serde(default = "default_content")]
    content: String,
    /// The due date
    #[serde(rename = "endDate")]
    end_date: EndDate,
    /// The completion status of this task
    #[serde(default)]
    completed: bool,
}

impl Task {
    pub fn new<T: ToString, C: ToString>(id: TaskId, title: T, content: C, end_date: EndDate, completed: bool) -> Self {
        Self {
            id,
            title: title.to_string(),
            content: content.to_string(),
            end_date,
            completed,
        }
    }

    pub fn id(&self) -> &TaskId           { &self.id       }
    pub fn title(&self) -> &str           { &self.title    }
    pub fn content(&self) -> &str         { &self.content  }
    pub fn end_date(&self) -> &EndDate    { &self.end_date }
    pub fn completed(&self) -> bool       { self.completed }

    /// The body the server expects to create or update this task
    pub fn payload(&self) -> TaskPayload {
        TaskPayload {
            title: self.title.clone(),
            content: self.content.clone(),
            end_date: self.end_date,
            completed: self.completed,
        }
    }

    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    /// Overwrite every field but the identifier.
    /// This is how servers apply an update
    pub fn apply(&mut self, payload: &TaskPayload) {
        self.title = payload.title.clone();
        self.content = payload.content.clone();
        self.end_date = payload.end_date;
        self.completed = payload.completed;
    }
}


/// The fields sent to the server when a task is created, updated, or deleted
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskPayload {
    pub title: String,
    pub content: String,
    #[serde(rename = "endDate")]
    pub end_date: EndDate,
    pub completed: bool,
}

impl TaskPayload {
    pub fn new<T: ToString, C: ToString>(title: T, content: C, end_date: EndDate, completed: bool) -> Self {
        Self {
            title: title.to_string(),
            content: content.to_string(),
            end_date,
            completed,
        }
    }

    /// Build the task a server would store for this payload
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            title: self.title,
            content: self.content,
            end_date: self.end_date,
            completed: self.completed,
        }
    }
}
