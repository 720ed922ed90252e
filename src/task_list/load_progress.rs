//! Utilities to track the loading state of a task list

use std::fmt::{Display, Error, Formatter};

/// The loading state of a task list
#[derive(Clone, Debug, PartialEq)]
pub enum LoadEvent {
    /// Nothing has been fetched yet
    NotLoaded,
    /// A refresh is in progress
    Loading,
    /// The last refresh succeeded
    Loaded{ count: usize },
    /// The last refresh failed. The list still shows what was fetched before
    LoadFailed{ reason: String },
}

impl LoadEvent {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadEvent::Loading)
    }
}

impl Display for LoadEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            LoadEvent::NotLoaded => write!(f, "Not loaded"),
            LoadEvent::Loading => write!(f, "Loading tasks..."),
            LoadEvent::Loaded{count: 0} => write!(f, "No tasks available. Add a new task!"),
            LoadEvent::Loaded{count} => write!(f, "{} tasks", count),
            LoadEvent::LoadFailed{reason} => write!(f, "Failed to load tasks ({})", reason),
        }
    }
}

impl Default for LoadEvent {
    fn default() -> Self {
        Self::NotLoaded
    }
}



/// See [`feedback_channel`]
pub type FeedbackSender = tokio::sync::watch::Sender<LoadEvent>;
/// See [`feedback_channel`]
pub type FeedbackReceiver = tokio::sync::watch::Receiver<LoadEvent>;

/// Create a feeback channel, that can be used to retrieve the current loading state of a list
pub fn feedback_channel() -> (FeedbackSender, FeedbackReceiver) {
    tokio::sync::watch::channel(LoadEvent::default())
}
