//! This module owns the in-memory list of tasks of the current user
//!
//! The list is never patched locally: it is rebuilt from the server every time it is refreshed,
//! and every successful creation, update or deletion triggers such a refresh.

use std::convert::TryInto;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::CONTENT_NOT_APPLICABLE;
use crate::date::{validate_title, EndDate};
use crate::error::{TaskError, TaskResult};
use crate::task::{Task, TaskId, TaskPayload};
use crate::task_item::TaskItem;
use crate::traits::{BearerToken, SessionStore, TaskApi};

pub mod load_progress;
use load_progress::{FeedbackReceiver, FeedbackSender, LoadEvent};


/// A flag shared between a list and its items.
///
/// Items raise it after a change that the list should fetch again
#[derive(Clone, Debug, Default)]
pub struct Invalidator {
    flag: Arc<AtomicBool>,
}

impl Invalidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalidate(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_invalidated(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Lower the flag, and tell whether it was raised
    fn take(&self) -> bool {
        self.flag.swap(false, Ordering::SeqCst)
    }
}


/// The tasks of the current user, as last fetched from a [`TaskApi`]
pub struct TaskList<A, S>
where
    A: TaskApi,
    S: SessionStore,
{
    api: Arc<A>,
    session: Arc<S>,

    tasks: Vec<Task>,
    /// Bumped at every successful refresh
    generation: u64,
    invalidator: Invalidator,

    feedback_sender: FeedbackSender,
    feedback_receiver: FeedbackReceiver,
}

impl<A, S> TaskList<A, S>
where
    A: TaskApi,
    S: SessionStore,
{
    /// Create an empty list. Nothing is fetched until [`Self::refresh`] is called
    pub fn new(api: Arc<A>, session: Arc<S>) -> Self {
        let (feedback_sender, feedback_receiver) = load_progress::feedback_channel();
        Self {
            api,
            session,
            tasks: Vec::new(),
            generation: 0,
            invalidator: Invalidator::new(),
            feedback_sender,
            feedback_receiver,
        }
    }

    pub fn tasks(&self) -> &[Task] { &self.tasks }
    pub fn len(&self) -> usize { self.tasks.len() }
    pub fn is_empty(&self) -> bool { self.tasks.is_empty() }
    pub fn generation(&self) -> u64 { self.generation }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    /// The current loading state
    pub fn load_state(&self) -> LoadEvent {
        self.feedback_receiver.borrow().clone()
    }

    /// Get notified of every change of the loading state
    pub fn subscribe(&self) -> FeedbackReceiver {
        self.feedback_receiver.clone()
    }

    /// The flag items raise when this list should be fetched again
    pub fn invalidator(&self) -> &Invalidator {
        &self.invalidator
    }

    /// Build one controller per task, in the order of the list.
    ///
    /// These controllers become stale at the next refresh, see [`Self::is_current`]
    pub fn items(&self) -> Vec<TaskItem<A, S>> {
        self.tasks.iter()
            .map(|task| self.make_item(task))
            .collect()
    }

    /// Build the controller of a single task
    pub fn item(&self, id: &TaskId) -> Option<TaskItem<A, S>> {
        self.get(id).map(|task| self.make_item(task))
    }

    fn make_item(&self, task: &Task) -> TaskItem<A, S> {
        TaskItem::new(task.clone(), self.api.clone(), self.session.clone(), self.invalidator.clone(), self.generation)
    }

    /// Whether this item has been built from the current content of the list.
    ///
    /// After a refresh, the server data wins, and items built before should be discarded
    pub fn is_current(&self, item: &TaskItem<A, S>) -> bool {
        item.generation() == self.generation && item.is_removed() == false
    }

    fn token(&self) -> TaskResult<BearerToken> {
        match self.session.get_token()? {
            None => {
                log::warn!("No session token, the user should log in");
                Err(TaskError::AuthRequired)
            },
            Some(token) => Ok(token),
        }
    }

    fn feedback(&self, event: LoadEvent) {
        // This cannot fail, since this list always holds a receiver
        let _ = self.feedback_sender.send(event);
    }

    /// Replace the whole list with the tasks currently on the server.
    ///
    /// In case of an error, the list is left untouched
    pub async fn refresh(&mut self) -> TaskResult<()> {
        let token = self.token()?;

        // Invalidations raised while this request is in flight will need another refresh
        let was_invalidated = self.invalidator.take();
        self.feedback(LoadEvent::Loading);

        match self.api.list_tasks(&token).await {
            Err(err) => {
                log::error!("Failed to load tasks: {}", err);
                if was_invalidated {
                    self.invalidator.invalidate();
                }
                self.feedback(LoadEvent::LoadFailed{ reason: err.to_string() });
                Err(err)
            },
            Ok(tasks) => {
                log::info!("Loaded {} tasks", tasks.len());
                self.tasks = tasks;
                self.generation += 1;
                self.feedback(LoadEvent::Loaded{ count: self.tasks.len() });
                Ok(())
            },
        }
    }

    /// Refresh if an item has signaled a change since the last refresh.
    ///
    /// Returns whether a refresh was performed
    pub async fn refresh_if_invalidated(&mut self) -> TaskResult<bool> {
        if self.invalidator.is_invalidated() == false {
            return Ok(false);
        }
        self.refresh().await?;
        Ok(true)
    }

    /// Create a task on the server, then refresh the list.
    ///
    /// `end_date` can be an ISO date string, or a [`DateDraft`](crate::date::DateDraft) typed by the user.
    /// Nothing is sent if the title is blank or the date is invalid.
    /// The new task is not inserted locally: it will only appear once the refresh succeeds.
    pub async fn create<D>(&mut self, title: &str, content: &str, end_date: D) -> TaskResult<()>
    where
        D: TryInto<EndDate, Error = TaskError>,
    {
        let title = validate_title(title)?;
        let end_date = end_date.try_into()?;
        let content = match content.trim() {
            "" => CONTENT_NOT_APPLICABLE,
            _ => content,
        };
        let token = self.token()?;

        let payload = TaskPayload::new(title, content, end_date, false);
        if let Err(err) = self.api.create_task(&token, &payload).await {
            log::error!("Failed to create task {:?}: {}", title, err);
            return Err(err);
        }
        log::info!("Created task {:?}", title);

        self.refresh().await
    }
}
