//! A controller for a single task of a [`TaskList`](crate::task_list::TaskList)
//!
//! It keeps a local copy of the task, so that a completion toggle shows immediately,
//! and is rolled back if the server refuses it.
//! Edits are made on a separate [`TaskDraft`], which only replaces the local copy once the server accepted it.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::date::{validate_title, DateDraft, EndDate};
use crate::error::{TaskError, TaskResult};
use crate::task::{Task, TaskId, TaskPayload};
use crate::task_list::Invalidator;
use crate::traits::{BearerToken, SessionStore, TaskApi};

/// The request currently in flight for a task
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusyKind {
    Toggling,
    Saving,
    Deleting,
}

/// Whether a task can accept a new operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// A request is in flight. No other operation is accepted until it resolves
    Busy(BusyKind),
    /// The task has been deleted on the server
    Removed,
}

/// The fields a user is editing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub date: DateDraft,
}

impl From<&Task> for TaskDraft {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title().to_string(),
            date: task.end_date().to_draft(),
        }
    }
}

impl TaskDraft {
    /// Check the title and the date, and return them the way they will be sent
    pub fn validate(&self) -> TaskResult<(String, EndDate)> {
        let title = validate_title(&self.title)?;
        let date = self.date.to_end_date()?;
        Ok((title.to_string(), date))
    }
}


struct ItemState {
    /// The local copy of the task
    task: Task,
    phase: Phase,
    /// `Some` while the task is being edited
    draft: Option<TaskDraft>,
}

impl ItemState {
    fn ensure_idle(&self) -> TaskResult<()> {
        match self.phase {
            Phase::Idle => Ok(()),
            Phase::Busy(_) => Err(TaskError::Busy),
            Phase::Removed => Err(TaskError::Removed),
        }
    }
}


/// The controller of a single task
pub struct TaskItem<A, S>
where
    A: TaskApi,
    S: SessionStore,
{
    id: TaskId,
    api: Arc<A>,
    session: Arc<S>,
    invalidator: Invalidator,
    generation: u64,

    state: Mutex<ItemState>,
}

impl<A, S> TaskItem<A, S>
where
    A: TaskApi,
    S: SessionStore,
{
    /// Usually, items are built by [`TaskList::items`](crate::task_list::TaskList::items)
    pub fn new(task: Task, api: Arc<A>, session: Arc<S>, invalidator: Invalidator, generation: u64) -> Self {
        Self {
            id: task.id().clone(),
            api,
            session,
            invalidator,
            generation,
            state: Mutex::new(ItemState { task, phase: Phase::Idle, draft: None }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ItemState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn token(&self) -> TaskResult<BearerToken> {
        self.session.get_token()?.ok_or(TaskError::AuthRequired)
    }

    pub fn id(&self) -> &TaskId       { &self.id }
    pub fn generation(&self) -> u64   { self.generation }
    pub fn phase(&self) -> Phase      { self.state().phase }
    pub fn title(&self) -> String     { self.state().task.title().to_string() }
    pub fn content(&self) -> String   { self.state().task.content().to_string() }
    pub fn end_date(&self) -> EndDate { *self.state().task.end_date() }
    pub fn completed(&self) -> bool   { self.state().task.completed() }

    /// While busy, every operation is refused
    pub fn is_busy(&self) -> bool {
        matches!(self.phase(), Phase::Busy(_))
    }

    pub fn is_removed(&self) -> bool {
        self.phase() == Phase::Removed
    }

    /// Flip the completion status right away, then tell the server.
    ///
    /// If the server refuses, the status is set back to what it was before this call.
    /// Returns the new completion status.
    pub async fn toggle_completed(&self) -> TaskResult<bool> {
        let (token, previous, payload) = {
            let mut state = self.state();
            state.ensure_idle()?;
            let token = self.token()?;

            let previous = state.task.completed();
            state.task.set_completed(!previous);
            state.phase = Phase::Busy(BusyKind::Toggling);
            (token, previous, state.task.payload())
        };

        let result = self.api.update_task(&token, &self.id, &payload).await;

        let mut state = self.state();
        state.phase = Phase::Idle;
        match result {
            Ok(()) => {
                log::debug!("Task {} is now {}", self.id, if payload.completed { "completed" } else { "uncompleted" });
                Ok(payload.completed)
            },
            Err(err) => {
                log::warn!("Failed to update status of task {}: {}. Rolling back", self.id, err);
                state.task.set_completed(previous);
                Err(err)
            },
        }
    }

    /// Start editing this task. This does not change the task until [`Self::save_edit`] succeeds.
    ///
    /// Calling this while already editing keeps the current draft
    pub fn begin_edit(&self) -> TaskResult<()> {
        let mut state = self.state();
        state.ensure_idle()?;
        if state.draft.is_none() {
            let draft = TaskDraft::from(&state.task);
            state.draft = Some(draft);
        }
        Ok(())
    }

    /// Leave edit mode without saving
    pub fn cancel_edit(&self) {
        self.state().draft = None;
    }

    pub fn is_editing(&self) -> bool {
        self.state().draft.is_some()
    }

    /// A copy of the current draft, if this task is being edited
    pub fn draft(&self) -> Option<TaskDraft> {
        self.state().draft.clone()
    }

    /// Change the draft, as a user would type in the edit fields.
    ///
    /// Refused while a request is in flight
    pub fn edit_draft<F>(&self, f: F) -> TaskResult<()>
    where
        F: FnOnce(&mut TaskDraft),
    {
        let mut state = self.state();
        state.ensure_idle()?;
        match state.draft.as_mut() {
            None => Err(TaskError::validation("This task is not being edited")),
            Some(draft) => {
                f(draft);
                Ok(())
            },
        }
    }

    /// Send the draft to the server.
    ///
    /// In case the draft is invalid or the server refuses it, edit mode is left open so that the user can retry.
    /// On success, the draft replaces the local copy, edit mode is closed and the owning list is invalidated.
    pub async fn save_edit(&self) -> TaskResult<()> {
        let (token, payload) = {
            let mut state = self.state();
            state.ensure_idle()?;
            let (title, end_date) = match &state.draft {
                None => return Err(TaskError::validation("This task is not being edited")),
                Some(draft) => draft.validate()?,
            };
            let token = self.token()?;

            let payload = TaskPayload::new(title, state.task.content(), end_date, state.task.completed());
            state.phase = Phase::Busy(BusyKind::Saving);
            (token, payload)
        };

        let result = self.api.update_task(&token, &self.id, &payload).await;

        let mut state = self.state();
        state.phase = Phase::Idle;
        match result {
            Ok(()) => {
                log::info!("Saved task {}", self.id);
                state.task.apply(&payload);
                state.draft = None;
                self.invalidator.invalidate();
                Ok(())
            },
            Err(err) => {
                log::warn!("Failed to update task {}: {}", self.id, err);
                Err(err)
            },
        }
    }

    /// Delete this task on the server.
    ///
    /// On success, the owning list is invalidated and this controller refuses every further operation
    pub async fn delete_task(&self) -> TaskResult<()> {
        let (token, payload) = {
            let mut state = self.state();
            state.ensure_idle()?;
            let token = self.token()?;
            state.phase = Phase::Busy(BusyKind::Deleting);
            (token, state.task.payload())
        };

        let result = self.api.delete_task(&token, &self.id, &payload).await;

        let mut state = self.state();
        match result {
            Ok(()) => {
                log::info!("Deleted task {}", self.id);
                state.phase = Phase::Removed;
                state.draft = None;
                self.invalidator.invalidate();
                Ok(())
            },
            Err(err) => {
                log::warn!("Failed to delete task {}: {}", self.id, err);
                state.phase = Phase::Idle;
                Err(err)
            },
        }
    }
}
