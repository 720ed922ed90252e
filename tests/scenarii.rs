//! Helpers to populate a mocked server and a task list before a test

#![allow(dead_code)]

use std::sync::Arc;

use todo_remote::date::EndDate;
use todo_remote::mock_server::MockServer;
use todo_remote::session::MemorySession;
use todo_remote::{Task, TaskId, TaskList};

pub type MockList = TaskList<MockServer, MemorySession>;

/// The state of a task on the server, before a test runs
pub struct TaskState {
    pub id: &'static str,
    pub title: &'static str,
    pub end_date: &'static str,
    pub completed: bool,
}

impl TaskState {
    pub fn to_task(&self) -> Task {
        let end_date = EndDate::parse(self.end_date).unwrap();
        Task::new(TaskId::from(self.id), self.title, "NaN", end_date, self.completed)
    }
}

/// A few tasks, some of them completed, in the order the server returns them
pub fn scenarii_basic() -> Vec<TaskState> {
    vec![
        TaskState { id: "1", title: "Buy milk",        end_date: "2025-03-01T00:00:00.000Z", completed: false },
        TaskState { id: "3", title: "Call the bank",   end_date: "2025-02-14T00:00:00.000Z", completed: true  },
        TaskState { id: "2", title: "Water plants",    end_date: "2025-03-02",               completed: false },
        TaskState { id: "7", title: "Renew passport",  end_date: "2025-06-30T00:00:00.000Z", completed: false },
    ]
}

/// A server with these tasks, and a logged-in session for it
pub fn populate_test_server(scenarii: &[TaskState]) -> (Arc<MockServer>, Arc<MemorySession>) {
    let server = Arc::new(MockServer::new());
    for state in scenarii {
        server.insert_task(state.to_task());
    }
    let session = Arc::new(MemorySession::with_token(server.issue_token()));
    (server, session)
}

/// A list that has not been refreshed yet
pub fn populate_test_list(scenarii: &[TaskState]) -> (Arc<MockServer>, MockList) {
    let (server, session) = populate_test_server(scenarii);
    let list = TaskList::new(server.clone(), session);
    (server, list)
}

pub fn titles(list: &MockList) -> Vec<String> {
    list.tasks().iter().map(|t| t.title().to_string()).collect()
}
