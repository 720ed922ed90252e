//! This crate provides a client for a remote to-do task API.
//!
//! It provides an HTTP client in the [`client`] module, that can be used as a stand-alone module.
//! Users log in with an [`Authenticator`](session::Authenticator), that keeps the session token in a [`SessionStore`](traits::SessionStore).
//!
//! The tasks of the current user are held by a [`TaskList`], that is always rebuilt from the server after a change. \
//! Each task is driven by a [`TaskItem`], that shows completion toggles right away and rolls them back in case the server refuses them.

pub mod traits;
pub mod error;
pub use error::{TaskError, TaskResult};

pub mod date;
mod task;
pub use task::{Task, TaskId, TaskPayload};
pub mod task_list;
pub use task_list::TaskList;
pub mod task_item;
pub use task_item::TaskItem;

mod resource;
pub use resource::{Endpoints, Resource};
pub mod client;
pub mod session;

pub mod mock_behaviour;
pub mod mock_server;

pub mod config;
pub mod utils;
