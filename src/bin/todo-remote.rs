//! Logs in to the task API, and prints the tasks of this user.
//!
//! Set `TODO_EMAIL` and `TODO_PASSWORD`, and optionally `TODO_API_URL` and `TODO_SESSION_FILE`.
//! Set `RUST_LOG` to display more info about the requests.

use std::path::PathBuf;
use std::sync::Arc;

use todo_remote::client::Client;
use todo_remote::session::{Authenticator, FileSession};
use todo_remote::traits::Credentials;
use todo_remote::{TaskError, TaskList};

const DEFAULT_SESSION_FILE: &str = "todo_session.json";

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), TaskError> {
    if let Ok(url) = std::env::var("TODO_API_URL") {
        if let Ok(mut api_url) = todo_remote::config::API_URL.lock() {
            *api_url = url;
        }
    }
    let session_file = std::env::var("TODO_SESSION_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_SESSION_FILE));

    let client = Arc::new(Client::from_config()?);
    let session = Arc::new(FileSession::new(&session_file));
    let auth = Authenticator::new(client.clone(), session.clone());

    if auth.is_logged_in()? == false {
        let email = std::env::var("TODO_EMAIL").unwrap_or_default();
        let password = std::env::var("TODO_PASSWORD").unwrap_or_default();
        auth.login(&Credentials::new(email, password)).await?;
    }

    let mut list = TaskList::new(client, session);
    match list.refresh().await {
        Err(TaskError::AuthRequired) => {
            log::warn!("The session has expired, please log in again");
            auth.logout()?;
            return Err(TaskError::AuthRequired);
        },
        other => other?,
    }

    println!("{}", list.load_state());
    todo_remote::utils::print_task_list(list.tasks());
    Ok(())
}
