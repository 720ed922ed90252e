//! This module stores the session token, and provides a way to log in and out

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::config::MIN_PASSWORD_LEN;
use crate::error::{TaskError, TaskResult};
use crate::traits::{AuthApi, BearerToken, Credentials, SessionStore};


/// A session store that only lives as long as the current process
#[derive(Debug, Default)]
pub struct MemorySession {
    token: Mutex<Option<BearerToken>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds a token
    pub fn with_token(token: BearerToken) -> Self {
        Self { token: Mutex::new(Some(token)) }
    }
}

impl SessionStore for MemorySession {
    fn get_token(&self) -> TaskResult<Option<BearerToken>> {
        Ok(lock(&self.token)?.clone())
    }

    fn set_token(&self, token: &BearerToken) -> TaskResult<()> {
        *lock(&self.token)? = Some(token.clone());
        Ok(())
    }

    fn clear_token(&self) -> TaskResult<()> {
        *lock(&self.token)? = None;
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> TaskResult<std::sync::MutexGuard<'_, T>> {
    mutex.lock().map_err(|_| TaskError::Storage("session mutex is poisoned".to_string()))
}


/// A session store that keeps its key-value pairs in a local JSON file
#[derive(Debug)]
pub struct FileSession {
    backing_file: PathBuf,
    key: String,
}

impl FileSession {
    /// Use `path` as the backing file. It is created on the first [`SessionStore::set_token`] call.
    ///
    /// The token is stored under the key currently set in the [`config`](crate::config)
    pub fn new(path: &Path) -> Self {
        Self::with_key(path, crate::config::session_key())
    }

    pub fn with_key<S: ToString>(path: &Path, key: S) -> Self {
        Self {
            backing_file: PathBuf::from(path),
            key: key.to_string(),
        }
    }

    pub fn backing_file(&self) -> &Path {
        &self.backing_file
    }

    fn load(&self) -> TaskResult<HashMap<String, String>> {
        let file = match std::fs::File::open(&self.backing_file) {
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(err) => {
                return Err(TaskError::Storage(format!("Unable to open file {:?}: {}", self.backing_file, err)));
            },
            Ok(file) => file,
        };
        Ok(serde_json::from_reader(file)?)
    }

    fn save(&self, data: &HashMap<String, String>) -> TaskResult<()> {
        if let Some(parent) = self.backing_file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(&self.backing_file)
            .map_err(|err| TaskError::Storage(format!("Unable to save file {:?}: {}", self.backing_file, err)))?;
        serde_json::to_writer(file, data)?;
        Ok(())
    }
}

impl SessionStore for FileSession {
    fn get_token(&self) -> TaskResult<Option<BearerToken>> {
        let data = self.load()?;
        Ok(data.get(&self.key).map(BearerToken::new))
    }

    fn set_token(&self, token: &BearerToken) -> TaskResult<()> {
        let mut data = self.load()?;
        data.insert(self.key.clone(), token.as_str().to_string());
        self.save(&data)
    }

    fn clear_token(&self) -> TaskResult<()> {
        let mut data = self.load()?;
        if data.remove(&self.key).is_some() {
            self.save(&data)?;
        }
        Ok(())
    }
}



/// Logs users in and out, and keeps the resulting token in a [`SessionStore`]
pub struct Authenticator<A, S>
where
    A: AuthApi,
    S: SessionStore,
{
    api: Arc<A>,
    store: Arc<S>,
}

impl<A, S> Authenticator<A, S>
where
    A: AuthApi,
    S: SessionStore,
{
    pub fn new(api: Arc<A>, store: Arc<S>) -> Self {
        Self { api, store }
    }

    pub fn is_logged_in(&self) -> TaskResult<bool> {
        Ok(self.store.get_token()?.is_some())
    }

    pub async fn login(&self, credentials: &Credentials) -> TaskResult<()> {
        check_credentials(credentials)?;
        let token = self.api.login(credentials).await?;
        self.store.set_token(&token)?;
        log::info!("Logged in as {}", credentials.email);
        Ok(())
    }

    pub async fn register(&self, credentials: &Credentials) -> TaskResult<()> {
        check_credentials(credentials)?;
        let token = self.api.register(credentials).await?;
        self.store.set_token(&token)?;
        log::info!("Registered as {}", credentials.email);
        Ok(())
    }

    /// Forget the session token. The user will have to log in again
    pub fn logout(&self) -> TaskResult<()> {
        self.store.clear_token()?;
        log::info!("Logged out");
        Ok(())
    }
}

/// The server is only contacted for plausible credentials
fn check_credentials(credentials: &Credentials) -> TaskResult<()> {
    if credentials.email.contains('@') == false {
        return Err(TaskError::validation("Please enter a valid email"));
    }
    if credentials.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(TaskError::validation(format!("The password must have at least {} characters", MIN_PASSWORD_LEN)));
    }
    Ok(())
}
