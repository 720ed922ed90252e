//! Support for library configuration options

use std::sync::{Arc, Mutex};
use once_cell::sync::Lazy;

/// The base URL of the task API. Every endpoint path is resolved relative to it, so it should end with a `/`.
/// Feel free to override it when initing this library.
pub static API_URL: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("https://fake-form.onrender.com/api/".to_string())));

/// The key the bearer token is stored under in a [`SessionStore`](crate::traits::SessionStore).
/// Feel free to override it when initing this library.
pub static SESSION_KEY: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("userToken".to_string())));

/// The text sent as `content` when a task has no content
pub const CONTENT_NOT_APPLICABLE: &str = "NaN";

/// Minimum password length accepted before any login or registration is attempted
pub const MIN_PASSWORD_LEN: usize = 6;

/// Returns the current API base URL
pub fn api_url() -> String {
    match API_URL.lock() {
        Ok(url) => url.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Returns the current session key
pub fn session_key() -> String {
    match SESSION_KEY.lock() {
        Ok(key) => key.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}
