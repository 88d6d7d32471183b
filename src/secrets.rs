//! Tracker password storage outside the config file.

use keyring::{Entry, Error as KeyringError};

const KEYRING_SERVICE: &str = "com.crashlytics.youtrack-hook";

/// Stores the tracker password per username.
pub trait PasswordStore {
    fn load_password(&self, username: &str) -> Result<Option<String>, String>;
    fn save_password(&self, username: &str, password: &str) -> Result<(), String>;
}

/// Keeps passwords in the platform keychain.
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new() -> Self {
        Self {
            service: KEYRING_SERVICE.to_string(),
        }
    }

    fn entry(&self, username: &str) -> Result<Entry, String> {
        Entry::new(&self.service, username)
            .map_err(|err| format!("Failed to open keyring entry: {err}"))
    }
}

impl PasswordStore for KeyringStore {
    fn load_password(&self, username: &str) -> Result<Option<String>, String> {
        match self.entry(username)?.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(KeyringError::NoEntry) => Ok(None),
            Err(err) => Err(format!("Failed to read password from keyring: {err}")),
        }
    }

    fn save_password(&self, username: &str, password: &str) -> Result<(), String> {
        self.entry(username)?
            .set_password(password)
            .map_err(|err| format!("Failed to store password in keyring: {err}"))
    }
}

#[cfg(test)]
pub mod memory {
    use super::PasswordStore;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-process stand-in for the keychain.
    #[derive(Default)]
    pub struct MemoryStore {
        passwords: Mutex<HashMap<String, String>>,
    }

    impl PasswordStore for MemoryStore {
        fn load_password(&self, username: &str) -> Result<Option<String>, String> {
            Ok(self.passwords.lock().unwrap().get(username).cloned())
        }

        fn save_password(&self, username: &str, password: &str) -> Result<(), String> {
            self.passwords
                .lock()
                .unwrap()
                .insert(username.to_string(), password.to_string());
            Ok(())
        }
    }
}
