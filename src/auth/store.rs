/// In-memory Credential Store
///
/// Authoritative mapping of username to user record. All state lives behind a
/// single `RwLock`:
/// - Mutations (register, set/clear/rotate/take refresh token) hold the write lock,
///   so read-modify-write on a user record is atomic
/// - Lookups hold the read lock and always see a whole `Token`
///
/// A secondary index maps refresh token value to username. It is updated under
/// the same write lock as the user record, so every stored refresh token has
/// exactly one index entry. Expired tokens stay in place until overwritten or
/// revoked; the active predicate (`expires > now`) is applied on every lookup.
///
/// Nothing is persisted: state lives as long as the store instance.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::auth::models::{Token, User};
use crate::error::StoreError;

#[derive(Default)]
struct StoreState {
    users: HashMap<String, User>,
    refresh_index: HashMap<String, String>,
}

impl StoreState {
    /// Username owning `value`, if that token is currently active
    fn active_owner(&self, value: &str, now: i64) -> Option<&str> {
        let username = self.refresh_index.get(value)?;
        let user = self.users.get(username)?;
        match &user.refresh_token {
            Some(token) if token.value == value && token.is_active(now) => Some(username),
            _ => None,
        }
    }

    fn replace_token(&mut self, username: &str, token: Option<Token>) -> Result<Option<Token>, StoreError> {
        let user = self
            .users
            .get_mut(username)
            .ok_or_else(|| StoreError::UserNotFound(username.to_string()))?;

        let previous = std::mem::replace(&mut user.refresh_token, token);
        if let Some(old) = &previous {
            self.refresh_index.remove(&old.value);
        }
        if let Some(new) = &user.refresh_token {
            self.refresh_index.insert(new.value.clone(), username.to_string());
        }

        Ok(previous)
    }
}

#[derive(Default)]
pub struct CredentialStore {
    state: RwLock<StoreState>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Every mutation leaves the maps consistent before it can panic, so a
    // poisoned lock still guards valid state.
    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a new user
    ///
    /// # Errors
    /// Returns `StoreError::UsernameTaken` if the username exists; the existing
    /// record is left untouched.
    pub fn register(&self, username: &str, password_hash: Vec<u8>) -> Result<User, StoreError> {
        let mut state = self.write();
        match state.users.entry(username.to_string()) {
            Entry::Occupied(_) => Err(StoreError::UsernameTaken(username.to_string())),
            Entry::Vacant(slot) => {
                let user = User::new(username.to_string(), password_hash);
                Ok(slot.insert(user).clone())
            }
        }
    }

    pub fn find_by_username(&self, username: &str) -> Result<User, StoreError> {
        self.read()
            .users
            .get(username)
            .cloned()
            .ok_or_else(|| StoreError::UserNotFound(username.to_string()))
    }

    /// Find the user whose refresh token equals `value` and is active at `now`
    pub fn find_by_active_refresh_token(&self, value: &str, now: i64) -> Option<User> {
        let state = self.read();
        let username = state.active_owner(value, now)?;
        state.users.get(username).cloned()
    }

    /// Replace the user's refresh token, dropping any previous one
    pub fn set_refresh_token(&self, username: &str, token: Token) -> Result<(), StoreError> {
        self.write().replace_token(username, Some(token)).map(|_| ())
    }

    /// Clear the user's refresh token, returning what was stored
    pub fn clear_refresh_token(&self, username: &str) -> Result<Option<Token>, StoreError> {
        self.write().replace_token(username, None)
    }

    /// Swap an active refresh token for `replacement` in one critical section
    ///
    /// Returns the updated user, or `None` when `value` is unknown or expired.
    /// Two callers racing with the same value cannot both succeed.
    pub fn rotate_active_refresh_token(
        &self,
        value: &str,
        now: i64,
        replacement: Token,
    ) -> Option<User> {
        let mut state = self.write();
        let username = state.active_owner(value, now)?.to_string();
        state.replace_token(&username, Some(replacement)).ok()?;
        state.users.get(&username).cloned()
    }

    /// Clear an active refresh token in one critical section
    ///
    /// Returns the user as it is after clearing, or `None` when `value` is
    /// unknown or expired.
    pub fn take_active_refresh_token(&self, value: &str, now: i64) -> Option<User> {
        let mut state = self.write();
        let username = state.active_owner(value, now)?.to_string();
        state.replace_token(&username, None).ok()?;
        state.users.get(&username).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
