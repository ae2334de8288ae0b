use chapter_portal_database::models::{Admin, User};
use chapter_portal_database::KeyValueStore;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::PortalError;

pub const STORAGE_KEY_USER: &str = "ieee_user";
pub const STORAGE_KEY_ADMIN: &str = "ieee_admin";

/// Whoever is signed in, as persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    Student(User),
    Admin(Admin),
}

/// Persists the signed in actor under a key scoped to its role.
#[derive(Debug)]
#[must_use]
pub struct SessionStore<S> {
    storage: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// A stored admin wins over a stored student. Entries that do not parse are ignored;
    /// whatever parses is trusted without further checks.
    pub fn restore(&self) -> Result<Option<Actor>, PortalError> {
        if let Some(admin) = self.load::<Admin>(STORAGE_KEY_ADMIN)? {
            return Ok(Some(Actor::Admin(admin)));
        }
        Ok(self.load::<User>(STORAGE_KEY_USER)?.map(Actor::Student))
    }

    pub fn save(&mut self, actor: &Actor) -> Result<(), PortalError> {
        let (key, _, value) = entry(actor)?;
        self.storage.set(key, value)?;
        Ok(())
    }

    /// Saves `actor` and then drops the other role's entry. If that removal fails the
    /// previous entry for `actor`'s role is put back, so storage keeps the old session.
    pub fn replace(&mut self, actor: &Actor) -> Result<(), PortalError> {
        let (key, other, value) = entry(actor)?;
        let previous = self.storage.get(key)?;
        self.storage.set(key, value)?;
        if let Err(error) = self.storage.remove(other) {
            let rollback = match previous {
                Some(previous) => self.storage.set(key, previous),
                None => self.storage.remove(key),
            };
            if let Err(rollback) = rollback {
                warn!("failed to restore stored session {key}: {rollback}");
            }
            return Err(error.into());
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), PortalError> {
        self.storage.remove(STORAGE_KEY_USER)?;
        self.storage.remove(STORAGE_KEY_ADMIN)?;
        Ok(())
    }

    pub fn into_inner(self) -> S {
        self.storage
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, PortalError> {
        let Some(value) = self.storage.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&value) {
            Ok(actor) => Ok(Some(actor)),
            Err(error) => {
                debug!("failed to parse stored session {key}: {error}");
                Ok(None)
            }
        }
    }
}

/// The role's key, the other role's key and the serialized actor.
fn entry(actor: &Actor) -> Result<(&'static str, &'static str, String), PortalError> {
    Ok(match actor {
        Actor::Student(user) => (
            STORAGE_KEY_USER,
            STORAGE_KEY_ADMIN,
            serde_json::to_string(user)?,
        ),
        Actor::Admin(admin) => (
            STORAGE_KEY_ADMIN,
            STORAGE_KEY_USER,
            serde_json::to_string(admin)?,
        ),
    })
}
