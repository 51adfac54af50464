use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::debug;

use crate::client::error::ClientError;
use crate::users::dto::UserDto;

/// Key the logged-in user is persisted under.
pub const SESSION_KEY: &str = "currentUser";

pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<UserDto>, ClientError>;
    fn save(&self, user: &UserDto) -> Result<(), ClientError>;
    fn clear(&self) -> Result<(), ClientError>;
}

/// Keeps the session as `<dir>/currentUser.json`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{SESSION_KEY}.json"))
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<UserDto>, ClientError> {
        match std::fs::read_to_string(self.path()) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, user: &UserDto) -> Result<(), ClientError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path(), serde_json::to_vec(user)?)?;
        debug!(path = %self.path().display(), "session saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        match std::fs::remove_file(self.path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<UserDto>>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<UserDto>, ClientError> {
        Ok(self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, user: &UserDto) -> Result<(), ClientError> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(user.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn sample_user_dto(username: &str, email: &str) -> UserDto {
    UserDto {
        id: uuid::Uuid::new_v4(),
        username: username.into(),
        email: email.into(),
        age: Some(30),
        gender: Some(crate::health::Gender::Female),
        weight: Some(70.0),
        height: Some(175.0),
        preferred_cuisines: vec!["Sichuan".into()],
        preferred_flavors: vec![],
        preferred_ingredients: vec![],
        allergies: vec!["peanut".into()],
        dietary_restrictions: vec![],
        diseases: vec![],
        created_at: None,
    }
}
