//! Application state management

use crate::api::types::User;
use crate::api::ApiClient;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::storage::LocalStorage;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Storage key holding the logged-in user
pub const USER_STORAGE_KEY: &str = "stock_ai_user";

/// Logged-in user, persisted as JSON under [`USER_STORAGE_KEY`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticated_at: Option<DateTime<Utc>>,
}

impl From<User> for UserSession {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            authenticated_at: Some(Utc::now()),
        }
    }
}

/// Current user session, mirrored to durable storage
pub struct SessionManager {
    current: RwLock<Option<UserSession>>,
    storage: LocalStorage,
}

impl SessionManager {
    /// Create an empty (logged-out) manager; call [`Self::rehydrate`] to restore
    pub fn new(storage: LocalStorage) -> Self {
        Self {
            current: RwLock::new(None),
            storage,
        }
    }

    /// Restore the session saved by a previous run
    ///
    /// Unreadable or corrupt records are discarded and treated as logged out.
    pub fn rehydrate(&self) -> Option<UserSession> {
        let restored = match self.storage.get_item(USER_STORAGE_KEY) {
            Ok(Some(text)) => match serde_json::from_str::<UserSession>(&text) {
                Ok(session) => Some(session),
                Err(e) => {
                    tracing::warn!("Discarding corrupt stored session: {}", e);
                    if let Err(e) = self.storage.remove_item(USER_STORAGE_KEY) {
                        tracing::warn!("Failed to remove stored session: {}", e);
                    }
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to read stored session: {}", e);
                None
            }
        };

        if let Some(session) = &restored {
            tracing::info!("Restored session for user {}", session.id);
        }

        *self.current.write() = restored.clone();
        restored
    }

    /// Record a successful login in memory and in storage
    pub fn establish(&self, session: UserSession) -> Result<()> {
        let text = serde_json::to_string(&session)?;
        self.storage.set_item(USER_STORAGE_KEY, &text)?;
        *self.current.write() = Some(session);
        Ok(())
    }

    /// Forget the session in storage and in memory
    ///
    /// The in-memory session is kept when the stored copy cannot be removed.
    pub fn clear(&self) -> Result<()> {
        self.storage.remove_item(USER_STORAGE_KEY)?;
        *self.current.write() = None;
        Ok(())
    }

    pub fn current(&self) -> Option<UserSession> {
        self.current.read().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.read().is_some()
    }

    pub fn user_id(&self) -> Option<String> {
        self.current.read().as_ref().map(|s| s.id.clone())
    }

    /// Current session, or an auth error asking the user to log in
    pub fn require_auth(&self) -> Result<UserSession> {
        self.current()
            .ok_or_else(|| AppError::Auth("Please login or register to continue".to_string()))
    }
}

/// Shared handles passed to every view
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub api: Arc<ApiClient>,
    pub session: Arc<SessionManager>,
}

impl AppContext {
    /// Build the client and session manager for `config`
    pub fn new(config: Config) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir)?;
        tracing::info!("Data directory: {:?}", config.data_dir);

        let api = Arc::new(ApiClient::new(&config)?);
        let session = Arc::new(SessionManager::new(LocalStorage::new(config.storage_dir())));

        Ok(Self {
            config: Arc::new(config),
            api,
            session,
        })
    }
}
