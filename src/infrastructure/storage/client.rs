//! Storage client session
//!
//! Holds the storage root, the application namespace, and the identity the
//! client signed in with. Constructed once at startup and handed to the
//! artifact store.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::info;
use uuid::Uuid;

use crate::application::ports::StorageError;

/// How the client authenticates
#[derive(Clone)]
pub enum Credentials {
    /// Opaque bearer token supplied by the host application
    Token(String),
    /// No credentials; a fresh anonymous identity is minted
    Anonymous,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(_) => f.write_str("Token(<redacted>)"),
            Self::Anonymous => f.write_str("Anonymous"),
        }
    }
}

/// Signed-in storage session
#[derive(Debug, Clone)]
pub struct StorageClient {
    root: PathBuf,
    app_id: String,
    uid: String,
    authenticated: bool,
}

impl StorageClient {
    /// Sign in against the storage rooted at `root`.
    ///
    /// Both credential kinds get a generated uid; a token only marks the
    /// session as authenticated.
    pub fn connect(
        root: impl Into<PathBuf>,
        app_id: impl Into<String>,
        credentials: Credentials,
    ) -> Result<Self, StorageError> {
        let app_id = app_id.into();
        if app_id.trim().is_empty() {
            return Err(StorageError::NotInitialized("app id is empty".into()));
        }
        if !is_path_segment(&app_id) {
            return Err(StorageError::NotInitialized(format!(
                "app id is not a valid path segment: {:?}",
                app_id
            )));
        }

        let authenticated = match &credentials {
            Credentials::Token(token) if token.trim().is_empty() => {
                return Err(StorageError::NotInitialized("auth token is empty".into()));
            }
            Credentials::Token(_) => true,
            Credentials::Anonymous => false,
        };

        let client = Self {
            root: root.into(),
            app_id,
            uid: Uuid::new_v4().to_string(),
            authenticated,
        };
        info!(
            uid = %client.uid,
            authenticated = client.authenticated,
            "storage client signed in"
        );
        Ok(client)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Identity assigned at sign-in
    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Directory holding a user's recordings
    pub fn recordings_dir(&self, user_id: &str) -> Result<PathBuf, StorageError> {
        if !is_path_segment(user_id) {
            return Err(StorageError::InvalidUserId(user_id.to_string()));
        }
        Ok(self
            .root
            .join("artifacts")
            .join(&self.app_id)
            .join("users")
            .join(user_id)
            .join("audio_recordings"))
    }
}

/// Non-empty, no separators, not a dot segment
fn is_path_segment(s: &str) -> bool {
    !s.is_empty() && s != "." && s != ".." && !s.contains(['/', '\\']) && !s.contains('\0')
}
