pub mod store;

pub use store::SessionStore;

use crate::api::User;
use serde::{Deserialize, Serialize};

/// Signed-in user context: bearer token plus the profile it belongs to.
///
/// Created when a token is imported, handed explicitly to every
/// authenticated call, and destroyed by [`SessionStore::clear`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// The viewing user; their own messages are hidden from the conversation list.
    pub fn user_id(&self) -> i64 {
        self.user.id
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field(
                "token",
                &if self.token.is_empty() {
                    "[empty]"
                } else {
                    "[REDACTED]"
                },
            )
            .field("user", &self.user)
            .finish()
    }
}
