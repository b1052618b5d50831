use uuid::Uuid;

use crate::ledger::LedgerError;
use crate::models::User;

/// Authenticated caller, resolved once per request by the session middleware
/// and handed to every ledger operation.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub user_id: Uuid,
    pub username: String,
    pub is_admin: bool,
}

impl RequestContext {
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            is_admin: user.is_admin,
        }
    }

    pub fn require_admin(&self) -> Result<(), LedgerError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(LedgerError::Forbidden)
        }
    }

    /// Callers may read their own records; admins may read anyone's.
    pub fn require_owner_or_admin(&self, user_id: Uuid) -> Result<(), LedgerError> {
        if self.is_admin || self.user_id == user_id {
            Ok(())
        } else {
            Err(LedgerError::Forbidden)
        }
    }
}
