//! Well-known role names and the acting-user context.
//!
//! Users themselves live outside this system; the service layer hands the
//! engine an already-authenticated [`Actor`].

use crate::error::CoreError;
use crate::types::DbId;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// The authenticated caller of an engine operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: DbId,
    pub role: String,
    /// Client address, forwarded to the operation log.
    pub ip_address: Option<String>,
}

impl Actor {
    pub fn new(user_id: DbId, role: impl Into<String>) -> Self {
        Self {
            user_id,
            role: role.into(),
            ip_address: None,
        }
    }

    pub fn with_ip(mut self, ip_address: Option<String>) -> Self {
        self.ip_address = ip_address;
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    /// Fail with `Forbidden` unless the actor is an administrator.
    pub fn require_admin(&self) -> Result<(), CoreError> {
        if !self.is_admin() {
            return Err(CoreError::Forbidden("Admin role required".to_string()));
        }
        Ok(())
    }
}
