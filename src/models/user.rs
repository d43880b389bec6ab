use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{require_non_blank, ValidationError};

/// An account that can authenticate with HTTP Basic credentials.
///
/// The password hash lives only in the repository layer and is never serialised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
}

impl SignupRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("username", &self.username)?;
        require_non_blank("password", &self.password)
    }
}
