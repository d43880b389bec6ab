//! Door-access models: panels, groups, and controller sync state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{require_non_blank, ValidationError};

/// A physical door panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorPanel {
    pub id: String,
    pub name: String,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DoorPanelInput {
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
}

impl DoorPanelInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("name", &self.name)
    }
}

/// A named access group (e.g. "Admins").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorGroup {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DoorGroupInput {
    pub name: String,
}

impl DoorGroupInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("name", &self.name)
    }
}

/// Last synchronisation with the local door-access controller.
///
/// Both fields are `None` until the first sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorAccessState {
    pub last_synced_with: Option<String>,
    pub synced_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DoorAccessSyncRequest {
    pub controller_url: String,
}

impl DoorAccessSyncRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("controller_url", &self.controller_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_request_validation() {
        // Controllers are often addressed without a scheme
        for addr in ["http://localhost", "192.168.1.50:8080", "controller.local"] {
            let ok = DoorAccessSyncRequest {
                controller_url: addr.to_string(),
            };
            assert!(ok.validate().is_ok(), "{addr} should be accepted");
        }

        let blank = DoorAccessSyncRequest {
            controller_url: " ".to_string(),
        };
        assert_eq!(
            blank.validate(),
            Err(ValidationError::Blank("controller_url"))
        );
    }

    #[test]
    fn test_panel_location_optional() {
        let input: DoorPanelInput = serde_json::from_str(r#"{"name": "Main Door"}"#).unwrap();
        assert_eq!(input.location, None);
        assert!(input.validate().is_ok());
    }
}
