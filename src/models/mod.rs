//! Data models for the Codex platform.

mod customer;
mod document;
mod door;
mod iot;
mod user;
mod visitor;

pub use customer::{Customer, CustomerInput};
pub use document::{Document, NewDocument};
pub use door::{
    DoorAccessState, DoorAccessSyncRequest, DoorGroup, DoorGroupInput, DoorPanel, DoorPanelInput,
};
pub use iot::{IotDataRequest, IotDevice, IotDeviceInput, IotEvent, MqttMessage};
pub use user::{SignupRequest, User};
pub use visitor::{Visitor, VisitorInput};

use thiserror::Error;

/// A request body failed field validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} must not be blank")]
    Blank(&'static str),
}

/// Reject empty or whitespace-only values for a required field.
pub(crate) fn require_non_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Blank(field))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_non_blank() {
        assert!(require_non_blank("name", "Alice").is_ok());
        assert_eq!(
            require_non_blank("name", "   "),
            Err(ValidationError::Blank("name"))
        );
        assert_eq!(
            ValidationError::Blank("name").to_string(),
            "name must not be blank"
        );
    }
}
