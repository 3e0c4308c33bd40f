//! Request-body validation. Collects every failing field into a map so a
//! single response can report all of them.

use std::collections::BTreeMap;

use super::error::ApiError;
use super::types::{
    ArtifactRequest, CreateUserRequest, PasswordChangeRequest, UpdateUserRequest, WizardRequest,
};

fn require(errors: &mut BTreeMap<String, String>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.insert(field.to_string(), format!("{field} is required."));
    }
}

fn finish(errors: BTreeMap<String, String>) -> Result<(), ApiError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::InvalidArguments(errors))
    }
}

pub fn validate_artifact(request: &ArtifactRequest) -> Result<(), ApiError> {
    let mut errors = BTreeMap::new();
    require(&mut errors, "name", &request.name);
    require(&mut errors, "description", &request.description);
    require(&mut errors, "imageUrl", &request.image_url);
    finish(errors)
}

pub fn validate_wizard(request: &WizardRequest) -> Result<(), ApiError> {
    let mut errors = BTreeMap::new();
    require(&mut errors, "name", &request.name);
    finish(errors)
}

pub fn validate_create_user(request: &CreateUserRequest) -> Result<(), ApiError> {
    let mut errors = BTreeMap::new();
    require(&mut errors, "username", &request.username);
    require(&mut errors, "password", &request.password);
    require(&mut errors, "roles", &request.roles);
    finish(errors)
}

pub fn validate_update_user(request: &UpdateUserRequest) -> Result<(), ApiError> {
    let mut errors = BTreeMap::new();
    require(&mut errors, "username", &request.username);
    require(&mut errors, "roles", &request.roles);
    finish(errors)
}

pub fn validate_password_change(request: &PasswordChangeRequest) -> Result<(), ApiError> {
    let mut errors = BTreeMap::new();
    require(&mut errors, "oldPassword", &request.old_password);
    require(&mut errors, "newPassword", &request.new_password);
    require(&mut errors, "confirmNewPassword", &request.confirm_new_password);
    finish(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_missing_fields_are_all_reported() {
        let request = ArtifactRequest {
            name: String::new(),
            description: "desc".to_string(),
            image_url: String::new(),
        };

        let err = validate_artifact(&request).unwrap_err();
        match err {
            ApiError::InvalidArguments(fields) => {
                assert_eq!(fields.len(), 2);
                assert!(fields.contains_key("name"));
                assert!(fields.contains_key("imageUrl"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn complete_artifact_passes() {
        let request = ArtifactRequest {
            name: "Deluminator".to_string(),
            description: "A device to remove light".to_string(),
            image_url: "imageUrl".to_string(),
        };
        assert!(validate_artifact(&request).is_ok());
    }

    #[test]
    fn whitespace_only_name_rejected() {
        let request = WizardRequest {
            name: "   ".to_string(),
        };
        assert!(validate_wizard(&request).is_err());
    }
}
