//! Client-side role validation.
//!
//! The duplicate check here only saves a round trip. The backend still decides
//! uniqueness, and a rejected write is mapped back to the same error.

use ams_common::models::{Role, RoleId, RolePayload};
use ams_common::permissions::PermissionMap;
use ams_common::validation::{is_blank_name, names_match};
use tracing::debug;

use crate::error::ConsoleError;
use crate::form::DraftRole;

/// A draft that passed validation: trimmed name, normalized permissions.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRole {
    pub name: String,
    pub permissions: PermissionMap,
}

impl ValidRole {
    pub fn into_payload(self) -> RolePayload {
        RolePayload {
            role: self.name,
            permissions: self.permissions,
        }
    }
}

/// Check a draft against the roles already known.
///
/// `editing_id` is the role being edited, which may keep its own name.
pub fn validate(
    draft: &DraftRole,
    existing: &[Role],
    editing_id: Option<&RoleId>,
) -> Result<ValidRole, ConsoleError> {
    if is_blank_name(&draft.name) {
        return Err(ConsoleError::EmptyName);
    }
    let name = draft.name.trim().to_string();

    let taken = existing
        .iter()
        .filter(|r| Some(&r.id) != editing_id)
        .any(|r| names_match(&r.name, &name));
    if taken {
        return Err(ConsoleError::DuplicateName { name });
    }

    let mut permissions = draft.permissions.clone();
    let coerced = permissions.normalize();
    if !coerced.is_empty() {
        debug!(?coerced, "cleared edit permissions without view access");
    }

    Ok(ValidRole { name, permissions })
}
