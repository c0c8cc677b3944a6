//! Role model — a named bundle of console permissions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use validator::Validate;

use crate::permissions::PermissionMap;

/// Backend-assigned role identifier.
///
/// Opaque to the console: backends hand out either strings or integers, and the
/// value is only ever compared and echoed back in URL paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RoleId(String);

impl RoleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoleId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RoleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for RoleId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRoleId {
    Text(String),
    Integer(i64),
    Unsigned(u64),
}

impl<'de> Deserialize<'de> for RoleId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawRoleId::deserialize(deserializer)? {
            RawRoleId::Text(s) => Self(s),
            RawRoleId::Integer(n) => Self(n.to_string()),
            RawRoleId::Unsigned(n) => Self(n.to_string()),
        })
    }
}

/// A role as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    #[serde(alias = "_id")]
    pub id: RoleId,

    /// Display name, unique across roles ignoring case.
    #[serde(alias = "role")]
    pub name: String,

    #[serde(default)]
    pub permissions: PermissionMap,

    #[serde(default, skip_serializing_if = "Option::is_none", alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none", alias = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Role {
    pub fn new(id: impl Into<RoleId>, name: impl Into<String>, permissions: PermissionMap) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            permissions,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Body of create and update requests.
///
/// The upper bound on the name is a deployment limit, checked by the server
/// against the trimmed name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RolePayload {
    #[validate(length(min = 1, message = "Role name is required"))]
    pub role: String,

    #[serde(default)]
    pub permissions: PermissionMap,
}

/// List response: either a bare array or `{ "roles": [...] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleList {
    Bare(Vec<Role>),
    Wrapped { roles: Vec<Role> },
}

impl RoleList {
    pub fn into_roles(self) -> Vec<Role> {
        match self {
            RoleList::Bare(roles) | RoleList::Wrapped { roles } => roles,
        }
    }
}

/// `{ "message": ... }` acknowledgement or error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}
