//! Role repository — in-memory, insertion-ordered.
//!
//! Every write runs under one lock, so the uniqueness check and the insert
//! cannot interleave with another writer.

use std::sync::Arc;

use ams_common::error::{AmsError, AmsResult};
use ams_common::ids::generate_role_id;
use ams_common::models::{Role, RoleId};
use ams_common::permissions::PermissionMap;
use ams_common::validation::names_match;
use chrono::Utc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Default)]
pub struct RoleRepository {
    inner: Arc<RwLock<Vec<Role>>>,
}

fn already_exists(name: &str) -> AmsError {
    AmsError::AlreadyExists {
        resource: format!("Role '{name}'"),
    }
}

fn not_found(id: &RoleId) -> AmsError {
    AmsError::NotFound {
        resource: format!("Role {id}"),
    }
}

impl RoleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// All roles in insertion order.
    pub async fn list(&self) -> Vec<Role> {
        self.inner.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Create a role. `name` must already be trimmed.
    pub async fn create(
        &self,
        name: &str,
        mut permissions: PermissionMap,
        max_roles: usize,
    ) -> AmsResult<Role> {
        let mut roles = self.inner.write().await;
        if roles.len() >= max_roles {
            return Err(AmsError::LimitReached {
                message: format!("At most {max_roles} roles can exist"),
            });
        }
        if roles.iter().any(|r| names_match(&r.name, name)) {
            return Err(already_exists(name));
        }

        permissions.normalize();
        let now = Utc::now();
        let role = Role {
            id: generate_role_id(),
            name: name.to_string(),
            permissions,
            created_at: Some(now),
            updated_at: Some(now),
        };
        roles.push(role.clone());
        tracing::info!(role_id = %role.id, role = %role.name, "role created");
        Ok(role)
    }

    /// Replace a role's name and permissions.
    pub async fn update(
        &self,
        id: &RoleId,
        name: &str,
        mut permissions: PermissionMap,
    ) -> AmsResult<Role> {
        let mut roles = self.inner.write().await;
        if roles.iter().any(|r| &r.id != id && names_match(&r.name, name)) {
            return Err(already_exists(name));
        }
        let role = roles.iter_mut().find(|r| &r.id == id).ok_or_else(|| not_found(id))?;

        permissions.normalize();
        role.name = name.to_string();
        role.permissions = permissions;
        role.updated_at = Some(Utc::now());
        tracing::info!(role_id = %role.id, role = %role.name, "role updated");
        Ok(role.clone())
    }

    pub async fn delete(&self, id: &RoleId) -> AmsResult<()> {
        let mut roles = self.inner.write().await;
        let before = roles.len();
        roles.retain(|r| &r.id != id);
        if roles.len() == before {
            return Err(not_found(id));
        }
        tracing::info!(role_id = %id, "role deleted");
        Ok(())
    }
}
