//! The seam between console logic and the role API.

use ams_common::models::{Role, RoleId, RolePayload};
use async_trait::async_trait;

use crate::error::Result;
use crate::rest::RestClient;

/// Role CRUD operations the console depends on.
///
/// [`RestClient`] is the production implementation; tests substitute their own.
#[async_trait]
pub trait RoleBackend: Send + Sync {
    async fn list_roles(&self) -> Result<Vec<Role>>;

    async fn create_role(&self, payload: &RolePayload) -> Result<Option<Role>>;

    async fn update_role(&self, id: &RoleId, payload: &RolePayload) -> Result<Option<Role>>;

    async fn delete_role(&self, id: &RoleId) -> Result<()>;
}

#[async_trait]
impl RoleBackend for RestClient {
    async fn list_roles(&self) -> Result<Vec<Role>> {
        RestClient::list_roles(self).await
    }

    async fn create_role(&self, payload: &RolePayload) -> Result<Option<Role>> {
        RestClient::create_role(self, payload).await
    }

    async fn update_role(&self, id: &RoleId, payload: &RolePayload) -> Result<Option<Role>> {
        RestClient::update_role(self, id, payload).await
    }

    async fn delete_role(&self, id: &RoleId) -> Result<()> {
        RestClient::delete_role(self, id).await
    }
}
