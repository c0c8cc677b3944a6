//! In-memory backend double that records every call.

use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use ams_common::models::{Role, RoleId, RolePayload};
use ams_common::permissions::PermissionMap;
use ams_sdk::{Result, RoleBackend, SdkError};
use async_trait::async_trait;
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    List,
    Create(RolePayload),
    Update(RoleId, RolePayload),
    Delete(RoleId),
}

#[derive(Default)]
pub(crate) struct FakeBackend {
    roles: Mutex<Vec<Role>>,
    calls: Mutex<Vec<Call>>,
    fail_next: Mutex<Option<(u16, Option<String>)>>,
    fail_lists: AtomicBool,
    next_id: AtomicU64,
    list_hold: Mutex<Option<Arc<Notify>>>,
}

impl FakeBackend {
    pub fn with_roles(roles: Vec<Role>) -> Self {
        let backend = Self::default();
        *backend.roles.lock().unwrap() = roles;
        backend.next_id.store(100, Ordering::SeqCst);
        backend
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls other than list refreshes.
    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(|c| *c != Call::List).collect()
    }

    pub fn fail_next(&self, status: u16, message: Option<&str>) {
        *self.fail_next.lock().unwrap() = Some((status, message.map(str::to_owned)));
    }

    pub fn fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    /// Park the next list request after it has read the roles, until the
    /// returned handle is notified.
    pub fn hold_next_list(&self) -> Arc<Notify> {
        let release = Arc::new(Notify::new());
        *self.list_hold.lock().unwrap() = Some(Arc::clone(&release));
        release
    }

    pub fn insert(&self, role: Role) {
        self.roles.lock().unwrap().push(role);
    }

    fn record(&self, call: Call) -> Result<()> {
        let is_list = call == Call::List;
        self.calls.lock().unwrap().push(call);
        if is_list && self.fail_lists.load(Ordering::SeqCst) {
            return Err(SdkError::Api { status: 500, message: Some("database offline".into()) });
        }
        match self.fail_next.lock().unwrap().take() {
            Some((status, message)) => Err(SdkError::Api { status, message }),
            None => Ok(()),
        }
    }
}

pub(crate) fn role(id: &str, name: &str, grants: &[(&str, bool)]) -> Role {
    Role::new(id, name, grants.iter().copied().collect::<PermissionMap>())
}

#[async_trait]
impl RoleBackend for FakeBackend {
    async fn list_roles(&self) -> Result<Vec<Role>> {
        self.record(Call::List)?;
        let roles = self.roles.lock().unwrap().clone();
        let hold = self.list_hold.lock().unwrap().take();
        if let Some(release) = hold {
            release.notified().await;
        }
        Ok(roles)
    }

    async fn create_role(&self, payload: &RolePayload) -> Result<Option<Role>> {
        self.record(Call::Create(payload.clone()))?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        let created = Role::new(id, payload.role.clone(), payload.permissions.clone());
        self.roles.lock().unwrap().push(created.clone());
        Ok(Some(created))
    }

    async fn update_role(&self, id: &RoleId, payload: &RolePayload) -> Result<Option<Role>> {
        self.record(Call::Update(id.clone(), payload.clone()))?;
        let mut roles = self.roles.lock().unwrap();
        let existing = roles
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or(SdkError::Api { status: 404, message: Some("Role not found".into()) })?;
        existing.name = payload.role.clone();
        existing.permissions = payload.permissions.clone();
        Ok(Some(existing.clone()))
    }

    async fn delete_role(&self, id: &RoleId) -> Result<()> {
        self.record(Call::Delete(id.clone()))?;
        self.roles.lock().unwrap().retain(|r| &r.id != id);
        Ok(())
    }
}
