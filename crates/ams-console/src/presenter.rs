//! Role list presenter — table rows, edit hand-off and confirmed deletes.

use std::sync::Arc;

use ams_common::models::{Role, RoleId};
use ams_sdk::RoleBackend;
use tracing::{debug, info, warn};

use crate::error::ConsoleError;
use crate::form::RoleFormController;
use crate::store::{LoadOutcome, RoleStore};

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRow {
    pub id: RoleId,
    pub name: String,
    /// Labels of every granted permission, flat.
    pub badges: Vec<String>,
}

impl From<&Role> for RoleRow {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id.clone(),
            name: role.name.clone(),
            badges: role.permissions.active_labels(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    /// The role was removed; `refresh` is the list reload that followed.
    Deleted {
        id: RoleId,
        refresh: Result<LoadOutcome, ConsoleError>,
    },
    /// Nothing was staged, so nothing was sent.
    NothingPending,
}

pub struct RoleListPresenter {
    backend: Arc<dyn RoleBackend>,
    store: RoleStore,
    pending_delete: Option<RoleId>,
}

impl RoleListPresenter {
    pub fn new(store: RoleStore) -> Self {
        Self {
            backend: store.backend(),
            store,
            pending_delete: None,
        }
    }

    /// Initial fetch when the page opens.
    pub async fn mount(&self) -> Result<LoadOutcome, ConsoleError> {
        self.store.load().await
    }

    pub fn rows(&self) -> Vec<RoleRow> {
        self.store.roles().iter().map(RoleRow::from).collect()
    }

    /// Open the edit form for a listed role. Returns `false` if the id is not listed.
    pub fn edit(&self, id: &RoleId, form: &mut RoleFormController) -> bool {
        match self.store.get(id) {
            Some(role) => {
                form.start_edit(&role);
                true
            }
            None => {
                debug!(role_id = %id, "edit requested for unknown role");
                false
            }
        }
    }

    /// First step of a delete: remember the target and wait for confirmation.
    pub fn request_delete(&mut self, id: RoleId) {
        debug!(role_id = %id, "delete awaiting confirmation");
        self.pending_delete = Some(id);
    }

    pub fn pending_delete(&self) -> Option<&RoleId> {
        self.pending_delete.as_ref()
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Second step: send the DELETE for the staged role, then refresh the list.
    ///
    /// On failure the store is left as it was.
    pub async fn confirm_delete(&mut self) -> Result<DeleteOutcome, ConsoleError> {
        let Some(id) = self.pending_delete.take() else {
            return Ok(DeleteOutcome::NothingPending);
        };
        if let Err(e) = self.backend.delete_role(&id).await {
            warn!(role_id = %id, error = %e, "role delete failed");
            return Err(ConsoleError::delete(&e));
        }
        info!(role_id = %id, "role deleted");
        let refresh = self.store.load().await;
        Ok(DeleteOutcome::Deleted { id, refresh })
    }
}
