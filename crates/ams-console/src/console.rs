//! The role management page: store, list, form and notifications wired together.

use std::sync::Arc;

use ams_common::config::BackendConfig;
use ams_common::models::RoleId;
use ams_common::permissions::{Module, PermissionKind};
use ams_sdk::{RestClient, RoleBackend, SdkError};

use crate::error::ConsoleError;
use crate::form::{RoleFormController, SubmitAction, SubmitOutcome, View};
use crate::notify::{Notice, Notifier, TracingNotifier};
use crate::presenter::{DeleteOutcome, RoleListPresenter, RoleRow};
use crate::store::{LoadOutcome, RoleStore};

pub struct RoleConsole {
    store: RoleStore,
    form: RoleFormController,
    list: RoleListPresenter,
    notifier: Arc<dyn Notifier>,
}

impl RoleConsole {
    pub fn new(backend: Arc<dyn RoleBackend>, notifier: Arc<dyn Notifier>) -> Self {
        let store = RoleStore::new(backend);
        Self {
            form: RoleFormController::new(store.clone()),
            list: RoleListPresenter::new(store.clone()),
            store,
            notifier,
        }
    }

    /// Console talking to the configured REST backend, notices going to tracing.
    pub fn from_config(config: &BackendConfig) -> Result<Self, SdkError> {
        let rest = RestClient::new(config)?;
        Ok(Self::new(Arc::new(rest), Arc::new(TracingNotifier)))
    }

    pub fn store(&self) -> &RoleStore {
        &self.store
    }

    pub fn form(&self) -> &RoleFormController {
        &self.form
    }

    pub fn list(&self) -> &RoleListPresenter {
        &self.list
    }

    pub fn view(&self) -> View {
        self.form.view()
    }

    pub fn rows(&self) -> Vec<RoleRow> {
        self.list.rows()
    }

    /// Load the role list when the page opens.
    pub async fn mount(&self) -> Result<LoadOutcome, ConsoleError> {
        let result = self.list.mount().await;
        if let Err(e) = &result {
            self.notify_error(e);
        }
        result
    }

    pub fn start_create(&mut self) {
        self.form.start_create();
    }

    /// Open the edit form for a listed role.
    pub fn start_edit(&mut self, id: &RoleId) -> bool {
        self.list.edit(id, &mut self.form)
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> bool {
        self.form.set_name(name)
    }

    pub fn toggle_permission(&mut self, module: Module, kind: PermissionKind, checked: bool) -> bool {
        self.form.toggle_permission(module, kind, checked)
    }

    pub fn cancel(&mut self) {
        self.form.cancel();
    }

    pub async fn submit(&mut self) -> Result<SubmitOutcome, ConsoleError> {
        let result = self.form.submit().await;
        match &result {
            Ok(outcome) => {
                let message = match outcome.action {
                    SubmitAction::Created => "Role created successfully",
                    SubmitAction::Updated(_) => "Role updated successfully",
                };
                self.notifier.notify(Notice::success(message));
                if let Err(e) = &outcome.refresh {
                    self.notify_error(e);
                }
            }
            Err(e) => self.notify_error(e),
        }
        result
    }

    pub fn request_delete(&mut self, id: RoleId) {
        self.list.request_delete(id);
    }

    pub fn cancel_delete(&mut self) {
        self.list.cancel_delete();
    }

    pub async fn confirm_delete(&mut self) -> Result<DeleteOutcome, ConsoleError> {
        let result = self.list.confirm_delete().await;
        match &result {
            Ok(DeleteOutcome::Deleted { refresh, .. }) => {
                self.notifier.notify(Notice::success("Role deleted successfully"));
                if let Err(e) = refresh {
                    self.notify_error(e);
                }
            }
            Ok(DeleteOutcome::NothingPending) => {}
            Err(e) => self.notify_error(e),
        }
        result
    }

    fn notify_error(&self, err: &ConsoleError) {
        self.notifier.notify(Notice::error(err.to_string()));
    }
}
