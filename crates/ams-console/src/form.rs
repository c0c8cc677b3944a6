//! Role form controller — owns the draft while a role is being added or edited.
//!
//! ```text
//! List --start_create/start_edit--> Form --submit ok--> List
//!                                   Form --submit err--> Form (draft kept)
//!                                   Form --cancel-----> List
//! ```
//!
//! The draft is only ever changed through the named operations below, so the
//! view/edit pairing holds after every call.

use std::sync::Arc;

use ams_common::models::{Role, RoleId};
use ams_common::permissions::{self, Module, PermissionKind, PermissionMap};
use ams_sdk::RoleBackend;
use tracing::{debug, info, warn};

use crate::error::ConsoleError;
use crate::store::{LoadOutcome, RoleStore};
use crate::validator::validate;

/// Uncommitted copy of a role.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftRole {
    pub name: String,
    pub permissions: PermissionMap,
}

impl DraftRole {
    /// Empty name, every permission off.
    pub fn blank() -> Self {
        Self {
            name: String::new(),
            permissions: PermissionMap::blank(),
        }
    }

    /// Copy of `role` with every known permission key present.
    pub fn from_role(role: &Role) -> Self {
        Self {
            name: role.name.clone(),
            permissions: role.permissions.clone().with_defaults(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(RoleId),
}

impl FormMode {
    pub fn editing_id(&self) -> Option<&RoleId> {
        match self {
            FormMode::Create => None,
            FormMode::Edit(id) => Some(id),
        }
    }
}

/// Which screen the role page is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    Form,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitAction {
    Created,
    Updated(RoleId),
}

/// What a successful submit did.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub action: SubmitAction,
    /// The saved role, when the backend echoed it back.
    pub role: Option<Role>,
    /// The list refresh that followed the write.
    pub refresh: Result<LoadOutcome, ConsoleError>,
}

#[derive(Debug, Clone)]
struct FormSession {
    mode: FormMode,
    draft: DraftRole,
    initial: DraftRole,
}

pub struct RoleFormController {
    backend: Arc<dyn RoleBackend>,
    store: RoleStore,
    session: Option<FormSession>,
}

impl RoleFormController {
    pub fn new(store: RoleStore) -> Self {
        Self {
            backend: store.backend(),
            store,
            session: None,
        }
    }

    pub fn view(&self) -> View {
        if self.session.is_some() { View::Form } else { View::List }
    }

    pub fn mode(&self) -> Option<&FormMode> {
        self.session.as_ref().map(|s| &s.mode)
    }

    pub fn draft(&self) -> Option<&DraftRole> {
        self.session.as_ref().map(|s| &s.draft)
    }

    /// Whether the draft differs from what the form opened with.
    pub fn is_dirty(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.draft != s.initial)
    }

    /// Open a blank form for a new role.
    pub fn start_create(&mut self) {
        debug!("opening role form (create)");
        let draft = DraftRole::blank();
        self.session = Some(FormSession {
            mode: FormMode::Create,
            initial: draft.clone(),
            draft,
        });
    }

    /// Open the form pre-filled from `role`.
    pub fn start_edit(&mut self, role: &Role) {
        debug!(role_id = %role.id, "opening role form (edit)");
        let draft = DraftRole::from_role(role);
        self.session = Some(FormSession {
            mode: FormMode::Edit(role.id.clone()),
            initial: draft.clone(),
            draft,
        });
    }

    /// Replace the draft name. Returns `false` when no form is open.
    pub fn set_name(&mut self, name: impl Into<String>) -> bool {
        match self.session.as_mut() {
            Some(session) => {
                session.draft.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Flip one permission checkbox.
    ///
    /// Clearing a view flag clears the edit flag in the same update; setting an
    /// edit flag without view access is ignored. Returns whether the draft changed.
    pub fn toggle_permission(&mut self, module: Module, kind: PermissionKind, checked: bool) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let applied = session.draft.permissions.toggle(module, kind, checked);
        if !applied {
            debug!(%module, ?kind, checked, "permission toggle refused");
        }
        applied
    }

    /// [`permissions::is_edit_allowed`] against the current draft; `false`
    /// outside the form.
    pub fn is_edit_allowed(&self, module: Module) -> bool {
        self.draft()
            .is_some_and(|d| permissions::is_edit_allowed(&d.permissions, module))
    }

    /// Validate and send the draft.
    ///
    /// Validation failures never reach the network. A failed request keeps the
    /// form open with the draft untouched.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, ConsoleError> {
        let session = self.session.as_ref().ok_or(ConsoleError::NotEditing)?;
        let mode = session.mode.clone();
        let valid = validate(&session.draft, &self.store.roles(), mode.editing_id())?;
        let name = valid.name.clone();
        let payload = valid.into_payload();

        let (action, result) = match &mode {
            FormMode::Create => (SubmitAction::Created, self.backend.create_role(&payload).await),
            FormMode::Edit(id) => (
                SubmitAction::Updated(id.clone()),
                self.backend.update_role(id, &payload).await,
            ),
        };

        let role = match result {
            Ok(role) => role,
            Err(e) if e.is_duplicate() => {
                warn!(role = %name, error = %e, "backend rejected duplicate role name");
                return Err(ConsoleError::DuplicateName { name });
            }
            Err(e) => {
                warn!(role = %name, error = %e, "role save failed");
                return Err(ConsoleError::submit(&e));
            }
        };

        info!(role = %name, ?action, "role saved");
        self.session = None;
        let refresh = self.store.load().await;
        Ok(SubmitOutcome { action, role, refresh })
    }

    /// Drop the draft and return to the list without contacting the backend.
    pub fn cancel(&mut self) {
        if self.session.take().is_some() {
            debug!("role form cancelled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Call, FakeBackend, role};

    async fn controller_with(roles: Vec<Role>) -> (Arc<FakeBackend>, RoleStore, RoleFormController) {
        let backend = Arc::new(FakeBackend::with_roles(roles));
        let store = RoleStore::new(backend.clone());
        store.load().await.unwrap();
        let form = RoleFormController::new(store.clone());
        (backend, store, form)
    }

    #[tokio::test]
    async fn test_start_create_resets_draft() {
        let (_, _, mut form) = controller_with(vec![]).await;
        assert_eq!(form.view(), View::List);

        form.start_create();
        form.set_name("Temp");
        form.start_create();

        assert_eq!(form.view(), View::Form);
        assert_eq!(form.mode(), Some(&FormMode::Create));
        assert_eq!(form.draft(), Some(&DraftRole::blank()));
        assert!(!form.is_dirty());
    }

    #[tokio::test]
    async fn test_start_edit_fills_missing_keys() {
        let (_, _, mut form) = controller_with(vec![]).await;
        let manager = role("1", "Manager", &[("StaffView", true), ("Staff", true)]);
        form.start_edit(&manager);

        let draft = form.draft().unwrap();
        assert_eq!(form.mode(), Some(&FormMode::Edit(RoleId::from("1"))));
        assert_eq!(draft.name, "Manager");
        assert!(draft.permissions.get("Staff"));
        assert!(draft.permissions.contains_key("BranchView"));
        assert!(!draft.permissions.get("BranchView"));
    }

    #[tokio::test]
    async fn test_clearing_view_clears_edit_in_draft() {
        let (_, _, mut form) = controller_with(vec![]).await;
        form.start_edit(&role("1", "Manager", &[("StaffView", true), ("Staff", true)]));

        assert!(form.toggle_permission(Module::Staff, PermissionKind::View, false));
        let perms = &form.draft().unwrap().permissions;
        assert!(!perms.get("StaffView"));
        assert!(!perms.get("Staff"));
        assert!(form.is_dirty());
    }

    #[tokio::test]
    async fn test_edit_toggle_ignored_without_view() {
        let (_, _, mut form) = controller_with(vec![]).await;
        form.start_create();

        assert!(!form.is_edit_allowed(Module::Attendance));
        assert!(!form.toggle_permission(Module::Attendance, PermissionKind::Edit, true));
        assert!(!form.draft().unwrap().permissions.get("Attendance"));
        assert!(!form.is_dirty());

        form.toggle_permission(Module::Attendance, PermissionKind::View, true);
        assert!(form.is_edit_allowed(Module::Attendance));
        assert!(form.toggle_permission(Module::Attendance, PermissionKind::Edit, true));
    }

    #[tokio::test]
    async fn test_dashboard_edit_not_applicable() {
        let (_, _, mut form) = controller_with(vec![]).await;
        form.start_create();
        assert!(!form.is_edit_allowed(Module::Dashboard));

        form.toggle_permission(Module::Dashboard, PermissionKind::View, true);
        let draft = form.draft().unwrap();
        assert_eq!(
            form.is_edit_allowed(Module::Dashboard),
            permissions::is_edit_allowed(&draft.permissions, Module::Dashboard)
        );
        assert!(!Module::Dashboard.has_edit());
        assert!(!form.toggle_permission(Module::Dashboard, PermissionKind::Edit, true));
        assert_eq!(form.draft().unwrap().permissions.len(), PermissionMap::blank().len());
    }

    #[tokio::test]
    async fn test_mutations_ignored_in_list_view() {
        let (_, _, mut form) = controller_with(vec![]).await;
        assert!(!form.set_name("x"));
        assert!(!form.toggle_permission(Module::Branch, PermissionKind::View, true));
        assert_eq!(form.submit().await.unwrap_err(), ConsoleError::NotEditing);
    }

    #[tokio::test]
    async fn test_create_submits_and_refreshes() {
        let (backend, store, mut form) = controller_with(vec![]).await;
        form.start_create();
        form.set_name(" Auditor ");
        form.toggle_permission(Module::Branch, PermissionKind::View, true);

        let outcome = form.submit().await.unwrap();
        assert_eq!(outcome.action, SubmitAction::Created);
        assert_eq!(outcome.refresh, Ok(LoadOutcome::Applied { count: 1 }));
        assert_eq!(form.view(), View::List);

        let writes = backend.writes();
        let [Call::Create(payload)] = writes.as_slice() else {
            panic!("expected one create, got {writes:?}");
        };
        assert_eq!(payload.role, "Auditor");
        assert!(payload.permissions.get("BranchView"));
        assert!(payload.permissions.contains_key("Branch"));
        assert!(!payload.permissions.get("Branch"));
        assert_eq!(store.roles()[0].name, "Auditor");
        assert_eq!(backend.calls().last(), Some(&Call::List));
    }

    #[tokio::test]
    async fn test_validation_failure_makes_no_request() {
        let (backend, _, mut form) =
            controller_with(vec![role("1", "Manager", &[("Dashboard", true)])]).await;
        form.start_create();
        form.set_name("manager");

        let err = form.submit().await.unwrap_err();
        assert_eq!(err, ConsoleError::DuplicateName { name: "manager".into() });
        assert!(backend.writes().is_empty());
        assert_eq!(form.view(), View::Form);
        assert_eq!(form.draft().unwrap().name, "manager");

        form.set_name("   ");
        assert_eq!(form.submit().await.unwrap_err(), ConsoleError::EmptyName);
        assert!(backend.writes().is_empty());
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_draft() {
        let (backend, _, mut form) = controller_with(vec![]).await;
        form.start_create();
        form.set_name("Payroll Officer");
        form.toggle_permission(Module::Salary, PermissionKind::View, true);
        let before = form.draft().cloned();

        backend.fail_next(500, Some("Database unavailable"));
        let err = form.submit().await.unwrap_err();
        assert_eq!(err, ConsoleError::SubmitFailure { message: "Database unavailable".into() });
        assert_eq!(form.view(), View::Form);
        assert_eq!(form.draft().cloned(), before);

        backend.fail_next(502, None);
        let err = form.submit().await.unwrap_err();
        assert_eq!(err.to_string(), crate::error::GENERIC_SUBMIT_MESSAGE);
    }

    #[tokio::test]
    async fn test_backend_duplicate_maps_to_duplicate_name() {
        let (backend, _, mut form) = controller_with(vec![]).await;
        form.start_create();
        form.set_name("HR");

        backend.fail_next(409, Some("Role 'hr' already exists"));
        assert_eq!(
            form.submit().await.unwrap_err(),
            ConsoleError::DuplicateName { name: "HR".into() }
        );

        backend.fail_next(400, Some("E11000 duplicate key error"));
        assert_eq!(
            form.submit().await.unwrap_err(),
            ConsoleError::DuplicateName { name: "HR".into() }
        );
    }

    #[tokio::test]
    async fn test_unmodified_edit_round_trips_permissions() {
        let mut grants = PermissionMap::blank();
        grants.toggle(Module::Staff, PermissionKind::View, true);
        grants.toggle(Module::Staff, PermissionKind::Edit, true);
        grants.toggle(Module::Dashboard, PermissionKind::View, true);
        let manager = Role::new("1", "Manager", grants.clone());

        let (backend, _, mut form) = controller_with(vec![manager.clone()]).await;
        form.start_edit(&manager);
        let outcome = form.submit().await.unwrap();
        assert_eq!(outcome.action, SubmitAction::Updated(RoleId::from("1")));

        let writes = backend.writes();
        let [Call::Update(id, payload)] = writes.as_slice() else {
            panic!("expected one update, got {writes:?}");
        };
        assert_eq!(id, &RoleId::from("1"));
        assert_eq!(payload.role, "Manager");
        assert_eq!(payload.permissions, manager.permissions);
    }

    #[tokio::test]
    async fn test_unmodified_edit_of_partial_role_fills_missing_keys() {
        let manager = role("1", "Manager", &[("StaffView", true), ("Staff", true)]);
        let (backend, _, mut form) = controller_with(vec![manager.clone()]).await;

        form.start_edit(&manager);
        assert!(!form.is_dirty());
        form.submit().await.unwrap();

        let writes = backend.writes();
        let [Call::Update(_, payload)] = writes.as_slice() else {
            panic!("expected one update, got {writes:?}");
        };
        assert_eq!(payload.role, "Manager");
        assert_eq!(payload.permissions, manager.permissions.clone().with_defaults());
        assert!(payload.permissions.get("StaffView"));
        assert!(payload.permissions.get("Staff"));
        assert_eq!(
            payload.permissions.iter().filter(|(_, granted)| *granted).count(),
            2
        );
    }

    #[tokio::test]
    async fn test_refresh_failure_still_reports_saved() {
        let (backend, _, mut form) = controller_with(vec![]).await;
        form.start_create();
        form.set_name("Night Shift Lead");
        backend.fail_lists(true);

        let outcome = form.submit().await.unwrap();
        assert!(matches!(outcome.refresh, Err(ConsoleError::FetchFailure { .. })));
        assert_eq!(form.view(), View::List);
    }

    #[tokio::test]
    async fn test_cancel_discards_without_requests() {
        let (backend, _, mut form) = controller_with(vec![]).await;
        let calls_before = backend.calls().len();
        form.start_create();
        form.set_name("Draft");
        form.cancel();

        assert_eq!(form.view(), View::List);
        assert!(form.draft().is_none());
        assert_eq!(backend.calls().len(), calls_before);
    }
}
