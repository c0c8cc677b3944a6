//! Role store — the console's read cache of backend roles.
//!
//! The backend is the source of truth; the store only mirrors the last list
//! response and is rebuilt after every write. Each `load()` takes a request
//! token when it is issued, and a response is applied only if no newer load has
//! already landed. Overlapping refreshes therefore settle on the latest request
//! rather than on whichever response happened to arrive last.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use ams_common::models::{Role, RoleId};
use ams_common::validation::names_match;
use ams_sdk::RoleBackend;
use tracing::{debug, warn};

use crate::error::ConsoleError;

/// Result of a successful list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The store now holds this many roles.
    Applied { count: usize },
    /// A newer load already replaced the store; this response was dropped.
    Stale,
}

#[derive(Debug, Default)]
struct StoreState {
    roles: Vec<Role>,
    applied_token: u64,
}

/// Cloneable handle to the shared role cache.
#[derive(Clone)]
pub struct RoleStore {
    backend: Arc<dyn RoleBackend>,
    state: Arc<RwLock<StoreState>>,
    next_token: Arc<AtomicU64>,
}

impl RoleStore {
    pub fn new(backend: Arc<dyn RoleBackend>) -> Self {
        Self {
            backend,
            state: Arc::new(RwLock::new(StoreState::default())),
            next_token: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Fetch the role list and replace the cached sequence.
    ///
    /// On failure the previous sequence is left intact.
    pub async fn load(&self) -> Result<LoadOutcome, ConsoleError> {
        let token = self.issue_token();
        debug!(token, "loading roles");
        match self.backend.list_roles().await {
            Ok(roles) => Ok(self.apply(token, roles)),
            Err(e) => {
                warn!(token, error = %e, "role list request failed");
                Err(ConsoleError::fetch(&e))
            }
        }
    }

    fn issue_token(&self) -> u64 {
        self.next_token.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn apply(&self, token: u64, roles: Vec<Role>) -> LoadOutcome {
        let mut state = self.write();
        if token <= state.applied_token {
            debug!(token, applied = state.applied_token, "discarding stale role list");
            return LoadOutcome::Stale;
        }
        state.applied_token = token;
        state.roles = roles;
        debug!(token, count = state.roles.len(), "role store replaced");
        LoadOutcome::Applied { count: state.roles.len() }
    }

    /// Whether any cached role carries `name` (ignoring case and padding),
    /// skipping the role `exclude_id`.
    pub fn contains(&self, name: &str, exclude_id: Option<&RoleId>) -> bool {
        self.read()
            .roles
            .iter()
            .filter(|r| Some(&r.id) != exclude_id)
            .any(|r| names_match(&r.name, name))
    }

    /// Snapshot of the cached roles in backend order.
    pub fn roles(&self) -> Vec<Role> {
        self.read().roles.clone()
    }

    pub fn get(&self, id: &RoleId) -> Option<Role> {
        self.read().roles.iter().find(|r| &r.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().roles.is_empty()
    }

    pub(crate) fn backend(&self) -> Arc<dyn RoleBackend> {
        Arc::clone(&self.backend)
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Call, FakeBackend, role};

    fn store_with(roles: Vec<Role>) -> (Arc<FakeBackend>, RoleStore) {
        let backend = Arc::new(FakeBackend::with_roles(roles));
        let store = RoleStore::new(backend.clone());
        (backend, store)
    }

    #[tokio::test]
    async fn test_load_replaces_sequence_in_backend_order() {
        let (backend, store) = store_with(vec![
            role("1", "Manager", &[("Dashboard", true)]),
            role("2", "Clerk", &[]),
        ]);
        assert!(store.is_empty());

        assert_eq!(store.load().await, Ok(LoadOutcome::Applied { count: 2 }));
        let names: Vec<_> = store.roles().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Manager", "Clerk"]);
        assert_eq!(backend.calls(), vec![Call::List]);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_roles() {
        let (backend, store) = store_with(vec![role("1", "Manager", &[])]);
        store.load().await.unwrap();

        backend.fail_lists(true);
        let err = store.load().await.unwrap_err();
        assert_eq!(err, ConsoleError::FetchFailure { message: "database offline".into() });
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&RoleId::from("1")).unwrap().name, "Manager");
    }

    #[tokio::test]
    async fn test_contains_is_case_insensitive_and_honours_exclusion() {
        let (_, store) = store_with(vec![role("1", "Manager", &[])]);
        store.load().await.unwrap();

        assert!(store.contains("manager", None));
        assert!(store.contains("  MANAGER ", None));
        assert!(!store.contains("manager", Some(&RoleId::from("1"))));
        assert!(store.contains("manager", Some(&RoleId::from("2"))));
        assert!(!store.contains("Auditor", None));
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let (_, store) = store_with(vec![]);
        let older = store.issue_token();
        let newer = store.issue_token();

        let fresh = vec![role("1", "Manager", &[]), role("2", "Auditor", &[])];
        assert_eq!(store.apply(newer, fresh), LoadOutcome::Applied { count: 2 });
        assert_eq!(store.apply(older, vec![role("1", "Manager", &[])]), LoadOutcome::Stale);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_overlapping_loads_settle_on_newest_request() {
        let (backend, store) = store_with(vec![role("1", "Manager", &[])]);
        let release = backend.hold_next_list();

        let first = tokio::spawn({
            let store = store.clone();
            async move { store.load().await }
        });
        while backend.calls().is_empty() {
            tokio::task::yield_now().await;
        }

        backend.insert(role("2", "Auditor", &[]));
        assert_eq!(store.load().await, Ok(LoadOutcome::Applied { count: 2 }));

        release.notify_one();
        assert_eq!(first.await.unwrap(), Ok(LoadOutcome::Stale));
        let names: Vec<_> = store.roles().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Manager", "Auditor"]);
    }

    #[test]
    fn test_clones_share_state() {
        let (_, store) = store_with(vec![]);
        let other = store.clone();
        let token = other.issue_token();
        other.apply(token, vec![role("9", "HR", &[])]);
        assert!(store.contains("hr", None));
    }
}
