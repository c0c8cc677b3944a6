//! Permission schema — which screens a role may see, and which it may change.
//!
//! Every console module has a "view" key (`BranchView`) and an "edit" key (`Branch`).
//! `Dashboard` is the only standalone key: it can be viewed but never edited.
//!
//! Invariant: an edit key may only be `true` while its view key is `true`.
//! [`PermissionMap::toggle`] enforces this on every mutation, and
//! [`PermissionMap::normalize`] repairs maps that arrive from elsewhere.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A console module that can be granted to a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Module {
    Dashboard,
    Branch,
    Staff,
    Attendance,
    Salary,
    Shift,
    Department,
    Holiday,
    Leave,
    Role,
}

impl Module {
    /// Every module in display order.
    pub const ALL: [Module; 10] = [
        Module::Dashboard,
        Module::Branch,
        Module::Staff,
        Module::Attendance,
        Module::Salary,
        Module::Shift,
        Module::Department,
        Module::Holiday,
        Module::Leave,
        Module::Role,
    ];

    /// Human-readable label shown in the permission matrix.
    pub fn label(self) -> &'static str {
        match self {
            Module::Dashboard => "Dashboard",
            Module::Branch => "Branch",
            Module::Staff => "Staff",
            Module::Attendance => "Attendance",
            Module::Salary => "Salary",
            Module::Shift => "Shift",
            Module::Department => "Department",
            Module::Holiday => "Holiday",
            Module::Leave => "Leave",
            Module::Role => "Role",
        }
    }

    /// Key granting read access to the module.
    pub fn view_key(self) -> &'static str {
        match self {
            Module::Dashboard => "Dashboard",
            Module::Branch => "BranchView",
            Module::Staff => "StaffView",
            Module::Attendance => "AttendanceView",
            Module::Salary => "SalaryView",
            Module::Shift => "ShiftView",
            Module::Department => "DepartmentView",
            Module::Holiday => "HolidayView",
            Module::Leave => "LeaveView",
            Module::Role => "RoleView",
        }
    }

    /// Key granting write access, or `None` for view-only modules.
    pub fn edit_key(self) -> Option<&'static str> {
        match self {
            Module::Dashboard => None,
            other => Some(other.label()),
        }
    }

    pub fn has_edit(self) -> bool {
        self.edit_key().is_some()
    }

    /// Resolve a wire key (`StaffView`, `Staff`, `Dashboard`) to its module and kind.
    pub fn from_key(key: &str) -> Option<(Module, PermissionKind)> {
        Module::ALL.iter().find_map(|&m| {
            if m.view_key() == key {
                Some((m, PermissionKind::View))
            } else if m.edit_key() == Some(key) {
                Some((m, PermissionKind::Edit))
            } else {
                None
            }
        })
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a module name is not part of the schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown permission module '{0}'")]
pub struct UnknownModule(pub String);

impl FromStr for Module {
    type Err = UnknownModule;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Module::ALL
            .iter()
            .copied()
            .find(|m| m.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownModule(s.to_string()))
    }
}

/// Which half of a view/edit pair a toggle targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionKind {
    View,
    Edit,
}

bitflags! {
    /// Effective access a permission map grants on a single module.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Access: u8 {
        const VIEW = 1 << 0;
        const EDIT = 1 << 1;
    }
}

/// Every known permission key, in schema order (view key before edit key).
pub fn all_keys() -> impl Iterator<Item = &'static str> {
    Module::ALL
        .into_iter()
        .flat_map(|m| std::iter::once(m.view_key()).chain(m.edit_key()))
}

/// Returns whether the edit half of `module` may currently be switched on.
///
/// This is the module's view flag. `Dashboard` has no edit half, so for it the
/// result is "not applicable": it mirrors the view flag, and
/// [`Module::has_edit`] tells callers there is no edit checkbox to enable.
pub fn is_edit_allowed(state: &PermissionMap, module: Module) -> bool {
    state.get(module.view_key())
}

/// Mapping from permission key to granted flag, serialized as a flat JSON object.
///
/// Keys the schema does not know about are carried through untouched so that an
/// edit never silently drops backend data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionMap(BTreeMap<String, bool>);

impl PermissionMap {
    /// Every known key, all `false`.
    pub fn blank() -> Self {
        Self(all_keys().map(|k| (k.to_string(), false)).collect())
    }

    /// Fill in any missing known key with `false`.
    pub fn with_defaults(mut self) -> Self {
        for key in all_keys() {
            self.0.entry(key.to_string()).or_insert(false);
        }
        self
    }

    /// Missing keys read as `false`.
    pub fn get(&self, key: &str) -> bool {
        self.0.get(key).copied().unwrap_or(false)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Derived access level for one module.
    pub fn access(&self, module: Module) -> Access {
        let mut access = Access::empty();
        if self.get(module.view_key()) {
            access |= Access::VIEW;
            if module.edit_key().is_some_and(|k| self.get(k)) {
                access |= Access::EDIT;
            }
        }
        access
    }

    /// Apply a single checkbox change, keeping the view/edit pairing consistent.
    ///
    /// - Clearing a view flag clears the matching edit flag in the same update.
    /// - Setting an edit flag is refused while the view flag is off.
    /// - Edit toggles on view-only modules are refused.
    ///
    /// Returns `true` if the change was applied.
    pub fn toggle(&mut self, module: Module, kind: PermissionKind, checked: bool) -> bool {
        match kind {
            PermissionKind::View => {
                self.0.insert(module.view_key().to_string(), checked);
                if !checked {
                    if let Some(edit) = module.edit_key() {
                        self.0.insert(edit.to_string(), false);
                    }
                }
                true
            }
            PermissionKind::Edit => {
                let Some(edit) = module.edit_key() else {
                    return false;
                };
                if checked && !is_edit_allowed(self, module) {
                    return false;
                }
                self.0.insert(edit.to_string(), checked);
                true
            }
        }
    }

    /// Force every edit flag whose view flag is off back to `false`.
    ///
    /// Returns the edit keys that were coerced.
    pub fn normalize(&mut self) -> Vec<&'static str> {
        let mut coerced = Vec::new();
        for module in Module::ALL {
            let Some(edit) = module.edit_key() else {
                continue;
            };
            if self.get(edit) && !self.get(module.view_key()) {
                self.0.insert(edit.to_string(), false);
                coerced.push(edit);
            }
        }
        coerced
    }

    /// Badge labels for every granted key: schema keys in schema order, then unknown keys.
    pub fn active_labels(&self) -> Vec<String> {
        let mut labels = Vec::new();
        for module in Module::ALL {
            match module.edit_key() {
                None => {
                    if self.get(module.view_key()) {
                        labels.push(module.label().to_string());
                    }
                }
                Some(edit) => {
                    if self.get(module.view_key()) {
                        labels.push(format!("{} view", module.label()));
                    }
                    if self.get(edit) {
                        labels.push(format!("{} edit", module.label()));
                    }
                }
            }
        }
        labels.extend(
            self.0
                .iter()
                .filter(|(k, v)| **v && Module::from_key(k).is_none())
                .map(|(k, _)| k.clone()),
        );
        labels
    }
}

impl From<BTreeMap<String, bool>> for PermissionMap {
    fn from(map: BTreeMap<String, bool>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for PermissionMap {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
