//! # ams-console
//!
//! Role and permission management for the AMS admin console: a read cache of
//! backend roles, client-side validation, the add/edit form state machine and
//! the role table. Rendering is left to the host; everything here is plain
//! state driven through named operations.

pub mod console;
pub mod error;
pub mod form;
pub mod notify;
pub mod presenter;
pub mod store;
pub mod validator;

#[cfg(test)]
pub(crate) mod test_support;

pub use console::RoleConsole;
pub use error::ConsoleError;
pub use form::{DraftRole, FormMode, RoleFormController, SubmitAction, SubmitOutcome, View};
pub use notify::{Notice, NoticeLevel, NoticeLog, Notifier, TracingNotifier};
pub use presenter::{DeleteOutcome, RoleListPresenter, RoleRow};
pub use store::{LoadOutcome, RoleStore};
pub use validator::{ValidRole, validate};
