//! Console error taxonomy.
//!
//! `EmptyName` and `DuplicateName` come from local validation and never reach
//! the network. The `*Failure` variants wrap a failed backend call; their
//! `message` is the backend's own text when it sent one, otherwise a generic line.

use ams_sdk::SdkError;
use thiserror::Error;

pub const GENERIC_FETCH_MESSAGE: &str = "Failed to load roles";
pub const GENERIC_SUBMIT_MESSAGE: &str = "Failed to save role";
pub const GENERIC_DELETE_MESSAGE: &str = "Failed to delete role";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleError {
    #[error("Role name is required")]
    EmptyName,

    #[error("A role named '{name}' already exists")]
    DuplicateName { name: String },

    #[error("{message}")]
    FetchFailure { message: String },

    #[error("{message}")]
    SubmitFailure { message: String },

    #[error("{message}")]
    DeleteFailure { message: String },

    /// Submit was called while no add/edit form is open.
    #[error("No role form is open")]
    NotEditing,
}

impl ConsoleError {
    pub fn fetch(err: &SdkError) -> Self {
        Self::FetchFailure {
            message: user_message(err, GENERIC_FETCH_MESSAGE),
        }
    }

    pub fn submit(err: &SdkError) -> Self {
        Self::SubmitFailure {
            message: user_message(err, GENERIC_SUBMIT_MESSAGE),
        }
    }

    pub fn delete(err: &SdkError) -> Self {
        Self::DeleteFailure {
            message: user_message(err, GENERIC_DELETE_MESSAGE),
        }
    }

    /// True for errors raised before any request was sent.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::EmptyName | Self::DuplicateName { .. } | Self::NotEditing)
    }
}

fn user_message(err: &SdkError, generic: &str) -> String {
    err.backend_message()
        .map(str::to_owned)
        .unwrap_or_else(|| generic.to_string())
}
