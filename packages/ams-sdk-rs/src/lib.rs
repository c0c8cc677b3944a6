//! AMS role API client for Rust.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use ams_common::config::BackendConfig;
//! use ams_sdk::RestClient;
//!
//! #[tokio::main]
//! async fn main() -> ams_sdk::Result<()> {
//!     let rest = RestClient::new(&BackendConfig::new("http://localhost:8080"))?;
//!     for role in rest.list_roles().await? {
//!         println!("{} {:?}", role.name, role.permissions.active_labels());
//!     }
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod error;
pub mod rest;

pub use backend::RoleBackend;
pub use error::{Result, SdkError};
pub use rest::RestClient;
