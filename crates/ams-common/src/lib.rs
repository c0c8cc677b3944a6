//! # ams-common
//!
//! Shared types, configuration, error handling, and utilities used across all AMS crates.
//! The permission schema and role models live here so the console, the SDK and the
//! reference backend agree on one wire format.

pub mod config;
pub mod error;
pub mod ids;
pub mod models;
pub mod permissions;
pub mod validation;
