//! Role ID generation for the reference backend.
//!
//! IDs are UUID v7: time-sortable and unique without coordination, so listing
//! roles by ID matches insertion order.

use uuid::Uuid;

use crate::models::RoleId;

/// Generate a new role ID.
pub fn generate_role_id() -> RoleId {
    RoleId::new(Uuid::now_v7().to_string())
}
