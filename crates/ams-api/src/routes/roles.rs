//! Role routes — list, create, update, delete.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use ams_common::{
    config::LimitsConfig,
    error::{AmsError, AmsResult},
    models::{ApiMessage, Role, RoleId, RoleList, RolePayload},
    validation::{is_blank_name, validate_request},
};
use std::sync::Arc;

use crate::AppState;

/// Role routes, mounted under `/api`.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/role/all", get(list_roles))
        .route("/role/create", post(create_role))
        .route("/role/{id}", put(update_role).delete(delete_role))
}

/// Validate a create/update body and return the trimmed name.
fn checked_name(body: &RolePayload, limits: &LimitsConfig) -> AmsResult<String> {
    validate_request(body)?;
    if is_blank_name(&body.role) {
        return Err(AmsError::Validation {
            message: "Role name cannot be empty or whitespace only".into(),
        });
    }
    let name = body.role.trim();
    if name.chars().count() > limits.max_role_name_length as usize {
        return Err(AmsError::Validation {
            message: format!(
                "Role name must be at most {} characters",
                limits.max_role_name_length
            ),
        });
    }
    Ok(name.to_string())
}

/// GET /api/role/all — every role, in creation order.
async fn list_roles(State(state): State<Arc<AppState>>) -> Json<RoleList> {
    Json(RoleList::Wrapped {
        roles: state.roles.list().await,
    })
}

/// POST /api/role/create — create a role.
async fn create_role(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RolePayload>,
) -> AmsResult<(StatusCode, Json<Role>)> {
    let name = checked_name(&body, &state.limits)?;
    let role = state
        .roles
        .create(&name, body.permissions, state.limits.max_roles as usize)
        .await?;
    Ok((StatusCode::CREATED, Json(role)))
}

/// PUT /api/role/{id} — replace a role's name and permissions.
async fn update_role(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<RolePayload>,
) -> AmsResult<Json<Role>> {
    let name = checked_name(&body, &state.limits)?;
    let role = state
        .roles
        .update(&RoleId::new(id), &name, body.permissions)
        .await?;
    Ok(Json(role))
}

/// DELETE /api/role/{id} — remove a role.
async fn delete_role(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AmsResult<Json<ApiMessage>> {
    state.roles.delete(&RoleId::new(id)).await?;
    Ok(Json(ApiMessage {
        message: "Role deleted".into(),
    }))
}
