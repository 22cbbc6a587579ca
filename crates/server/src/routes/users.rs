use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Serialize;

use models::{RegisterUserInput, User};

use crate::errors::ApiError;
use crate::routes::ServerState;

#[derive(Debug, Serialize)]
pub struct UserSaved {
    pub success: bool,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct UserList {
    pub users: Vec<User>,
}

#[derive(Debug, Serialize)]
pub struct UserBody {
    pub user: User,
}

/// Register a user, or update name/phone/address when the email is already known.
#[utoipa::path(post, path = "/api/users", tag = "users", request_body = crate::openapi::RegisterUserDoc, responses((status = 200, description = "Created or updated", body = crate::openapi::UserSavedDoc), (status = 400, description = "email missing")))]
pub async fn register_user(
    State(state): State<ServerState>,
    payload: Result<Json<RegisterUserInput>, JsonRejection>,
) -> Result<Json<UserSaved>, ApiError> {
    let Json(input) = payload?;
    let (user, _) = state.users.register(input).await?;
    Ok(Json(UserSaved { success: true, user }))
}

#[utoipa::path(get, path = "/api/users", tag = "users", responses((status = 200, description = "All users", body = crate::openapi::UserListDoc)))]
pub async fn list_users(State(state): State<ServerState>) -> Json<UserList> {
    Json(UserList { users: state.users.list().await })
}

#[utoipa::path(get, path = "/api/users/{id}", tag = "users", params(("id" = String, Path, description = "User id")), responses((status = 200, description = "Found", body = crate::openapi::UserBodyDoc), (status = 404, description = "Unknown id")))]
pub async fn get_user(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<UserBody>, ApiError> {
    let user = state.users.get(&id).await?;
    Ok(Json(UserBody { user }))
}
