//! User handlers.

use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{request::Parts, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{ValidPath, ValidatedJson};
use crate::api::AppState;
use crate::domain::{CreateUser, UpdateUser, UserResponse};
use crate::errors::{AppError, AppResult};

/// Account creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    /// User display name
    #[schema(example = "John Doe")]
    pub name: String,
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "johndoe@email.com")]
    pub email: String,
    /// User password (minimum 4 characters)
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    #[schema(example = "123123", min_length = 4)]
    pub password: String,
}

impl From<CreateUserRequest> for CreateUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: req.password,
        }
    }
}

/// Partial update request; absent fields are left untouched
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    /// New display name
    #[schema(example = "Jane Doe")]
    pub name: Option<String>,
    /// New email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "janedoe@email.com")]
    pub email: Option<String>,
    /// New password (minimum 4 characters)
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    #[schema(example = "321321", min_length = 4)]
    pub password: Option<String>,
}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: req.password,
        }
    }
}

/// `:id` path segment; only UUID v4 ids are accepted
pub struct UserId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ValidPath(id) = ValidPath::<Uuid>::from_request_parts(parts, state).await?;

        if id.get_version_num() != 4 {
            return Err(AppError::validation("path", "Invalid UUID v4"));
        }

        Ok(UserId(id))
    }
}

/// Envelope for the account listing
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserListResponse {
    pub data: Vec<UserResponse>,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route(
            "/:id",
            get(find_user).patch(update_user).delete(remove_user),
        )
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created"),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<StatusCode> {
    state.user_service.create_user(payload.into()).await?;
    Ok(StatusCode::CREATED)
}

/// List all accounts
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "All registered users", body = UserListResponse)
    )
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<UserListResponse>> {
    let data = state.user_service.list_users().await?;
    Ok(Json(UserListResponse { data }))
}

/// Get account by ID
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, description = "Malformed ID"),
        (status = 404, description = "User not found")
    )
)]
pub async fn find_user(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.find_user_by_id(id).await?;
    Ok(Json(user))
}

/// Update account fields
#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    UserId(id): UserId,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.update_user(id, payload.into()).await?;
    Ok(Json(user))
}

/// Delete an account
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "User removed"),
        (status = 400, description = "Malformed ID"),
        (status = 404, description = "User not found")
    )
)]
pub async fn remove_user(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> AppResult<StatusCode> {
    // Record vanished between lookup and delete
    if !state.user_service.remove_user(id).await? {
        return Err(AppError::UserNotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}
