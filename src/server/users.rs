use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::Utc;
use log::{debug, info};
use sea_orm::{ColumnTrait, Condition, Set};

use crate::data::error::StorageError;
use crate::data::password::hash_password;
use crate::entity::helpers::{favorites_of, remove_favorites_of_user};
use crate::entity::{EntityKind, user};
use crate::server::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::server::extract::IdPath;
use crate::server::types::{
    CreateUserRequest, FavoriteResponse, MessageResponse, UserListResponse, UserResponse,
};

pub(super) async fn list_users(State(state): State<AppState>) -> ApiResult<Json<UserListResponse>> {
    let repo = state.database_connection.begin().await?;
    let users = repo.list_all::<user::Entity>(user::Column::Id).await?;

    if users.is_empty() {
        return Err(ApiError::EmptyCollection(EntityKind::User));
    }

    Ok(Json(UserListResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
    }))
}

pub(super) async fn get_user(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<UserResponse>> {
    let repo = state.database_connection.begin().await?;
    let user = repo
        .get::<user::Entity>(id)
        .await?
        .ok_or(ApiError::NotFound(EntityKind::User))?;

    Ok(Json(user.into()))
}

pub(super) async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let Json(payload) = payload?;
    if payload.email.trim().is_empty() {
        return Err(ApiError::MissingField("email"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::MissingField("password"));
    }

    let repo = state.database_connection.begin().await?;
    let taken = repo
        .find::<user::Entity>(Condition::all().add(user::Column::Email.eq(payload.email.as_str())))
        .await?;
    if taken.is_some() {
        return Err(ApiError::EmailTaken);
    }

    let password = hash_password(&payload.password).map_err(|_| ApiError::PasswordHash)?;
    let user = repo
        .insert(user::ActiveModel {
            email: Set(payload.email),
            password: Set(password),
            name: Set(payload.name),
            subscription_date: Set(Utc::now()),
            is_active: Set(payload.is_active),
            ..Default::default()
        })
        .await
        .map_err(|e| match e {
            StorageError::UniqueViolation(_) => ApiError::EmailTaken,
            other => other.into(),
        })?;
    repo.commit().await?;

    info!("Created user {} ({})", user.id, user.email);
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Deletes the user and, in the same transaction, every favorite they own.
pub(super) async fn delete_user(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<MessageResponse>> {
    let repo = state.database_connection.begin().await?;
    if repo.get::<user::Entity>(id).await?.is_none() {
        return Err(ApiError::NotFound(EntityKind::User));
    }

    let removed = remove_favorites_of_user(&repo, id).await?;
    repo.delete::<user::Entity>(id).await?;
    repo.commit().await?;

    info!("Deleted user {id} and {removed} favorites");
    Ok(Json(MessageResponse::new("User deleted")))
}

pub(super) async fn list_user_favorites(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<Vec<FavoriteResponse>>> {
    let repo = state.database_connection.begin().await?;
    if repo.get::<user::Entity>(id).await?.is_none() {
        return Err(ApiError::NotFound(EntityKind::User));
    }

    let favorites = favorites_of(&repo, id).await?;
    debug!("User {id} has {} favorites", favorites.len());
    Ok(Json(
        favorites.into_iter().map(FavoriteResponse::from).collect(),
    ))
}
