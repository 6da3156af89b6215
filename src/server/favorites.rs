use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use log::info;

use crate::data::error::StorageError;
use crate::data::repository::Repository;
use crate::entity::helpers::{Favorite, FavoriteTarget, add_favorite, find_favorite};
use crate::entity::{EntityKind, favorite, people, planet, user};
use crate::server::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::server::extract::IdPath;
use crate::server::types::{FavoriteRequest, FavoriteResponse, MessageResponse};

pub(super) async fn add_planet_favorite(
    State(state): State<AppState>,
    IdPath(planet_id): IdPath,
    payload: Result<Json<FavoriteRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<FavoriteResponse>)> {
    let favorite = create(&state, FavoriteTarget::Planet(planet_id), payload).await?;
    Ok((StatusCode::CREATED, Json(favorite.into())))
}

pub(super) async fn add_person_favorite(
    State(state): State<AppState>,
    IdPath(people_id): IdPath,
    payload: Result<Json<FavoriteRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let favorite = create(&state, FavoriteTarget::Person(people_id), payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::with_id(
            "Person added to favorites",
            favorite.id,
        )),
    ))
}

pub(super) async fn remove_planet_favorite(
    State(state): State<AppState>,
    IdPath(planet_id): IdPath,
    payload: Result<Json<FavoriteRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    remove(&state, FavoriteTarget::Planet(planet_id), payload).await?;
    Ok(Json(MessageResponse::new("Favorite planet removed")))
}

pub(super) async fn remove_person_favorite(
    State(state): State<AppState>,
    IdPath(people_id): IdPath,
    payload: Result<Json<FavoriteRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    remove(&state, FavoriteTarget::Person(people_id), payload).await?;
    Ok(Json(MessageResponse::new("Favorite person removed")))
}

fn requested_user(payload: Result<Json<FavoriteRequest>, JsonRejection>) -> ApiResult<i32> {
    let Json(payload) = payload?;
    payload.user_id.ok_or(ApiError::MissingField("user_id"))
}

/// Both ends of the favorite must exist before it is touched.
async fn resolve(repo: &Repository, user_id: i32, target: FavoriteTarget) -> ApiResult<()> {
    if repo.get::<user::Entity>(user_id).await?.is_none() {
        return Err(ApiError::NotFound(EntityKind::User));
    }
    let target_exists = match target {
        FavoriteTarget::Planet(id) => repo.get::<planet::Entity>(id).await?.is_some(),
        FavoriteTarget::Person(id) => repo.get::<people::Entity>(id).await?.is_some(),
    };
    if !target_exists {
        return Err(ApiError::NotFound(target.kind()));
    }

    Ok(())
}

async fn create(
    state: &AppState,
    target: FavoriteTarget,
    payload: Result<Json<FavoriteRequest>, JsonRejection>,
) -> ApiResult<Favorite> {
    let user_id = requested_user(payload)?;
    let repo = state.database_connection.begin().await?;
    resolve(&repo, user_id, target).await?;

    if find_favorite(&repo, user_id, target).await?.is_some() {
        return Err(ApiError::AlreadyFavorited(target.kind()));
    }

    // A concurrent request can still win between the lookup and the insert;
    // the unique index turns that into the same error.
    let favorite = add_favorite(&repo, user_id, target)
        .await
        .map_err(|e| match e {
            StorageError::UniqueViolation(_) => ApiError::AlreadyFavorited(target.kind()),
            other => other.into(),
        })?;
    repo.commit().await?;

    info!(
        "User {user_id} favorited {} {}",
        target.kind(),
        target.id()
    );
    Ok(favorite)
}

async fn remove(
    state: &AppState,
    target: FavoriteTarget,
    payload: Result<Json<FavoriteRequest>, JsonRejection>,
) -> ApiResult<()> {
    let user_id = requested_user(payload)?;
    let repo = state.database_connection.begin().await?;
    resolve(&repo, user_id, target).await?;

    let existing = find_favorite(&repo, user_id, target)
        .await?
        .ok_or(ApiError::NotFound(EntityKind::Favorite))?;
    repo.delete::<favorite::Entity>(existing.id).await?;
    repo.commit().await?;

    info!(
        "User {user_id} removed {} {} from favorites",
        target.kind(),
        target.id()
    );
    Ok(())
}
