use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use log::info;
use sea_orm::{IntoActiveModel, Set};

use crate::entity::helpers::{FavoriteTarget, remove_favorites_of_target};
use crate::entity::{EntityKind, people};
use crate::server::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::server::extract::IdPath;
use crate::server::types::{
    CreatePersonRequest, MessageResponse, PersonListResponse, PersonResponse, UpdatePersonRequest,
};

pub(super) async fn list_people(
    State(state): State<AppState>,
) -> ApiResult<Json<PersonListResponse>> {
    let repo = state.database_connection.begin().await?;
    let people = repo.list_all::<people::Entity>(people::Column::Id).await?;

    if people.is_empty() {
        return Err(ApiError::EmptyCollection(EntityKind::Person));
    }

    Ok(Json(PersonListResponse {
        peoples: people.into_iter().map(PersonResponse::from).collect(),
    }))
}

pub(super) async fn get_person(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<PersonResponse>> {
    let repo = state.database_connection.begin().await?;
    let person = repo
        .get::<people::Entity>(id)
        .await?
        .ok_or(ApiError::NotFound(EntityKind::Person))?;

    Ok(Json(person.into()))
}

pub(super) async fn create_person(
    State(state): State<AppState>,
    payload: Result<Json<CreatePersonRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let Json(payload) = payload?;

    let repo = state.database_connection.begin().await?;
    let person = repo
        .insert(people::ActiveModel {
            name: Set(payload.name),
            height: Set(payload.height),
            weight: Set(payload.weight),
            hair_color: Set(payload.hair_color),
            skin_color: Set(payload.skin_color),
            eye_color: Set(payload.eye_color),
            birth_day: Set(payload.birth_day),
            gender: Set(payload.gender),
            species: Set(payload.species),
            home_planet: Set(payload.home_planet),
            ..Default::default()
        })
        .await?;
    repo.commit().await?;

    info!("Created person {} ({})", person.id, person.name);
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::with_id("Person created", person.id)),
    ))
}

pub(super) async fn update_person(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    payload: Result<Json<UpdatePersonRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(payload) = payload?;
    if payload.is_empty() {
        return Err(ApiError::InvalidRequest(
            "no person fields to update".to_string(),
        ));
    }

    let repo = state.database_connection.begin().await?;
    let mut person = repo
        .get::<people::Entity>(id)
        .await?
        .ok_or(ApiError::NotFound(EntityKind::Person))?
        .into_active_model();

    if let Some(name) = payload.name {
        person.name = Set(name);
    }
    if let Some(height) = payload.height {
        person.height = Set(height);
    }
    if let Some(weight) = payload.weight {
        person.weight = Set(weight);
    }
    if let Some(hair_color) = payload.hair_color {
        person.hair_color = Set(hair_color);
    }
    if let Some(skin_color) = payload.skin_color {
        person.skin_color = Set(skin_color);
    }
    if let Some(eye_color) = payload.eye_color {
        person.eye_color = Set(eye_color);
    }
    if let Some(birth_day) = payload.birth_day {
        person.birth_day = Set(birth_day);
    }
    if let Some(gender) = payload.gender {
        person.gender = Set(gender);
    }
    if let Some(species) = payload.species {
        person.species = Set(species);
    }
    if let Some(home_planet) = payload.home_planet {
        person.home_planet = Set(home_planet);
    }

    repo.update(person).await?;
    repo.commit().await?;

    info!("Updated person {id}");
    Ok(Json(MessageResponse::new("Person updated")))
}

pub(super) async fn delete_person(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<MessageResponse>> {
    let repo = state.database_connection.begin().await?;
    if repo.get::<people::Entity>(id).await?.is_none() {
        return Err(ApiError::NotFound(EntityKind::Person));
    }

    let removed = remove_favorites_of_target(&repo, FavoriteTarget::Person(id)).await?;
    repo.delete::<people::Entity>(id).await?;
    repo.commit().await?;

    info!("Deleted person {id} and {removed} favorites");
    Ok(Json(MessageResponse::new("Person deleted")))
}
