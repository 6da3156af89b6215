use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use log::{debug, info};
use sea_orm::{IntoActiveModel, Set};

use crate::entity::helpers::{FavoriteTarget, remove_favorites_of_target};
use crate::entity::{EntityKind, planet};
use crate::server::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::server::extract::IdPath;
use crate::server::types::{
    CreatePlanetRequest, MessageResponse, PlanetListResponse, PlanetResponse, UpdatePlanetRequest,
};

pub(super) async fn list_planets(
    State(state): State<AppState>,
) -> ApiResult<Json<PlanetListResponse>> {
    let repo = state.database_connection.begin().await?;
    let planets = repo.list_all::<planet::Entity>(planet::Column::Id).await?;

    // An empty catalog is reported as 404, not as an empty list.
    if planets.is_empty() {
        return Err(ApiError::EmptyCollection(EntityKind::Planet));
    }

    Ok(Json(PlanetListResponse {
        planets: planets.into_iter().map(PlanetResponse::from).collect(),
    }))
}

pub(super) async fn get_planet(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<PlanetResponse>> {
    let repo = state.database_connection.begin().await?;
    let planet = repo
        .get::<planet::Entity>(id)
        .await?
        .ok_or(ApiError::NotFound(EntityKind::Planet))?;

    debug!("Fetched planet {id}");
    Ok(Json(planet.into()))
}

pub(super) async fn create_planet(
    State(state): State<AppState>,
    payload: Result<Json<CreatePlanetRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let Json(payload) = payload?;

    let repo = state.database_connection.begin().await?;
    let planet = repo
        .insert(planet::ActiveModel {
            name: Set(payload.name),
            diameter: Set(payload.diameter),
            climate: Set(payload.climate),
            population: Set(payload.population),
            gravity: Set(payload.gravity),
            rotation_period: Set(payload.rotation_period),
            orbital_period: Set(payload.orbital_period),
            terrain: Set(payload.terrain),
            ..Default::default()
        })
        .await?;
    repo.commit().await?;

    info!("Created planet {} ({})", planet.id, planet.name);
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::with_id("Planet created", planet.id)),
    ))
}

pub(super) async fn update_planet(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    payload: Result<Json<UpdatePlanetRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(payload) = payload?;
    if payload.is_empty() {
        return Err(ApiError::InvalidRequest(
            "no planet fields to update".to_string(),
        ));
    }

    let repo = state.database_connection.begin().await?;
    let mut planet = repo
        .get::<planet::Entity>(id)
        .await?
        .ok_or(ApiError::NotFound(EntityKind::Planet))?
        .into_active_model();

    if let Some(name) = payload.name {
        planet.name = Set(name);
    }
    if let Some(diameter) = payload.diameter {
        planet.diameter = Set(diameter);
    }
    if let Some(climate) = payload.climate {
        planet.climate = Set(climate);
    }
    if let Some(population) = payload.population {
        planet.population = Set(population);
    }
    if let Some(gravity) = payload.gravity {
        planet.gravity = Set(gravity);
    }
    if let Some(rotation_period) = payload.rotation_period {
        planet.rotation_period = Set(rotation_period);
    }
    if let Some(orbital_period) = payload.orbital_period {
        planet.orbital_period = Set(orbital_period);
    }
    if let Some(terrain) = payload.terrain {
        planet.terrain = Set(terrain);
    }

    repo.update(planet).await?;
    repo.commit().await?;

    info!("Updated planet {id}");
    Ok(Json(MessageResponse::new("Planet updated")))
}

/// Deletes the planet along with every favorite pointing at it.
pub(super) async fn delete_planet(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<MessageResponse>> {
    let repo = state.database_connection.begin().await?;
    if repo.get::<planet::Entity>(id).await?.is_none() {
        return Err(ApiError::NotFound(EntityKind::Planet));
    }

    let removed = remove_favorites_of_target(&repo, FavoriteTarget::Planet(id)).await?;
    repo.delete::<planet::Entity>(id).await?;
    repo.commit().await?;

    info!("Deleted planet {id} and {removed} favorites");
    Ok(Json(MessageResponse::new("Planet deleted")))
}
