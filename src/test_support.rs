//! Fixtures shared by unit and HTTP tests.

use chrono::Utc;
use sea_orm::Set;
use tempfile::TempDir;

use crate::data::dbconnector::{CatalogConnection, SQLConnector};
use crate::data::repository::Repository;
use crate::entity::{people, planet, user};

/// A connected, initialized catalog backed by a SQLite file in a fresh temp
/// dir. Keep the `TempDir` alive for as long as the connector is used.
pub(crate) async fn catalog() -> (TempDir, SQLConnector) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("catalog.db").display()
    );
    let mut connector = SQLConnector::new(&url);
    connector.connect().await.unwrap();
    connector.initialize().await.unwrap();
    (dir, connector)
}

pub(crate) async fn seed_user(repo: &Repository, email: &str) -> user::Model {
    repo.insert(user::ActiveModel {
        email: Set(email.to_string()),
        password: Set("$argon2id$placeholder".to_string()),
        name: Set(email.split('@').next().unwrap_or(email).to_string()),
        subscription_date: Set(Utc::now()),
        is_active: Set(true),
        ..Default::default()
    })
    .await
    .unwrap()
}

pub(crate) async fn seed_planet(repo: &Repository, name: &str) -> planet::Model {
    repo.insert(planet::ActiveModel {
        name: Set(name.to_string()),
        diameter: Set(10465.0),
        climate: Set("arid".to_string()),
        population: Set(200_000),
        gravity: Set(1.0),
        rotation_period: Set(23.0),
        orbital_period: Set(304.0),
        terrain: Set("desert".to_string()),
        ..Default::default()
    })
    .await
    .unwrap()
}

pub(crate) async fn seed_person(repo: &Repository, name: &str) -> people::Model {
    repo.insert(people::ActiveModel {
        name: Set(name.to_string()),
        height: Set(150.0),
        weight: Set(49.0),
        hair_color: Set("brown".to_string()),
        skin_color: Set("light".to_string()),
        eye_color: Set("brown".to_string()),
        birth_day: Set("19BBY".to_string()),
        gender: Set("female".to_string()),
        species: Set("Human".to_string()),
        home_planet: Set("Alderaan".to_string()),
        ..Default::default()
    })
    .await
    .unwrap()
}
