use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::helpers::Favorite;
use crate::entity::{people, planet, user};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub subscription_date: DateTime<Utc>,
    pub is_active: bool,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        UserResponse {
            id: model.id,
            email: model.email,
            name: model.name,
            subscription_date: model.subscription_date,
            is_active: model.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    #[serde(rename = "Users")]
    pub users: Vec<UserResponse>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePlanetRequest {
    #[serde(alias = "planet_name")]
    pub name: String,
    pub diameter: f64,
    pub climate: String,
    pub population: i64,
    pub gravity: f64,
    pub rotation_period: f64,
    pub orbital_period: f64,
    pub terrain: String,
}

/// Partial update: absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePlanetRequest {
    #[serde(alias = "planet_name")]
    pub name: Option<String>,
    pub diameter: Option<f64>,
    pub climate: Option<String>,
    pub population: Option<i64>,
    pub gravity: Option<f64>,
    pub rotation_period: Option<f64>,
    pub orbital_period: Option<f64>,
    pub terrain: Option<String>,
}

impl UpdatePlanetRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.diameter.is_none()
            && self.climate.is_none()
            && self.population.is_none()
            && self.gravity.is_none()
            && self.rotation_period.is_none()
            && self.orbital_period.is_none()
            && self.terrain.is_none()
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct PlanetResponse {
    pub id: i32,
    pub name: String,
    pub diameter: f64,
    pub climate: String,
    pub population: i64,
    pub gravity: f64,
    pub rotation_period: f64,
    pub orbital_period: f64,
    pub terrain: String,
}

impl From<planet::Model> for PlanetResponse {
    fn from(model: planet::Model) -> Self {
        PlanetResponse {
            id: model.id,
            name: model.name,
            diameter: model.diameter,
            climate: model.climate,
            population: model.population,
            gravity: model.gravity,
            rotation_period: model.rotation_period,
            orbital_period: model.orbital_period,
            terrain: model.terrain,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlanetListResponse {
    #[serde(rename = "Planets")]
    pub planets: Vec<PlanetResponse>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePersonRequest {
    #[serde(alias = "name_people")]
    pub name: String,
    pub height: f64,
    pub weight: f64,
    pub hair_color: String,
    pub skin_color: String,
    pub eye_color: String,
    pub birth_day: String,
    pub gender: String,
    pub species: String,
    pub home_planet: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePersonRequest {
    #[serde(alias = "name_people")]
    pub name: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub hair_color: Option<String>,
    pub skin_color: Option<String>,
    pub eye_color: Option<String>,
    pub birth_day: Option<String>,
    pub gender: Option<String>,
    pub species: Option<String>,
    pub home_planet: Option<String>,
}

impl UpdatePersonRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.height.is_none()
            && self.weight.is_none()
            && self.hair_color.is_none()
            && self.skin_color.is_none()
            && self.eye_color.is_none()
            && self.birth_day.is_none()
            && self.gender.is_none()
            && self.species.is_none()
            && self.home_planet.is_none()
    }
}

#[derive(Debug, Serialize)]
pub struct PersonResponse {
    pub id: i32,
    pub name: String,
    pub height: f64,
    pub weight: f64,
    pub hair_color: String,
    pub skin_color: String,
    pub eye_color: String,
    pub birth_day: String,
    pub gender: String,
    pub species: String,
    pub home_planet: String,
}

impl From<people::Model> for PersonResponse {
    fn from(model: people::Model) -> Self {
        PersonResponse {
            id: model.id,
            name: model.name,
            height: model.height,
            weight: model.weight,
            hair_color: model.hair_color,
            skin_color: model.skin_color,
            eye_color: model.eye_color,
            birth_day: model.birth_day,
            gender: model.gender,
            species: model.species,
            home_planet: model.home_planet,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PersonListResponse {
    pub peoples: Vec<PersonResponse>,
}

/// Body of the favorite endpoints. `user_id` is optional here so a missing id
/// is reported as a missing field rather than a malformed body.
#[derive(Debug, Deserialize)]
pub struct FavoriteRequest {
    pub user_id: Option<i32>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct FavoriteResponse {
    pub id: i32,
    pub user_id: i32,
    pub people_id: Option<i32>,
    pub planet_id: Option<i32>,
}

impl From<Favorite> for FavoriteResponse {
    fn from(favorite: Favorite) -> Self {
        FavoriteResponse {
            id: favorite.id,
            user_id: favorite.user_id,
            people_id: favorite.people_id(),
            planet_id: favorite.planet_id(),
        }
    }
}

/// Confirmation body for writes that don't return the record.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
            id: None,
        }
    }

    pub fn with_id(message: impl Into<String>, id: i32) -> Self {
        MessageResponse {
            message: message.into(),
            id: Some(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::helpers::FavoriteTarget;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn user_serialization_hides_password() {
        let model = user::Model {
            id: 1,
            email: "luke@rebellion.org".to_string(),
            password: "$argon2id$secret".to_string(),
            name: "Luke".to_string(),
            subscription_date: Utc.with_ymd_and_hms(2024, 5, 4, 12, 0, 0).unwrap(),
            is_active: true,
        };
        let value = serde_json::to_value(UserResponse::from(model)).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 1,
                "email": "luke@rebellion.org",
                "name": "Luke",
                "subscription_date": "2024-05-04T12:00:00Z",
                "is_active": true
            })
        );
    }

    #[test]
    fn favorite_serializes_both_target_columns() {
        let favorite = Favorite {
            id: 2,
            user_id: 1,
            target: FavoriteTarget::Person(4),
        };
        let value = serde_json::to_value(FavoriteResponse::from(favorite)).unwrap();
        assert_eq!(
            value,
            json!({"id": 2, "user_id": 1, "people_id": 4, "planet_id": null})
        );
    }

    #[test]
    fn create_payloads_accept_legacy_names() {
        let planet: CreatePlanetRequest = serde_json::from_value(json!({
            "planet_name": "Dagobah",
            "diameter": 8900,
            "climate": "murky",
            "population": 0,
            "gravity": 0.9,
            "rotation_period": 23,
            "orbital_period": 341,
            "terrain": "swamp"
        }))
        .unwrap();
        assert_eq!(planet.name, "Dagobah");
        assert_eq!(planet.diameter, 8900.0);

        let update: UpdatePersonRequest =
            serde_json::from_value(json!({"name_people": "Ben"})).unwrap();
        assert_eq!(update.name.as_deref(), Some("Ben"));
        assert!(!update.is_empty());
    }

    #[test]
    fn unknown_fields_make_an_empty_update() {
        let update: UpdatePlanetRequest = serde_json::from_value(json!({"moons": 3})).unwrap();
        assert!(update.is_empty());
    }
}
