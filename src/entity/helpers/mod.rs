use sea_orm::{ColumnTrait, Condition, Set};

use crate::data::error::StorageError;
use crate::data::repository::Repository;
use crate::entity::{EntityKind, favorite};

/// What a favorite points at. A favorite always has exactly one target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FavoriteTarget {
    Planet(i32),
    Person(i32),
}

impl FavoriteTarget {
    pub fn kind(self) -> EntityKind {
        match self {
            FavoriteTarget::Planet(_) => EntityKind::Planet,
            FavoriteTarget::Person(_) => EntityKind::Person,
        }
    }

    pub fn id(self) -> i32 {
        match self {
            FavoriteTarget::Planet(id) | FavoriteTarget::Person(id) => id,
        }
    }

    /// Every favorite row pointing at this target, whoever owns it.
    fn referencing(self) -> Condition {
        match self {
            FavoriteTarget::Planet(id) => Condition::all().add(favorite::Column::PlanetId.eq(id)),
            FavoriteTarget::Person(id) => Condition::all().add(favorite::Column::PeopleId.eq(id)),
        }
    }

    fn owned_by(self, user_id: i32) -> Condition {
        self.referencing().add(favorite::Column::UserId.eq(user_id))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Favorite {
    pub id: i32,
    pub user_id: i32,
    pub target: FavoriteTarget,
}

impl Favorite {
    pub fn planet_id(&self) -> Option<i32> {
        match self.target {
            FavoriteTarget::Planet(id) => Some(id),
            FavoriteTarget::Person(_) => None,
        }
    }

    pub fn people_id(&self) -> Option<i32> {
        match self.target {
            FavoriteTarget::Person(id) => Some(id),
            FavoriteTarget::Planet(_) => None,
        }
    }
}

impl TryFrom<favorite::Model> for Favorite {
    type Error = StorageError;

    fn try_from(row: favorite::Model) -> Result<Self, Self::Error> {
        let target = match (row.planet_id, row.people_id) {
            (Some(planet_id), None) => FavoriteTarget::Planet(planet_id),
            (None, Some(people_id)) => FavoriteTarget::Person(people_id),
            _ => return Err(StorageError::MalformedFavorite { id: row.id }),
        };
        Ok(Favorite {
            id: row.id,
            user_id: row.user_id,
            target,
        })
    }
}

pub async fn favorites_of(repo: &Repository, user_id: i32) -> Result<Vec<Favorite>, StorageError> {
    repo.find_all::<favorite::Entity>(
        Condition::all().add(favorite::Column::UserId.eq(user_id)),
        favorite::Column::Id,
    )
    .await?
    .into_iter()
    .map(Favorite::try_from)
    .collect()
}

pub async fn find_favorite(
    repo: &Repository,
    user_id: i32,
    target: FavoriteTarget,
) -> Result<Option<Favorite>, StorageError> {
    repo.find::<favorite::Entity>(target.owned_by(user_id))
        .await?
        .map(Favorite::try_from)
        .transpose()
}

/// Inserts the favorite. Does not check that user or target exist, nor for an
/// existing identical favorite; the unique index rejects a duplicate with
/// `StorageError::UniqueViolation`.
pub async fn add_favorite(
    repo: &Repository,
    user_id: i32,
    target: FavoriteTarget,
) -> Result<Favorite, StorageError> {
    let row = favorite::ActiveModel {
        user_id: Set(user_id),
        planet_id: Set(match target {
            FavoriteTarget::Planet(id) => Some(id),
            FavoriteTarget::Person(_) => None,
        }),
        people_id: Set(match target {
            FavoriteTarget::Person(id) => Some(id),
            FavoriteTarget::Planet(_) => None,
        }),
        ..Default::default()
    };

    Favorite::try_from(repo.insert(row).await?)
}

pub async fn remove_favorites_of_target(
    repo: &Repository,
    target: FavoriteTarget,
) -> Result<u64, StorageError> {
    repo.delete_where::<favorite::Entity>(target.referencing()).await
}

pub async fn remove_favorites_of_user(repo: &Repository, user_id: i32) -> Result<u64, StorageError> {
    repo.delete_where::<favorite::Entity>(Condition::all().add(favorite::Column::UserId.eq(user_id)))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{catalog, seed_person, seed_planet, seed_user};

    #[test]
    fn rows_need_exactly_one_target() {
        let both = favorite::Model {
            id: 3,
            user_id: 1,
            people_id: Some(1),
            planet_id: Some(1),
        };
        assert!(matches!(
            Favorite::try_from(both),
            Err(StorageError::MalformedFavorite { id: 3 })
        ));

        let neither = favorite::Model {
            id: 4,
            user_id: 1,
            people_id: None,
            planet_id: None,
        };
        assert!(Favorite::try_from(neither).is_err());

        let planet = favorite::Model {
            id: 5,
            user_id: 1,
            people_id: None,
            planet_id: Some(9),
        };
        let fav = Favorite::try_from(planet).unwrap();
        assert_eq!(fav.target, FavoriteTarget::Planet(9));
        assert_eq!(fav.planet_id(), Some(9));
        assert_eq!(fav.people_id(), None);
    }

    #[tokio::test]
    async fn add_then_find_and_list() {
        let (_dir, connector) = catalog().await;
        let repo = connector.begin().await.unwrap();
        let user = seed_user(&repo, "luke@rebellion.org").await;
        let planet = seed_planet(&repo, "Tatooine").await;
        let person = seed_person(&repo, "Leia Organa").await;

        let on_planet = add_favorite(&repo, user.id, FavoriteTarget::Planet(planet.id))
            .await
            .unwrap();
        let on_person = add_favorite(&repo, user.id, FavoriteTarget::Person(person.id))
            .await
            .unwrap();

        let found = find_favorite(&repo, user.id, FavoriteTarget::Planet(planet.id))
            .await
            .unwrap();
        assert_eq!(found, Some(on_planet.clone()));

        let missing = find_favorite(&repo, user.id, FavoriteTarget::Person(planet.id + 100))
            .await
            .unwrap();
        assert!(missing.is_none());

        let all = favorites_of(&repo, user.id).await.unwrap();
        assert_eq!(all, vec![on_planet, on_person]);
    }

    #[tokio::test]
    async fn duplicate_insert_hits_unique_index() {
        let (_dir, connector) = catalog().await;
        let repo = connector.begin().await.unwrap();
        let user = seed_user(&repo, "han@falcon.net").await;
        let planet = seed_planet(&repo, "Corellia").await;

        add_favorite(&repo, user.id, FavoriteTarget::Planet(planet.id))
            .await
            .unwrap();
        let second = add_favorite(&repo, user.id, FavoriteTarget::Planet(planet.id)).await;
        assert!(matches!(second, Err(StorageError::UniqueViolation(_))));
    }

    #[tokio::test]
    async fn removing_a_target_removes_its_favorites_only() {
        let (_dir, connector) = catalog().await;
        let repo = connector.begin().await.unwrap();
        let luke = seed_user(&repo, "luke@rebellion.org").await;
        let leia = seed_user(&repo, "leia@rebellion.org").await;
        let hoth = seed_planet(&repo, "Hoth").await;
        let endor = seed_planet(&repo, "Endor").await;

        add_favorite(&repo, luke.id, FavoriteTarget::Planet(hoth.id))
            .await
            .unwrap();
        add_favorite(&repo, leia.id, FavoriteTarget::Planet(hoth.id))
            .await
            .unwrap();
        add_favorite(&repo, leia.id, FavoriteTarget::Planet(endor.id))
            .await
            .unwrap();

        let removed = remove_favorites_of_target(&repo, FavoriteTarget::Planet(hoth.id))
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert!(favorites_of(&repo, luke.id).await.unwrap().is_empty());
        assert_eq!(favorites_of(&repo, leia.id).await.unwrap().len(), 1);

        assert_eq!(remove_favorites_of_user(&repo, leia.id).await.unwrap(), 1);
    }
}
