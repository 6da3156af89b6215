use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, Condition, DatabaseTransaction, EntityTrait,
    IntoActiveModel, PrimaryKeyTrait, QueryFilter, QueryOrder,
};

use crate::data::error::StorageError;

/// Storage handle for a single request.
///
/// Every operation runs inside one database transaction. `commit` consumes the
/// repository; dropping it without committing rolls everything back, so an
/// early `?` return from a handler never leaves a partial write behind.
pub struct Repository {
    txn: DatabaseTransaction,
}

impl Repository {
    pub(crate) fn new(txn: DatabaseTransaction) -> Self {
        Repository { txn }
    }

    pub async fn get<E>(&self, id: i32) -> Result<Option<E::Model>, StorageError>
    where
        E: EntityTrait,
        <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
    {
        Ok(E::find_by_id(id).one(&self.txn).await?)
    }

    /// All rows of `E`, ordered by `order_by` ascending.
    pub async fn list_all<E>(&self, order_by: E::Column) -> Result<Vec<E::Model>, StorageError>
    where
        E: EntityTrait,
    {
        Ok(E::find().order_by_asc(order_by).all(&self.txn).await?)
    }

    /// First row of `E` matching `condition`.
    pub async fn find<E>(&self, condition: Condition) -> Result<Option<E::Model>, StorageError>
    where
        E: EntityTrait,
    {
        Ok(E::find().filter(condition).one(&self.txn).await?)
    }

    pub async fn find_all<E>(
        &self,
        condition: Condition,
        order_by: E::Column,
    ) -> Result<Vec<E::Model>, StorageError>
    where
        E: EntityTrait,
    {
        Ok(E::find()
            .filter(condition)
            .order_by_asc(order_by)
            .all(&self.txn)
            .await?)
    }

    /// Inserts a row and returns it with its assigned id.
    pub async fn insert<A>(
        &self,
        model: A,
    ) -> Result<<A::Entity as EntityTrait>::Model, StorageError>
    where
        A: ActiveModelTrait + ActiveModelBehavior + Send + 'static,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    {
        Ok(model.insert(&self.txn).await?)
    }

    /// Writes the fields set on `model`. Unchanged fields are left alone.
    pub async fn update<A>(
        &self,
        model: A,
    ) -> Result<<A::Entity as EntityTrait>::Model, StorageError>
    where
        A: ActiveModelTrait + ActiveModelBehavior + Send + 'static,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    {
        Ok(model.update(&self.txn).await?)
    }

    /// Deletes by primary key and returns the number of rows removed.
    pub async fn delete<E>(&self, id: i32) -> Result<u64, StorageError>
    where
        E: EntityTrait,
        <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
    {
        let result = E::delete_by_id(id).exec(&self.txn).await?;
        Ok(result.rows_affected)
    }

    pub async fn delete_where<E>(&self, condition: Condition) -> Result<u64, StorageError>
    where
        E: EntityTrait,
    {
        let result = E::delete_many().filter(condition).exec(&self.txn).await?;
        Ok(result.rows_affected)
    }

    pub async fn commit(self) -> Result<(), StorageError> {
        self.txn.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{ColumnTrait, IntoActiveModel, Set};

    use super::*;
    use crate::entity::planet;
    use crate::test_support::{catalog, seed_planet};

    #[tokio::test]
    async fn dropped_repository_rolls_back() {
        let (_dir, connector) = catalog().await;

        let repo = connector.begin().await.unwrap();
        seed_planet(&repo, "Alderaan").await;
        drop(repo);

        let repo = connector.begin().await.unwrap();
        let planets = repo
            .list_all::<planet::Entity>(planet::Column::Id)
            .await
            .unwrap();
        assert!(planets.is_empty());
    }

    #[tokio::test]
    async fn committed_writes_are_visible_to_the_next_request() {
        let (_dir, connector) = catalog().await;

        let repo = connector.begin().await.unwrap();
        let naboo = seed_planet(&repo, "Naboo").await;
        repo.commit().await.unwrap();

        let repo = connector.begin().await.unwrap();
        let fetched = repo.get::<planet::Entity>(naboo.id).await.unwrap();
        assert_eq!(fetched, Some(naboo));
    }

    #[tokio::test]
    async fn update_writes_only_set_fields() {
        let (_dir, connector) = catalog().await;
        let repo = connector.begin().await.unwrap();
        let tatooine = seed_planet(&repo, "Tatooine").await;

        let mut active = tatooine.clone().into_active_model();
        active.climate = Set("temperate".to_string());
        let updated = repo.update(active).await.unwrap();

        assert_eq!(updated.climate, "temperate");
        assert_eq!(updated.population, tatooine.population);
        assert_eq!(updated.name, tatooine.name);
    }

    #[tokio::test]
    async fn find_and_delete() {
        let (_dir, connector) = catalog().await;
        let repo = connector.begin().await.unwrap();
        seed_planet(&repo, "Hoth").await;
        let bespin = seed_planet(&repo, "Bespin").await;

        let found = repo
            .find::<planet::Entity>(Condition::all().add(planet::Column::Name.eq("Bespin")))
            .await
            .unwrap();
        assert_eq!(found.map(|p| p.id), Some(bespin.id));

        assert_eq!(repo.delete::<planet::Entity>(bespin.id).await.unwrap(), 1);
        assert_eq!(repo.delete::<planet::Entity>(bespin.id).await.unwrap(), 0);
        assert!(repo.get::<planet::Entity>(bespin.id).await.unwrap().is_none());

        let removed = repo
            .delete_where::<planet::Entity>(Condition::all().add(planet::Column::Name.eq("Hoth")))
            .await
            .unwrap();
        assert_eq!(removed, 1);
    }
}
