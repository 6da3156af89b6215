use log::{debug, info};
use sea_orm::sea_query::{Expr, Index, IndexCreateStatement, TableCreateStatement};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityName, Schema,
    TransactionTrait,
};

use crate::data::error::StorageError;
use crate::data::repository::Repository;
use crate::entity::{favorite, people, planet, user};

/// Rejects favorite rows that point at neither or both targets.
const FAVORITE_TARGET_CHECK: &str = "(people_id IS NULL) <> (planet_id IS NULL)";

pub(crate) trait CatalogConnection {
    async fn connect(&mut self) -> Result<(), anyhow::Error>;
    async fn check(&self) -> Result<(), anyhow::Error>;
    async fn initialize(&self) -> Result<(), anyhow::Error>;
    async fn close(&self) -> Result<(), anyhow::Error>;
}

pub struct SQLConnector {
    url: String,
    database_connection: Option<DatabaseConnection>,
}

impl SQLConnector {
    pub fn new(url: &str) -> Self {
        SQLConnector {
            url: url.to_string(),
            database_connection: None,
        }
    }

    fn connection(&self) -> Result<&DatabaseConnection, StorageError> {
        self.database_connection
            .as_ref()
            .ok_or(StorageError::NotConnected)
    }

    /// Opens a transaction-scoped repository for one request.
    pub async fn begin(&self) -> Result<Repository, StorageError> {
        let txn = self.connection()?.begin().await?;
        Ok(Repository::new(txn))
    }

    fn favorite_indexes() -> [IndexCreateStatement; 2] {
        [
            Index::create()
                .name("idx_favorite_user_planet")
                .table(favorite::Entity.table_ref())
                .col(favorite::Column::UserId)
                .col(favorite::Column::PlanetId)
                .unique()
                .if_not_exists()
                .to_owned(),
            Index::create()
                .name("idx_favorite_user_people")
                .table(favorite::Entity.table_ref())
                .col(favorite::Column::UserId)
                .col(favorite::Column::PeopleId)
                .unique()
                .if_not_exists()
                .to_owned(),
        ]
    }

    fn tables(schema: &Schema) -> Vec<TableCreateStatement> {
        let mut favorites = schema.create_table_from_entity(favorite::Entity);
        favorites.check(Expr::cust(FAVORITE_TARGET_CHECK));

        // favorite last: it references the other three
        let mut tables = vec![
            schema.create_table_from_entity(user::Entity),
            schema.create_table_from_entity(planet::Entity),
            schema.create_table_from_entity(people::Entity),
            favorites,
        ];
        for table in &mut tables {
            table.if_not_exists();
        }
        tables
    }
}

impl CatalogConnection for SQLConnector {
    async fn connect(&mut self) -> Result<(), anyhow::Error> {
        let mut options = ConnectOptions::new(self.url.clone());
        options
            .sqlx_logging(true)
            .sqlx_logging_level(log::LevelFilter::Debug);

        let db = Database::connect(options).await?;

        self.database_connection = Some(db);
        Ok(())
    }
    async fn check(&self) -> Result<(), anyhow::Error> {
        if let Some(ref db) = self.database_connection {
            db.ping().await?;
        }
        Ok(())
    }
    async fn initialize(&self) -> Result<(), anyhow::Error> {
        let db = self.connection()?;
        let backend = db.get_database_backend();
        let schema = Schema::new(backend);

        for table in Self::tables(&schema) {
            db.execute(backend.build(&table)).await?;
        }
        for index in Self::favorite_indexes() {
            db.execute(backend.build(&index)).await?;
        }
        debug!("Schema ensured on {backend:?}");
        info!("Database is initialized");
        Ok(())
    }
    async fn close(&self) -> Result<(), anyhow::Error> {
        if let Some(ref db) = self.database_connection {
            let db = db.clone();
            db.close().await?;
        }
        Ok(())
    }
}
