use crate::data::configuration::Configuration;
use crate::data::dbconnector::SQLConnector;
pub(crate) mod error;
mod extract;
mod favorites;
mod people;
mod planets;
pub(crate) mod types;
mod users;
use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use log::{debug, info};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub database_connection: Arc<SQLConnector>,
}

pub fn router(database_connection: Arc<SQLConnector>) -> Router {
    Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            get(users::get_user).delete(users::delete_user),
        )
        .route("/users/{id}/favorites", get(users::list_user_favorites))
        .route(
            "/planets",
            get(planets::list_planets).post(planets::create_planet),
        )
        .route(
            "/planets/{id}",
            get(planets::get_planet)
                .put(planets::update_planet)
                .delete(planets::delete_planet),
        )
        .route("/peoples", get(people::list_people))
        .route(
            "/peoples/{id}",
            get(people::get_person)
                .put(people::update_person)
                .delete(people::delete_person),
        )
        .route("/people", post(people::create_person))
        .route(
            "/favorite/planet/{id}",
            post(favorites::add_planet_favorite).delete(favorites::remove_planet_favorite),
        )
        .route(
            "/favorite/people/{id}",
            post(favorites::add_person_favorite).delete(favorites::remove_person_favorite),
        )
        .with_state(AppState {
            database_connection,
        })
}

/// Serves the API until Ctrl-C. Returns the connector so the caller can close
/// it once no handler holds a reference any more.
pub async fn run(
    config: &Configuration,
    database_connection: SQLConnector,
) -> Result<Arc<SQLConnector>, anyhow::Error> {
    let address = format!("{}:{}", config.server.host, config.server.port);
    debug!("Starting server on {address}");

    let shared_db = Arc::new(database_connection);
    let app = router(shared_db.clone());

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Listening on {address}");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(shared_db)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
    }
}
