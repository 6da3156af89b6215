use crate::data::configuration::Configuration;
use crate::data::dbconnector::{CatalogConnection, SQLConnector};
use crate::server;
use anyhow::Context;
use clap::Parser;
use log::{debug, info};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Overrides `[server] port` and `PORT`.
    #[arg(short, long)]
    port: Option<u16>,
    #[arg(long)]
    host: Option<String>,
    #[arg(short, long, default_value_t = String::from("configuration.toml"))]
    configuration_path: String,
    /// Overrides `[database] url` and `DATABASE_URL`.
    #[arg(short, long)]
    database_url: Option<String>,
}

impl Args {
    fn apply(self, config: &mut Configuration) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(url) = self.database_url {
            config.database.url = url;
        }
    }
}

pub async fn run() -> Result<(), anyhow::Error> {
    let args = Args::parse();

    debug!("Configuration path: {}", args.configuration_path);
    let mut config = Configuration::load(&args.configuration_path)?;
    args.apply(&mut config);
    debug!("Loaded configuration: {config:?}");

    // Check the database connection
    let mut db_connector = SQLConnector::new(&config.database.url);
    db_connector
        .connect()
        .await
        .with_context(|| format!("Failed to connect to {}", config.database.url))?;
    db_connector.check().await?;
    db_connector.initialize().await?;

    let db_connector = server::run(&config, db_connector).await?;
    db_connector.close().await?;
    info!("Database connection closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_configuration() {
        let args = Args::parse_from([
            "holonet",
            "--port",
            "9000",
            "--database-url",
            "sqlite://flags.db?mode=rwc",
        ]);
        let mut config = Configuration::default();
        args.apply(&mut config);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.database.url, "sqlite://flags.db?mode=rwc");
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn no_flags_leave_configuration_alone() {
        let args = Args::parse_from(["holonet"]);
        assert_eq!(args.configuration_path, "configuration.toml");
        let mut config = Configuration::default();
        args.apply(&mut config);
        assert_eq!(config, Configuration::default());
    }
}
