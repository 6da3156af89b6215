mod cli;
pub mod data;
pub(crate) mod entity;
mod server;
#[cfg(test)]
mod test_support;

use env_logger::Env;
use log::error;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if let Err(e) = cli::run().await {
        error!("{e:#}");
        std::process::exit(1);
    }
}
