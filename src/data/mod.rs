pub mod configuration;
pub mod dbconnector;
pub mod error;
pub mod password;
pub mod repository;
