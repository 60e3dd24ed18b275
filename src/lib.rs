// Library for tests to access modules

pub mod config;
pub mod history;
pub mod models;
pub mod monitor_repo;
pub mod routes;
pub mod scale;
pub mod version;
pub mod worker;
