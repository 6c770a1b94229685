// Library for tests to access modules

pub mod analysis;
pub mod cmdb_client;
pub mod config;
pub mod models;
pub mod report;
pub mod routes;
pub mod version;
pub mod worker;
