// Library root: the binary and the integration tests use these modules

pub mod autostart;
pub mod config;
pub mod display;
pub mod error;
pub mod interface_repo;
pub mod models;
pub mod rate;
pub mod sampler;
pub mod selector;
