pub mod config;
pub mod controller;
pub mod data_models;
pub mod errors;
pub mod navigator;
pub mod pagination;
pub mod query_state;
pub mod renderer;
pub mod search_client;
pub mod telemetry;
