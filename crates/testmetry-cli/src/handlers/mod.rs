pub mod components;
pub mod config;
pub mod contexts;
pub mod export;
pub mod metrics;
pub mod pipelines;
pub mod resources;
pub mod sessions;
