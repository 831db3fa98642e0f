pub mod config;
pub mod data;
pub mod items;
pub mod metrics;
