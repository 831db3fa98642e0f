pub mod config;
pub mod session;
pub mod telemetry;

pub use config::{ImportSettings, LabConfig, LogFormat};
pub use session::ReviewSession;
