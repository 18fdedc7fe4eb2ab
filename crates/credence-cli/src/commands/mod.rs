//! Command implementations.

mod analyze;
mod config;
mod health;

pub use analyze::execute_analyze;
pub use config::execute_config;
pub use health::execute_health;
