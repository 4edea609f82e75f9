//! Removal configuration and the reloadable snapshot provider

pub mod removal;
pub mod provider;

pub use removal::{RemovalConfig, RemovalMode, MIN_SCAN_DELAY_TICKS};
pub use provider::ConfigProvider;
