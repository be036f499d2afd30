//! Configuration module for fleetcost
//!
//! - Config directory resolution
//! - User settings persistence (category overrides, usage defaults, logging)

pub mod paths;
pub mod settings;

pub use paths::FleetPaths;
pub use settings::Settings;
