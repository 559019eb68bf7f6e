// Public API for integration tests and potential library usage

pub mod config;
pub mod history;
pub mod hub;
pub mod lifecycle;
pub mod protocol;
pub mod registry;
pub mod results;
pub mod state;
pub mod timer;
pub mod types;
pub mod ws;
