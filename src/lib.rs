// Main library entry point for shadergraph.

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::{discover, DiscoveryError, FunctionIdentity};
