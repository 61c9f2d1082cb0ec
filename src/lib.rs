//! Library exports for animerec, shared between the binary and tests.

pub mod client;
pub mod config;
pub mod guard;
pub mod models;
pub mod services;
pub mod session;
pub mod startup;
pub mod state;
pub mod store;
pub mod utils;
