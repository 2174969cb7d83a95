pub mod bridge;
pub mod config;
pub mod language;
pub mod speech;
