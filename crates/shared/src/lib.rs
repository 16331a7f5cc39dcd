//! Shared auth and configuration for Bursar.
//!
//! This crate provides common types used across all other crates:
//! - JWT claims and token validation
//! - Configuration management

pub mod auth;
pub mod config;
pub mod jwt;

pub use auth::Claims;
pub use config::AppConfig;
pub use jwt::{JwtConfig, JwtError, JwtService};
