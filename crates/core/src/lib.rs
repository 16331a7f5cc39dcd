//! Core business logic for Bursar.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `billing` - Fee obligations, payment reconciliation, and invoice arithmetic

pub mod billing;
