//! Roster Core - Shared types library.
//!
//! This crate provides common types used across all Roster components:
//! - `admin` - Record store, JSON API, API client and dashboard
//! - `cli` - Command-line front end over the API client
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients,
//! no storage. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - The `User` record, its create payload, and the `UserId` newtype

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
