//! Shopfront Core - Shared types library.
//!
//! This crate provides the types and pure helpers used by the storefront
//! client (`shopfront-web`) and its tests:
//! - identifiers and wire types for the cart and search endpoints
//! - validation predicates for email addresses and phone numbers
//! - currency formatting
//!
//! # Architecture
//!
//! The core crate contains only types and functions - no I/O, no DOM access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere,
//! including `wasm32-unknown-unknown`.
//!
//! # Modules
//!
//! - [`types`] - IDs, wire payloads, validation predicates and price formatting

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
