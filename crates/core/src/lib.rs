//! Pocket Shop Core - Shared types library.
//!
//! This crate provides the types shared by all Pocket Shop components:
//! - `storefront` - Cart store, catalog, and view synchronization
//! - `cli` - Command-line front end driving the cart store
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no storage
//! access, no HTTP clients. Every cart mutation here is a plain function over
//! an in-memory [`Cart`]; persistence and rendering live in the storefront
//! crate.
//!
//! # Modules
//!
//! - [`types`] - Product ids, line items, the cart, add requests, and currency

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
