//! Pocket Shop Storefront library.
//!
//! The cart store is the system of record: one cart value, persisted in a
//! key/value [`storage::Storage`], mutated through [`cart::CartStore`], and
//! mirrored onto every bound surface of a [`view::Document`] after each
//! change. The [`catalog`] module supplies products, search, and prices for
//! the UI code that calls into the store.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod storage;
pub mod view;
