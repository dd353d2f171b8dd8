//! GoMarketplace Core - Shared cart domain types.
//!
//! This crate provides the types used across all GoMarketplace components:
//! - `cart` - Session-scoped cart store with local persistence
//! - `cli` - Command-line driver for the cart store
//!
//! # Architecture
//!
//! The core crate contains only types and the pure cart mutation rules - no
//! I/O, no storage access, no async runtime. This keeps it lightweight and
//! allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices and quantities,
//!   plus the line-item and cart types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
