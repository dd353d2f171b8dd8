//! GoMarketplace cart store.
//!
//! Holds the shopping cart for one client session and mirrors it to local
//! device storage so it survives restarts.
//!
//! # Lifecycle
//!
//! 1. [`CartProvider::start`] hydrates the cart from storage (once) and
//!    spawns the background writer.
//! 2. Consumers get a [`CartHandle`] from [`CartProvider::cart`] and call
//!    `add_to_cart`, `increment` and `decrement`. Mutations apply
//!    synchronously; persistence follows in the background.
//! 3. [`CartProvider::shutdown`] flushes and ends the session.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use go_marketplace_cart::{CartProvider, MemoryStore};
//! use go_marketplace_core::{NewLineItem, Price};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), go_marketplace_cart::CartError> {
//! let provider = CartProvider::start(Arc::new(MemoryStore::new()), "GoMarketPlace@Cart").await;
//! let cart = provider.cart();
//!
//! cart.add_to_cart(NewLineItem::new("p1", "Pineapple", "https://img/p1.png", Price::from_cents(1000)))?;
//! cart.increment("p1")?;
//! assert_eq!(cart.snapshot()?.total_quantity(), 2);
//!
//! provider.shutdown().await;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
mod persistence;
pub mod provider;
pub mod storage;

pub use config::{CART_STORAGE_KEY, CartConfig, ConfigError, LogFormat};
pub use error::{CartError, Result};
pub use provider::{CartHandle, CartProvider};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
