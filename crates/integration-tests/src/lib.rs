//! Integration tests for GoMarketplace.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p go-marketplace-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_session` - Full cart sessions against on-disk device storage
//!
//! The helpers here give each test its own throwaway device directory.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use go_marketplace_cart::{CART_STORAGE_KEY, CartProvider, FileStore};
use go_marketplace_core::{NewLineItem, Price};
use tempfile::TempDir;

/// A fake device: a temporary directory backing a `FileStore`.
pub struct TestDevice {
    dir: TempDir,
}

impl TestDevice {
    /// Create a device with empty storage.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    /// A store over this device's storage.
    #[must_use]
    pub fn store(&self) -> FileStore {
        FileStore::new(self.dir.path())
    }

    /// Start a cart session on this device, as an app launch would.
    pub async fn launch(&self) -> CartProvider {
        CartProvider::start(Arc::new(self.store()), CART_STORAGE_KEY).await
    }

    /// Raw stored cart blob, if any.
    #[must_use]
    pub fn stored_blob(&self) -> Option<String> {
        std::fs::read_to_string(self.store().path_for(CART_STORAGE_KEY)).ok()
    }

    /// Overwrite the stored cart blob directly.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    #[allow(clippy::expect_used)]
    pub fn write_blob(&self, blob: &str) {
        std::fs::write(self.store().path_for(CART_STORAGE_KEY), blob)
            .expect("Failed to write stored cart");
    }
}

impl Default for TestDevice {
    fn default() -> Self {
        Self::new()
    }
}

/// A product as the catalogue would offer it.
#[must_use]
pub fn product(id: &str, title: &str, cents: i64) -> NewLineItem {
    NewLineItem::new(
        id,
        title,
        format!("https://cdn.gomarketplace.test/{id}.png"),
        Price::from_cents(cents),
    )
}
