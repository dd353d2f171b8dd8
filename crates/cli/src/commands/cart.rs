//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! gm-cli list
//!
//! # Add a product (or bump its quantity if already present)
//! gm-cli add --id p1 --title "Pineapple" --image-url https://img/p1.png --price 10
//!
//! # Change quantities
//! gm-cli increment p1
//! gm-cli decrement p1
//! ```
//!
//! # Environment Variables
//!
//! - `GOMARKETPLACE_STORAGE_DIR` - Device storage directory
//! - `GOMARKETPLACE_CART_KEY` - Storage key of the cart

use std::fmt::Write as _;

use go_marketplace_cart::{CartConfig, CartError, CartHandle, CartProvider, ConfigError};
use go_marketplace_core::{Cart, NewLineItem};
use thiserror::Error;

/// Errors that can occur while running a cart command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The cart session rejected the call.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),
}

/// A single cart operation requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    List,
    Add(NewLineItem),
    Increment(String),
    Decrement(String),
}

/// Apply `action` to the cart.
///
/// # Errors
///
/// Returns `CliError::Cart` if the session has already ended.
pub fn apply(cart: &CartHandle, action: CartAction) -> Result<(), CliError> {
    match action {
        CartAction::List => {}
        CartAction::Add(item) => {
            tracing::info!(product_id = %item.id, "Adding to cart");
            cart.add_to_cart(item)?;
        }
        CartAction::Increment(id) => {
            tracing::info!(product_id = %id, "Incrementing");
            cart.increment(&id)?;
        }
        CartAction::Decrement(id) => {
            tracing::info!(product_id = %id, "Decrementing");
            cart.decrement(&id)?;
        }
    }
    Ok(())
}

/// Run `action` as one cart session over the configured storage.
///
/// The stored cart is hydrated, the action applied, and the session shut
/// down so the resulting cart is on disk before this returns.
///
/// # Errors
///
/// Returns `CliError::Cart` if the session rejects the action.
pub async fn execute(config: &CartConfig, action: CartAction) -> Result<Cart, CliError> {
    let provider = CartProvider::from_config(config).await;
    let cart = provider.cart();

    let applied = apply(&cart, action);
    let snapshot = cart.snapshot();
    provider.shutdown().await;

    applied?;
    Ok(snapshot?)
}

/// Render the cart as a plain-text table.
#[must_use]
pub fn render(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let mut out = String::new();
    for item in cart {
        let _ = writeln!(
            out,
            "{:<12} {:<30} x{:<4} {:>10} {:>10}",
            item.id,
            item.title,
            item.quantity,
            item.price.to_string(),
            item.line_total().to_string(),
        );
    }
    let _ = writeln!(
        out,
        "Items: {}  Subtotal: {}",
        cart.total_quantity(),
        cart.subtotal()
    );
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use go_marketplace_cart::FileStore;
    use go_marketplace_core::Price;

    use super::*;

    fn config_in(dir: &tempfile::TempDir) -> CartConfig {
        CartConfig {
            storage_dir: dir.path().to_path_buf(),
            ..CartConfig::default()
        }
    }

    fn stored_cart(config: &CartConfig) -> Cart {
        let path = FileStore::new(&config.storage_dir).path_for(&config.storage_key);
        Cart::from_json(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_each_command_is_written_before_exit() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let pineapple = NewLineItem::new("p1", "Pineapple", "u", Price::from_cents(1000));

        let cart = execute(&config, CartAction::Add(pineapple)).await.unwrap();
        assert_eq!(cart.get("p1").unwrap().quantity.get(), 1);
        assert_eq!(stored_cart(&config), cart);

        execute(&config, CartAction::Increment("p1".to_string())).await.unwrap();
        assert_eq!(stored_cart(&config).get("p1").unwrap().quantity.get(), 2);

        execute(&config, CartAction::Decrement("p1".to_string())).await.unwrap();
        assert_eq!(stored_cart(&config).get("p1").unwrap().quantity.get(), 1);

        execute(&config, CartAction::Decrement("p1".to_string())).await.unwrap();
        let stored = stored_cart(&config);
        assert_eq!(stored.len(), 1);
        assert_eq!(stored.get("p1").unwrap().quantity.get(), 1);
    }

    #[tokio::test]
    async fn test_list_reads_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);

        let cart = execute(&config, CartAction::List).await.unwrap();
        assert!(cart.is_empty());
        assert!(!FileStore::new(&config.storage_dir).path_for(&config.storage_key).exists());
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&Cart::new()), "Cart is empty\n");
    }

    #[test]
    fn test_render_lines_and_totals() {
        let mut cart = Cart::new();
        cart.add(NewLineItem::new("p1", "Pineapple", "u", Price::from_cents(1000)));
        cart.add(NewLineItem::new("p1", "Pineapple", "u", Price::from_cents(1000)));
        cart.add(NewLineItem::new("p2", "Mango", "u", Price::from_cents(250)));

        let output = render(&cart);
        let lines: Vec<_> = output.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines.first().unwrap().starts_with("p1"));
        assert!(lines.first().unwrap().contains("$20.00"));
        assert!(lines.get(1).unwrap().contains("Mango"));
        assert_eq!(*lines.last().unwrap(), "Items: 3  Subtotal: $22.50");
    }
}
