//! The cart: an ordered list of line-items keyed by product ID.
//!
//! All mutation rules live here so that they can be exercised without any
//! storage or runtime. Every mutating method reports whether the cart
//! actually changed, which callers use to decide whether to notify
//! observers and persist.

use serde::{Deserialize, Serialize, Serializer};

use super::{LineItem, NewLineItem, Price};

/// Errors that can occur when decoding a [`Cart`] from its stored form.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartDecodeError {
    /// The same product ID appears on more than one line.
    #[error("duplicate product id in cart: {0}")]
    DuplicateId(String),
}

/// An ordered collection of line-items.
///
/// ## Invariants
///
/// - At most one line-item per product ID
/// - Insertion order is preserved
/// - Every quantity is at least 1
///
/// Serializes as a bare JSON array of line-items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from line-items, rejecting duplicate product IDs.
    ///
    /// # Errors
    ///
    /// Returns `CartDecodeError::DuplicateId` if two lines share an ID.
    pub fn from_items(items: Vec<LineItem>) -> Result<Self, CartDecodeError> {
        for (index, item) in items.iter().enumerate() {
            if items.iter().skip(index + 1).any(|other| other.id == item.id) {
                return Err(CartDecodeError::DuplicateId(item.id.to_string()));
            }
        }
        Ok(Self { items })
    }

    /// Decode a cart from its stored JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed JSON, zero quantities or duplicate IDs.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Encode the cart into its stored JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// The line-items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Iterate over the line-items in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no line-items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line-item by product ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Add a product to the cart.
    ///
    /// If the product is already present its quantity goes up by one and
    /// the incoming title, image and price are ignored. Otherwise the
    /// product is appended with a quantity of one.
    pub fn add(&mut self, item: NewLineItem) -> bool {
        if self.get(item.id.as_str()).is_some() {
            return self.increment(item.id.as_str());
        }
        self.items.push(LineItem::from(item));
        true
    }

    /// Increase the quantity of a product by one.
    ///
    /// Unknown IDs are ignored.
    pub fn increment(&mut self, id: &str) -> bool {
        let Some(item) = self.get_mut(id) else {
            return false;
        };
        match item.quantity.incremented() {
            Some(quantity) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Decrease the quantity of a product by one.
    ///
    /// A line with a single unit is left as it is: it is neither removed
    /// nor zeroed. Unknown IDs are ignored.
    pub fn decrement(&mut self, id: &str) -> bool {
        let Some(item) = self.get_mut(id) else {
            return false;
        };
        match item.quantity.decremented() {
            Some(quantity) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }
}

impl TryFrom<Vec<LineItem>> for Cart {
    type Error = CartDecodeError;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        Self::from_items(items)
    }
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::Quantity;

    fn product(id: &str, cents: i64) -> NewLineItem {
        NewLineItem::new(id, format!("Product {id}"), format!("https://img/{id}.png"), Price::from_cents(cents))
    }

    fn cart_with(quantities: &[(&str, u32)]) -> Cart {
        let mut cart = Cart::new();
        for (id, qty) in quantities {
            for _ in 0..*qty {
                cart.add(product(id, 1000));
            }
        }
        cart
    }

    // =========================================================================
    // add
    // =========================================================================

    #[test]
    fn test_add_new_product_to_empty_cart() {
        let mut cart = Cart::new();
        assert!(cart.add(product("p1", 1000)));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].id, "p1");
        assert_eq!(cart.items()[0].quantity, Quantity::ONE);
    }

    #[test]
    fn test_add_same_product_twice_keeps_first_fields() {
        let mut cart = Cart::new();
        cart.add(NewLineItem::new("p1", "First", "first.png", Price::from_cents(1000)));
        cart.add(NewLineItem::new("p1", "Second", "second.png", Price::from_cents(9999)));

        assert_eq!(cart.len(), 1);
        let item = &cart.items()[0];
        assert_eq!(item.quantity.get(), 2);
        assert_eq!(item.title, "First");
        assert_eq!(item.image_url, "first.png");
        assert_eq!(item.price, Price::from_cents(1000));
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let cart = cart_with(&[("b", 1), ("a", 1), ("c", 1)]);
        let ids: Vec<_> = cart.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, ["b", "a", "c"]);
    }

    // =========================================================================
    // increment
    // =========================================================================

    #[test]
    fn test_increment_only_touches_matching_item() {
        let mut cart = cart_with(&[("p1", 1), ("p2", 1)]);
        assert!(cart.increment("p2"));

        assert_eq!(cart.get("p1").unwrap().quantity.get(), 1);
        assert_eq!(cart.get("p2").unwrap().quantity.get(), 2);
    }

    #[test]
    fn test_increment_absent_id_is_noop() {
        let mut cart = cart_with(&[("p1", 2)]);
        let before = cart.to_json().unwrap();

        assert!(!cart.increment("missing"));
        assert_eq!(cart.to_json().unwrap(), before);
    }

    // =========================================================================
    // decrement
    // =========================================================================

    #[test]
    fn test_decrement_from_three_to_two() {
        let mut cart = cart_with(&[("p1", 3)]);
        assert!(cart.decrement("p1"));
        assert_eq!(cart.get("p1").unwrap().quantity.get(), 2);
    }

    /// Decrementing a single unit keeps the line in the cart at quantity 1.
    /// Kept as-is; removing the line here would be a product change.
    #[test]
    fn test_decrement_at_one_does_not_remove_item() {
        let mut cart = cart_with(&[("p1", 1)]);

        assert!(!cart.decrement("p1"));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get("p1").unwrap().quantity, Quantity::ONE);
    }

    #[test]
    fn test_decrement_absent_id_is_noop() {
        let mut cart = cart_with(&[("p1", 2)]);
        assert!(!cart.decrement("missing"));
        assert_eq!(cart.get("p1").unwrap().quantity.get(), 2);
    }

    // =========================================================================
    // serialization
    // =========================================================================

    #[test]
    fn test_json_round_trip_preserves_order_and_fields() {
        let mut cart = cart_with(&[("z", 2), ("a", 1)]);
        cart.add(NewLineItem::new("m", "Mango", "m.png", Price::from_cents(1999)));

        let json = cart.to_json().unwrap();
        let decoded = Cart::from_json(&json).unwrap();
        assert_eq!(decoded, cart);
    }

    #[test]
    fn test_json_round_trip_keeps_high_precision_prices() {
        let mut cart = Cart::new();
        for (id, price) in [("fine", "0.1234567890123456789"), ("wide", "123456789.123456789")] {
            cart.add(NewLineItem::new(id, id, "x.png", price.parse().unwrap()));
        }

        let json = cart.to_json().unwrap();
        let decoded = Cart::from_json(&json).unwrap();
        assert_eq!(decoded, cart);
        assert_eq!(decoded.to_json().unwrap(), json);
    }

    #[test]
    fn test_decode_rejects_out_of_range_price() {
        let json = r#"[{"id":"p1","title":"T","image_url":"u","price":1e30,"quantity":1}]"#;
        assert!(Cart::from_json(json).is_err());
    }

    #[test]
    fn test_serializes_as_bare_array() {
        let cart = cart_with(&[("p1", 1)]);
        let value: serde_json::Value = serde_json::from_str(&cart.to_json().unwrap()).unwrap();
        assert!(value.is_array());
        assert_eq!(Cart::new().to_json().unwrap(), "[]");
    }

    #[test]
    fn test_decode_rejects_duplicate_ids() {
        let json = r#"[
            {"id":"p1","title":"T","image_url":"u","price":10,"quantity":1},
            {"id":"p1","title":"T","image_url":"u","price":10,"quantity":2}
        ]"#;
        assert!(Cart::from_json(json).is_err());
    }

    #[test]
    fn test_decode_rejects_zero_quantity() {
        let json = r#"[{"id":"p1","title":"T","image_url":"u","price":10,"quantity":0}]"#;
        assert!(Cart::from_json(json).is_err());
    }

    #[test]
    fn test_decode_rejects_null() {
        assert!(Cart::from_json("null").is_err());
    }

    // =========================================================================
    // totals
    // =========================================================================

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        cart.add(NewLineItem::new("a", "A", "a.png", Price::from_cents(250)));
        cart.add(NewLineItem::new("a", "A", "a.png", Price::from_cents(250)));
        cart.add(NewLineItem::new("b", "B", "b.png", Price::from_cents(1000)));

        assert_eq!(cart.total_quantity(), 3);
        assert_eq!(cart.subtotal(), Price::from_cents(1500));
        assert_eq!(Cart::new().subtotal(), Price::ZERO);
    }
}
